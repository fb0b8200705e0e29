//! emviz Web - wasm binding for browser-side scene renderers
//!
//! The browser owns the drawing; this crate hands it one JSON sample per
//! animation frame, timed by `performance.now()`.

use emviz_core::{
    Channel, ConfigError, Driver, TimeSource, Visualization, VisualizationConfig,
    WaveformParameters, WaveformSample,
};
use wasm_bindgen::prelude::*;

/// `performance.now()` in seconds, or zero outside a browser window.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceTimeSource;

impl TimeSource for PerformanceTimeSource {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or(0.0)
    }
}

#[wasm_bindgen]
pub struct WebDriver {
    driver: Driver<PerformanceTimeSource>,
}

#[wasm_bindgen]
impl WebDriver {
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> Result<WebDriver, JsValue> {
        let visualization = parse_visualization(name).map_err(to_js)?;
        Ok(Self::mount(visualization, visualization.default_parameters()))
    }

    /// Driver whose parameters come from a TOML document.
    pub fn with_config(name: &str, toml: &str) -> Result<WebDriver, JsValue> {
        let visualization = parse_visualization(name).map_err(to_js)?;
        let config = VisualizationConfig::from_toml_str(toml).map_err(to_js)?;
        Ok(Self::mount(visualization, config.parameters(visualization)))
    }

    pub fn name(&self) -> String {
        self.driver.visualization().name().to_string()
    }

    pub fn title(&self) -> String {
        self.driver.visualization().title().to_string()
    }

    /// Sample at the current clock time, as JSON.
    pub fn sample(&self) -> Result<String, JsValue> {
        sample_json(&self.driver.sample()).map_err(to_js)
    }

    pub fn sample_at(&self, time: f64) -> Result<String, JsValue> {
        sample_json(&self.driver.sample_at(time)).map_err(to_js)
    }

    /// One channel at `time`; `undefined` when the card does not emit it.
    pub fn channel(&self, name: &str, time: f64) -> Result<Option<f64>, JsValue> {
        let channel: Channel = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        Ok(self.driver.sample_at(time).get(channel))
    }

    /// Readout lines at `time`, joined with newlines.
    pub fn readouts(&self, time: f64) -> String {
        self.driver
            .readouts(&self.driver.sample_at(time))
            .join("\n")
    }

    pub fn elapsed(&self) -> f64 {
        self.driver.clock().elapsed()
    }

    pub fn reset(&mut self) {
        self.driver.clock_mut().reset();
    }

    pub fn toggle_pause(&mut self) {
        self.driver.clock_mut().toggle_pause();
    }

    pub fn is_paused(&self) -> bool {
        self.driver.clock().is_paused()
    }
}

impl WebDriver {
    fn mount(visualization: Visualization, params: WaveformParameters) -> Self {
        tracing::debug!(visualization = %visualization, "mounting web driver");
        Self {
            driver: Driver::new(visualization, params, PerformanceTimeSource),
        }
    }
}

/// Names of every card, for building a picker.
#[wasm_bindgen]
pub fn visualizations() -> Vec<String> {
    Visualization::ALL
        .iter()
        .map(|v| v.name().to_string())
        .collect()
}

fn parse_visualization(name: &str) -> Result<Visualization, ConfigError> {
    name.parse()
}

fn sample_json(sample: &WaveformSample) -> Result<String, serde_json::Error> {
    serde_json::to_string(sample)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
