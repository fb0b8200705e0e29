//! TOML overrides for visualization parameters.
//!
//! Every section is optional and every field inside a section falls back to
//! that family's default, so a partial file works:
//!
//! ```toml
//! [ac_generator]
//! angular_speed = "0.5 Hz"
//! peak_voltage = 230.0
//!
//! [induction_motor]
//! slip = 0.95
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::visualization::Visualization;
use crate::waveform::{
    DotProductParameters, FluxParameters, GeneratorParameters, ParticleFlowParameters,
    RotorParameters, ThreePhaseOverrides, ThreePhaseParameters, WaveformParameters,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizationConfig {
    pub dc_motor: RotorParameters,
    pub induction_motor: ThreePhaseParameters,
    #[serde(deserialize_with = "rotating_field_section")]
    pub rotating_field: ThreePhaseParameters,
    pub ac_generator: GeneratorParameters,
    pub transformer: FluxParameters,
    pub solenoid: ParticleFlowParameters,
    pub power_factor: DotProductParameters,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self::from_parameters(|v| v.default_parameters())
    }
}

impl VisualizationConfig {
    fn from_parameters(mut params_for: impl FnMut(Visualization) -> WaveformParameters) -> Self {
        let mut config = Self {
            dc_motor: RotorParameters::default(),
            induction_motor: ThreePhaseParameters::default(),
            rotating_field: ThreePhaseParameters::default(),
            ac_generator: GeneratorParameters::default(),
            transformer: FluxParameters::default(),
            solenoid: ParticleFlowParameters::default(),
            power_factor: DotProductParameters::default(),
        };
        for v in Visualization::ALL {
            config.set_parameters(v, params_for(v));
        }
        config
    }

    /// Parse and validate strictly; any invalid section is an error.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config = parse(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize config: {e}")))
    }

    pub fn parameters(&self, visualization: Visualization) -> WaveformParameters {
        match visualization {
            Visualization::DcMotor => self.dc_motor.into(),
            Visualization::InductionMotor => self.induction_motor.into(),
            Visualization::RotatingField => self.rotating_field.into(),
            Visualization::AcGenerator => self.ac_generator.into(),
            Visualization::Transformer => self.transformer.into(),
            Visualization::Solenoid => self.solenoid.clone().into(),
            Visualization::PowerFactor => self.power_factor.into(),
        }
    }

    /// Replace one section. Parameters of the wrong family are ignored.
    fn set_parameters(&mut self, visualization: Visualization, params: WaveformParameters) {
        match (visualization, params) {
            (Visualization::DcMotor, WaveformParameters::Rotor(p)) => self.dc_motor = p,
            (Visualization::InductionMotor, WaveformParameters::ThreePhase(p)) => {
                self.induction_motor = p
            }
            (Visualization::RotatingField, WaveformParameters::ThreePhase(p)) => {
                self.rotating_field = p
            }
            (Visualization::AcGenerator, WaveformParameters::Generator(p)) => {
                self.ac_generator = p
            }
            (Visualization::Transformer, WaveformParameters::Flux(p)) => self.transformer = p,
            (Visualization::Solenoid, WaveformParameters::ParticleFlow(p)) => self.solenoid = p,
            (Visualization::PowerFactor, WaveformParameters::DotProduct(p)) => {
                self.power_factor = p
            }
            (v, p) => warn!("ignoring {p:?} for {v}: parameter family mismatch"),
        }
    }

    /// Problems per section, as `"<section>: <reason>"`.
    pub fn issues(&self) -> Vec<(Visualization, String)> {
        Visualization::ALL
            .iter()
            .filter_map(|v| {
                self.parameters(*v)
                    .validate()
                    .err()
                    .map(|e| (*v, format!("{}: {e}", section_name(*v))))
            })
            .collect()
    }

    /// Run all validations, collecting every error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            let messages: Vec<String> = issues.into_iter().map(|(_, m)| m).collect();
            Err(ConfigError::ValidationError(messages.join("; ")))
        }
    }

    /// Reset every invalid section to its default, logging each one.
    pub fn sanitize(&mut self) -> usize {
        let issues = self.issues();
        for (v, message) in &issues {
            warn!("config validation warning: {message}; using defaults for [{}]", section_name(*v));
            self.set_parameters(*v, v.default_parameters());
        }
        issues.len()
    }
}

/// TOML section name for a visualization.
pub fn section_name(visualization: Visualization) -> &'static str {
    match visualization {
        Visualization::DcMotor => "dc_motor",
        Visualization::InductionMotor => "induction_motor",
        Visualization::RotatingField => "rotating_field",
        Visualization::AcGenerator => "ac_generator",
        Visualization::Transformer => "transformer",
        Visualization::Solenoid => "solenoid",
        Visualization::PowerFactor => "power_factor",
    }
}

/// Fields missing from `[rotating_field]` come from that card's defaults,
/// not the motor defaults the family falls back to.
fn rotating_field_section<'de, D>(deserializer: D) -> Result<ThreePhaseParameters, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = ThreePhaseOverrides::deserialize(deserializer)?;
    Ok(overrides.over(ThreePhaseParameters::rotating_field()))
}

fn parse(content: &str) -> Result<VisualizationConfig, ConfigError> {
    // Absent sections come from `VisualizationConfig::default`, i.e. the
    // card defaults; absent fields inside a section from the family default,
    // except `[rotating_field]` which fills from its own card.
    toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))
}

/// Load overrides from a file.
///
/// Unreadable or malformed files are errors. Sections that parse but fail
/// validation are logged and replaced by their defaults.
pub fn load_from_path(path: &Path) -> Result<VisualizationConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(format!("failed to read {}: {e}", path.display())))?;

    let mut config = parse(&content)?;
    let replaced = config.sanitize();

    info!(
        replaced_sections = replaced,
        "loaded visualization config from {}",
        path.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Channel;
    use crate::waveform::Waveform;
    use std::io::Write;

    #[test]
    fn empty_file_yields_card_defaults() {
        let config = VisualizationConfig::from_toml_str("").unwrap();
        assert_eq!(config, VisualizationConfig::default());
        for v in Visualization::ALL {
            assert_eq!(config.parameters(v), v.default_parameters());
        }
    }

    #[test]
    fn partial_section_keeps_other_fields() {
        let config = VisualizationConfig::from_toml_str(
            "[ac_generator]\nangular_speed = \"1 Hz\"\n",
        )
        .unwrap();
        assert_eq!(config.ac_generator.peak_voltage(), 12.0);
        let sample = config.parameters(Visualization::AcGenerator).sample(0.25);
        assert!((sample.value(Channel::Voltage) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn strict_parse_rejects_invalid_slip() {
        let err = VisualizationConfig::from_toml_str("[induction_motor]\nslip = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("induction_motor"));
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let err = VisualizationConfig::from_toml_str("[transformer]\nglow = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn validation_collects_every_section() {
        let content = "[induction_motor]\nslip = 0.0\n\n[solenoid]\nmarkers = 0\n";
        let err = VisualizationConfig::from_toml_str(content).unwrap_err().to_string();
        assert!(err.contains("induction_motor"));
        assert!(err.contains("solenoid"));
    }

    #[test]
    fn solenoid_path_can_be_overridden() {
        let content = "[solenoid]\nmarkers = 4\n\n[solenoid.path]\nkind = \"rectangle\"\nwidth = 4.0\nheight = 2.0\n";
        let config = VisualizationConfig::from_toml_str(content).unwrap();
        assert_eq!(config.solenoid.marker_count(), 4);
        let sample = config.parameters(Visualization::Solenoid).sample(0.0);
        assert_eq!(sample.markers()[0].position.z, 0.0);
    }

    #[test]
    fn partial_rotating_field_keeps_its_card_defaults() {
        let config = VisualizationConfig::from_toml_str("[rotating_field]\nslip = 0.9\n").unwrap();
        assert_eq!(config.rotating_field.angular_speed().rad_per_sec(), 1.5);
        assert_eq!(config.rotating_field.slip(), 0.9);
        assert_eq!(config.induction_motor, ThreePhaseParameters::default());
    }

    #[test]
    fn stalled_or_reversed_field_is_rejected() {
        for omega in ["0.0", "-1.4"] {
            let content = format!("[induction_motor]\nangular_speed = {omega}\n");
            let err = VisualizationConfig::from_toml_str(&content).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "omega {omega}");
        }
    }

    #[test]
    fn huge_counts_are_rejected_before_sampling() {
        for content in [
            "[induction_motor]\nphase_count = 9223372036854775807\n",
            "[rotating_field]\nphase_count = 100000\n",
            "[solenoid]\nmarkers = 9223372036854775807\n",
        ] {
            let err = VisualizationConfig::from_toml_str(content).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "{content}");
        }
    }

    #[test]
    fn unknown_rotating_field_keys_are_parse_errors() {
        let err = VisualizationConfig::from_toml_str("[rotating_field]\npoles = 4\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let config = VisualizationConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(VisualizationConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_from_path_replaces_invalid_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[induction_motor]\nslip = 1.5\n\n[transformer]\nangular_speed = 6.0").unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.induction_motor, ThreePhaseParameters::default());
        assert_eq!(config.transformer.angular_speed().rad_per_sec(), 6.0);
    }

    #[test]
    fn load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ac_generator\npeak_voltage = ").unwrap();
        assert!(matches!(load_from_path(file.path()), Err(ConfigError::ParseError(_))));
    }
}
