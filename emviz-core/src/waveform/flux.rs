//! Pulsing transformer core flux.
//!
//! Every flux element in a scene (core glow, direction arrows) reads the
//! same intensity from one sample so they never drift apart.

use serde::{Deserialize, Serialize};

use super::Waveform;
use crate::error::{ensure_finite, ParameterError};
use crate::sample::{Channel, WaveformSample};
use crate::units::AngularSpeed;

/// Opacity of the flux tube at zero intensity.
pub const MIN_FLUX_OPACITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FluxParameters {
    angular_speed: AngularSpeed,
}

impl FluxParameters {
    pub fn new(angular_speed: AngularSpeed) -> Result<Self, ParameterError> {
        let params = Self { angular_speed };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_finite("angular_speed", self.angular_speed.rad_per_sec())?;
        Ok(())
    }

    pub fn angular_speed(&self) -> AngularSpeed {
        self.angular_speed
    }

    /// `(sin ωt + 1) / 2`, always in `[0, 1]`.
    pub fn intensity_at(&self, t: f64) -> f64 {
        ((self.angular_speed.angle_at(t).sin() + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

impl Default for FluxParameters {
    fn default() -> Self {
        Self {
            angular_speed: AngularSpeed::from_rad_per_sec(3.0),
        }
    }
}

impl Waveform for FluxParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        let intensity = self.intensity_at(t);
        WaveformSample::new(t)
            .with(Channel::AngularVelocity, self.angular_speed.rad_per_sec())
            .with(Channel::FluxIntensity, intensity)
            .with(
                Channel::FluxOpacity,
                MIN_FLUX_OPACITY + intensity * (1.0 - MIN_FLUX_OPACITY),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::test_support::{assert_close, probe_times};

    #[test]
    fn intensity_starts_at_half() {
        assert_close(FluxParameters::default().sample(0.0).value(Channel::FluxIntensity), 0.5);
    }

    #[test]
    fn intensity_and_opacity_stay_in_range() {
        let flux = FluxParameters::default();
        for t in probe_times() {
            let sample = flux.sample(t);
            let i = sample.value(Channel::FluxIntensity);
            let o = sample.value(Channel::FluxOpacity);
            assert!((0.0..=1.0).contains(&i), "intensity {i} at t={t}");
            assert!((0.2..=1.0 + 1e-12).contains(&o), "opacity {o} at t={t}");
        }
    }

    #[test]
    fn peaks_a_quarter_period_in() {
        let flux = FluxParameters::default();
        let quarter = flux.angular_speed().period().unwrap() / 4.0;
        assert_close(flux.intensity_at(quarter), 1.0);
        assert_close(flux.sample(quarter).value(Channel::FluxOpacity), 1.0);
        assert!(flux.intensity_at(3.0 * quarter) < 1e-9);
    }
}
