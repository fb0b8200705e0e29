//! Single rotating-coil AC generator.
//!
//! The coil angle is `θ = ω·t` and the displayed EMF is the rectified
//! magnitude `|sin θ|` scaled to a nominal peak. The angle is emitted
//! unwrapped; wrapping to one turn is a display concern.

use serde::{Deserialize, Serialize};

use super::Waveform;
use crate::error::{ensure_finite, ensure_positive, ParameterError};
use crate::sample::{Channel, WaveformSample};
use crate::units::AngularSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorParameters {
    angular_speed: AngularSpeed,
    peak_voltage: f64,
}

impl GeneratorParameters {
    pub fn new(angular_speed: AngularSpeed, peak_voltage: f64) -> Result<Self, ParameterError> {
        let params = Self {
            angular_speed,
            peak_voltage,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_finite("angular_speed", self.angular_speed.rad_per_sec())?;
        ensure_positive("peak_voltage", self.peak_voltage)?;
        Ok(())
    }

    pub fn angular_speed(&self) -> AngularSpeed {
        self.angular_speed
    }

    pub fn peak_voltage(&self) -> f64 {
        self.peak_voltage
    }

    pub fn voltage_at(&self, t: f64) -> f64 {
        self.angular_speed.angle_at(t).sin().abs() * self.peak_voltage
    }
}

impl Default for GeneratorParameters {
    fn default() -> Self {
        Self {
            angular_speed: AngularSpeed::from_hz(0.5),
            peak_voltage: 12.0,
        }
    }
}

impl Waveform for GeneratorParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        let theta = self.angular_speed.angle_at(t);
        WaveformSample::new(t)
            .with(Channel::AngleRad, theta)
            .with(Channel::AngleDeg, theta.to_degrees())
            .with(Channel::AngularVelocity, self.angular_speed.rad_per_sec())
            .with(Channel::Voltage, theta.sin().abs() * self.peak_voltage)
            .with(Channel::PeakVoltage, self.peak_voltage)
    }
}
