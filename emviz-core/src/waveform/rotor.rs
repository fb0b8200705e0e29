//! Constant-speed rotor (DC motor armature).
use serde::{Deserialize, Serialize};

use super::Waveform;
use crate::error::{ensure_finite, ParameterError};
use crate::sample::{Channel, WaveformSample};
use crate::units::AngularSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotorParameters {
    angular_speed: AngularSpeed,
    /// Clockwise as seen from +Z, i.e. a negative angle about Z.
    clockwise: bool,
}

impl RotorParameters {
    pub fn new(angular_speed: AngularSpeed, clockwise: bool) -> Result<Self, ParameterError> {
        let params = Self {
            angular_speed,
            clockwise,
        };
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

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// Signed angular velocity about +Z.
    pub fn signed_velocity(&self) -> f64 {
        let omega = self.angular_speed.rad_per_sec();
        if self.clockwise {
            -omega
        } else {
            omega
        }
    }
}

impl Default for RotorParameters {
    fn default() -> Self {
        Self {
            angular_speed: AngularSpeed::from_rad_per_sec(2.0),
            clockwise: true,
        }
    }
}

impl Waveform for RotorParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        let velocity = self.signed_velocity();
        let theta = velocity * t;
        WaveformSample::new(t)
            .with(Channel::AngleRad, theta)
            .with(Channel::AngleDeg, theta.to_degrees())
            .with(Channel::AngularVelocity, velocity)
    }
}
