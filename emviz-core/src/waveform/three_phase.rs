//! Balanced polyphase currents, rotating field and slipping rotor.
//!
//! Phase `k` of `N` carries `A·cos(ωt − 2πk/N)` and its winding sits at
//! angle `2πk/N`. The field rotates at `ω`; the rotor follows at `slip·ω`
//! with `slip` strictly inside (0, 1), so it always lags.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::Waveform;
use crate::error::{ensure_positive, ParameterError};
use crate::sample::{Channel, WaveformSample};
use crate::units::AngularSpeed;

/// Most phases a system may carry; every frame allocates one current per phase.
pub const MAX_PHASES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThreePhaseOverrides")]
pub struct ThreePhaseParameters {
    angular_speed: AngularSpeed,
    amplitude: f64,
    phase_count: usize,
    slip: f64,
}

impl ThreePhaseParameters {
    pub fn new(
        angular_speed: AngularSpeed,
        amplitude: f64,
        phase_count: usize,
        slip: f64,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            angular_speed,
            amplitude,
            phase_count,
            slip,
        };
        params.validate()?;
        Ok(params)
    }

    /// Three phases, unit amplitude.
    pub fn three_phase(angular_speed: AngularSpeed, slip: f64) -> Result<Self, ParameterError> {
        Self::new(angular_speed, 1.0, 3, slip)
    }

    /// Defaults for the rotating-field card: a slightly faster field than the
    /// motor card, with the rotor barely slipping.
    pub fn rotating_field() -> Self {
        Self {
            angular_speed: AngularSpeed::from_rad_per_sec(1.5),
            slip: 0.95,
            ..Self::default()
        }
    }

    /// The field must turn forwards: with ω ≤ 0 the rotor would no longer lag.
    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_positive("angular_speed", self.angular_speed.rad_per_sec())?;
        ensure_positive("amplitude", self.amplitude)?;
        if self.phase_count < 3 {
            return Err(ParameterError::TooFewPhases(self.phase_count));
        }
        if self.phase_count > MAX_PHASES {
            return Err(ParameterError::TooManyPhases {
                count: self.phase_count,
                max: MAX_PHASES,
            });
        }
        if !(self.slip > 0.0 && self.slip < 1.0) {
            return Err(ParameterError::SlipOutOfRange(self.slip));
        }
        Ok(())
    }

    pub fn angular_speed(&self) -> AngularSpeed {
        self.angular_speed
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn phase_count(&self) -> usize {
        self.phase_count
    }

    pub fn slip(&self) -> f64 {
        self.slip
    }

    pub fn field_speed(&self) -> AngularSpeed {
        self.angular_speed
    }

    pub fn rotor_speed(&self) -> AngularSpeed {
        self.angular_speed.scaled(self.slip)
    }

    /// Electrical offset (and winding angle) of phase `k`.
    pub fn phase_offset(&self, k: usize) -> f64 {
        TAU * k as f64 / self.phase_count as f64
    }

    pub fn phases(&self, t: f64) -> Vec<f64> {
        let wt = self.angular_speed.angle_at(t);
        (0..self.phase_count)
            .map(|k| self.amplitude * (wt - self.phase_offset(k)).cos())
            .collect()
    }

    /// Sum of each phase magnitude along its winding axis, as (x, y).
    pub fn net_vector(&self, phases: &[f64]) -> (f64, f64) {
        phases
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(x, y), (k, magnitude)| {
                let axis = self.phase_offset(k);
                (x + magnitude * axis.cos(), y + magnitude * axis.sin())
            })
    }
}

impl Default for ThreePhaseParameters {
    fn default() -> Self {
        Self {
            angular_speed: AngularSpeed::from_rad_per_sec(1.4),
            amplitude: 1.0,
            phase_count: 3,
            slip: 0.92,
        }
    }
}

/// One TOML section: every field optional, filled from a base set.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThreePhaseOverrides {
    pub angular_speed: Option<AngularSpeed>,
    pub amplitude: Option<f64>,
    pub phase_count: Option<usize>,
    pub slip: Option<f64>,
}

impl ThreePhaseOverrides {
    pub fn over(self, base: ThreePhaseParameters) -> ThreePhaseParameters {
        ThreePhaseParameters {
            angular_speed: self.angular_speed.unwrap_or(base.angular_speed),
            amplitude: self.amplitude.unwrap_or(base.amplitude),
            phase_count: self.phase_count.unwrap_or(base.phase_count),
            slip: self.slip.unwrap_or(base.slip),
        }
    }
}

impl From<ThreePhaseOverrides> for ThreePhaseParameters {
    fn from(overrides: ThreePhaseOverrides) -> Self {
        overrides.over(Self::default())
    }
}

impl Waveform for ThreePhaseParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        let phases = self.phases(t);
        let (x, y) = self.net_vector(&phases);

        let mut sample = WaveformSample::new(t)
            .with(Channel::AngularVelocity, self.field_speed().rad_per_sec())
            .with(Channel::FieldAngle, self.field_speed().angle_at(t))
            .with(Channel::RotorAngle, self.rotor_speed().angle_at(t))
            .with(Channel::RotorVelocity, self.rotor_speed().rad_per_sec())
            .with(Channel::NetVectorAngle, y.atan2(x))
            .with(Channel::NetVectorMagnitude, x.hypot(y));
        sample.set_phases(phases);
        sample
    }
}
