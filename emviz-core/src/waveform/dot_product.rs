//! Rotating vector projected onto a fixed reference (power-factor geometry).
use serde::{Deserialize, Serialize};

use super::Waveform;
use crate::error::{ensure_finite, ensure_positive, ParameterError};
use crate::sample::{Channel, WaveformSample};
use crate::units::AngularSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotProductParameters {
    angular_speed: AngularSpeed,
    radius: f64,
}

impl DotProductParameters {
    pub fn new(angular_speed: AngularSpeed, radius: f64) -> Result<Self, ParameterError> {
        let params = Self {
            angular_speed,
            radius,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_finite("angular_speed", self.angular_speed.rad_per_sec())?;
        ensure_positive("radius", self.radius)?;
        Ok(())
    }

    pub fn angular_speed(&self) -> AngularSpeed {
        self.angular_speed
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// `r·cos θ` for an explicit angle.
    pub fn projection_at_angle(&self, theta: f64) -> f64 {
        self.radius * theta.cos()
    }
}

impl Default for DotProductParameters {
    fn default() -> Self {
        Self {
            angular_speed: AngularSpeed::from_rad_per_sec(0.5),
            radius: 3.0,
        }
    }
}

impl Waveform for DotProductParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        let theta = self.angular_speed.angle_at(t);
        let projection = self.projection_at_angle(theta);
        WaveformSample::new(t)
            .with(Channel::AngleRad, theta)
            .with(Channel::AngleDeg, theta.to_degrees())
            .with(Channel::AngularVelocity, self.angular_speed.rad_per_sec())
            .with(Channel::Projection, projection)
            .with(Channel::Quadrature, self.radius * theta.sin())
            .with(Channel::PowerFactor, projection / self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Polarity;
    use crate::waveform::test_support::{assert_close, probe_times};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn projection_at_cardinal_angles() {
        let params = DotProductParameters::default();
        assert_close(params.projection_at_angle(0.0), 3.0);
        assert!(params.projection_at_angle(FRAC_PI_2).abs() < 1e-9);
        assert_close(params.projection_at_angle(PI), -3.0);
    }

    #[test]
    fn power_factor_is_projection_over_radius() {
        let params = DotProductParameters::new(AngularSpeed::from_rad_per_sec(1.0), 2.0).unwrap();
        for t in probe_times() {
            let sample = params.sample(t);
            assert_close(sample.value(Channel::PowerFactor), t.cos());
            assert_close(
                sample.value(Channel::Projection),
                2.0 * sample.value(Channel::PowerFactor),
            );
        }
    }

    #[test]
    fn polarity_flips_at_quarter_turns() {
        // ω = 1 so t equals θ
        let params = DotProductParameters::new(AngularSpeed::from_rad_per_sec(1.0), 1.0).unwrap();
        let polarity = |t: f64| params.sample(t).polarity(Channel::Projection);
        assert_eq!(polarity(FRAC_PI_2 - 0.01), Polarity::Positive);
        assert_eq!(polarity(FRAC_PI_2 + 0.01), Polarity::Negative);
        assert_eq!(polarity(3.0 * FRAC_PI_2 - 0.01), Polarity::Negative);
        assert_eq!(polarity(3.0 * FRAC_PI_2 + 0.01), Polarity::Positive);
    }

    #[test]
    fn rotating_vector_keeps_its_length() {
        let params = DotProductParameters::default();
        for t in probe_times() {
            let sample = params.sample(t);
            let len = sample
                .value(Channel::Projection)
                .hypot(sample.value(Channel::Quadrature));
            assert_close(len, 3.0);
        }
    }
}
