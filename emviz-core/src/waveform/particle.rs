//! Current markers flowing along a solenoid winding.
//!
//! Marker `i` of `N` sits at `u_i = frac(t·speed + i/N)` on the path. The
//! shared base offset is reduced to one turn before the per-marker offset is
//! added, which keeps neighbouring markers exactly `1/N` apart however large
//! `t` grows.

use serde::{Deserialize, Serialize};

use super::Waveform;
use crate::error::{ensure_finite, ParameterError};
use crate::path::{wrap_unit, Helix, ParametricPath, Path};
use crate::sample::{Channel, Marker, WaveformSample};

/// Most markers a path may carry; every frame allocates one position per marker.
pub const MAX_MARKERS: usize = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleFlowParameters {
    markers: usize,
    /// Path traversals per second.
    speed: f64,
    path: Path,
}

impl ParticleFlowParameters {
    pub fn new(markers: usize, speed: f64, path: Path) -> Result<Self, ParameterError> {
        let params = Self {
            markers,
            speed,
            path,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.markers == 0 {
            return Err(ParameterError::NoMarkers);
        }
        if self.markers > MAX_MARKERS {
            return Err(ParameterError::TooManyMarkers {
                count: self.markers,
                max: MAX_MARKERS,
            });
        }
        ensure_finite("speed", self.speed)?;
        Ok(())
    }

    pub fn marker_count(&self) -> usize {
        self.markers
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fraction of one traversal completed at `t`.
    pub fn flow_phase(&self, t: f64) -> f64 {
        wrap_unit(t * self.speed)
    }

    /// Path parameter of every marker, in marker order.
    pub fn parameters_at(&self, t: f64) -> Vec<f64> {
        let base = self.flow_phase(t);
        let n = self.markers as f64;
        (0..self.markers)
            .map(|i| wrap_unit(base + i as f64 / n))
            .collect()
    }
}

impl Default for ParticleFlowParameters {
    fn default() -> Self {
        Self {
            markers: 8,
            speed: 1.0,
            path: Path::Helix(Helix {
                radius: 1.0,
                length: 4.0,
                turns: 8.0,
            }),
        }
    }
}

impl Waveform for ParticleFlowParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        let markers = self
            .parameters_at(t)
            .into_iter()
            .enumerate()
            .map(|(index, u)| Marker {
                index,
                u,
                position: self.path.point_at(u),
            })
            .collect();

        let mut sample = WaveformSample::new(t).with(Channel::FlowPhase, self.flow_phase(t));
        sample.set_markers(markers);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ClosedPolyline;
    use crate::waveform::test_support::probe_times;

    fn spacing(a: f64, b: f64) -> f64 {
        wrap_unit(b - a)
    }

    #[test]
    fn adjacent_markers_stay_evenly_spaced() {
        let params = ParticleFlowParameters::default();
        for t in probe_times().chain([1e6 + 0.3, 123_456.789]) {
            let us = params.parameters_at(t);
            for i in 0..us.len() {
                let next = us[(i + 1) % us.len()];
                let gap = spacing(us[i], next);
                assert!((gap - 0.125).abs() < 1e-9, "gap {gap} at t={t}, marker {i}");
            }
        }
    }

    #[test]
    fn parameters_stay_in_unit_interval() {
        let params = ParticleFlowParameters::new(
            5,
            -0.7,
            Path::Loop(ClosedPolyline::rectangle(3.0, 2.0).unwrap()),
        )
        .unwrap();
        for t in probe_times() {
            for u in params.parameters_at(t) {
                assert!((0.0..1.0).contains(&u), "u={u} at t={t}");
            }
        }
    }

    #[test]
    fn markers_follow_the_path() {
        let params = ParticleFlowParameters::default();
        let sample = params.sample(0.3);
        assert_eq!(sample.markers().len(), 8);
        for marker in sample.markers() {
            let expected = params.path().point_at(marker.u);
            assert!((marker.position - expected).norm() < 1e-12);
        }
        assert!((sample.value(Channel::FlowPhase) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn single_marker_is_allowed_but_zero_is_not() {
        let path = ParticleFlowParameters::default().path().clone();
        assert!(ParticleFlowParameters::new(1, 1.0, path.clone()).is_ok());
        assert_eq!(
            ParticleFlowParameters::new(0, 1.0, path).unwrap_err(),
            ParameterError::NoMarkers
        );
    }

    #[test]
    fn marker_count_is_bounded() {
        let path = ParticleFlowParameters::default().path().clone();
        assert!(ParticleFlowParameters::new(MAX_MARKERS, 1.0, path.clone()).is_ok());
        assert_eq!(
            ParticleFlowParameters::new(usize::MAX, 1.0, path).unwrap_err(),
            ParameterError::TooManyMarkers {
                count: usize::MAX,
                max: MAX_MARKERS
            }
        );
    }
}
