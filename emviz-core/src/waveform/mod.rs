//! Closed-form waveform models for idealized electrical machines.
//!
//! Each parameter struct is a [`Waveform`]: given elapsed seconds it returns
//! the instantaneous quantities a scene needs. Sampling is pure, so the same
//! `t` always produces the same sample regardless of frame history.

pub mod dot_product;
pub mod flux;
pub mod generator;
pub mod particle;
pub mod rotor;
pub mod three_phase;

pub use dot_product::DotProductParameters;
pub use flux::FluxParameters;
pub use generator::GeneratorParameters;
pub use particle::ParticleFlowParameters;
pub use rotor::RotorParameters;
pub use three_phase::{ThreePhaseOverrides, ThreePhaseParameters};

use crate::error::ParameterError;
use crate::sample::WaveformSample;

pub trait Waveform {
    fn sample(&self, t: f64) -> WaveformSample;
}

/// Constant configuration of one visualization instance.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveformParameters {
    Rotor(RotorParameters),
    Generator(GeneratorParameters),
    ThreePhase(ThreePhaseParameters),
    DotProduct(DotProductParameters),
    Flux(FluxParameters),
    ParticleFlow(ParticleFlowParameters),
}

impl WaveformParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        match self {
            WaveformParameters::Rotor(p) => p.validate(),
            WaveformParameters::Generator(p) => p.validate(),
            WaveformParameters::ThreePhase(p) => p.validate(),
            WaveformParameters::DotProduct(p) => p.validate(),
            WaveformParameters::Flux(p) => p.validate(),
            WaveformParameters::ParticleFlow(p) => p.validate(),
        }
    }
}

impl Waveform for WaveformParameters {
    fn sample(&self, t: f64) -> WaveformSample {
        match self {
            WaveformParameters::Rotor(p) => p.sample(t),
            WaveformParameters::Generator(p) => p.sample(t),
            WaveformParameters::ThreePhase(p) => p.sample(t),
            WaveformParameters::DotProduct(p) => p.sample(t),
            WaveformParameters::Flux(p) => p.sample(t),
            WaveformParameters::ParticleFlow(p) => p.sample(t),
        }
    }
}

macro_rules! impl_from_params {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for WaveformParameters {
            fn from(params: $ty) -> Self {
                WaveformParameters::$variant(params)
            }
        })*
    };
}

impl_from_params! {
    Rotor => RotorParameters,
    Generator => GeneratorParameters,
    ThreePhase => ThreePhaseParameters,
    DotProduct => DotProductParameters,
    Flux => FluxParameters,
    ParticleFlow => ParticleFlowParameters,
}

#[cfg(test)]
pub(crate) mod test_support {
    pub const EPS: f64 = 1e-9;

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    /// Times spread over several periods, including negative and large values.
    pub fn probe_times() -> impl Iterator<Item = f64> {
        (-40..400).map(|k| k as f64 * 0.137)
    }
}
