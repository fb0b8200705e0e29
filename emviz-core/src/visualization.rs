//! The study cards and the per-frame driver that samples them.
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::clock::{SimulationClock, SystemTimeSource, TimeSource};
use crate::error::ConfigError;
use crate::readout;
use crate::sample::{Channel, WaveformSample};
use crate::waveform::{
    DotProductParameters, FluxParameters, GeneratorParameters, ParticleFlowParameters,
    RotorParameters, ThreePhaseParameters, Waveform, WaveformParameters,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visualization {
    DcMotor,
    InductionMotor,
    RotatingField,
    AcGenerator,
    Transformer,
    Solenoid,
    PowerFactor,
}

impl Visualization {
    pub const ALL: [Visualization; 7] = [
        Visualization::DcMotor,
        Visualization::InductionMotor,
        Visualization::RotatingField,
        Visualization::AcGenerator,
        Visualization::Transformer,
        Visualization::Solenoid,
        Visualization::PowerFactor,
    ];

    /// Kebab-case name used on the command line and in the web binding.
    pub fn name(self) -> &'static str {
        match self {
            Visualization::DcMotor => "dc-motor",
            Visualization::InductionMotor => "induction-motor",
            Visualization::RotatingField => "rotating-field",
            Visualization::AcGenerator => "ac-generator",
            Visualization::Transformer => "transformer",
            Visualization::Solenoid => "solenoid",
            Visualization::PowerFactor => "power-factor",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Visualization::DcMotor => "DC Motor - Fleming's Left Hand Rule",
            Visualization::InductionMotor => "Induction Motor - Arago's Disk",
            Visualization::RotatingField => "Three-Phase Rotating Magnetic Field",
            Visualization::AcGenerator => "AC Generator - Fleming's Right Hand Rule",
            Visualization::Transformer => "Transformer - Mutual Induction",
            Visualization::Solenoid => "Solenoid - Ampere's Circuital Law",
            Visualization::PowerFactor => "Power Factor - Vector Dot Product",
        }
    }

    /// The card after this one, wrapping around.
    pub fn next(self) -> Visualization {
        let index = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn default_parameters(self) -> WaveformParameters {
        match self {
            Visualization::DcMotor => RotorParameters::default().into(),
            Visualization::InductionMotor => ThreePhaseParameters::default().into(),
            Visualization::RotatingField => ThreePhaseParameters::rotating_field().into(),
            Visualization::AcGenerator => GeneratorParameters::default().into(),
            Visualization::Transformer => FluxParameters::default().into(),
            Visualization::Solenoid => ParticleFlowParameters::default().into(),
            Visualization::PowerFactor => DotProductParameters::default().into(),
        }
    }

    /// Readout lines for the card, derived only from `sample`.
    pub fn readouts(self, sample: &WaveformSample) -> Vec<String> {
        let phases = || {
            format!(
                "Ia {}  Ib {}  Ic {}",
                readout::format_signed(sample.value(Channel::PhaseA)),
                readout::format_signed(sample.value(Channel::PhaseB)),
                readout::format_signed(sample.value(Channel::PhaseC)),
            )
        };

        match self {
            Visualization::DcMotor => vec![
                format!("Rotor: {}", readout::format_degrees(sample.value(Channel::AngleRad))),
                format!(
                    "Speed: {}",
                    readout::format_angular_velocity(sample.value(Channel::AngularVelocity))
                ),
            ],
            Visualization::InductionMotor => {
                let field = sample.value(Channel::AngularVelocity);
                let rotor = sample.value(Channel::RotorVelocity);
                let slip = if field == 0.0 { 0.0 } else { 1.0 - rotor / field };
                vec![
                    phases(),
                    format!(
                        "Field: {}  Rotor: {}",
                        readout::format_degrees(sample.value(Channel::FieldAngle)),
                        readout::format_degrees(sample.value(Channel::RotorAngle)),
                    ),
                    format!("Slip: {}", readout::format_percent(slip)),
                ]
            }
            Visualization::RotatingField => vec![
                phases(),
                format!(
                    "Net field: {:.2} @ {}",
                    sample.value(Channel::NetVectorMagnitude),
                    readout::format_degrees(sample.value(Channel::NetVectorAngle)),
                ),
            ],
            Visualization::AcGenerator => vec![
                format!("Angle: {}", readout::format_degrees(sample.value(Channel::AngleRad))),
                format!("Voltage: {}", readout::format_voltage(sample.value(Channel::Voltage))),
            ],
            Visualization::Transformer => {
                vec![readout::format_flux(sample.value(Channel::FluxIntensity))]
            }
            Visualization::Solenoid => vec![format!(
                "Current markers: {}  Flow: {}",
                sample.markers().len(),
                readout::format_percent(sample.value(Channel::FlowPhase)),
            )],
            Visualization::PowerFactor => vec![
                format!("Angle: {}", readout::format_degrees(sample.value(Channel::AngleRad))),
                readout::format_power_factor(sample.value(Channel::PowerFactor)),
            ],
        }
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Visualization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownVisualization(s.to_string()))
    }
}

/// Binds one visualization's parameters to a simulation clock.
pub struct Driver<S: TimeSource = SystemTimeSource> {
    visualization: Visualization,
    params: WaveformParameters,
    clock: SimulationClock<S>,
}

impl<S: TimeSource> Driver<S> {
    pub fn new(visualization: Visualization, params: WaveformParameters, source: S) -> Self {
        debug!(visualization = %visualization, ?params, "mounting driver");
        Self {
            visualization,
            params,
            clock: SimulationClock::new(source),
        }
    }

    pub fn with_defaults(visualization: Visualization, source: S) -> Self {
        Self::new(visualization, visualization.default_parameters(), source)
    }

    /// Sample at the clock's current elapsed time.
    pub fn sample(&self) -> WaveformSample {
        self.params.sample(self.clock.elapsed())
    }

    /// Sample at an explicit elapsed time, bypassing the clock.
    pub fn sample_at(&self, t: f64) -> WaveformSample {
        self.params.sample(t)
    }

    pub fn readouts(&self, sample: &WaveformSample) -> Vec<String> {
        self.visualization.readouts(sample)
    }

    pub fn visualization(&self) -> Visualization {
        self.visualization
    }

    pub fn params(&self) -> &WaveformParameters {
        &self.params
    }

    pub fn clock(&self) -> &SimulationClock<S> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock<S> {
        &mut self.clock
    }

    /// Swap in another visualization; the clock restarts as on remount.
    pub fn remount(&mut self, visualization: Visualization, params: WaveformParameters) {
        debug!(from = %self.visualization, to = %visualization, "remounting driver");
        self.visualization = visualization;
        self.params = params;
        self.clock.reset();
    }
}
