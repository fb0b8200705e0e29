//! Per-frame waveform output.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;
use serde::Serialize;

/// Named quantity a scene can read from a [`WaveformSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Unwrapped rotation angle in degrees, for transforms.
    AngleDeg,
    /// Unwrapped rotation angle in radians.
    AngleRad,
    AngularVelocity,
    PhaseA,
    PhaseB,
    PhaseC,
    Voltage,
    PeakVoltage,
    FieldAngle,
    RotorAngle,
    RotorVelocity,
    NetVectorAngle,
    NetVectorMagnitude,
    Projection,
    Quadrature,
    PowerFactor,
    FluxIntensity,
    FluxOpacity,
    FlowPhase,
}

impl Channel {
    pub const ALL: [Channel; 19] = [
        Channel::AngleDeg,
        Channel::AngleRad,
        Channel::AngularVelocity,
        Channel::PhaseA,
        Channel::PhaseB,
        Channel::PhaseC,
        Channel::Voltage,
        Channel::PeakVoltage,
        Channel::FieldAngle,
        Channel::RotorAngle,
        Channel::RotorVelocity,
        Channel::NetVectorAngle,
        Channel::NetVectorMagnitude,
        Channel::Projection,
        Channel::Quadrature,
        Channel::PowerFactor,
        Channel::FluxIntensity,
        Channel::FluxOpacity,
        Channel::FlowPhase,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::AngleDeg => "angleDeg",
            Channel::AngleRad => "angleRad",
            Channel::AngularVelocity => "angularVelocity",
            Channel::PhaseA => "phaseA",
            Channel::PhaseB => "phaseB",
            Channel::PhaseC => "phaseC",
            Channel::Voltage => "voltage",
            Channel::PeakVoltage => "peakVoltage",
            Channel::FieldAngle => "fieldAngle",
            Channel::RotorAngle => "rotorAngle",
            Channel::RotorVelocity => "rotorVelocity",
            Channel::NetVectorAngle => "netVectorAngle",
            Channel::NetVectorMagnitude => "netVectorMagnitude",
            Channel::Projection => "projection",
            Channel::Quadrature => "quadrature",
            Channel::PowerFactor => "powerFactor",
            Channel::FluxIntensity => "fluxIntensity",
            Channel::FluxOpacity => "fluxOpacity",
            Channel::FlowPhase => "flowPhase",
        }
    }

    /// Channel for the k-th phase, if it has a dedicated name.
    pub fn phase(index: usize) -> Option<Channel> {
        match index {
            0 => Some(Channel::PhaseA),
            1 => Some(Channel::PhaseB),
            2 => Some(Channel::PhaseC),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown channel '{s}'"))
    }
}

/// Sign of a projected quantity, used to pick a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Zero counts as positive.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }
}

/// One current particle on a parametric path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub index: usize,
    /// Path parameter in `[0, 1)`.
    pub u: f64,
    pub position: Point3<f64>,
}

/// Instantaneous values for one frame. Built fresh each frame and dropped
/// once the scene has read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaveformSample {
    pub time: f64,
    channels: BTreeMap<Channel, f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    phases: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    markers: Vec<Marker>,
}

impl WaveformSample {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn with(mut self, channel: Channel, value: f64) -> Self {
        self.channels.insert(channel, value);
        self
    }

    pub fn set(&mut self, channel: Channel, value: f64) {
        self.channels.insert(channel, value);
    }

    pub fn get(&self, channel: Channel) -> Option<f64> {
        self.channels.get(&channel).copied()
    }

    /// Value of `channel`, or 0.0 if this visualization doesn't emit it.
    pub fn value(&self, channel: Channel) -> f64 {
        self.get(channel).unwrap_or(0.0)
    }

    pub fn channels(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        self.channels.iter().map(|(c, v)| (*c, *v))
    }

    pub fn polarity(&self, channel: Channel) -> Polarity {
        Polarity::of(self.value(channel))
    }

    /// Every phase magnitude, in phase order (empty for single-phase models).
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    pub fn set_phases(&mut self, phases: Vec<f64>) {
        for (index, magnitude) in phases.iter().enumerate() {
            if let Some(channel) = Channel::phase(index) {
                self.channels.insert(channel, *magnitude);
            }
        }
        self.phases = phases;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(channel.as_str().parse::<Channel>(), Ok(channel));
        }
        assert!("angle".parse::<Channel>().is_err());
    }

    #[test]
    fn serialized_names_match_as_str() {
        for channel in Channel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{}\"", channel.as_str()));
        }
    }

    #[test]
    fn missing_channel_reads_as_zero() {
        let sample = WaveformSample::new(1.0).with(Channel::Voltage, 3.0);
        assert_eq!(sample.get(Channel::Voltage), Some(3.0));
        assert_eq!(sample.get(Channel::PhaseA), None);
        assert_eq!(sample.value(Channel::PhaseA), 0.0);
    }

    #[test]
    fn set_phases_fills_named_channels() {
        let mut sample = WaveformSample::new(0.0);
        sample.set_phases(vec![1.0, -0.5, -0.5, 0.0]);
        assert_eq!(sample.value(Channel::PhaseA), 1.0);
        assert_eq!(sample.value(Channel::PhaseC), -0.5);
        assert_eq!(sample.phases().len(), 4);
    }

    #[test]
    fn polarity_flips_at_zero() {
        assert_eq!(Polarity::of(0.0), Polarity::Positive);
        assert_eq!(Polarity::of(-1e-9), Polarity::Negative);
    }

    #[test]
    fn sample_serializes_channel_map() {
        let sample = WaveformSample::new(0.5).with(Channel::Voltage, 12.0);
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["time"], 0.5);
        assert_eq!(json["channels"]["voltage"], 12.0);
        assert!(json.get("markers").is_none());
    }
}
