//! Angular speed with unit-string parsing.
//!
//! Config files and the CLI accept either a bare number (rad/s) or a string
//! such as `"0.5 Hz"`, `"120 rpm"`, `"90 deg/s"` or `"1.4 rad/s"`.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::multispace0,
    combinator::{all_consuming, opt, value},
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    RadPerSec,
    DegPerSec,
    Hertz,
    Rpm,
}

impl SpeedUnit {
    fn to_rad_per_sec(self, magnitude: f64) -> f64 {
        match self {
            SpeedUnit::RadPerSec => magnitude,
            SpeedUnit::DegPerSec => magnitude.to_radians(),
            SpeedUnit::Hertz => magnitude * TAU,
            SpeedUnit::Rpm => magnitude * TAU / 60.0,
        }
    }
}

/// Angular speed ω, stored in rad/s. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "SpeedRepr", into = "f64")]
pub struct AngularSpeed(f64);

impl AngularSpeed {
    pub fn from_rad_per_sec(omega: f64) -> Self {
        Self(omega)
    }

    /// One revolution every `1 / hz` seconds.
    pub fn from_hz(hz: f64) -> Self {
        Self(hz * TAU)
    }

    pub fn from_rpm(rpm: f64) -> Self {
        Self(rpm * TAU / 60.0)
    }

    pub fn rad_per_sec(self) -> f64 {
        self.0
    }

    pub fn hz(self) -> f64 {
        self.0 / TAU
    }

    /// Seconds per revolution, `None` for a stationary speed.
    pub fn period(self) -> Option<f64> {
        if self.0 == 0.0 {
            None
        } else {
            Some(TAU / self.0.abs())
        }
    }

    /// Angle swept after `t` seconds.
    pub fn angle_at(self, t: f64) -> f64 {
        self.0 * t
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }
}

impl From<AngularSpeed> for f64 {
    fn from(speed: AngularSpeed) -> f64 {
        speed.0
    }
}

impl fmt::Display for AngularSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} rad/s", self.0)
    }
}

impl FromStr for AngularSpeed {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_angular_speed(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpeedRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<SpeedRepr> for AngularSpeed {
    type Error = ParameterError;

    fn try_from(repr: SpeedRepr) -> Result<Self, Self::Error> {
        match repr {
            SpeedRepr::Number(omega) => Ok(Self(omega)),
            SpeedRepr::Text(text) => parse_angular_speed(&text),
        }
    }
}

/// Parse `"<number> [unit]"`; a missing unit means rad/s.
pub fn parse_angular_speed(input: &str) -> Result<AngularSpeed, ParameterError> {
    let invalid = |reason: &str| ParameterError::InvalidSpeed {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (_, (magnitude, unit)) =
        all_consuming(parse_speed_impl)(input).map_err(|_| invalid("expected '<number> [rad/s|deg/s|Hz|rpm]'"))?;

    if !magnitude.is_finite() {
        return Err(invalid("magnitude must be finite"));
    }

    Ok(AngularSpeed(unit.to_rad_per_sec(magnitude)))
}

fn parse_speed_impl(input: &str) -> IResult<&str, (f64, SpeedUnit)> {
    let (input, magnitude) = preceded(multispace0, double)(input)?;
    let (input, unit) = delimited(multispace0, opt(parse_unit), multispace0)(input)?;
    Ok((input, (magnitude, unit.unwrap_or(SpeedUnit::RadPerSec))))
}

fn parse_unit(input: &str) -> IResult<&str, SpeedUnit> {
    alt((
        value(SpeedUnit::RadPerSec, tag_no_case("rad/s")),
        value(SpeedUnit::DegPerSec, tag_no_case("deg/s")),
        value(SpeedUnit::Hertz, tag_no_case("hz")),
        value(SpeedUnit::Rpm, tag_no_case("rpm")),
    ))(input)
}
