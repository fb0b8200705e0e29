//! Parametric paths that markers travel along.
//!
//! Every path maps `u` to a point. Values outside `[0, 1)` wrap, so callers
//! may pass `t * speed + offset` without reducing it first.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{ensure_finite, ensure_positive, ParameterError};

pub trait ParametricPath {
    fn point_at(&self, u: f64) -> Point3<f64>;
}

/// Reduce `u` into `[0, 1)`.
pub fn wrap_unit(u: f64) -> f64 {
    let wrapped = u.rem_euclid(1.0);
    // rem_euclid of a tiny negative rounds up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Coil winding centred on the origin, axis along +Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Helix {
    pub radius: f64,
    pub length: f64,
    pub turns: f64,
}

impl Helix {
    pub fn new(radius: f64, length: f64, turns: f64) -> Result<Self, ParameterError> {
        ensure_positive("helix.radius", radius)?;
        ensure_positive("helix.length", length)?;
        ensure_positive("helix.turns", turns)?;
        Ok(Self {
            radius,
            length,
            turns,
        })
    }
}

impl ParametricPath for Helix {
    fn point_at(&self, u: f64) -> Point3<f64> {
        let u = wrap_unit(u);
        let angle = TAU * self.turns * u;
        Point3::new(
            self.radius * angle.cos(),
            (u - 0.5) * self.length,
            self.radius * angle.sin(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl LineSegment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Result<Self, ParameterError> {
        for c in start.iter().chain(end.iter()) {
            ensure_finite("line endpoint", *c)?;
        }
        if (end - start).norm() == 0.0 {
            return Err(ParameterError::DegeneratePath(
                "line segment has zero length".into(),
            ));
        }
        Ok(Self { start, end })
    }
}

impl ParametricPath for LineSegment {
    fn point_at(&self, u: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * wrap_unit(u)
    }
}

/// Closed loop through `points`, parameterized by arc length so markers
/// keep constant speed around corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPolyline {
    points: Vec<Point3<f64>>,
    // cumulative[i] = arc length from points[0] to points[i]; last entry is the perimeter
    cumulative: Vec<f64>,
}

impl ClosedPolyline {
    pub fn new(points: Vec<Point3<f64>>) -> Result<Self, ParameterError> {
        if points.len() < 2 {
            return Err(ParameterError::DegeneratePath(format!(
                "closed polyline needs at least 2 points, got {}",
                points.len()
            )));
        }
        for c in points.iter().flat_map(|p| p.iter()) {
            ensure_finite("polyline point", *c)?;
        }

        let mut cumulative = Vec::with_capacity(points.len() + 1);
        let mut total = 0.0;
        cumulative.push(0.0);
        for i in 0..points.len() {
            let next = points[(i + 1) % points.len()];
            total += (next - points[i]).norm();
            cumulative.push(total);
        }

        if total == 0.0 {
            return Err(ParameterError::DegeneratePath(
                "closed polyline has zero perimeter".into(),
            ));
        }

        Ok(Self { points, cumulative })
    }

    /// Axis-aligned rectangle in the XY plane, centred on the origin,
    /// traversed counter-clockwise from the bottom-left corner.
    pub fn rectangle(width: f64, height: f64) -> Result<Self, ParameterError> {
        ensure_positive("rectangle.width", width)?;
        ensure_positive("rectangle.height", height)?;
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Point3::new(-hw, -hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(-hw, hh, 0.0),
        ])
    }

    pub fn perimeter(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }
}

impl ParametricPath for ClosedPolyline {
    fn point_at(&self, u: f64) -> Point3<f64> {
        let distance = wrap_unit(u) * self.perimeter();
        // first segment whose end lies beyond `distance`
        let segment = self.cumulative[1..]
            .partition_point(|&end| end <= distance)
            .min(self.points.len() - 1);

        let start = self.points[segment];
        let end = self.points[(segment + 1) % self.points.len()];
        let seg_len = self.cumulative[segment + 1] - self.cumulative[segment];
        if seg_len == 0.0 {
            return start;
        }
        let local = (distance - self.cumulative[segment]) / seg_len;
        start + (end - start) * local
    }
}

/// Serializable description of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathSpec {
    Helix {
        radius: f64,
        length: f64,
        turns: f64,
    },
    Line {
        start: [f64; 3],
        end: [f64; 3],
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    Loop {
        points: Vec<[f64; 3]>,
    },
}

/// A validated path, ready to sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "PathSpec")]
pub enum Path {
    Helix(Helix),
    Line(LineSegment),
    Loop(ClosedPolyline),
}

impl Path {
    pub fn spec(&self) -> PathSpec {
        match self {
            Path::Helix(h) => PathSpec::Helix {
                radius: h.radius,
                length: h.length,
                turns: h.turns,
            },
            Path::Line(l) => PathSpec::Line {
                start: l.start.coords.into(),
                end: l.end.coords.into(),
            },
            Path::Loop(p) => PathSpec::Loop {
                points: p.points.iter().map(|p| p.coords.into()).collect(),
            },
        }
    }
}

impl TryFrom<PathSpec> for Path {
    type Error = ParameterError;

    fn try_from(spec: PathSpec) -> Result<Self, Self::Error> {
        let point = |c: [f64; 3]| Point3::from(Vector3::from(c));
        Ok(match spec {
            PathSpec::Helix {
                radius,
                length,
                turns,
            } => Path::Helix(Helix::new(radius, length, turns)?),
            PathSpec::Line { start, end } => Path::Line(LineSegment::new(point(start), point(end))?),
            PathSpec::Rectangle { width, height } => {
                Path::Loop(ClosedPolyline::rectangle(width, height)?)
            }
            PathSpec::Loop { points } => {
                Path::Loop(ClosedPolyline::new(points.into_iter().map(point).collect())?)
            }
        })
    }
}

impl Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.spec().serialize(serializer)
    }
}

impl ParametricPath for Path {
    fn point_at(&self, u: f64) -> Point3<f64> {
        match self {
            Path::Helix(h) => h.point_at(u),
            Path::Line(l) => l.point_at(u),
            Path::Loop(p) => p.point_at(u),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: Point3<f64>, b: Point3<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn wrap_unit_handles_negatives_and_whole_numbers() {
        assert_eq!(wrap_unit(0.25), 0.25);
        assert_eq!(wrap_unit(3.0), 0.0);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-12);
        assert_eq!(wrap_unit(-1e-18), 0.0);
    }

    #[test]
    fn helix_spans_its_length() {
        let helix = Helix::new(1.0, 4.0, 8.0).unwrap();
        assert!(near(helix.point_at(0.0), Point3::new(1.0, -2.0, 0.0)));
        assert!(near(helix.point_at(0.5), Point3::new(1.0, 0.0, 0.0)));
        assert!(near(helix.point_at(1.0), helix.point_at(0.0)));
    }

    #[test]
    fn line_interpolates() {
        let line = LineSegment::new(Point3::origin(), Point3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(near(line.point_at(0.25), Point3::new(0.5, 0.0, 0.0)));
        assert!(LineSegment::new(Point3::origin(), Point3::origin()).is_err());
    }

    #[test]
    fn rectangle_is_arc_length_parameterized() {
        let rect = ClosedPolyline::rectangle(4.0, 2.0).unwrap();
        assert_eq!(rect.perimeter(), 12.0);
        assert!(near(rect.point_at(0.0), Point3::new(-2.0, -1.0, 0.0)));
        // 4 along the bottom edge lands on the bottom-right corner
        assert!(near(rect.point_at(4.0 / 12.0), Point3::new(2.0, -1.0, 0.0)));
        // halfway up the right edge
        assert!(near(rect.point_at(5.0 / 12.0), Point3::new(2.0, 0.0, 0.0)));
        // last edge closes back to the start
        assert!(near(rect.point_at(11.0 / 12.0), Point3::new(-2.0, 0.0, 0.0)));
    }

    #[test]
    fn degenerate_loops_are_rejected() {
        assert!(ClosedPolyline::new(vec![Point3::origin()]).is_err());
        assert!(ClosedPolyline::new(vec![Point3::origin(), Point3::origin()]).is_err());
        assert!(Helix::new(0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn path_deserializes_from_tagged_spec() {
        let path: Path = toml::from_str("kind = \"rectangle\"\nwidth = 4.0\nheight = 2.0").unwrap();
        assert!(matches!(path, Path::Loop(_)));
        let bad = toml::from_str::<Path>("kind = \"helix\"\nradius = -1.0\nlength = 1.0\nturns = 1.0");
        assert!(bad.is_err());
    }
}
