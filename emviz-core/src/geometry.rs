//! Geometry primitives for the machine scenes

use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order, `None` for a sliver.
    pub fn face_normal(&self) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = &self.vertices;
        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        edge1.cross(&edge2).try_normalize(1e-12)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append every triangle of `other`.
    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Copy with positions and normals carried through `matrix`.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Mesh {
        let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        let map = |v: &Vertex| Vertex {
            position: matrix.transform_point(&v.position),
            normal: (normal_matrix * v.normal)
                .try_normalize(1e-12)
                .unwrap_or(v.normal),
        };

        Mesh {
            triangles: self
                .triangles
                .iter()
                .map(|t| {
                    Triangle::new(map(&t.vertices[0]), map(&t.vertices[1]), map(&t.vertices[2]))
                })
                .collect(),
        }
    }

    /// Axis-aligned box centred on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut mesh = Self::with_capacity(12);

        // (normal, u axis, v axis); corners are normal*h ± u*h ± v*h
        let faces = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];
        let half = Vector3::new(hx, hy, hz);

        for (normal, u, v) in faces {
            let centre = normal.component_mul(&half);
            let du = u.component_mul(&half);
            let dv = v.component_mul(&half);
            let corner = |su: f32, sv: f32| {
                Vertex::new(Point3::from(centre + du * su + dv * sv), normal)
            };
            mesh.add_triangle(Triangle::new(
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
            ));
            mesh.add_triangle(Triangle::new(
                corner(-1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ));
        }

        mesh
    }

    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Unit-length shaft from the origin along +X, for phasors.
    pub fn arrow(thickness: f32) -> Self {
        let shaft = Self::cuboid(0.85, thickness, thickness)
            .transformed(&Matrix4::new_translation(&Vector3::new(0.425, 0.0, 0.0)));
        let head = Self::cuboid(0.15, thickness * 2.5, thickness * 2.5)
            .transformed(&Matrix4::new_translation(&Vector3::new(0.925, 0.0, 0.0)));
        let mut mesh = shaft;
        mesh.extend(head);
        mesh
    }

    /// Rectangular loop in the XY plane built from four bars, e.g. a coil
    /// turn or a transformer core.
    pub fn frame(width: f32, height: f32, bar: f32) -> Self {
        let mut mesh = Self::with_capacity(48);
        let (hw, hh) = (width / 2.0, height / 2.0);
        let bars = [
            (Vector3::new(0.0, hh, 0.0), width + bar, bar),
            (Vector3::new(0.0, -hh, 0.0), width + bar, bar),
            (Vector3::new(hw, 0.0, 0.0), bar, height - bar),
            (Vector3::new(-hw, 0.0, 0.0), bar, height - bar),
        ];
        for (offset, w, h) in bars {
            mesh.extend(Self::cuboid(w, h, bar).transformed(&Matrix4::new_translation(&offset)));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(mesh: &Mesh) -> (Point3<f32>, Point3<f32>) {
        let mut lo = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut hi = Point3::new(f32::MIN, f32::MIN, f32::MIN);
        for v in mesh.triangles.iter().flat_map(|t| t.vertices.iter()) {
            lo = lo.inf(&v.position);
            hi = hi.sup(&v.position);
        }
        (lo, hi)
    }

    #[test]
    fn test_cube_triangle_count() {
        assert_eq!(Mesh::cube(2.0).triangles.len(), 12);
    }

    #[test]
    fn cuboid_spans_its_extents() {
        let (lo, hi) = bounds(&Mesh::cuboid(4.0, 2.0, 1.0));
        assert_eq!(lo, Point3::new(-2.0, -1.0, -0.5));
        assert_eq!(hi, Point3::new(2.0, 1.0, 0.5));
    }

    #[test]
    fn cuboid_winding_matches_normals() {
        for t in Mesh::cuboid(1.0, 2.0, 3.0).triangles {
            let face = t.face_normal().unwrap();
            assert!((face - t.vertices[0].normal).norm() < 1e-5);
        }
    }

    #[test]
    fn arrow_runs_from_origin_to_one() {
        let (lo, hi) = bounds(&Mesh::arrow(0.1));
        assert!(lo.x.abs() < 1e-6);
        assert!((hi.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn transformed_rotates_normals() {
        let rot = Matrix4::new_rotation(Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let mesh = Mesh::cube(1.0).transformed(&rot);
        for t in &mesh.triangles {
            let face = t.face_normal().unwrap();
            assert!((face - t.vertices[0].normal).norm() < 1e-5);
        }
    }

    #[test]
    fn frame_has_four_bars() {
        assert_eq!(Mesh::frame(3.0, 2.0, 0.2).triangles.len(), 48);
    }
}
