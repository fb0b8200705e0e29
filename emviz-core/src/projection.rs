//! Camera and projection for scene renderers

use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A projected vertex: screen coordinates plus NDC depth in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Fixed camera looking at the scene origin
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 8.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Camera for a character grid whose cells are `cell_aspect` times taller
    /// than wide (about 2 for most terminal fonts).
    pub fn for_cells(columns: u32, rows: u32, cell_aspect: f32) -> Self {
        let mut camera = Self::new(columns, rows);
        camera.aspect = columns as f32 / (rows.max(1) as f32 * cell_aspect);
        camera
    }

    pub fn looking_from(mut self, position: Point3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_mode(mut self, mode: ProjectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a model-space point through `mvp` onto a `width` x `height`
    /// screen. `None` when the point falls outside the view volume.
    pub fn project(mvp: &Matrix4<f32>, point: &Point3<f32>, width: u32, height: u32) -> Option<ScreenPoint> {
        let clip = mvp * point.to_homogeneous();
        if clip.w.abs() < 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;

        if !(-1.0..=1.0).contains(&ndc.z) || ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }

    /// Project with this camera and a model matrix.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        Self::project(&(self.view_projection() * model_matrix), point, width, height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
