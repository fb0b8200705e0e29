//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use emviz_core::{Camera, ScreenPoint};
use nalgebra::Vector3;
use std::io::Write;

use crate::scene::{Instance, Tint};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light shining from over the viewer's shoulder.
const LIGHT_DIR: [f32; 3] = [0.3, 0.5, 1.0];

/// Share of brightness every lit face gets regardless of orientation.
const AMBIENT: f32 = 0.15;

#[derive(Debug, Clone, Copy)]
struct Cell {
    depth: f32,
    glyph: char,
    tint: Option<Tint>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        depth: f32::INFINITY,
        glyph: ' ',
        tint: None,
    };
}

/// Depth-buffered character grid
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    pub fn render(&mut self, instances: &[Instance<'_>], camera: &Camera) {
        let view_projection = camera.view_projection();
        let light = Vector3::from(LIGHT_DIR).normalize();

        for instance in instances {
            let mvp = view_projection * instance.model;
            let world = instance.mesh.transformed(&instance.model);

            for (triangle, posed) in instance.mesh.triangles.iter().zip(&world.triangles) {
                let mut screen = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 }; 3];
                let mut visible = true;
                for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
                    match Camera::project(&mvp, &vertex.position, self.width as u32, self.height as u32) {
                        Some(p) => *slot = p,
                        None => {
                            visible = false;
                            break;
                        }
                    }
                }
                if !visible {
                    continue;
                }

                // faces squashed to a sliver by the model keep their vertex normal
                let normal = posed.face_normal().unwrap_or(posed.vertices[0].normal);
                let diffuse = normal.dot(&light).max(0.0);
                let brightness = (AMBIENT + (1.0 - AMBIENT) * diffuse + instance.emissive).min(1.0);
                self.rasterize_triangle(&screen, shade(brightness), instance.tint);
            }
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], glyph: char, tint: Tint) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to the screen
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let cell = &mut self.cells[y as usize * self.width + x as usize];
                if depth < cell.depth {
                    *cell = Cell {
                        depth,
                        glyph,
                        tint: Some(tint),
                    };
                }
            }
        }
    }

    /// The character grid as plain text, one line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|c| c.glyph));
            out.push('\n');
        }
        out
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                writer.queue(SetForegroundColor(color_of(cell)))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map brightness in `[0, 1]` onto the ramp, never blank for a lit face.
fn shade(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

fn color_of(cell: &Cell) -> Color {
    let bright = matches!(cell.glyph, '#' | '%' | '@');
    match (cell.tint, bright) {
        (None, _) => Color::DarkGrey,
        (Some(Tint::Red), false) => Color::DarkRed,
        (Some(Tint::Red), true) => Color::Red,
        (Some(Tint::Blue), false) => Color::DarkBlue,
        (Some(Tint::Blue), true) => Color::Blue,
        (Some(Tint::Yellow), false) => Color::DarkYellow,
        (Some(Tint::Yellow), true) => Color::Yellow,
        (Some(Tint::Green), false) => Color::DarkGreen,
        (Some(Tint::Green), true) => Color::Green,
        (Some(Tint::Cyan), false) => Color::DarkCyan,
        (Some(Tint::Cyan), true) => Color::Cyan,
        (Some(Tint::Magenta), false) => Color::DarkMagenta,
        (Some(Tint::Magenta), true) => Color::Magenta,
        (Some(Tint::Grey), false) => Color::Grey,
        (Some(Tint::Grey), true) => Color::White,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use emviz_core::{Mesh, Visualization, Waveform};
    use nalgebra::Matrix4;

    #[test]
    fn barycentric_of_vertex_is_unit() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)).unwrap();
        assert!((w0 - 1.0).abs() < 1e-6 && w1.abs() < 1e-6 && w2.abs() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_has_no_barycentric() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn shade_never_blanks_a_lit_face() {
        assert_eq!(shade(0.0), '.');
        assert_eq!(shade(1.0), '@');
    }

    #[test]
    fn cube_in_front_of_camera_covers_the_centre() {
        let mesh = Mesh::cube(2.0);
        let instances = [Instance {
            mesh: &mesh,
            model: Matrix4::identity(),
            tint: Tint::Cyan,
            emissive: 0.0,
        }];
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render(&instances, &Camera::for_cells(40, 20, 2.0));

        let text = renderer.to_text();
        let centre = text.lines().nth(10).unwrap().chars().nth(20).unwrap();
        assert_ne!(centre, ' ');
        assert_eq!(text.lines().next().unwrap().trim(), "");
    }

    fn centre_glyph(model: Matrix4<f32>) -> char {
        let mesh = Mesh::cube(2.0);
        let instances = [Instance {
            mesh: &mesh,
            model,
            tint: Tint::Grey,
            emissive: 0.0,
        }];
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render(&instances, &Camera::for_cells(40, 20, 2.0));
        renderer.to_text().lines().nth(10).unwrap().chars().nth(20).unwrap()
    }

    #[test]
    fn shading_follows_the_posed_face() {
        let half_turn = Matrix4::new_rotation(Vector3::new(0.0, std::f32::consts::PI, 0.0));
        assert_eq!(centre_glyph(half_turn), centre_glyph(Matrix4::identity()));
    }

    #[test]
    fn flattened_mesh_still_renders() {
        let flat = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, 0.0));
        assert_ne!(centre_glyph(flat), ' ');
    }

    #[test]
    fn clear_resets_every_cell() {
        let scene = Scene::new(Visualization::DcMotor);
        let sample = Visualization::DcMotor.default_parameters().sample(0.0);
        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.render(&scene.frame(&sample), &Camera::for_cells(60, 30, 2.0));
        assert!(renderer.to_text().chars().any(|c| c != ' ' && c != '\n'));

        renderer.clear();
        assert!(renderer.to_text().chars().all(|c| c == ' ' || c == '\n'));
    }
}
