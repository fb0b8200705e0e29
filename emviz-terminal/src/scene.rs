//! Per-visualization scene layout for the ASCII renderer
//!
//! Meshes are built once per card; each frame only the model matrices and
//! glow levels change, and those come straight from the waveform sample.

use emviz_core::{
    Channel, Mesh, Polarity, ProjectionMode, RotationState, Transform, Visualization,
    WaveformSample,
};
use nalgebra::{Matrix4, Point3, Vector3};

/// Glow gain applied to phase coils, relative to |current|.
const COIL_GLOW_GAIN: f64 = 1.3;

/// Palette the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Red,
    Blue,
    Yellow,
    Green,
    Cyan,
    Magenta,
    Grey,
}

/// One mesh to draw this frame.
pub struct Instance<'a> {
    pub mesh: &'a Mesh,
    pub model: Matrix4<f32>,
    pub tint: Tint,
    /// Self-illumination in `[0, 1]`, added on top of diffuse shading.
    pub emissive: f32,
}

/// Glow for a phase coil carrying `current`.
pub fn coil_emissive(current: f64) -> f32 {
    (current.abs() * COIL_GLOW_GAIN).min(1.0) as f32
}

struct Parts {
    slab: Mesh,
    arrow: Mesh,
    coil: Mesh,
    core: Mesh,
    rotor: Mesh,
    marker: Mesh,
}

pub struct Scene {
    visualization: Visualization,
    parts: Parts,
}

impl Scene {
    pub fn new(visualization: Visualization) -> Self {
        Self {
            visualization,
            parts: Parts {
                slab: Mesh::cuboid(1.2, 3.0, 2.0),
                arrow: Mesh::arrow(0.12),
                coil: Mesh::frame(2.0, 1.4, 0.15),
                core: Mesh::frame(4.0, 3.0, 0.5),
                rotor: Mesh::cuboid(2.6, 0.45, 0.45),
                marker: Mesh::cube(0.25),
            },
        }
    }

    pub fn visualization(&self) -> Visualization {
        self.visualization
    }

    /// Where the camera sits for this card.
    pub fn camera_position(&self) -> Point3<f32> {
        match self.visualization {
            Visualization::AcGenerator | Visualization::Solenoid | Visualization::Transformer => {
                Point3::new(3.0, 2.5, 8.0)
            }
            _ => Point3::new(0.0, 0.0, 9.0),
        }
    }

    /// Flat phasor diagrams read best without perspective.
    pub fn projection_mode(&self) -> ProjectionMode {
        match self.visualization {
            Visualization::RotatingField | Visualization::PowerFactor => ProjectionMode::Orthographic,
            _ => ProjectionMode::Perspective,
        }
    }

    pub fn frame(&self, sample: &WaveformSample) -> Vec<Instance<'_>> {
        let p = &self.parts;
        let at = |x: f32, y: f32, z: f32| Transform::translation_matrix(x, y, z);
        let spin_z = |angle: f64| Transform::rotation_matrix(&RotationState::about_z(angle));
        let body = Transform::rotation_matrix(&RotationState::from_sample(self.visualization, sample));

        match self.visualization {
            Visualization::DcMotor => vec![
                instance(&p.slab, at(-2.5, 0.0, 0.0), Tint::Red, 0.0),
                instance(&p.slab, at(2.5, 0.0, 0.0), Tint::Blue, 0.0),
                instance(&p.rotor, body, Tint::Yellow, 0.2),
            ],

            Visualization::AcGenerator => {
                let peak = sample.value(Channel::PeakVoltage);
                let glow = if peak > 0.0 {
                    (sample.value(Channel::Voltage) / peak) as f32
                } else {
                    0.0
                };
                // coil plane contains the X axis, so spinning about X flips it between the poles
                vec![
                    instance(&p.slab, at(-2.2, 0.0, 0.0), Tint::Red, 0.0),
                    instance(&p.slab, at(2.2, 0.0, 0.0), Tint::Blue, 0.0),
                    instance(&p.coil, body, Tint::Yellow, glow),
                ]
            }

            Visualization::InductionMotor => {
                let mut nodes = self.phase_coils(sample, 2.8);
                nodes.push(instance(
                    &p.arrow,
                    spin_z(sample.value(Channel::FieldAngle)) * Transform::scale_matrix(2.2, 1.0, 1.0),
                    Tint::Cyan,
                    0.6,
                ));
                nodes.push(instance(&p.rotor, body, Tint::Grey, 0.0));
                nodes
            }

            Visualization::RotatingField => {
                let mut nodes = self.phase_coils(sample, 3.0);
                for (k, tint) in phase_tints().into_iter().enumerate() {
                    let axis = k as f64 * std::f64::consts::TAU / 3.0;
                    let magnitude = sample.phases().get(k).copied().unwrap_or(0.0);
                    nodes.push(instance(&p.arrow, Transform::phasor(axis, 2.0 * magnitude), tint, 0.3));
                }
                nodes.push(instance(
                    &p.arrow,
                    Transform::phasor(
                        sample.value(Channel::NetVectorAngle),
                        1.5 * sample.value(Channel::NetVectorMagnitude),
                    ),
                    Tint::Magenta,
                    0.8,
                ));
                nodes
            }

            Visualization::Transformer => {
                // core glow and both flux arrows read the same intensity
                let flux = sample.value(Channel::FluxIntensity) as f32;
                let opacity = sample.value(Channel::FluxOpacity) as f32;
                let mut nodes = vec![
                    instance(&p.core, Matrix4::identity(), Tint::Grey, flux * 0.5),
                    instance(&p.coil, at(-2.0, 0.0, 0.0) * spin_z(std::f64::consts::FRAC_PI_2), Tint::Red, 0.2),
                    instance(&p.coil, at(2.0, 0.0, 0.0) * spin_z(std::f64::consts::FRAC_PI_2), Tint::Blue, 0.2),
                ];
                for (x, y, angle) in [(0.0, 1.5, 0.0), (0.0, -1.5, std::f64::consts::PI)] {
                    nodes.push(instance(
                        &p.arrow,
                        at(x, y, 0.6) * spin_z(angle),
                        Tint::Green,
                        opacity * flux,
                    ));
                }
                nodes
            }

            Visualization::Solenoid => sample
                .markers()
                .iter()
                .map(|m| {
                    let pos = m.position.cast::<f32>();
                    instance(&p.marker, at(pos.x, pos.y, pos.z), Tint::Yellow, 1.0)
                })
                .collect(),

            Visualization::PowerFactor => {
                let projection = sample.value(Channel::Projection);
                let radius = projection.hypot(sample.value(Channel::Quadrature));
                let projection_tint = match sample.polarity(Channel::Projection) {
                    Polarity::Positive => Tint::Red,
                    Polarity::Negative => Tint::Blue,
                };
                vec![
                    instance(&p.arrow, Transform::phasor(0.0, radius), Tint::Grey, 0.0),
                    instance(
                        &p.arrow,
                        Transform::phasor(sample.value(Channel::AngleRad), radius),
                        Tint::Yellow,
                        0.4,
                    ),
                    instance(
                        &p.arrow,
                        at(0.0, -0.3, 0.0) * Transform::phasor(0.0, projection),
                        projection_tint,
                        0.8,
                    ),
                ]
            }
        }
    }

    /// Three stator coils around the origin, glowing with their phase current.
    fn phase_coils(&self, sample: &WaveformSample, radius: f32) -> Vec<Instance<'_>> {
        phase_tints()
            .into_iter()
            .enumerate()
            .map(|(k, tint)| {
                let axis = k as f32 * std::f32::consts::TAU / 3.0;
                let offset = Vector3::new(radius * axis.cos(), radius * axis.sin(), 0.0);
                let model = Transform::model_matrix(
                    offset,
                    &RotationState::new(0.0, 0.0, axis),
                    Vector3::new(0.3, 0.6, 1.0),
                );
                let current = sample.phases().get(k).copied().unwrap_or(0.0);
                instance(&self.parts.slab, model, tint, coil_emissive(current))
            })
            .collect()
    }
}

fn phase_tints() -> [Tint; 3] {
    [Tint::Red, Tint::Yellow, Tint::Blue]
}

fn instance(mesh: &Mesh, model: Matrix4<f32>, tint: Tint, emissive: f32) -> Instance<'_> {
    Instance {
        mesh,
        model,
        tint,
        emissive: emissive.clamp(0.0, 1.0),
    }
}
