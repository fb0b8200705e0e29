//! Model transforms derived from waveform samples.
//!
//! Rotation state is rebuilt from sampled angles every frame; nothing here
//! integrates deltas, so a dropped frame never shifts a rotor.

use nalgebra::{Matrix4, Vector3};

use crate::sample::{Channel, WaveformSample};
use crate::visualization::Visualization;

/// Rotation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Spin about the X axis, e.g. the generator coil.
    pub fn about_x(angle: f64) -> Self {
        Self::new(angle as f32, 0.0, 0.0)
    }

    /// Spin about the Z axis (towards the viewer), e.g. motor rotors and phasors.
    pub fn about_z(angle: f64) -> Self {
        Self::new(0.0, 0.0, angle as f32)
    }

    /// Orientation of the card's main moving body for this sample.
    ///
    /// Cards with no rotating body (transformer, solenoid) stay at rest.
    pub fn from_sample(visualization: Visualization, sample: &WaveformSample) -> Self {
        match visualization {
            Visualization::DcMotor | Visualization::PowerFactor => {
                Self::about_z(sample.value(Channel::AngleRad))
            }
            Visualization::AcGenerator => Self::about_x(sample.value(Channel::AngleRad)),
            Visualization::InductionMotor => Self::about_z(sample.value(Channel::RotorAngle)),
            Visualization::RotatingField => Self::about_z(sample.value(Channel::NetVectorAngle)),
            Visualization::Transformer | Visualization::Solenoid => Self::zero(),
        }
    }

}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix applying Z, then Y, then X.
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Translate * rotate * scale.
    pub fn model_matrix(
        translation: Vector3<f32>,
        rotation: &RotationState,
        scale: Vector3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new_translation(&translation)
            * Self::rotation_matrix(rotation)
            * Matrix4::new_nonuniform_scaling(&scale)
    }

    /// Phasor arrow: a unit mesh along +X, stretched to `|magnitude|` and
    /// pointed at `angle` in the XY plane. Negative magnitudes flip it.
    pub fn phasor(angle: f64, magnitude: f64) -> Matrix4<f32> {
        let (angle, length) = if magnitude < 0.0 {
            (angle + std::f64::consts::PI, -magnitude)
        } else {
            (angle, magnitude)
        };
        Self::rotation_matrix(&RotationState::about_z(angle))
            * Self::scale_matrix(length as f32, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    fn near(a: Point3<f32>, b: Point3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&RotationState::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn about_z_turns_x_into_y() {
        let m = Transform::rotation_matrix(&RotationState::about_z(FRAC_PI_2));
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(near(p, Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn about_x_turns_y_into_z() {
        let m = Transform::rotation_matrix(&RotationState::about_x(FRAC_PI_2));
        let p = m.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert!(near(p, Point3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn rotation_follows_the_sampled_angle() {
        use crate::waveform::Waveform;

        let generator = Visualization::AcGenerator.default_parameters().sample(0.5);
        let state = RotationState::from_sample(Visualization::AcGenerator, &generator);
        assert!((state.x - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!((state.y, state.z), (0.0, 0.0));

        let motor = Visualization::DcMotor.default_parameters().sample(1.0);
        assert!((RotationState::from_sample(Visualization::DcMotor, &motor).z + 2.0).abs() < 1e-6);

        let solenoid = Visualization::Solenoid.default_parameters().sample(3.0);
        assert_eq!(
            RotationState::from_sample(Visualization::Solenoid, &solenoid),
            RotationState::zero()
        );
    }

    #[test]
    fn phasor_flips_negative_magnitudes() {
        let m = Transform::phasor(0.0, -2.0);
        let tip = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(near(tip, Point3::new(-2.0, 0.0, 0.0)));
    }

    #[test]
    fn model_matrix_scales_then_rotates_then_translates() {
        let m = Transform::model_matrix(
            Vector3::new(1.0, 0.0, 0.0),
            &RotationState::about_z(FRAC_PI_2),
            Vector3::new(2.0, 1.0, 1.0),
        );
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(near(p, Point3::new(1.0, 2.0, 0.0)));
    }
}
