//! Camera view parameters.

use ember_math::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A pinhole camera described by where it sits and what it looks at.
///
/// `near` and `far` are carried for completeness; ray generation does not
/// use them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
    pub aspect_ratio: f32,
}

/// Orthonormal camera frame in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 60.0,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            near: 1.0,
            far: 1000.0,
            aspect_ratio: 1.0,
        }
    }
}

impl Camera {
    pub fn new(fov: f32, position: Vec3, target: Vec3, up: Vec3, aspect_ratio: f32) -> Self {
        Self {
            fov,
            position,
            target,
            up,
            aspect_ratio,
            ..Default::default()
        }
    }

    /// Camera frame, or `None` when it is undefined (target on top of the
    /// position, or `up` parallel to the view direction).
    pub fn basis(&self) -> Option<CameraBasis> {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return None;
        }
        let up = right.cross(forward);
        Some(CameraBasis { forward, right, up })
    }

    /// Camera-to-world transform. Camera space looks down -Z with +Y up.
    pub fn camera_to_world(&self) -> Option<Mat4> {
        let basis = self.basis()?;
        Some(Mat4::from_cols(
            basis.right.extend(0.0),
            basis.up.extend(0.0),
            (-basis.forward).extend(0.0),
            self.position.extend(1.0),
        ))
    }

    /// `tan(fov / 2)` with the fov given in degrees.
    pub fn tan_half_fov(&self) -> f32 {
        (self.fov.to_radians() / 2.0).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_is_identity_frame() {
        let camera = Camera::default();
        let basis = camera.basis().unwrap();

        assert!((basis.forward - Vec3::NEG_Z).length() < 1e-6);
        assert!((basis.right - Vec3::X).length() < 1e-6);
        assert!((basis.up - Vec3::Y).length() < 1e-6);

        let m = camera.camera_to_world().unwrap();
        assert!((m.transform_point3(Vec3::new(0.3, -0.2, -1.0)) - Vec3::new(0.3, -0.2, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_camera_to_world_moves_origin_to_position() {
        let camera = Camera::new(
            45.0,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(1.0, 2.0, 10.0),
            Vec3::Y,
            1.5,
        );
        let m = camera.camera_to_world().unwrap();

        assert!((m.transform_point3(Vec3::ZERO) - camera.position).length() < 1e-6);
        // Camera-space -Z maps onto the view direction
        let ahead = m.transform_point3(Vec3::NEG_Z) - camera.position;
        assert!((ahead - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_basis() {
        let mut camera = Camera::default();
        camera.up = Vec3::NEG_Z;
        assert!(camera.basis().is_none());

        let mut camera = Camera::default();
        camera.target = camera.position;
        assert!(camera.camera_to_world().is_none());
    }

    #[test]
    fn test_tan_half_fov() {
        let camera = Camera {
            fov: 90.0,
            ..Default::default()
        };
        assert!((camera.tan_half_fov() - 1.0).abs() < 1e-6);
    }
}
