//! Where a body sits in the world.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::SoftBodyError;

/// The translation, rotation and scale of a body.
///
/// The rotation is given as XYZ Euler angles in radians. The world transform is `translation · rotation · scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The position of the body's origin in the world.
    pub translation: Vec3,
    /// XYZ Euler angles, in radians.
    pub rotation: Vec3,
    /// The per-axis scale.
    pub scale: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Placement {
    /// A placement at `translation` with a uniform `scale`.
    #[must_use]
    pub const fn at(translation: Vec3, scale: f32) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(scale),
        }
    }

    /// Checks that the placement has an invertible transform.
    ///
    /// # Errors
    ///
    /// - If the translation or rotation is not finite.
    /// - If any scale component is zero or not finite.
    pub fn validate(&self) -> Result<(), SoftBodyError> {
        let invalid = |field, value| Err(SoftBodyError::InvalidPlacement { field, value });

        if !self.translation.is_finite() {
            return invalid("translation", self.translation);
        }
        if !self.rotation.is_finite() {
            return invalid("rotation", self.rotation);
        }
        if !(self.scale.is_finite() && self.scale.cmpne(Vec3::ZERO).all()) {
            return invalid("scale", self.scale);
        }
        Ok(())
    }

    /// The 4×4 world transform.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }

    /// The world transform and its inverse.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::new(self.transform())
    }
}

/// A world transform together with its inverse, computed once per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Local to world.
    transform: Mat4,
    /// World to local.
    inverse: Mat4,
}

impl Frame {
    /// The identity frame: local space is world space.
    pub const IDENTITY: Self = Self {
        transform: Mat4::IDENTITY,
        inverse: Mat4::IDENTITY,
    };

    /// Creates a frame from a world transform.
    #[must_use]
    pub fn new(transform: Mat4) -> Self {
        if transform == Mat4::IDENTITY {
            return Self::IDENTITY;
        }
        Self {
            transform,
            inverse: transform.inverse(),
        }
    }

    /// Local to world.
    #[must_use]
    pub const fn transform(&self) -> Mat4 {
        self.transform
    }

    /// World to local.
    #[must_use]
    pub const fn inverse(&self) -> Mat4 {
        self.inverse
    }

    /// Maps a local point to world space.
    #[must_use]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.transform.transform_point3(local)
    }

    /// Maps a world point to local space.
    #[must_use]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_point3(world)
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use glam::{Mat4, Vec3};

    use super::{Frame, Placement};
    use crate::SoftBodyError;

    #[test]
    fn default_is_identity() {
        assert_eq!(Placement::default().frame(), Frame::IDENTITY);
    }

    #[test]
    fn round_trip() {
        let placement = Placement {
            translation: Vec3::new(0.0, 6.0, 0.0),
            rotation: Vec3::new(0.3, -0.2, 1.1),
            scale: Vec3::splat(5.0),
        };
        let frame = placement.frame();
        let local = Vec3::new(0.25, -0.5, 0.75);
        let back = frame.to_local(frame.to_world(local));
        assert_float_eq!(back.to_array(), local.to_array(), abs_all <= 1e-5);

        let product = frame.transform() * frame.inverse();
        assert_float_eq!(product.to_cols_array(), Mat4::IDENTITY.to_cols_array(), abs_all <= 1e-5);
    }

    #[test]
    fn translation_and_scale() {
        let frame = Placement::at(Vec3::new(0.0, 6.0, 0.0), 5.0).frame();
        let world = frame.to_world(Vec3::new(0.0, -1.0, 0.0));
        assert_float_eq!(world.to_array(), [0.0, 1.0, 0.0], abs_all <= 1e-6);
    }

    #[test]
    fn singular_placements() {
        assert_eq!(Placement::default().validate(), Ok(()));
        assert_eq!(Placement::at(Vec3::ONE, -2.0).validate(), Ok(()));

        let cases = [
            (Placement::at(Vec3::ZERO, 0.0), "scale"),
            (Placement::at(Vec3::ZERO, f32::NAN), "scale"),
            (Placement::at(Vec3::new(f32::INFINITY, 0.0, 0.0), 1.0), "translation"),
            (
                Placement {
                    rotation: Vec3::new(0.0, f32::NAN, 0.0),
                    ..Placement::default()
                },
                "rotation",
            ),
            (
                Placement {
                    scale: Vec3::new(1.0, 0.0, 1.0),
                    ..Placement::default()
                },
                "scale",
            ),
        ];
        for (placement, field) in cases {
            match placement.validate() {
                Err(SoftBodyError::InvalidPlacement { field: f, .. }) => assert_eq!(f, field, "{placement:?}"),
                other => panic!("Expected an invalid {field}, got {other:?}"),
            }
        }
    }
}
