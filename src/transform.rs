//! Per-mesh transform parameters.
//!
//! Scene-update code mutates these between frames; the pipeline reads them
//! once per frame to build the mesh's world matrix.

use crate::math::{Mat4, Vec3};

/// Translation, Euler rotation (radians) and scale of a mesh.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// mesh.transform_mut()
///     .set_translation(Vec3::new(0.0, 0.0, 5.0))
///     .rotate(Vec3::new(0.01, 0.01, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    translation: Vec3,
    rotation: Vec3,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec3) -> &mut Self {
        self.translation = translation;
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.translation = self.translation + delta;
        self
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Adds a delta to the Euler angles.
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Builds the world matrix.
    ///
    /// Order: Translation * RotationX * RotationY * RotationZ * Scale, so a
    /// vertex is scaled, then rotated about Z, Y and X, then translated.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::translation(self.translation.x, self.translation.y, self.translation.z)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default().world_matrix(), Mat4::identity());
    }

    #[test]
    fn fluent_setters_chain() {
        let mut t = Transform::default();
        t.set_translation(Vec3::new(1.0, 2.0, 3.0))
            .rotate(Vec3::new(0.0, 0.5, 0.0))
            .set_scale_uniform(2.0);

        assert_eq!(t.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.5);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn scale_is_applied_before_translation() {
        let t = Transform::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let p = t.world_matrix() * Vec3::new(1.0, 1.0, 1.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 7.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_z_is_applied_before_rotation_x() {
        // Rz(90) takes +X to +Y, then Rx(90) takes +Y to +Z.
        let t = Transform::new(Vec3::ZERO, Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2), Vec3::ONE);
        let p = t.world_matrix() * Vec3::RIGHT;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-5);
    }
}
