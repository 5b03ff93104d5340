//! The single directional light used for flat shading.

use crate::math::Vec3;

/// Lowest intensity a face can receive, so unlit faces stay visible.
pub const MIN_INTENSITY: f32 = 0.1;

/// A directional light that illuminates the scene uniformly from a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light travels (not where it comes from).
    pub direction: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::FORWARD)
    }
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
        }
    }

    /// Flat-shading intensity for a face with the given unit normal.
    ///
    /// `-dot(normal, direction)`, clamped to `[MIN_INTENSITY, 1.0]`: a face
    /// looking straight into the light gets 1, perpendicular or back-facing
    /// faces get the floor.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        Self::intensity_for(normal, self.direction)
    }

    /// Same as [`DirectionalLight::intensity`] with an explicit light
    /// direction, e.g. one already transformed into camera space.
    pub fn intensity_for(normal: Vec3, direction: Vec3) -> f32 {
        let i = -normal.dot(direction);
        if i.is_nan() {
            return MIN_INTENSITY;
        }
        i.clamp(MIN_INTENSITY, 1.0)
    }
}
