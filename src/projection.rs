//! Perspective projection and the matching clip volume.
//!
//! Camera space looks down +Z. The projection matrix maps `z_near..z_far`
//! onto `0..1` and copies the camera-space depth into `w`, so after
//! `Mat4::project` the divide by `w` gives NDC x/y and `w` stays available
//! for depth and perspective-correct interpolation.
//!
//! The clip planes are derived from the same parameters, so the matrix and
//! the frustum can never disagree. Both are rebuilt together whenever the
//! output size changes.

use crate::clipper::Frustum;
use crate::math::Mat4;

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width over height of the output.
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
    matrix: Mat4,
    frustum: Frustum,
}

impl Projection {
    /// `fov_y` is in radians; `0 < z_near < z_far`.
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let fov_x = horizontal_fov(fov_y, aspect_ratio);
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
            matrix: Mat4::perspective(fov_y, aspect_ratio, z_near, z_far),
            frustum: Frustum::new(fov_x, fov_y, z_near, z_far),
        }
    }

    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// Projection for a `width` x `height` pixel buffer.
    pub fn for_viewport(fov_y_degrees: f32, width: u32, height: u32, z_near: f32, z_far: f32) -> Self {
        Self::from_degrees(fov_y_degrees, viewport_aspect(width, height), z_near, z_far)
    }

    /// Adapts to a new output size, rebuilding the matrix and the planes.
    ///
    /// Returns false (and changes nothing) when the aspect ratio is the same.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let aspect_ratio = viewport_aspect(width, height);
        if aspect_ratio == self.aspect_ratio {
            return false;
        }
        *self = Self::new(self.fov_y, aspect_ratio, self.z_near, self.z_far);
        true
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn fov_x(&self) -> f32 {
        horizontal_fov(self.fov_y, self.aspect_ratio)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Camera-space clip planes matching [`Projection::matrix`].
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }
}

/// `tan(fov_x / 2) = aspect * tan(fov_y / 2)`
fn horizontal_fov(fov_y: f32, aspect_ratio: f32) -> f32 {
    2.0 * (aspect_ratio * (fov_y / 2.0).tan()).atan()
}

fn viewport_aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::PlaneSide;
    use crate::math::{Vec3, Vec4};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn square_viewport_has_equal_fovs() {
        let proj = Projection::new(FRAC_PI_4, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.fov_x(), proj.fov_y(), epsilon = 1e-6);
    }

    #[test]
    fn wide_viewport_widens_horizontal_fov() {
        let proj = Projection::for_viewport(45.0, 1600, 900, 0.1, 100.0);
        assert_relative_eq!(proj.fov_y(), FRAC_PI_4, epsilon = 1e-6);
        assert!(proj.fov_x() > proj.fov_y());
    }

    #[test]
    fn near_and_far_map_to_unit_depth() {
        let proj = Projection::from_degrees(60.0, 1.0, 0.5, 50.0);
        let near = proj.matrix().project(Vec4::point(Vec3::new(0.0, 0.0, 0.5)));
        let far = proj.matrix().project(Vec4::point(Vec3::new(0.0, 0.0, 50.0)));
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(far.w, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn frustum_edge_projects_to_ndc_edge() {
        let proj = Projection::for_viewport(60.0, 800, 400, 0.1, 100.0);
        // A point on the right plane lands on x = 1 after the divide.
        let x = (proj.fov_x() / 2.0).tan() * 10.0;
        let edge = Vec3::new(x, 0.0, 10.0);
        assert!(proj.frustum().plane(PlaneSide::Right).signed_distance(edge).abs() < 1e-4);

        let clip = proj.matrix().project(Vec4::point(edge));
        assert_relative_eq!(clip.x / clip.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn resize_rebuilds_matrix_and_planes() {
        let mut proj = Projection::for_viewport(60.0, 800, 600, 0.1, 100.0);
        let before = proj.clone();

        assert!(!proj.resize(800, 600));
        assert_eq!(proj, before);

        assert!(proj.resize(400, 400));
        assert_eq!(proj.aspect_ratio(), 1.0);
        assert_ne!(proj.matrix(), before.matrix());
        assert_ne!(proj.frustum(), before.frustum());
        assert_eq!(proj.fov_y(), before.fov_y());
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let proj = Projection::for_viewport(60.0, 640, 0, 0.1, 100.0);
        assert_eq!(proj.aspect_ratio(), 640.0);
        assert!(proj.fov_x().is_finite());
    }
}
