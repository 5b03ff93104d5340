//! The six camera-space clipping planes.

use super::polygon::{ClipVertex, Polygon};
use crate::math::Vec3;

pub const NUM_CLIP_PLANES: usize = 6;

/// Which side of the view volume a plane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    Left,
    Right,
    Top,
    Bottom,
    Near,
    Far,
}

/// A plane through `point` with unit `normal`.
///
/// The normal points into the view volume, so the signed distance is
/// non-negative for visible points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl FrustumPlane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Returns the signed distance from a point to this plane.
    /// Positive = inside (same side as normal), Negative = outside.
    #[inline]
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.point).dot(self.normal)
    }
}

/// Camera-space frustum defined by six clipping planes.
///
/// Planes are built once from the projection parameters and only rebuilt
/// when the field of view or aspect ratio changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    planes: [(PlaneSide, FrustumPlane); NUM_CLIP_PLANES],
}

impl Frustum {
    /// Creates the frustum from projection parameters.
    ///
    /// # Arguments
    /// * `fov_x` - Horizontal field of view in radians
    /// * `fov_y` - Vertical field of view in radians
    /// * `z_near` - Near clipping plane distance
    /// * `z_far` - Far clipping plane distance
    pub fn new(fov_x: f32, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        let (sin_x, cos_x) = (fov_x / 2.0).sin_cos();
        let (sin_y, cos_y) = (fov_y / 2.0).sin_cos();
        let origin = Vec3::ZERO;

        Self {
            planes: [
                (
                    PlaneSide::Left,
                    FrustumPlane::new(origin, Vec3::new(cos_x, 0.0, sin_x)),
                ),
                (
                    PlaneSide::Right,
                    FrustumPlane::new(origin, Vec3::new(-cos_x, 0.0, sin_x)),
                ),
                (
                    PlaneSide::Top,
                    FrustumPlane::new(origin, Vec3::new(0.0, -cos_y, sin_y)),
                ),
                (
                    PlaneSide::Bottom,
                    FrustumPlane::new(origin, Vec3::new(0.0, cos_y, sin_y)),
                ),
                (
                    PlaneSide::Near,
                    FrustumPlane::new(Vec3::new(0.0, 0.0, z_near), Vec3::FORWARD),
                ),
                (
                    PlaneSide::Far,
                    FrustumPlane::new(Vec3::new(0.0, 0.0, z_far), -Vec3::FORWARD),
                ),
            ],
        }
    }

    /// The planes in clipping order: left, right, top, bottom, near, far.
    pub fn planes(&self) -> impl Iterator<Item = (PlaneSide, &FrustumPlane)> + '_ {
        self.planes.iter().map(|(side, plane)| (*side, plane))
    }

    pub fn plane(&self, side: PlaneSide) -> &FrustumPlane {
        self.planes
            .iter()
            .find(|(s, _)| *s == side)
            .map(|(_, plane)| plane)
            .unwrap_or(&self.planes[0].1)
    }

    /// True if the point lies inside (or on) every plane.
    pub fn contains(&self, position: Vec3) -> bool {
        self.planes
            .iter()
            .all(|(_, plane)| plane.signed_distance(position) >= 0.0)
    }

    /// Clip a polygon against all frustum planes.
    /// Returns the clipped polygon, which is empty once any plane removes it.
    pub fn clip_polygon(&self, polygon: Polygon) -> Polygon {
        let mut result = polygon;

        for (_, plane) in &self.planes {
            if result.is_empty() {
                break;
            }
            result = result.clip_against_plane(plane);
        }

        result
    }

    /// Clips a camera-space triangle; see [`Frustum::clip_polygon`].
    ///
    /// Triangles with every vertex inside skip the plane loop.
    pub fn clip_triangle(&self, triangle: [ClipVertex; 3]) -> Polygon {
        let polygon = Polygon::from_triangle(triangle[0], triangle[1], triangle[2]);
        if triangle.iter().all(|v| self.contains(v.position)) {
            return polygon;
        }
        self.clip_polygon(polygon)
    }
}
