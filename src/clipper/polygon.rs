//! Fixed-capacity convex polygon produced by clipping.

use super::frustum::{FrustumPlane, NUM_CLIP_PLANES};
use crate::math::{Vec2, Vec3};

/// Upper bound on polygon size.
///
/// Clipping a convex polygon against one plane adds at most one vertex, so a
/// triangle leaves the frustum with at most `3 + 6` vertices. One slot is kept
/// spare for the duplicated vertex a plane produces when an edge endpoint lies
/// exactly on it.
pub const MAX_POLYGON_VERTICES: usize = 3 + NUM_CLIP_PLANES + 1;

/// A camera-space vertex with the attributes interpolated during clipping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl ClipVertex {
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }

    /// Linearly interpolate position and UV.
    /// Used when a polygon edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// An ordered convex polygon stored inline.
///
/// Pushing past [`MAX_POLYGON_VERTICES`] drops the vertex and marks the
/// polygon as truncated instead of overflowing.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: [ClipVertex; MAX_POLYGON_VERTICES],
    len: usize,
    truncated: bool,
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            vertices: [ClipVertex::default(); MAX_POLYGON_VERTICES],
            len: 0,
            truncated: false,
        }
    }
}

impl Polygon {
    /// Create a polygon from a triangle (3 vertices).
    pub fn from_triangle(v0: ClipVertex, v1: ClipVertex, v2: ClipVertex) -> Self {
        let mut polygon = Self::default();
        polygon.push(v0);
        polygon.push(v1);
        polygon.push(v2);
        polygon
    }

    /// Appends a vertex; returns `false` (and marks truncation) when full.
    pub fn push(&mut self, vertex: ClipVertex) -> bool {
        if self.len == MAX_POLYGON_VERTICES {
            self.truncated = true;
            return false;
        }
        self.vertices[self.len] = vertex;
        self.len += 1;
        true
    }

    pub fn vertices(&self) -> &[ClipVertex] {
        &self.vertices[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if fewer than three vertices remain, i.e. nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.len < 3
    }

    /// True if a vertex was ever dropped for lack of capacity.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Clip this polygon against a single plane using the Sutherland-Hodgman algorithm.
    ///
    /// Vertices with a non-negative signed distance are inside. Every edge
    /// whose endpoints fall on different sides contributes its intersection at
    /// `t = d(current) / (d(current) - d(next))`.
    pub fn clip_against_plane(&self, plane: &FrustumPlane) -> Self {
        let mut output = Self {
            truncated: self.truncated,
            ..Self::default()
        };
        if self.is_empty() {
            return output;
        }

        let vertices = self.vertices();
        for (i, current) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % vertices.len()];

            let d1 = plane.signed_distance(current.position);
            let d2 = plane.signed_distance(next.position);

            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                output.push(*current);
            }
            if current_inside != next_inside {
                let t = d1 / (d1 - d2);
                output.push(current.lerp(next, t));
            }
        }

        output
    }

    /// Fan triangulation from vertex 0: `(v0, v[i], v[i + 1])` for each
    /// `i` in `1..len - 1`. Polygons with fewer than three vertices yield
    /// nothing.
    pub fn triangles(&self) -> impl Iterator<Item = [ClipVertex; 3]> + '_ {
        let vertices = self.vertices();
        (1..vertices.len().saturating_sub(1)).map(move |i| [vertices[0], vertices[i], vertices[i + 1]])
    }
}
