//! Edge function-based triangle rasterization.
//!
//! The foundation of GPU rasterization: every pixel in the triangle's
//! bounding box is tested against the three edges.
//!
//! # Algorithm Overview
//!
//! 1. Compute a bounding box around the triangle, clipped to the buffer
//! 2. For each pixel center in the box, compute barycentric weights
//! 3. The pixel is inside when all three weights are non-negative
//!
//! The weights are the normalized edge functions, so the inside test and
//! attribute interpolation come from the same numbers. Winding order does not
//! matter since each weight is divided by the signed area.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)

use super::shader::{barycentric_weights, shade_fragment, FlatShader, PixelShader, TextureShader};
use super::{inverse_w, Rasterizer, Triangle};
use crate::math::Vec2;
use crate::render::framebuffer::FrameBuffer;
use crate::texture::Texture;

/// Triangle rasterizer using the edge function algorithm.
///
/// The bounding box approach tests many pixels outside the triangle,
/// especially for thin or elongated triangles, but each test is independent.
pub struct EdgeFunctionRasterizer;

impl EdgeFunctionRasterizer {
    /// Creates a new edge function rasterizer instance.
    pub fn new() -> Self {
        EdgeFunctionRasterizer {}
    }

    fn rasterize_with_shader<S: PixelShader>(
        points: [Vec2; 3],
        inv_w: [f32; 3],
        buffer: &mut FrameBuffer,
        shader: &S,
    ) {
        let [v0, v1, v2] = points;

        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to framebuffer bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(buffer.width() as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(buffer.height() as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at pixel center
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(lambda) = barycentric_weights(v0, v1, v2, p) else {
                    return; // Degenerate triangle
                };

                if lambda.iter().all(|&w| w >= 0.0) {
                    shade_fragment(buffer, x, y, lambda, inv_w, shader);
                }
            }
        }
    }
}

impl Default for EdgeFunctionRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer, texture: Option<&Texture>) {
        let Some(inv_w) = inverse_w(triangle) else {
            return;
        };
        let points = triangle.points.map(|p| Vec2::new(p.x, p.y));

        match texture {
            Some(texture) => {
                let shader = TextureShader::new(texture, triangle.uvs, inv_w);
                Self::rasterize_with_shader(points, inv_w, buffer, &shader);
            }
            None => {
                let shader = FlatShader::new(triangle.color);
                Self::rasterize_with_shader(points, inv_w, buffer, &shader);
            }
        }
    }
}
