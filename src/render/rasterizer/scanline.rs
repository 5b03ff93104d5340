//! Scanline-based triangle rasterization.
//!
//! Implements triangle filling with the classic scanline algorithm and
//! flat-top/flat-bottom decomposition.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y coordinate (top to bottom in screen space)
//! 2. **Split** at the middle vertex into an upper (flat-bottom) half and a
//!    lower (flat-top) half
//! 3. **Walk scanlines** computing the span start/end from inverse slopes
//! 4. **Shade each pixel** of the span through the shared fragment stage
//!
//! ```text
//!        v0                   v0
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>   v1 /----\  <- split at v1.y
//!     /      \              \    /
//!    /________\              \  /
//!                             \/
//!                             v2
//! ```
//!
//! # Edge anchoring
//!
//! Vertices are truncated to integer pixels before anything else. Both
//! halves compute, for each row `y`:
//!
//! ```text
//! x_start = x1 + (y - y1) * inv_slope_1
//! x_end   = x0 + (y - y0) * inv_slope_2
//! ```
//!
//! where the upper half uses `inv_slope_1 = (x1 - x0) / |y1 - y0|` and the
//! lower half `inv_slope_1 = (x2 - x1) / |y2 - y1|`; `inv_slope_2` is always
//! the long edge `(x2 - x0) / |y2 - y0|`. The upper half covers rows
//! `y0..=y1` and the lower half rows `y1..=y2`, so the middle row is visited
//! twice (the depth test makes the second visit a no-op). Each span covers
//! `x_start..x_end`, with the end column excluded.

use super::shader::{barycentric_weights, shade_fragment, FlatShader, PixelShader, TextureShader};
use super::{inverse_w, Rasterizer, Triangle};
use crate::math::Vec2;
use crate::render::framebuffer::FrameBuffer;
use crate::texture::Texture;

/// Vertices further off-screen than this are rejected before the integer
/// conversion, so edge deltas cannot overflow.
const MAX_SCREEN_COORD: f32 = (1 << 24) as f32;

/// Integer screen vertex carried through the sort with its attributes.
#[derive(Clone, Copy)]
struct ScanVertex {
    x: i32,
    y: i32,
    inv_w: f32,
    uv: Vec2,
}

/// Scanline-based triangle rasterizer.
///
/// Processes triangles one horizontal span at a time. Cache-friendly and
/// efficient for thin triangles, since only covered pixels are visited.
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    /// Creates a new scanline rasterizer instance.
    pub fn new() -> Self {
        Self
    }

    /// Sorts three vertices by Y coordinate, ascending.
    ///
    /// Three compare-and-swaps; attributes travel with their vertex.
    fn sort_vertices(v: &mut [ScanVertex; 3]) {
        if v[1].y < v[0].y {
            v.swap(0, 1);
        }
        if v[2].y < v[1].y {
            v.swap(1, 2);
        }
        if v[1].y < v[0].y {
            v.swap(0, 1);
        }
    }

    fn fill_span<S: PixelShader>(
        y: i32,
        x_start: f32,
        x_end: f32,
        v: &[ScanVertex; 3],
        buffer: &mut FrameBuffer,
        shader: &S,
    ) {
        let mut x_start = x_start as i32;
        let mut x_end = x_end as i32;
        if x_end < x_start {
            std::mem::swap(&mut x_start, &mut x_end);
        }

        // Clamp to the buffer; off-screen pixels would be rejected anyway.
        let x_start = x_start.max(0);
        let x_end = x_end.min(buffer.width() as i32);

        let a = Vec2::new(v[0].x as f32, v[0].y as f32);
        let b = Vec2::new(v[1].x as f32, v[1].y as f32);
        let c = Vec2::new(v[2].x as f32, v[2].y as f32);
        let inv_w = [v[0].inv_w, v[1].inv_w, v[2].inv_w];

        for x in x_start..x_end {
            let p = Vec2::new(x as f32, y as f32);
            let Some(lambda) = barycentric_weights(a, b, c, p) else {
                continue;
            };
            shade_fragment(buffer, x, y, clamp_weights(lambda), inv_w, shader);
        }
    }

    fn rasterize_with_shader<S: PixelShader>(
        v: &[ScanVertex; 3],
        buffer: &mut FrameBuffer,
        shader: &S,
    ) {
        let [v0, v1, v2] = *v;
        let height = buffer.height() as i32;

        let long_slope = if v2.y != v0.y {
            (v2.x - v0.x) as f32 / (v2.y - v0.y).abs() as f32
        } else {
            0.0
        };

        // Upper half (flat-bottom)
        if v1.y != v0.y {
            let inv_slope_1 = (v1.x - v0.x) as f32 / (v1.y - v0.y).abs() as f32;
            for y in v0.y.max(0)..=v1.y.min(height - 1) {
                let x_start = v1.x as f32 + (y - v1.y) as f32 * inv_slope_1;
                let x_end = v0.x as f32 + (y - v0.y) as f32 * long_slope;
                Self::fill_span(y, x_start, x_end, v, buffer, shader);
            }
        }

        // Lower half (flat-top)
        if v2.y != v1.y {
            let inv_slope_1 = (v2.x - v1.x) as f32 / (v2.y - v1.y).abs() as f32;
            for y in v1.y.max(0)..=v2.y.min(height - 1) {
                let x_start = v1.x as f32 + (y - v1.y) as f32 * inv_slope_1;
                let x_end = v0.x as f32 + (y - v0.y) as f32 * long_slope;
                Self::fill_span(y, x_start, x_end, v, buffer, shader);
            }
        }
    }
}

/// Pulls weights of pixels just outside an edge back onto the triangle.
///
/// Span ends are truncated, so the first pixel of a row can sit a fraction
/// of a pixel outside the edge it starts on. Its negative weight would
/// extrapolate UVs past the texture border and wrap to the far side.
#[inline]
fn clamp_weights(lambda: [f32; 3]) -> [f32; 3] {
    let clamped = lambda.map(|l| l.clamp(0.0, 1.0));
    let sum = clamped[0] + clamped[1] + clamped[2];
    if sum > 0.0 {
        clamped.map(|l| l / sum)
    } else {
        lambda
    }
}

impl Default for ScanlineRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer, texture: Option<&Texture>) {
        let Some(inv_w) = inverse_w(triangle) else {
            return;
        };
        let in_range = |c: f32| c.is_finite() && c.abs() < MAX_SCREEN_COORD;
        if !triangle.points.iter().all(|p| in_range(p.x) && in_range(p.y)) {
            return;
        }

        let mut v = [0, 1, 2].map(|i| ScanVertex {
            x: triangle.points[i].x as i32,
            y: triangle.points[i].y as i32,
            inv_w: inv_w[i],
            uv: triangle.uvs[i],
        });
        Self::sort_vertices(&mut v);

        match texture {
            Some(texture) => {
                let uvs = [v[0].uv, v[1].uv, v[2].uv];
                let inv_w = [v[0].inv_w, v[1].inv_w, v[2].inv_w];
                let shader = TextureShader::new(texture, uvs, inv_w);
                Self::rasterize_with_shader(&v, buffer, &shader);
            }
            None => {
                let shader = FlatShader::new(triangle.color);
                Self::rasterize_with_shader(&v, buffer, &shader);
            }
        }
    }
}
