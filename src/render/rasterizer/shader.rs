//! Pixel shaders and the fragment stage shared by both rasterizers.
//!
//! The rasterizers decide which pixels a triangle covers and compute the
//! barycentric weights for each one. Everything after that is common:
//!
//! - Interpolating `1/w` and converting it to a depth value
//! - The depth test
//! - Perspective-correct attribute interpolation (UVs)
//! - Texture sampling / final color
//!
//! Keeping this in one place means the scanline and edge-function
//! rasterizers produce the same color and depth for a given pixel.

use crate::math::Vec2;
use crate::render::framebuffer::FrameBuffer;
use crate::texture::Texture;

/// Barycentric weights `[alpha, beta, gamma]` of `p` relative to the
/// triangle `(a, b, c)`.
///
/// Computed from 2D cross-product areas:
///
/// ```text
/// alpha = |PC x PB| / |AC x AB|
/// beta  = |AC x AP| / |AC x AB|
/// gamma = 1 - alpha - beta
/// ```
///
/// Returns `None` for a degenerate (zero-area) triangle.
#[inline]
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<[f32; 3]> {
    let ac = c - a;
    let ab = b - a;
    let area = ac.cross(ab);
    if area.abs() < f32::EPSILON {
        return None;
    }

    let ap = p - a;
    let pc = c - p;
    let pb = b - p;

    let alpha = pc.cross(pb) / area;
    let beta = ac.cross(ap) / area;
    let gamma = 1.0 - alpha - beta;

    Some([alpha, beta, gamma])
}

/// Trait for per-pixel shading computations.
///
/// The rasterizer calls `shade()` for each pixel that passes the depth test.
///
/// # Arguments
/// * `lambda` - Barycentric weights [λ₀, λ₁, λ₂], summing to 1.0
/// * `inv_w` - The interpolated `1/w` at this pixel, for perspective correction
pub trait PixelShader {
    fn shade(&self, lambda: [f32; 3], inv_w: f32) -> u32;
}

/// Returns a constant color for all pixels.
///
/// Used for flat shading where the whole triangle has a single color
/// computed from the face normal.
pub struct FlatShader {
    color: u32,
}

impl FlatShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], _inv_w: f32) -> u32 {
        self.color
    }
}

/// Samples a texture at perspective-correct UV coordinates.
///
/// UVs are not linear in screen space, but `u/w`, `v/w` and `1/w` are.
/// The shader keeps `uv / w` per vertex, interpolates it with the
/// barycentric weights and divides by the interpolated `1/w`.
pub struct TextureShader<'a> {
    texture: &'a Texture,
    uv_over_w: [Vec2; 3],
}

impl<'a> TextureShader<'a> {
    pub fn new(texture: &'a Texture, uvs: [Vec2; 3], inv_w: [f32; 3]) -> Self {
        Self {
            texture,
            uv_over_w: [uvs[0] * inv_w[0], uvs[1] * inv_w[1], uvs[2] * inv_w[2]],
        }
    }

    #[inline]
    fn interpolate_uv(&self, lambda: [f32; 3], inv_w: f32) -> Vec2 {
        let [a, b, c] = self.uv_over_w;
        let u = lambda[0] * a.x + lambda[1] * b.x + lambda[2] * c.x;
        let v = lambda[0] * a.y + lambda[1] * b.y + lambda[2] * c.y;
        Vec2::new(u / inv_w, v / inv_w)
    }
}

impl PixelShader for TextureShader<'_> {
    #[inline]
    fn shade(&self, lambda: [f32; 3], inv_w: f32) -> u32 {
        let uv = self.interpolate_uv(lambda, inv_w);
        self.texture.sample(uv.x, uv.y)
    }
}

/// Depth-tests and shades one covered pixel.
///
/// `inv_w` holds the per-vertex `1/w` in the same order as `lambda`.
#[inline]
pub(crate) fn shade_fragment<S: PixelShader>(
    buffer: &mut FrameBuffer,
    x: i32,
    y: i32,
    lambda: [f32; 3],
    inv_w: [f32; 3],
    shader: &S,
) {
    let interpolated = lambda[0] * inv_w[0] + lambda[1] * inv_w[1] + lambda[2] * inv_w[2];
    if interpolated <= 0.0 || !interpolated.is_finite() {
        return;
    }

    let depth = buffer.depth_for(interpolated);
    if buffer.depth_test(x, y, depth) {
        let color = shader.shade(lambda, interpolated);
        buffer.set_pixel_with_depth(x, y, depth, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn barycentric_weights_at_vertices() {
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(50.0, 20.0);
        let c = Vec2::new(20.0, 60.0);

        let wa = barycentric_weights(a, b, c, a).unwrap();
        let wb = barycentric_weights(a, b, c, b).unwrap();
        let wc = barycentric_weights(a, b, c, c).unwrap();
        for (w, expected) in [(wa, [1.0, 0.0, 0.0]), (wb, [0.0, 1.0, 0.0]), (wc, [0.0, 0.0, 1.0])] {
            for i in 0..3 {
                assert_relative_eq!(w[i], expected[i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn barycentric_weights_sum_to_one() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(7.0, 1.0);
        let c = Vec2::new(2.0, 9.0);
        for p in [
            Vec2::new(3.0, 3.0),
            Vec2::new(-4.0, 11.0),
            Vec2::new(100.0, -50.0),
            Vec2::new(2.5, 0.25),
        ] {
            let [alpha, beta, gamma] = barycentric_weights(a, b, c, p).unwrap();
            assert_relative_eq!(alpha + beta + gamma, 1.0, epsilon = 1e-5);
        }

        // Inside points have all weights in [0, 1].
        let [alpha, beta, gamma] = barycentric_weights(a, b, c, Vec2::new(3.0, 3.0)).unwrap();
        for w in [alpha, beta, gamma] {
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn degenerate_triangle_has_no_weights() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(5.0, 5.0);
        let c = Vec2::new(10.0, 10.0);
        assert!(barycentric_weights(a, b, c, Vec2::new(1.0, 1.0)).is_none());
        assert!(barycentric_weights(a, a, a, a).is_none());
    }

    #[test]
    fn texture_shader_divides_by_interpolated_inv_w() {
        // Left half black, right half white.
        let texture = Texture::new(2, 1, vec![0xFF000000, 0xFFFFFFFF]).unwrap();
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)];
        let inv_w = [1.0, 0.25, 1.0];
        let shader = TextureShader::new(&texture, uvs, inv_w);

        // Screen-space halfway along the first edge.
        let lambda = [0.5, 0.5, 0.0];
        let interpolated = 0.5 * 1.0 + 0.5 * 0.25;
        let uv = shader.interpolate_uv(lambda, interpolated);

        // Naive interpolation gives u = 0.5; the far vertex pulls it to 0.2.
        assert_relative_eq!(uv.x, 0.2, epsilon = 1e-6);
        assert_eq!(shader.shade(lambda, interpolated), 0xFF000000);
    }
}
