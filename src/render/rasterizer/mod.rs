//! Triangle rasterization algorithms.
//!
//! This module provides multiple rasterizer implementations that can be
//! swapped at runtime for testing and benchmarking purposes.
//!
//! Available algorithms:
//! - [`ScanlineRasterizer`]: Flat-top/flat-bottom triangle decomposition
//! - [`EdgeFunctionRasterizer`]: Bounding box iteration with edge function tests
//!
//! Both hand covered pixels to the same fragment stage in [`shader`], so
//! they only differ in how pixels are visited.

mod edgefunction;
mod scanline;
pub mod shader;

use std::fmt;
use std::rc::Rc;

pub use edgefunction::EdgeFunctionRasterizer;
pub use scanline::ScanlineRasterizer;

use super::framebuffer::FrameBuffer;
use crate::math::{Vec2, Vec4};
use crate::texture::Texture;

/// A triangle ready for rasterization in screen space.
///
/// `points` hold pixel x/y, the projected z and the clip-space `w`, which the
/// rasterizers need for depth and perspective-correct UVs.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub uvs: [Vec2; 3],
    /// Shaded face color, used for flat fills.
    pub color: u32,
    pub texture: Option<Rc<Texture>>,
}

impl Triangle {
    pub fn new(points: [Vec4; 3], uvs: [Vec2; 3], color: u32) -> Self {
        Self {
            points,
            uvs,
            color,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Option<Rc<Texture>>) -> Self {
        self.texture = texture;
        self
    }
}

/// Per-vertex `1/w`, or `None` if any `w` is not strictly positive.
#[inline]
pub(crate) fn inverse_w(triangle: &Triangle) -> Option<[f32; 3]> {
    let [a, b, c] = triangle.points;
    let valid = |w: f32| w > 0.0 && w.is_finite();
    if valid(a.w) && valid(b.w) && valid(c.w) {
        Some([1.0 / a.w, 1.0 / b.w, 1.0 / c.w])
    } else {
        None
    }
}

/// Trait for triangle rasterization algorithms.
///
/// Implementors define how triangles are filled into a pixel buffer.
/// This allows swapping between different rasterization strategies
/// (scanline, edge functions, etc.) for testing and benchmarking.
pub trait Rasterizer {
    /// Fill a triangle into the frame buffer.
    ///
    /// # Arguments
    /// * `triangle` - The triangle to rasterize
    /// * `buffer` - The frame buffer to draw into
    /// * `texture` - Texture to sample; `None` fills with `triangle.color`
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer, texture: Option<&Texture>);
}

/// Available rasterization algorithms.
///
/// Can be changed at runtime via `Engine::set_rasterizer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerType {
    /// Scanline rasterizer using flat-top/flat-bottom triangle decomposition.
    #[default]
    Scanline,
    /// Edge function rasterizer that tests each pixel in the bounding box.
    EdgeFunction,
}

impl fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterizerType::Scanline => write!(f, "Scanline"),
            RasterizerType::EdgeFunction => write!(f, "EdgeFunction"),
        }
    }
}

/// Holds both rasterizer implementations and forwards to the active one.
pub struct RasterizerDispatcher {
    scanline: ScanlineRasterizer,
    edge_function: EdgeFunctionRasterizer,
    active: RasterizerType,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType) -> Self {
        Self {
            scanline: ScanlineRasterizer::new(),
            edge_function: EdgeFunctionRasterizer::new(),
            active: rasterizer_type,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_triangle(&self, triangle: &Triangle, buffer: &mut FrameBuffer, texture: Option<&Texture>) {
        match self.active {
            RasterizerType::Scanline => self.scanline.fill_triangle(triangle, buffer, texture),
            RasterizerType::EdgeFunction => {
                self.edge_function.fill_triangle(triangle, buffer, texture)
            }
        }
    }
}
