//! Pixel-level rendering: the owned color/depth planes, the borrowed
//! [`FrameBuffer`] view and the triangle rasterizers.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{
    EdgeFunctionRasterizer, Rasterizer, RasterizerDispatcher, RasterizerType, ScanlineRasterizer,
    Triangle,
};
pub use renderer::Renderer;

/// The display collaborator a finished frame is handed to.
///
/// `frame` is the color plane as ARGB8888 bytes, `width * height * 4` long.
pub trait PresentTarget {
    type Error;

    fn present(&mut self, frame: &[u8], width: u32, height: u32) -> Result<(), Self::Error>;
}
