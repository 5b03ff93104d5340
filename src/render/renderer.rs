//! Low-level rendering primitives.
//!
//! Provides the [`Renderer`] struct which owns the color and depth planes and
//! implements basic drawing operations like lines, rectangles, and wireframes.

use super::framebuffer::FrameBuffer;
use super::rasterizer::Triangle;
use super::PresentTarget;
use crate::colors;

/// Window-sized color and depth planes.
///
/// Both planes are reallocated only on [`Renderer::resize`].
pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    depth_near: f32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![1.0; size],
            width,
            height,
            depth_near: 1.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color_buffer = vec![colors::BACKGROUND; size];
        self.depth_buffer = vec![1.0; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Near-plane distance used to scale `1/w` into stored depth.
    pub fn set_depth_near(&mut self, near: f32) {
        self.depth_near = near;
    }

    pub fn clear_color_buffer(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Resets every depth cell to 1.0 (farthest).
    #[inline]
    pub fn clear_depth_buffer(&mut self) {
        self.depth_buffer.fill(1.0);
    }

    /// Writes a pixel without depth testing. Out-of-range coordinates are
    /// ignored.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = (y as u32 * self.width + x as u32) as usize;
            self.color_buffer[index] = color;
        }
    }

    pub fn draw_grid(&mut self, spacing: i32, color: u32) {
        if spacing <= 0 {
            return;
        }
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if x % spacing == 0 || y % spacing == 0 {
                    self.draw_pixel(x, y, color);
                }
            }
        }
    }

    #[inline]
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                self.draw_pixel(x + dx, y + dy, color);
            }
        }
    }

    pub fn draw_triangle_wireframe(&mut self, triangle: &Triangle, color: u32) {
        let [p0, p1, p2] = triangle.points.map(|p| (p.x as i32, p.y as i32));

        self.draw_line(p0.0, p0.1, p1.0, p1.1, color);
        self.draw_line(p1.0, p1.1, p2.0, p2.1, color);
        self.draw_line(p2.0, p2.1, p0.0, p0.1, color);
    }

    /// Draws a line between two points using Bresenham's line algorithm.
    ///
    /// Steps along the major axis and tracks an integer error term to decide
    /// when to also step along the minor axis. Both endpoints are drawn.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // Positive error favors x movement, negative favors y.
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.draw_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;

            // Both conditions can hold, which is a diagonal step.
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// The color plane as ARGB8888 bytes, in native endianness.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.color_buffer.as_slice())
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
        .with_near(self.depth_near)
    }

    /// Hands the color plane to the display.
    pub fn present<T: PresentTarget>(&self, target: &mut T) -> Result<(), T::Error> {
        target.present(self.as_bytes(), self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clears_fill_whole_planes() {
        let mut renderer = Renderer::new(4, 3);
        renderer.draw_pixel(1, 1, 0xFF112233);
        renderer.clear_color_buffer(0xFF000000);
        assert!(renderer.color_buffer().iter().all(|&c| c == 0xFF000000));

        renderer.as_framebuffer().set_pixel_with_depth(2, 2, 0.3, 1);
        assert_eq!(renderer.depth_buffer()[2 * 4 + 2], 0.3);
        renderer.clear_depth_buffer();
        assert!(renderer.depth_buffer().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn draw_pixel_ignores_out_of_range() {
        let mut renderer = Renderer::new(2, 2);
        renderer.clear_color_buffer(0);
        for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i32::MAX, i32::MIN)] {
            renderer.draw_pixel(x, y, 9);
        }
        assert!(renderer.color_buffer().iter().all(|&c| c == 0));
    }

    #[test]
    fn bresenham_draws_both_endpoints() {
        let mut renderer = Renderer::new(10, 10);
        renderer.clear_color_buffer(0);
        renderer.draw_line(1, 1, 8, 4, 7);
        let at = |x: usize, y: usize| renderer.color_buffer()[y * 10 + x];
        assert_eq!(at(1, 1), 7);
        assert_eq!(at(8, 4), 7);
        // One pixel per column along the major axis.
        let lit = renderer.color_buffer().iter().filter(|&&c| c == 7).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn lines_leaving_the_screen_are_safe() {
        let mut renderer = Renderer::new(8, 8);
        renderer.clear_color_buffer(0);
        renderer.draw_line(-20, 4, 30, 4, 1);
        assert!((0..8).all(|x| renderer.color_buffer()[4 * 8 + x] == 1));
    }

    #[test]
    fn grid_and_rect() {
        let mut renderer = Renderer::new(10, 10);
        renderer.clear_color_buffer(0);
        renderer.draw_grid(5, 1);
        assert_eq!(renderer.color_buffer()[0], 1);
        assert_eq!(renderer.color_buffer()[5], 1);
        assert_eq!(renderer.color_buffer()[11], 0);

        renderer.draw_rect(8, 8, 4, 4, 2);
        assert_eq!(renderer.color_buffer()[99], 2);
    }

    #[test]
    fn bytes_follow_the_color_plane() {
        let mut renderer = Renderer::new(2, 1);
        renderer.clear_color_buffer(0xAABBCCDD);
        let bytes = renderer.as_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &0xAABBCCDDu32.to_ne_bytes());
    }

    #[test]
    fn present_hands_over_the_frame() {
        struct Capture(Vec<u8>, u32, u32);
        impl PresentTarget for Capture {
            type Error = std::convert::Infallible;
            fn present(&mut self, frame: &[u8], width: u32, height: u32) -> Result<(), Self::Error> {
                self.0 = frame.to_vec();
                self.1 = width;
                self.2 = height;
                Ok(())
            }
        }

        let renderer = Renderer::new(3, 2);
        let mut capture = Capture(Vec::new(), 0, 0);
        renderer.present(&mut capture).unwrap();
        assert_eq!(capture.0.len(), 3 * 2 * 4);
        assert_eq!((capture.1, capture.2), (3, 2));
    }
}
