//! Render configuration and the per-frame state threaded through the pipeline.

use std::fmt;

use crate::colors;
use crate::projection::Projection;
use crate::render::{RasterizerDispatcher, RasterizerType, Renderer, Triangle};

/// Rendering mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Wireframe only (key: 1)
    Wireframe,
    /// Wireframe + vertices (key: 2)
    WireframeVertices,
    /// Filled only (key: 3)
    Filled,
    /// Filled + wireframe (key: 4)
    FilledWireframe,
    /// Textured only (key: 5)
    #[default]
    Textured,
    /// Textured + wireframe (key: 6)
    TexturedWireframe,
}

impl RenderMode {
    pub fn fills(self) -> bool {
        !matches!(self, RenderMode::Wireframe | RenderMode::WireframeVertices)
    }

    pub fn textured(self) -> bool {
        matches!(self, RenderMode::Textured | RenderMode::TexturedWireframe)
    }

    pub fn wireframe(self) -> bool {
        matches!(
            self,
            RenderMode::Wireframe
                | RenderMode::WireframeVertices
                | RenderMode::FilledWireframe
                | RenderMode::TexturedWireframe
        )
    }

    pub fn vertices(self) -> bool {
        self == RenderMode::WireframeVertices
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Wireframe => "Wireframe",
            RenderMode::WireframeVertices => "Wireframe + Vertices",
            RenderMode::Filled => "Filled",
            RenderMode::FilledWireframe => "Filled + Wireframe",
            RenderMode::Textured => "Textured",
            RenderMode::TexturedWireframe => "Textured + Wireframe",
        };
        f.write_str(name)
    }
}

/// Whether back-facing triangles are discarded before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    Backface,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Upper bound on triangles emitted per frame.
    pub max_triangles: usize,
    pub render_mode: RenderMode,
    pub cull_mode: CullMode,
    pub rasterizer: RasterizerType,
    pub background: u32,
    pub draw_grid: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_y_degrees: 60.0,
            z_near: 0.1,
            z_far: 100.0,
            max_triangles: 10_000,
            render_mode: RenderMode::default(),
            cull_mode: CullMode::default(),
            rasterizer: RasterizerType::default(),
            background: colors::BACKGROUND,
            draw_grid: true,
        }
    }
}

/// Bounded list of screen-space triangles for one frame.
///
/// Pushing past the capacity drops the triangle and counts it.
#[derive(Debug)]
pub struct TriangleBuffer {
    triangles: Vec<Triangle>,
    capacity: usize,
    dropped: usize,
}

impl TriangleBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity.min(4096)),
            capacity,
            dropped: 0,
        }
    }

    /// Returns `false` if the buffer is full and the triangle was dropped.
    pub fn push(&mut self, triangle: Triangle) -> bool {
        if self.triangles.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.triangles.push(triangle);
        true
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.dropped = 0;
    }

    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Triangles dropped since the last clear.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Counters for the last `update()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub faces_processed: usize,
    pub faces_culled: usize,
    /// Faces skipped because an index had no vertex.
    pub faces_invalid: usize,
    /// Faces entirely outside the frustum.
    pub faces_clipped_away: usize,
    pub triangles_emitted: usize,
    pub triangles_dropped: usize,
}

/// Explicit pipeline state, passed by reference to every stage.
pub struct RenderContext {
    pub(crate) render_mode: RenderMode,
    pub(crate) cull_mode: CullMode,
    pub(crate) background: u32,
    pub(crate) draw_grid: bool,
    pub(crate) projection: Projection,
    pub(crate) renderer: Renderer,
    pub(crate) rasterizer: RasterizerDispatcher,
    pub(crate) triangles: TriangleBuffer,
    pub(crate) stats: FrameStats,
}

impl RenderContext {
    pub fn new(config: &EngineConfig) -> Self {
        let projection = Projection::for_viewport(
            config.fov_y_degrees,
            config.width,
            config.height,
            config.z_near,
            config.z_far,
        );
        let mut renderer = Renderer::new(config.width, config.height);
        renderer.set_depth_near(projection.z_near());

        Self {
            render_mode: config.render_mode,
            cull_mode: config.cull_mode,
            background: config.background,
            draw_grid: config.draw_grid,
            projection,
            renderer,
            rasterizer: RasterizerDispatcher::new(config.rasterizer),
            triangles: TriangleBuffer::with_capacity(config.max_triangles),
            stats: FrameStats::default(),
        }
    }

    /// Reallocates the planes and adapts the projection to the new aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.projection.resize(width, height);
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn triangles(&self) -> &[Triangle] {
        self.triangles.as_slice()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}
