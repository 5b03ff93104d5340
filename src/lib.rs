//! A CPU-based software 3D rasterizer.
//!
//! Meshes go through one linear pipeline every frame: transform into camera
//! space, backface culling, frustum clipping, perspective projection and
//! scanline rasterization with perspective-correct UVs and a depth buffer.
//! All rendering is done on the CPU; SDL2 (behind the `window` feature) is
//! only used to show the result.
//!
//! # Quick Start
//!
//! ```no_run
//! use scanline3d::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let cube = engine.load_cube_mesh();
//! if let Some(mesh) = engine.scene_mut().mesh_mut(cube) {
//!     mesh.transform_mut().set_translation(Vec3::new(0.0, 0.0, 5.0));
//! }
//! engine.update();
//! engine.render();
//! let frame: &[u8] = engine.frame_buffer();
//! # let _ = frame;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod clipper;
pub mod colors;
pub mod context;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod scene;
pub mod texture;
pub mod transform;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use context::{CullMode, EngineConfig, FrameStats, RenderMode};
pub use engine::Engine;
pub use error::LoadError;
pub use mesh::Mesh;
pub use projection::Projection;
pub use render::RasterizerType;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use scanline3d::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, FpsCameraController, InputState};

    // Engine
    pub use crate::context::{CullMode, EngineConfig, FrameStats, RenderMode};
    pub use crate::engine::Engine;

    // Scene
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::{Face, Mesh};
    pub use crate::scene::Scene;
    pub use crate::texture::Texture;

    // Projection
    pub use crate::projection::Projection;

    // Transform
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::render::{PresentTarget, RasterizerType};

    // Window & Input
    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        EdgeFunctionRasterizer, FrameBuffer, Rasterizer, ScanlineRasterizer, Triangle,
    };
}
