//! Errors raised while loading meshes and textures.
//!
//! The render pipeline itself never fails; only the loading edge does.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The OBJ file could not be read or parsed.
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    /// The texture image could not be opened or decoded.
    #[error("failed to load texture: {0}")]
    Image(#[from] image::ImageError),

    /// The file parsed but contained no triangles.
    #[error("mesh contains no faces")]
    EmptyMesh,

    /// A face refers to a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// Width or height is zero, or the pixel count does not match.
    #[error("invalid texture dimensions {width}x{height} for {len} pixels")]
    BadTextureSize { width: u32, height: u32, len: usize },

    /// The scene has no mesh at this index.
    #[error("no mesh at index {0}")]
    NoSuchMesh(usize),
}
