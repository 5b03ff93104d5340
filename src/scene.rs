//! Everything the pipeline reads each frame: camera, light and meshes.

use crate::camera::Camera;
use crate::light::DirectionalLight;
use crate::mesh::Mesh;

/// Scene state owned by the application and read by the pipeline.
///
/// Meshes are fully materialized before rendering; the pipeline never adds
/// or removes them.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    camera: Camera,
    light: DirectionalLight,
    meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(camera: Camera, light: DirectionalLight) -> Self {
        Self {
            camera,
            light,
            meshes: Vec::new(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    /// Adds a mesh and returns its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut Mesh> {
        self.meshes.get_mut(index)
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.iter_mut()
    }
}
