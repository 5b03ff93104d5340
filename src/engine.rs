//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns the
//! [`Scene`] and the [`RenderContext`] and drives the pipeline stages once per
//! frame: [`Engine::update`] builds the triangle list, [`Engine::render`]
//! rasterizes it.

use std::path::Path;
use std::rc::Rc;

use log::info;

use crate::camera::Camera;
use crate::context::{CullMode, EngineConfig, FrameStats, RenderContext, RenderMode};
use crate::error::LoadError;
use crate::light::DirectionalLight;
use crate::mesh::Mesh;
use crate::pipeline;
use crate::projection::Projection;
use crate::render::{PresentTarget, RasterizerType, Triangle};
use crate::scene::Scene;
use crate::texture::Texture;

pub struct Engine {
    context: RenderContext,
    scene: Scene,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            "engine {}x{}, fov {} deg, {:?} / {:?}",
            config.width, config.height, config.fov_y_degrees, config.render_mode, config.cull_mode
        );
        Self {
            context: RenderContext::new(&config),
            scene: Scene::new(Camera::default(), DirectionalLight::default()),
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.context.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.context.render_mode
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.context.cull_mode = mode;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.context.cull_mode
    }

    pub fn set_rasterizer(&mut self, rasterizer_type: RasterizerType) {
        self.context.rasterizer.set_type(rasterizer_type);
    }

    pub fn rasterizer(&self) -> RasterizerType {
        self.context.rasterizer.active_type()
    }

    pub fn set_draw_grid(&mut self, draw_grid: bool) {
        self.context.draw_grid = draw_grid;
    }

    pub fn draw_grid(&self) -> bool {
        self.context.draw_grid
    }

    pub fn projection(&self) -> &Projection {
        self.context.projection()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        self.scene.camera()
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        self.scene.camera_mut()
    }

    /// Adds the built-in cube and returns its mesh index.
    pub fn load_cube_mesh(&mut self) -> usize {
        self.scene.add_mesh(Mesh::cube())
    }

    /// Loads an OBJ file into the scene and returns its mesh index.
    pub fn load_mesh<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, LoadError> {
        let mesh = Mesh::from_obj(path)?;
        Ok(self.scene.add_mesh(mesh))
    }

    /// Loads a texture and attaches it to the mesh at `index`.
    ///
    /// The index is checked before the image is decoded.
    pub fn load_texture<P: AsRef<Path>>(&mut self, index: usize, path: P) -> Result<(), LoadError> {
        let mesh = self
            .scene
            .mesh_mut(index)
            .ok_or(LoadError::NoSuchMesh(index))?;
        mesh.set_texture(Rc::new(Texture::from_file(path)?));
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        info!("resize to {}x{}", width, height);
        self.context.resize(width, height);
    }

    pub fn width(&self) -> u32 {
        self.context.renderer().width()
    }

    pub fn height(&self) -> u32 {
        self.context.renderer().height()
    }

    /// Update the engine state - transforms, culls, clips and projects every
    /// mesh into the triangle list.
    pub fn update(&mut self) {
        pipeline::update(&mut self.context, &self.scene);
    }

    /// Render the current frame.
    pub fn render(&mut self) {
        pipeline::render(&mut self.context);
    }

    /// Triangles produced by the last `update()`.
    pub fn triangles(&self) -> &[Triangle] {
        self.context.triangles()
    }

    pub fn stats(&self) -> FrameStats {
        self.context.stats()
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.context.renderer().as_bytes()
    }

    pub fn depth_buffer(&self) -> &[f32] {
        self.context.renderer().depth_buffer()
    }

    pub fn present<T: PresentTarget>(&self, target: &mut T) -> Result<(), T::Error> {
        self.context.renderer().present(target)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn engine() -> Engine {
        Engine::new(EngineConfig {
            width: 160,
            height: 120,
            draw_grid: false,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn textured_cube_frame() {
        let mut engine = engine();
        let index = engine.load_cube_mesh();
        let texture = Rc::new(Texture::checkerboard(8, 2, 0xFFFF0000, 0xFF0000FF));
        let mesh = engine.scene_mut().mesh_mut(index).unwrap();
        mesh.set_texture(texture);
        mesh.transform_mut()
            .set_translation(Vec3::new(0.0, 0.0, 4.0))
            .set_rotation(Vec3::new(0.3, 0.5, 0.0));

        engine.update();
        engine.render();

        assert!(!engine.triangles().is_empty());
        assert!(engine.triangles().iter().all(|t| t.texture.is_some()));
        let pixels: &[u32] = bytemuck::cast_slice(engine.frame_buffer());
        assert!(pixels.contains(&0xFFFF0000));
        assert!(pixels.contains(&0xFF0000FF));
        assert_eq!(engine.frame_buffer().len(), 160 * 120 * 4);
    }

    #[test]
    fn flat_mode_ignores_textures() {
        let mut engine = engine();
        let index = engine.load_cube_mesh();
        let mesh = engine.scene_mut().mesh_mut(index).unwrap();
        mesh.set_texture(Rc::new(Texture::checkerboard(8, 2, 0xFFFF0000, 0xFF0000FF)));
        mesh.transform_mut().set_translation(Vec3::new(0.0, 0.0, 5.0));
        engine.set_render_mode(RenderMode::Filled);

        engine.update();
        engine.render();

        assert!(engine.triangles().iter().all(|t| t.texture.is_none()));
        let pixels: &[u32] = bytemuck::cast_slice(engine.frame_buffer());
        assert!(pixels.contains(&0xFFFFFFFF));
        assert!(!pixels.contains(&0xFFFF0000));
    }

    #[test]
    fn wireframe_mode_leaves_depth_untouched() {
        let mut engine = engine();
        let index = engine.load_cube_mesh();
        engine
            .scene_mut()
            .mesh_mut(index)
            .unwrap()
            .transform_mut()
            .set_translation(Vec3::new(0.0, 0.0, 5.0));
        engine.set_render_mode(RenderMode::WireframeVertices);

        engine.update();
        engine.render();

        let pixels: &[u32] = bytemuck::cast_slice(engine.frame_buffer());
        assert!(pixels.contains(&crate::colors::WIREFRAME));
        assert!(pixels.contains(&crate::colors::VERTEX));
        assert!(engine.depth_buffer().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn empty_scene_renders_background() {
        let mut engine = engine();
        engine.update();
        engine.render();
        assert_eq!(engine.stats(), FrameStats::default());
        let pixels: &[u32] = bytemuck::cast_slice(engine.frame_buffer());
        assert!(pixels.iter().all(|&p| p == crate::colors::BACKGROUND));
    }

    #[test]
    fn resize_changes_frame_size() {
        let mut engine = engine();
        engine.resize(64, 32);
        assert_eq!((engine.width(), engine.height()), (64, 32));
        assert_eq!(engine.frame_buffer().len(), 64 * 32 * 4);
        assert_eq!(engine.projection().aspect_ratio(), 2.0);
    }

    #[test]
    fn load_texture_rejects_missing_mesh() {
        let mut engine = engine();
        let count = engine.scene().meshes().len();

        let result = engine.load_texture(count + 2, "no-such-texture.png");
        assert!(matches!(result, Err(LoadError::NoSuchMesh(i)) if i == count + 2));
    }
}
