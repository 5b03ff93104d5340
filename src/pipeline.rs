//! The per-frame stage sequence: transform -> cull -> clip -> project ->
//! rasterize.
//!
//! Every stage reads its flags from the [`RenderContext`] instead of
//! branching into separate pipelines per feature. Nothing here returns an
//! error: bad faces, degenerate geometry and capacity overflow are skipped
//! and counted in [`FrameStats`].

use log::{debug, warn};

use crate::clipper::{ClipVertex, Frustum, Polygon};
use crate::colors;
use crate::context::{CullMode, FrameStats, RenderContext};
use crate::light::DirectionalLight;
use crate::math::{Mat4, Vec2, Vec3, Vec4};
use crate::mesh::{Face, Mesh};
use crate::render::{Rasterizer, Triangle};
use crate::scene::Scene;

/// Side length of the vertex markers in `WireframeVertices` mode.
const VERTEX_MARKER_SIZE: i32 = 4;
const GRID_SPACING: i32 = 50;

/// Runs every stage up to projection and fills the context's triangle list.
pub fn update(ctx: &mut RenderContext, scene: &Scene) {
    ctx.triangles.clear();
    ctx.stats = FrameStats::default();

    let view = scene.camera().view_matrix();
    let light_direction = view
        .transform_direction(scene.light().direction)
        .normalize();

    for mesh in scene.meshes() {
        process_mesh(ctx, mesh, &view, light_direction);
    }

    ctx.stats.triangles_emitted = ctx.triangles.len();
    ctx.stats.triangles_dropped = ctx.triangles.dropped();
    if ctx.stats.triangles_dropped > 0 {
        warn!(
            "triangle buffer full ({}), dropped {} triangles",
            ctx.triangles.capacity(),
            ctx.stats.triangles_dropped
        );
    }
    debug!("frame stats: {:?}", ctx.stats);
}

fn process_mesh(ctx: &mut RenderContext, mesh: &Mesh, view: &Mat4, light_direction: Vec3) {
    let world_view = *view * mesh.transform().world_matrix();
    let texture = if ctx.render_mode.textured() {
        mesh.texture().cloned()
    } else {
        None
    };
    let width = ctx.renderer.width();
    let height = ctx.renderer.height();
    let mut invalid = 0;

    for face in mesh.faces() {
        ctx.stats.faces_processed += 1;

        let Some(camera_space) = transform_face(&world_view, mesh.vertices(), face) else {
            invalid += 1;
            continue;
        };

        let normal = face_normal(&camera_space);
        if ctx.cull_mode == CullMode::Backface && is_back_facing(&camera_space, normal) {
            ctx.stats.faces_culled += 1;
            continue;
        }

        let intensity = DirectionalLight::intensity_for(normal, light_direction);
        let color = colors::apply_intensity(face.color, intensity);

        let polygon = clip_face(ctx.projection.frustum(), &camera_space, face.uvs());
        if polygon.is_empty() {
            ctx.stats.faces_clipped_away += 1;
            continue;
        }

        for [a, b, c] in polygon.triangles() {
            let points = [a, b, c]
                .map(|v| project_to_screen(ctx.projection.matrix(), v.position, width, height));
            let triangle = Triangle::new(points, [a.uv, b.uv, c.uv], color)
                .with_texture(texture.clone());
            ctx.triangles.push(triangle);
        }
    }

    ctx.stats.faces_invalid += invalid;
    if invalid > 0 {
        warn!(
            "mesh '{}': skipped {} faces referencing missing vertices",
            mesh.name(),
            invalid
        );
    }
}

/// Gathers a face's vertices and moves them into camera space.
///
/// Returns `None` if any index has no vertex.
pub fn transform_face(world_view: &Mat4, vertices: &[Vec3], face: &Face) -> Option<[Vec3; 3]> {
    let [a, b, c] = face.indices();
    let gathered = [*vertices.get(a)?, *vertices.get(b)?, *vertices.get(c)?];
    Some(gathered.map(|v| *world_view * v))
}

/// Unit normal of `(v1 - v0) x (v2 - v0)`, both edges normalized first.
///
/// Degenerate triangles give the zero vector.
pub fn face_normal(vertices: &[Vec3; 3]) -> Vec3 {
    let [v0, v1, v2] = *vertices;
    let ab = (v1 - v0).normalize();
    let ac = (v2 - v0).normalize();
    ab.cross(ac).normalize()
}

/// True if the face points away from the camera at the origin.
pub fn is_back_facing(vertices: &[Vec3; 3], normal: Vec3) -> bool {
    let camera_ray = -vertices[0];
    normal.dot(camera_ray) < 0.0
}

/// Clips a camera-space face against the frustum.
pub fn clip_face(frustum: &Frustum, vertices: &[Vec3; 3], uvs: [Vec2; 3]) -> Polygon {
    frustum.clip_triangle([
        ClipVertex::new(vertices[0], uvs[0]),
        ClipVertex::new(vertices[1], uvs[1]),
        ClipVertex::new(vertices[2], uvs[2]),
    ])
}

/// Projects a camera-space point to pixel coordinates.
///
/// x and y are divided by w, y is flipped for the top-left origin and both
/// are mapped onto the buffer. z and w are kept for depth and perspective
/// correction.
pub fn project_to_screen(projection: &Mat4, point: Vec3, width: u32, height: u32) -> Vec4 {
    let clip = projection.project(Vec4::point(point));
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;

    let ndc_x = clip.x / clip.w;
    let ndc_y = -(clip.y / clip.w);

    Vec4::new(
        ndc_x * half_width + half_width,
        ndc_y * half_height + half_height,
        clip.z,
        clip.w,
    )
}

/// Clears the planes and draws the current triangle list.
pub fn render(ctx: &mut RenderContext) {
    ctx.renderer.clear_color_buffer(ctx.background);
    ctx.renderer.clear_depth_buffer();

    if ctx.draw_grid {
        ctx.renderer.draw_grid(GRID_SPACING, colors::GRID);
    }

    let mode = ctx.render_mode;

    if mode.fills() {
        let mut fb = ctx.renderer.as_framebuffer();
        for triangle in ctx.triangles.as_slice() {
            let texture = if mode.textured() {
                triangle.texture.as_deref()
            } else {
                None
            };
            ctx.rasterizer.fill_triangle(triangle, &mut fb, texture);
        }
    }

    if mode.wireframe() || mode.vertices() {
        for triangle in ctx.triangles.as_slice() {
            if mode.wireframe() {
                ctx.renderer
                    .draw_triangle_wireframe(triangle, colors::WIREFRAME);
            }
            if mode.vertices() {
                for point in &triangle.points {
                    let half = VERTEX_MARKER_SIZE / 2;
                    ctx.renderer.draw_rect(
                        point.x as i32 - half,
                        point.y as i32 - half,
                        VERTEX_MARKER_SIZE,
                        VERTEX_MARKER_SIZE,
                        colors::VERTEX,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::context::{EngineConfig, RenderMode};
    use crate::render::RasterizerType;
    use approx::assert_relative_eq;

    const SIZE: u32 = 200;

    fn config(cull_mode: CullMode) -> EngineConfig {
        EngineConfig {
            width: SIZE,
            height: SIZE,
            fov_y_degrees: 60.0,
            z_near: 0.1,
            z_far: 100.0,
            cull_mode,
            render_mode: RenderMode::Filled,
            draw_grid: false,
            ..EngineConfig::default()
        }
    }

    fn cube_scene() -> Scene {
        let mut scene = Scene::new(Camera::new(Vec3::ZERO), DirectionalLight::default());
        let mut cube = Mesh::cube();
        cube.transform_mut().set_translation(Vec3::new(0.0, 0.0, 5.0));
        scene.add_mesh(cube);
        scene
    }

    fn lit_pixels(ctx: &RenderContext) -> usize {
        ctx.renderer()
            .color_buffer()
            .iter()
            .filter(|&&c| c != colors::BACKGROUND)
            .count()
    }

    #[test]
    fn cube_front_face_is_centered_and_on_screen() {
        let mut ctx = RenderContext::new(&config(CullMode::Backface));
        let scene = cube_scene();
        let view = scene.camera().view_matrix();
        let world_view = view * scene.meshes()[0].transform().world_matrix();

        // Front face corners sit at z = 4 in camera space.
        let corners = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ];
        let screen: Vec<Vec4> = corners
            .iter()
            .map(|&c| project_to_screen(ctx.projection.matrix(), world_view * c, SIZE, SIZE))
            .collect();

        let center = SIZE as f32 / 2.0;
        for p in &screen {
            assert!(p.x >= 0.0 && p.x < SIZE as f32);
            assert!(p.y >= 0.0 && p.y < SIZE as f32);
            assert_relative_eq!(p.w, 4.0, epsilon = 1e-5);
        }
        // Opposite corners mirror each other through the center.
        assert_relative_eq!(screen[0].x + screen[2].x, 2.0 * center, epsilon = 1e-3);
        assert_relative_eq!(screen[0].y + screen[2].y, 2.0 * center, epsilon = 1e-3);
        assert_relative_eq!(screen[1].x + screen[3].x, 2.0 * center, epsilon = 1e-3);
        assert_relative_eq!(screen[1].y + screen[3].y, 2.0 * center, epsilon = 1e-3);
        // Top of the cube is up on screen.
        assert!(screen[1].y < screen[0].y);

        update(&mut ctx, &scene);
        let stats = ctx.stats();
        assert_eq!(stats.faces_processed, 12);
        // Only the two front triangles face the camera.
        assert_eq!(stats.faces_culled, 10);
        assert_eq!(stats.triangles_emitted, 2);
        for triangle in ctx.triangles() {
            for p in &triangle.points {
                assert!(p.x >= 0.0 && p.x <= SIZE as f32);
                assert!(p.y >= 0.0 && p.y <= SIZE as f32);
            }
        }

        render(&mut ctx);
        let idx = (120 * SIZE + 120) as usize;
        // Front face looks straight into the default light.
        assert_eq!(ctx.renderer().color_buffer()[idx], 0xFFFFFFFF);
        let depth = ctx.renderer().depth_buffer()[idx];
        assert!((0.0..1.0).contains(&depth));
    }

    #[test]
    fn back_face_is_drawn_only_without_culling() {
        // A single triangle wound so its normal faces away from the camera.
        let mesh = Mesh::new(
            "back",
            vec![
                Vec3::new(-1.0, -1.0, 5.0),
                Vec3::new(1.0, 1.0, 5.0),
                Vec3::new(-1.0, 1.0, 5.0),
            ],
            vec![Face::new([0, 1, 2], [Vec2::ZERO; 3], 0xFFFFFFFF)],
        );
        let normal = face_normal(&[
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, 1.0, 5.0),
            Vec3::new(-1.0, 1.0, 5.0),
        ]);
        assert!(normal.dot(Vec3::new(1.0, 1.0, -5.0)) < 0.0);

        let mut scene = Scene::default();
        scene.add_mesh(mesh);

        let mut culled = RenderContext::new(&config(CullMode::Backface));
        update(&mut culled, &scene);
        render(&mut culled);
        assert_eq!(culled.stats().faces_culled, 1);
        assert_eq!(lit_pixels(&culled), 0);

        let mut drawn = RenderContext::new(&config(CullMode::None));
        update(&mut drawn, &scene);
        render(&mut drawn);
        assert_eq!(drawn.stats().faces_culled, 0);
        assert!(lit_pixels(&drawn) >= 1);
    }

    #[test]
    fn bad_indices_are_skipped() {
        let mesh = Mesh::new(
            "broken",
            vec![
                Vec3::new(-1.0, -1.0, 5.0),
                Vec3::new(-1.0, 1.0, 5.0),
                Vec3::new(1.0, 1.0, 5.0),
            ],
            vec![
                Face::new([0, 1, 2], [Vec2::ZERO; 3], 0xFFFFFFFF),
                Face::new([0, 1, 7], [Vec2::ZERO; 3], 0xFFFFFFFF),
            ],
        );
        let mut scene = Scene::default();
        scene.add_mesh(mesh);

        let mut ctx = RenderContext::new(&config(CullMode::Backface));
        update(&mut ctx, &scene);
        assert_eq!(ctx.stats().faces_processed, 2);
        assert_eq!(ctx.stats().faces_invalid, 1);
        assert_eq!(ctx.stats().triangles_emitted, 1);
    }

    #[test]
    fn capacity_overflow_truncates() {
        let mut ctx = RenderContext::new(&EngineConfig {
            max_triangles: 1,
            ..config(CullMode::None)
        });
        update(&mut ctx, &cube_scene());
        assert_eq!(ctx.triangles().len(), 1);
        assert!(ctx.stats().triangles_dropped > 0);
        render(&mut ctx);
    }

    #[test]
    fn mesh_behind_camera_is_clipped_away() {
        let mut scene = cube_scene();
        if let Some(mesh) = scene.mesh_mut(0) {
            mesh.transform_mut().set_translation(Vec3::new(0.0, 0.0, -5.0));
        }
        let mut ctx = RenderContext::new(&config(CullMode::None));
        update(&mut ctx, &scene);
        assert_eq!(ctx.stats().faces_clipped_away, 12);
        assert!(ctx.triangles().is_empty());
    }

    #[test]
    fn camera_inside_cube_still_renders_in_bounds() {
        let mut scene = cube_scene();
        scene.camera_mut().set_position(Vec3::new(0.0, 0.0, 5.0));
        for rasterizer in [RasterizerType::Scanline, RasterizerType::EdgeFunction] {
            let mut ctx = RenderContext::new(&EngineConfig {
                rasterizer,
                ..config(CullMode::None)
            });
            update(&mut ctx, &scene);
            assert!(ctx.stats().triangles_emitted > 0);
            render(&mut ctx);
            assert!(ctx
                .renderer()
                .depth_buffer()
                .iter()
                .all(|d| (0.0..=1.0).contains(d)));
        }
    }
}
