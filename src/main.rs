use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use scanline3d::prelude::*;

/// Software rasterizer demo.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Window width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// OBJ mesh to load instead of the built-in cube.
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Texture image for the mesh; a checkerboard is used otherwise.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut window = Window::new("scanline3d", args.width, args.height).map_err(|e| anyhow!(e))?;
    let mut engine = Engine::new(EngineConfig {
        width: args.width,
        height: args.height,
        fov_y_degrees: args.fov,
        ..EngineConfig::default()
    });

    let index = match &args.obj {
        Some(path) => engine
            .load_mesh(path)
            .with_context(|| format!("loading mesh {}", path.display()))?,
        None => engine.load_cube_mesh(),
    };
    match &args.texture {
        Some(path) => engine
            .load_texture(index, path)
            .with_context(|| format!("loading texture {}", path.display()))?,
        None => {
            if let Some(mesh) = engine.scene_mut().mesh_mut(index) {
                mesh.set_texture(Rc::new(Texture::checkerboard(
                    64, 8, 0xFFE0E0E0, 0xFF3060C0,
                )));
            }
        }
    }
    if let Some(mesh) = engine.scene_mut().mesh_mut(index) {
        mesh.transform_mut().set_translation(Vec3::new(0.0, 0.0, 5.0));
    }

    let controller = FpsCameraController::default();
    let mut input = InputState::default();
    let mut frame_limiter = FrameLimiter::new(&window);

    info!("controls: WASD + arrows to move, 1-6 render modes, C cull, R rasterizer, G grid");

    window
        .set_title(&title(&engine))
        .map_err(|e| anyhow!(e))?;

    'running: loop {
        for event in window.poll_events(&mut input) {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h).map_err(|e| anyhow!(e))?;
                    engine.resize(w, h);
                }
                WindowEvent::SetRenderMode(mode) => {
                    info!("render mode: {mode}");
                    engine.set_render_mode(mode);
                }
                WindowEvent::ToggleCulling => {
                    let mode = match engine.cull_mode() {
                        CullMode::Backface => CullMode::None,
                        CullMode::None => CullMode::Backface,
                    };
                    info!("cull mode: {mode:?}");
                    engine.set_cull_mode(mode);
                }
                WindowEvent::ToggleRasterizer => {
                    let next = match engine.rasterizer() {
                        RasterizerType::Scanline => RasterizerType::EdgeFunction,
                        RasterizerType::EdgeFunction => RasterizerType::Scanline,
                    };
                    info!("rasterizer: {next}");
                    engine.set_rasterizer(next);
                }
                WindowEvent::ToggleGrid => {
                    let draw_grid = !engine.draw_grid();
                    engine.set_draw_grid(draw_grid);
                }
            }
            if !matches!(event, WindowEvent::Resize(..)) {
                window
                    .set_title(&title(&engine))
                    .map_err(|e| anyhow!(e))?;
            }
        }

        let delta_time = frame_limiter.wait_and_get_delta(&window);

        controller.update(engine.camera_mut(), &input, delta_time);
        for mesh in engine.scene_mut().meshes_mut() {
            mesh.transform_mut()
                .rotate(Vec3::new(0.3 * delta_time, 0.5 * delta_time, 0.0));
        }

        engine.update();
        engine.render();
        engine.present(&mut window).map_err(|e| anyhow!(e))?;
    }

    Ok(())
}

fn title(engine: &Engine) -> String {
    format!(
        "scanline3d | {} | {} | cull: {:?}",
        engine.render_mode(),
        engine.rasterizer(),
        engine.cull_mode()
    )
}
