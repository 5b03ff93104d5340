//! SDL2 window, input polling and frame pacing.
//!
//! Only compiled with the `window` feature. The engine never talks to SDL
//! directly; frames reach the screen through [`PresentTarget`].

use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::camera::InputState;
use crate::context::RenderMode;
use crate::render::PresentTarget;

pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

/// What the application should react to after polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Quit,
    Resize(u32, u32),
    SetRenderMode(RenderMode),
    ToggleCulling,
    ToggleRasterizer,
    ToggleGrid,
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time in seconds.
    /// Delta time represents the time elapsed since the last call to this method.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> f32 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time.saturating_sub(self.previous_frame_time);

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time.saturating_sub(self.previous_frame_time);
        }

        self.previous_frame_time = current_time;
        delta_time as f32 / 1000.0
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Declared before the creator so it is dropped first.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;
        let texture = Self::create_texture(&texture_creator, width, height)?;

        Ok(Self {
            canvas,
            texture,
            texture_creator,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    fn create_texture(
        texture_creator: &sdl2::render::TextureCreator<sdl2::video::WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<sdl2::render::Texture<'static>, String> {
        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it is dropped before the creator.
        let texture_creator: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator as *const _) };
        texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())
    }

    /// Drains pending events and refreshes `input` from the keyboard state.
    ///
    /// Returns every event the application has to act on, in arrival order.
    pub fn poll_events(&mut self, input: &mut InputState) -> Vec<WindowEvent> {
        let events = self
            .event_pump
            .poll_iter()
            .filter_map(|event| match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => Some(WindowEvent::Quit),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => Some(WindowEvent::Resize(w.max(1) as u32, h.max(1) as u32)),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => map_key(key),
                _ => None,
            })
            .collect();

        let keys = self.event_pump.keyboard_state();
        *input = InputState {
            forward: keys.is_scancode_pressed(Scancode::W),
            back: keys.is_scancode_pressed(Scancode::S),
            yaw_left: keys.is_scancode_pressed(Scancode::A),
            yaw_right: keys.is_scancode_pressed(Scancode::D),
            pitch_up: keys.is_scancode_pressed(Scancode::Up),
            pitch_down: keys.is_scancode_pressed(Scancode::Down),
        };

        events
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        self.texture = Self::create_texture(&self.texture_creator, width, height)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), String> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| e.to_string())
    }
}

impl PresentTarget for Window {
    type Error = String;

    fn present(&mut self, frame: &[u8], width: u32, height: u32) -> Result<(), String> {
        self.texture
            .update(None, frame, (width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, width, height)))?;
        self.canvas.present();
        Ok(())
    }
}

fn map_key(key: Keycode) -> Option<WindowEvent> {
    let event = match key {
        Keycode::Num1 => WindowEvent::SetRenderMode(RenderMode::Wireframe),
        Keycode::Num2 => WindowEvent::SetRenderMode(RenderMode::WireframeVertices),
        Keycode::Num3 => WindowEvent::SetRenderMode(RenderMode::Filled),
        Keycode::Num4 => WindowEvent::SetRenderMode(RenderMode::FilledWireframe),
        Keycode::Num5 => WindowEvent::SetRenderMode(RenderMode::Textured),
        Keycode::Num6 => WindowEvent::SetRenderMode(RenderMode::TexturedWireframe),
        Keycode::C => WindowEvent::ToggleCulling,
        Keycode::R => WindowEvent::ToggleRasterizer,
        Keycode::G => WindowEvent::ToggleGrid,
        _ => return None,
    };
    Some(event)
}
