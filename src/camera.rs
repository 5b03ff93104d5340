//! First-person camera.
//!
//! # Coordinate System
//!
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into the screen)
//!
//! # Orientation
//!
//! Orientation is stored as yaw/pitch angles; the forward direction is derived
//! from them on demand.
//!
//! - **Yaw**: Rotation around Y-axis (positive = look right)
//! - **Pitch**: Rotation around X-axis (positive = look down)

use crate::math::{Mat4, Vec3};

/// Camera with position, yaw/pitch orientation and a forward velocity.
///
/// Input handling mutates it between frames; the pipeline only reads the
/// view matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    forward_velocity: Vec3,

    pitch_min: f32,
    pitch_max: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Creates a camera at the given position, looking along +Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            forward_velocity: Vec3::ZERO,
            pitch_min: -89.0_f32.to_radians(),
            pitch_max: 89.0_f32.to_radians(),
        }
    }

    /// Creates a camera at `position` looking toward `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self::new(position);
        camera.look_at(target);
        camera
    }

    /// Rotates the camera horizontally (around Y-axis).
    pub fn rotate_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(std::f32::consts::TAU);
    }

    /// Rotates the camera vertically (around X-axis), clamped to the pitch limits.
    pub fn rotate_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(self.pitch_min, self.pitch_max);
    }

    /// Points the camera at a world position.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        let horizontal_len = (direction.x * direction.x + direction.z * direction.z).sqrt();

        if horizontal_len > f32::EPSILON {
            self.yaw = direction.x.atan2(direction.z);
        }

        if direction.magnitude() > f32::EPSILON {
            self.pitch = (-direction.y)
                .atan2(horizontal_len)
                .clamp(self.pitch_min, self.pitch_max);
        }
    }

    /// Sets the forward velocity to `speed * delta_time` along the view
    /// direction and advances the position by it.
    pub fn move_forward(&mut self, speed: f32, delta_time: f32) {
        self.forward_velocity = self.direction() * (speed * delta_time);
        self.position = self.position + self.forward_velocity;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Displacement applied by the last [`Camera::move_forward`] call.
    pub fn forward_velocity(&self) -> Vec3 {
        self.forward_velocity
    }

    /// Unit view direction: +Z rotated by pitch, then yaw.
    pub fn direction(&self) -> Vec3 {
        let rotation = Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch);
        rotation.transform_direction(Vec3::FORWARD).normalize()
    }

    /// The point one unit ahead of the camera.
    pub fn target(&self) -> Vec3 {
        self.position + self.direction()
    }

    /// World-to-camera matrix for the current frame.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target(), Vec3::UP)
    }
}

/// Snapshot of the movement keys, filled in by the windowing layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
}

/// Maps [`InputState`] onto camera motion.
#[derive(Debug, Clone)]
pub struct FpsCameraController {
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Turn speed in radians per second.
    pub turn_speed: f32,
}

impl Default for FpsCameraController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_speed: 1.5,
        }
    }
}

impl FpsCameraController {
    pub fn new(move_speed: f32, turn_speed: f32) -> Self {
        Self {
            move_speed,
            turn_speed,
        }
    }

    /// Updates the camera based on input state.
    ///
    /// # Input Mapping
    /// - W/S: Move forward/backward
    /// - A/D: Yaw left/right
    /// - Up/Down: Pitch up/down
    pub fn update(&self, camera: &mut Camera, input: &InputState, delta_time: f32) {
        let turn = self.turn_speed * delta_time;
        if input.yaw_left {
            camera.rotate_yaw(-turn);
        }
        if input.yaw_right {
            camera.rotate_yaw(turn);
        }
        if input.pitch_up {
            camera.rotate_pitch(-turn);
        }
        if input.pitch_down {
            camera.rotate_pitch(turn);
        }

        match (input.forward, input.back) {
            (true, false) => camera.move_forward(self.move_speed, delta_time),
            (false, true) => camera.move_forward(-self.move_speed, delta_time),
            _ => camera.forward_velocity = Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn camera_starts_looking_forward() {
        let camera = Camera::new(Vec3::ZERO);
        assert_relative_eq!(camera.direction().z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.direction().x, 0.0, epsilon = 1e-5);
        assert_eq!(camera.view_matrix(), Mat4::identity());
    }

    #[test]
    fn yaw_rotates_horizontally() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate_yaw(std::f32::consts::FRAC_PI_2);

        assert_relative_eq!(camera.direction().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.direction().z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn positive_pitch_looks_down() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate_pitch(0.5);
        assert!(camera.direction().y < 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate_pitch(std::f32::consts::PI);

        assert!(camera.pitch() < std::f32::consts::FRAC_PI_2);
        assert!(camera.pitch() > 0.0);
    }

    #[test]
    fn move_forward_records_velocity() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.move_forward(5.0, 0.5);

        assert_relative_eq!(camera.position().z, 2.5, epsilon = 1e-5);
        assert_relative_eq!(camera.forward_velocity().z, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn looking_at_places_target_in_front() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        let origin = camera.view_matrix() * Vec3::ZERO;
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(origin.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn looking_at_point_above_pitches_up() {
        let camera = Camera::looking_at(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));
        assert_relative_eq!(camera.direction().y, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    }

    #[test]
    fn controller_moves_and_stops() {
        let controller = FpsCameraController::default();
        let mut camera = Camera::new(Vec3::ZERO);

        let input = InputState {
            forward: true,
            ..Default::default()
        };
        controller.update(&mut camera, &input, 1.0);
        assert_relative_eq!(camera.position().z, 5.0, epsilon = 1e-5);

        controller.update(&mut camera, &InputState::default(), 1.0);
        assert_eq!(camera.forward_velocity(), Vec3::ZERO);
        assert_relative_eq!(camera.position().z, 5.0, epsilon = 1e-5);
    }
}
