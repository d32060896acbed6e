use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};
use tilecube_input::{InputState, MouseButton};

use crate::config::CameraConfig;

/// Orbit camera circling a target point.
///
/// Dragging with either mouse button held turns the azimuth; the polar
/// angle and distance stay fixed. Movement input is resolved against the
/// azimuth, so the rig is part of the game state and not only cosmetics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Horizontal angle in radians, wrapped to (-PI, PI].
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    pub target: Vec3,
    pub sensitivity: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from(CameraConfig::default())
    }
}

impl From<CameraConfig> for CameraRig {
    fn from(config: CameraConfig) -> Self {
        Self {
            azimuth: wrap_angle(config.azimuth),
            polar: config.polar,
            distance: config.distance,
            target: Vec3::ZERO,
            sensitivity: config.sensitivity,
        }
    }
}

impl CameraRig {
    /// Apply this frame's mouse drag, then track `target`.
    pub fn update(&mut self, input: &InputState, target: Vec3) {
        if input.is_mouse_down(MouseButton::Left) || input.is_mouse_down(MouseButton::Right) {
            self.rotate(input.mouse_delta());
        }
        self.target = target;
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth = wrap_angle(self.azimuth - delta.x * self.sensitivity);
    }

    /// Camera position on the orbit sphere.
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + self.distance * Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a)
    }

    /// Unit direction the camera faces, flattened onto the ground plane.
    pub fn planar_forward(&self) -> Vec2 {
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Vec2::new(-sin_a, -cos_a)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
