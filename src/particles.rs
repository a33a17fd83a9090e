//! Background particle field: point positions, rotation and camera.

use glam::{Mat4, Vec3};

use crate::config::ParticleConfig;

/// Scatter `cfg.count` points uniformly in a cube of edge `cfg.spread`
/// centred on the origin. `random` yields values in [0, 1).
pub fn scatter(cfg: &ParticleConfig, mut random: impl FnMut() -> f64) -> Vec<f32> {
    (0..cfg.count * 3)
        .map(|_| ((random() - 0.5) * cfg.spread as f64) as f32)
        .collect()
}

/// Per-frame orientation of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRotation {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    cfg: ParticleConfig,
    /// Pointer in [-0.5, 0.5].
    pointer: (f32, f32),
    aspect: f32,
}

impl ParticleField {
    pub fn new(cfg: ParticleConfig, aspect: f32) -> Self {
        Self { cfg, pointer: (0.0, 0.0), aspect: sanitize_aspect(aspect) }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.cfg
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = (x as f32, y as f32);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Slow spin about y, tilted toward the pointer.
    pub fn rotation(&self, elapsed: f64) -> FieldRotation {
        let (mx, my) = self.pointer;
        FieldRotation {
            x: my * self.cfg.pointer_tilt,
            y: elapsed as f32 * self.cfg.spin_rate + mx * self.cfg.pointer_tilt,
        }
    }

    /// Rotation about x then y, in that order (XYZ Euler).
    pub fn model(&self, elapsed: f64) -> Mat4 {
        let r = self.rotation(elapsed);
        Mat4::from_rotation_x(r.x) * Mat4::from_rotation_y(r.y)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.cfg.camera_z))
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.cfg.fov_degrees.to_radians(),
            self.aspect,
            self.cfg.near,
            self.cfg.far,
        )
    }

    pub fn model_view(&self, elapsed: f64) -> Mat4 {
        self.view() * self.model(elapsed)
    }

    /// Factor turning world-space point size into pixels at unit depth:
    /// half the drawing buffer height.
    pub fn point_scale(buffer_height: f32) -> f32 {
        buffer_height * 0.5
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}
