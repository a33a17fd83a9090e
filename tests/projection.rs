//! Camera checks for the particle background: the vertical field of view is
//! fixed, so on-screen height of the cloud does not depend on window shape.

use folio_wasm::config::ParticleConfig;
use folio_wasm::particles::ParticleField;
use glam::Vec3;

fn ndc(field: &ParticleField, p: Vec3) -> (f32, f32) {
    let clip = field.projection() * field.view().transform_point3(p).extend(1.0);
    (clip.x / clip.w, clip.y / clip.w)
}

#[test]
fn vertical_extent_is_aspect_invariant() {
    let wide = ParticleField::new(ParticleConfig::default(), 1920.0 / 1080.0);
    let tall = ParticleField::new(ParticleConfig::default(), 1080.0 / 1920.0);
    let p = Vec3::new(0.3, 0.4, -1.0);
    let (_, yw) = ndc(&wide, p);
    let (_, yt) = ndc(&tall, p);
    assert!((yw - yt).abs() < 1e-6, "wide={yw} tall={yt}");
}

#[test]
fn horizontal_extent_scales_with_aspect() {
    let wide = ParticleField::new(ParticleConfig::default(), 2.0);
    let square = ParticleField::new(ParticleConfig::default(), 1.0);
    let p = Vec3::new(0.5, 0.0, 0.0);
    let (xw, _) = ndc(&wide, p);
    let (xs, _) = ndc(&square, p);
    assert!((xs - 2.0 * xw).abs() < 1e-6);
}

#[test]
fn points_behind_the_camera_are_clipped() {
    let field = ParticleField::new(ParticleConfig::default(), 1.0);
    // Camera sits at z = 2 looking toward -z.
    let clip = field.projection() * field.view().transform_point3(Vec3::new(0.0, 0.0, 3.0)).extend(1.0);
    assert!(clip.w < 0.0);
}
