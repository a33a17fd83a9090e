//! Custom cursor and magnetic hover targets.
//!
//! Pointer events are turned into tween requests here; the browser side only
//! applies them. Coordinates are client (viewport) pixels.

use crate::config::CursorConfig;
use crate::tween::{Prop, Tween};

/// Default duration for tweens that do not name one.
pub const DEFAULT_DURATION: f64 = 0.5;

/// Class toggled on the follower while a magnetic target is hovered.
pub const ACTIVE_CLASS: &str = "cursor-active";

/// Elements that react to hover.
pub const HOVER_SELECTOR: &str = ".magnetic-link, .magnetic";

/// Class marking elements that also drift toward the pointer.
pub const MAGNETIC_CLASS: &str = "magnetic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorPart {
    /// Small dot locked to the pointer.
    Dot,
    /// Ring trailing slightly behind.
    Follower,
}

/// Viewport-relative box, as from `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// A tween the page should start.
#[derive(Debug, Clone, PartialEq)]
pub struct Request<T> {
    pub target: T,
    pub props: Vec<(Prop, f64)>,
    pub tween: Tween,
}

#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    cfg: CursorConfig,
}

impl Cursor {
    pub fn new(cfg: CursorConfig) -> Self {
        Self { cfg }
    }

    /// Dot jumps to the pointer, follower eases after it.
    pub fn pointer_moved(&self, x: f64, y: f64) -> [Request<CursorPart>; 2] {
        let pos = vec![(Prop::X, x), (Prop::Y, y)];
        [
            Request { target: CursorPart::Dot, props: pos.clone(), tween: Tween::new(0.0) },
            Request {
                target: CursorPart::Follower,
                props: pos,
                tween: Tween::new(self.cfg.follower_lag),
            },
        ]
    }

    pub fn hover_started(&self) -> Request<CursorPart> {
        Request {
            target: CursorPart::Follower,
            props: vec![(Prop::Scale, self.cfg.hover_scale)],
            tween: Tween::new(DEFAULT_DURATION),
        }
    }

    /// Follower shrinks back; the hovered element returns to rest.
    pub fn hover_ended(&self) -> (Request<CursorPart>, Request<()>) {
        (
            Request {
                target: CursorPart::Follower,
                props: vec![(Prop::Scale, 1.0)],
                tween: Tween::new(DEFAULT_DURATION),
            },
            Request {
                target: (),
                props: vec![(Prop::X, 0.0), (Prop::Y, 0.0)],
                tween: Tween::new(self.cfg.release_duration),
            },
        )
    }

    /// Pull a magnetic element toward the pointer.
    pub fn magnetic_moved(&self, rect: Rect, x: f64, y: f64) -> Request<()> {
        let (dx, dy) = magnetic_offset(rect, x, y, self.cfg.magnetic_strength);
        Request {
            target: (),
            props: vec![(Prop::X, dx), (Prop::Y, dy)],
            tween: Tween::new(self.cfg.magnetic_duration),
        }
    }
}

/// Pointer offset from the element's centre, scaled by `strength`.
pub fn magnetic_offset(rect: Rect, x: f64, y: f64, strength: f64) -> (f64, f64) {
    let (cx, cy) = rect.center();
    ((x - cx) * strength, (y - cy) * strength)
}

/// Pointer position mapped to [-0.5, 0.5] on both axes.
pub fn normalized_pointer(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    (x / width - 0.5, y / height - 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_is_instant_and_follower_lags() {
        let c = Cursor::new(CursorConfig::default());
        let [dot, follower] = c.pointer_moved(120.0, 40.0);
        assert_eq!(dot.target, CursorPart::Dot);
        assert_eq!(dot.tween.duration, 0.0);
        assert_eq!(follower.tween.duration, 0.1);
        assert_eq!(follower.props, vec![(Prop::X, 120.0), (Prop::Y, 40.0)]);
    }

    #[test]
    fn magnetic_pull_is_scaled_offset_from_center() {
        let rect = Rect { left: 100.0, top: 200.0, width: 80.0, height: 40.0 };
        assert_eq!(magnetic_offset(rect, 140.0, 220.0, 0.3), (0.0, 0.0));
        let (dx, dy) = magnetic_offset(rect, 180.0, 200.0, 0.3);
        assert!((dx - 12.0).abs() < 1e-9);
        assert!((dy + 6.0).abs() < 1e-9);
    }

    #[test]
    fn hover_cycle_scales_follower() {
        let c = Cursor::new(CursorConfig::default());
        assert_eq!(c.hover_started().props, vec![(Prop::Scale, 1.5)]);
        let (follower, element) = c.hover_ended();
        assert_eq!(follower.props, vec![(Prop::Scale, 1.0)]);
        assert_eq!(element.props, vec![(Prop::X, 0.0), (Prop::Y, 0.0)]);
        assert_eq!(element.tween.duration, 0.5);
    }

    #[test]
    fn pointer_normalization() {
        assert_eq!(normalized_pointer(960.0, 540.0, 1920.0, 1080.0), (0.0, 0.0));
        assert_eq!(normalized_pointer(0.0, 1080.0, 1920.0, 1080.0), (-0.5, 0.5));
        assert_eq!(normalized_pointer(10.0, 10.0, 0.0, 0.0), (0.0, 0.0));
    }
}
