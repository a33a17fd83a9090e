//! Horizontal project gallery.
//!
//! The container pins at the top of the viewport while the page scrolls by
//! the width of the slide track; over that distance the slides slide left
//! until the last one is in view. Slide position trails the scrollbar.

use crate::error::SiteResult;
use crate::scroll::{Region, ScrollRange, ScrollTrigger, Scrub};

pub const CONTAINER_SELECTOR: &str = ".projects-container";
pub const TRACK_SELECTOR: &str = ".projects-slider-wrapper";
pub const SLIDE_SELECTOR: &str = ".project-slide";

/// What to apply this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryFrame {
    /// Applied to every slide.
    pub x_percent: f64,
    /// Vertical translation holding the container in place, px.
    pub pin_offset: f64,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    slides: usize,
    range: ScrollRange,
    scrub: Scrub,
}

impl Gallery {
    /// `track_width` is the scroll distance the pin lasts for.
    pub fn new(
        slides: usize,
        container: Region,
        track_width: f64,
        viewport_height: f64,
        scrub_lag: f64,
    ) -> SiteResult<Self> {
        let trigger = ScrollTrigger::pinned(&format!("+={track_width}"))?;
        Ok(Self {
            slides,
            range: trigger.range(container, viewport_height),
            scrub: Scrub::new(scrub_lag),
        })
    }

    pub fn range(&self) -> ScrollRange {
        self.range
    }

    /// Extra height the page needs so the pinned stretch can be scrolled.
    pub fn spacer(&self) -> f64 {
        self.range.distance()
    }

    /// Distance the slides travel, in percent of one slide.
    pub fn travel(&self) -> f64 {
        -100.0 * self.slides.saturating_sub(1) as f64
    }

    pub fn frame(&mut self, scroll: f64, now: f64) -> GalleryFrame {
        let target = self.range.progress(scroll);
        let progress = self.scrub.update(target, now);
        GalleryFrame {
            x_percent: self.travel() * progress,
            pin_offset: (scroll - self.range.start).clamp(0.0, self.range.distance()),
        }
    }

    pub fn is_settled(&self, scroll: f64) -> bool {
        self.scrub.is_settled(self.range.progress(scroll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery() -> Gallery {
        Gallery::new(4, Region { top: 2000.0, height: 900.0 }, 3000.0, 900.0, 0.0).unwrap()
    }

    #[test]
    fn pin_spans_track_width() {
        let g = gallery();
        assert_eq!(g.range(), ScrollRange { start: 2000.0, end: 5000.0 });
        assert_eq!(g.spacer(), 3000.0);
        assert_eq!(g.travel(), -300.0);
    }

    #[test]
    fn slides_follow_progress() {
        let mut g = gallery();
        assert_eq!(g.frame(0.0, 0.0), GalleryFrame { x_percent: 0.0, pin_offset: 0.0 });
        let mid = g.frame(3500.0, 0.1);
        assert!((mid.x_percent + 150.0).abs() < 1e-9);
        assert_eq!(mid.pin_offset, 1500.0);
        let end = g.frame(9000.0, 0.2);
        assert_eq!(end.x_percent, -300.0);
        assert_eq!(end.pin_offset, 3000.0);
    }

    #[test]
    fn scrubbed_slides_trail_the_scrollbar() {
        let mut g = Gallery::new(3, Region { top: 0.0, height: 800.0 }, 1000.0, 800.0, 1.0).unwrap();
        g.frame(0.0, 0.0);
        let f = g.frame(1000.0, 0.05);
        assert!(f.x_percent < 0.0 && f.x_percent > -200.0);
        assert_eq!(f.pin_offset, 1000.0);
        assert!(!g.is_settled(1000.0));
    }

    #[test]
    fn single_slide_never_moves() {
        let mut g = Gallery::new(1, Region::default(), 500.0, 800.0, 0.0).unwrap();
        assert_eq!(g.frame(250.0, 0.0).x_percent, 0.0);
    }
}
