//! Scroll trigger geometry.
//!
//! A trigger pairs a page region with two anchors. Each anchor names a point
//! on the element and a point on the viewport (`"top 80%"`: the element's top
//! meets the line 80% down the viewport). The scroll offsets at which the
//! start and end anchors line up bound the region's progress.

use std::str::FromStr;

use crate::error::{SiteError, SiteResult};

/// A length measured along an element or the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    Px(f64),
    /// Percent of the element's (or viewport's) height.
    Percent(f64),
}

impl Offset {
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Offset::Px(v) => v,
            Offset::Percent(p) => extent * p / 100.0,
        }
    }
}

impl FromStr for Offset {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        let s = s.trim();
        let bad = || SiteError::Anchor(s.to_string());
        match s {
            "top" => return Ok(Offset::Percent(0.0)),
            "center" => return Ok(Offset::Percent(50.0)),
            "bottom" => return Ok(Offset::Percent(100.0)),
            _ => {}
        }
        if let Some(n) = s.strip_suffix('%') {
            return n.trim().parse().map(Offset::Percent).map_err(|_| bad());
        }
        let n = s.strip_suffix("px").unwrap_or(s);
        n.trim().parse().map(Offset::Px).map_err(|_| bad())
    }
}

/// `"<element point> <viewport point>"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub element: Offset,
    pub viewport: Offset,
}

impl Anchor {
    /// Scroll offset at which the two points coincide.
    pub fn scroll_offset(&self, region: Region, viewport_height: f64) -> f64 {
        region.top + self.element.resolve(region.height) - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for Anchor {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(el), Some(vp), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SiteError::Anchor(s.to_string()));
        };
        Ok(Anchor { element: el.parse()?, viewport: vp.parse()? })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum End {
    Anchor(Anchor),
    /// `"+=N"`: N px past the start.
    After(f64),
}

impl FromStr for End {
    type Err = SiteError;

    fn from_str(s: &str) -> SiteResult<Self> {
        match s.trim().strip_prefix("+=") {
            Some(n) => n
                .trim()
                .trim_end_matches("px")
                .parse()
                .map(End::After)
                .map_err(|_| SiteError::Anchor(s.to_string())),
            None => s.parse().map(End::Anchor),
        }
    }
}

/// An element's box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    pub start: Anchor,
    pub end: End,
}

impl ScrollTrigger {
    /// Plain triggers run from `top bottom` to `bottom top`.
    pub fn new(start: &str) -> SiteResult<Self> {
        Self::between(start, "bottom top")
    }

    pub fn between(start: &str, end: &str) -> SiteResult<Self> {
        Ok(Self { start: start.parse()?, end: end.parse()? })
    }

    /// Pinned sections start when their top meets the viewport top.
    pub fn pinned(end: &str) -> SiteResult<Self> {
        Self::between("top top", end)
    }

    pub fn range(&self, region: Region, viewport_height: f64) -> ScrollRange {
        let start = self.start.scroll_offset(region, viewport_height);
        let end = match self.end {
            End::Anchor(a) => a.scroll_offset(region, viewport_height),
            End::After(px) => start + px,
        };
        ScrollRange { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    pub fn distance(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Progress through the range, clamped to [0, 1].
    pub fn progress(&self, scroll: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }

    pub fn is_reached(&self, scroll: f64) -> bool {
        scroll >= self.start
    }
}

/// Fires the first time the scroll offset reaches a start point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reveal {
    fired: bool,
}

impl Reveal {
    /// `true` exactly once: on the first call with `scroll >= start`.
    pub fn check(&mut self, range: &ScrollRange, scroll: f64) -> bool {
        if self.fired || !range.is_reached(scroll) {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Trails a target value, closing ~99% of the gap within `lag` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrub {
    lag: f64,
    value: Option<f64>,
    last: f64,
}

impl Scrub {
    pub fn new(lag: f64) -> Self {
        Self { lag, value: None, last: 0.0 }
    }

    pub fn value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    /// Move toward `target`. The first call jumps straight to it.
    pub fn update(&mut self, target: f64, now: f64) -> f64 {
        let next = match self.value {
            None => target,
            Some(_) if self.lag <= 0.0 => target,
            Some(v) => {
                let dt = (now - self.last).max(0.0);
                let k = 1.0 - (-dt * 4.6 / self.lag).exp();
                let n = v + (target - v) * k;
                if (target - n).abs() < 1e-4 { target } else { n }
            }
        };
        self.value = Some(next);
        self.last = now;
        next
    }

    pub fn is_settled(&self, target: f64) -> bool {
        self.value == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_numeric_offsets() {
        let a: Anchor = "top 80%".parse().unwrap();
        assert_eq!(a.element, Offset::Percent(0.0));
        assert_eq!(a.viewport, Offset::Percent(80.0));
        let b: Anchor = "bottom center".parse().unwrap();
        assert_eq!(b.element, Offset::Percent(100.0));
        assert_eq!(b.viewport, Offset::Percent(50.0));
        let c: Anchor = "20px 100".parse().unwrap();
        assert_eq!(c.element, Offset::Px(20.0));
        assert_eq!(c.viewport, Offset::Px(100.0));
    }

    #[test]
    fn rejects_malformed_anchors() {
        assert!("top".parse::<Anchor>().is_err());
        assert!("top middle".parse::<Anchor>().is_err());
        assert!("top 80% extra".parse::<Anchor>().is_err());
        assert!("+=wide".parse::<End>().is_err());
    }

    #[test]
    fn start_offset_accounts_for_viewport_line() {
        // Element at 2000px, viewport 1000px: "top 80%" lines up at 1200.
        let t = ScrollTrigger::new("top 80%").unwrap();
        let r = t.range(Region { top: 2000.0, height: 600.0 }, 1000.0);
        assert_eq!(r.start, 1200.0);
        assert_eq!(r.end, 2600.0);
    }

    #[test]
    fn center_to_center_progress() {
        let t = ScrollTrigger::between("top center", "bottom center").unwrap();
        let r = t.range(Region { top: 1000.0, height: 900.0 }, 800.0);
        assert_eq!(r.start, 600.0);
        assert_eq!(r.end, 1500.0);
        assert_eq!(r.progress(0.0), 0.0);
        assert_eq!(r.progress(600.0), 0.0);
        assert!((r.progress(1050.0) - 0.5).abs() < 1e-12);
        assert_eq!(r.progress(1500.0), 1.0);
        assert_eq!(r.progress(9000.0), 1.0);
    }

    #[test]
    fn relative_end_and_pin() {
        let t = ScrollTrigger::pinned("+=2400").unwrap();
        let r = t.range(Region { top: 3000.0, height: 800.0 }, 800.0);
        assert_eq!(r.start, 3000.0);
        assert_eq!(r.end, 5400.0);
        assert_eq!(r.distance(), 2400.0);
    }

    #[test]
    fn degenerate_range_steps() {
        let r = ScrollRange { start: 100.0, end: 100.0 };
        assert_eq!(r.progress(99.0), 0.0);
        assert_eq!(r.progress(100.0), 1.0);
    }

    #[test]
    fn reveal_fires_once() {
        let r = ScrollRange { start: 500.0, end: 900.0 };
        let mut rv = Reveal::default();
        assert!(!rv.check(&r, 100.0));
        assert!(rv.check(&r, 520.0));
        assert!(!rv.check(&r, 600.0));
        assert!(!rv.check(&r, 0.0));
        assert!(rv.has_fired());
    }

    #[test]
    fn scrub_trails_then_settles() {
        let mut s = Scrub::new(1.0);
        assert_eq!(s.update(0.0, 0.0), 0.0);
        let v = s.update(1.0, 0.1);
        assert!(v > 0.0 && v < 1.0);
        let mut now = 0.1;
        for _ in 0..200 {
            now += 1.0 / 60.0;
            s.update(1.0, now);
        }
        assert!(s.is_settled(1.0));
    }

    #[test]
    fn zero_lag_scrub_is_direct() {
        let mut s = Scrub::new(0.0);
        s.update(0.2, 0.0);
        assert_eq!(s.update(0.7, 0.01), 0.7);
    }
}
