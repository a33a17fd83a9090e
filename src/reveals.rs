//! Scroll-triggered entrance animations and stat counters.

use crate::ease::Ease;
use crate::tween::{Prop, Stagger, Tween};

/// One group of elements that animates in when its section scrolls into view.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSpec {
    /// Elements animated.
    pub targets: &'static str,
    /// Element whose position starts the animation.
    pub trigger: &'static str,
    pub start: &'static str,
    /// Values the targets start from before tweening to rest.
    pub from: &'static [(Prop, f64)],
    pub batch: Stagger,
    /// Drop inline styles once finished so stylesheet hover effects apply.
    pub clear_after: bool,
}

impl RevealSpec {
    /// Batch sized for `count` matched elements.
    pub fn batch_for(&self, count: usize) -> Stagger {
        Stagger { count, ..self.batch }
    }
}

/// Name of the section whose scroll extent drives the timeline display.
pub const TIMELINE_SECTION: &str = ".experience-section";
pub const TIMELINE_ITEM: &str = ".timeline-item";
pub const TIMELINE_START: &str = "top center";
pub const TIMELINE_END: &str = "bottom center";

pub fn reveal_specs() -> Vec<RevealSpec> {
    vec![
        RevealSpec {
            targets: ".about-section .headline",
            trigger: ".about-section",
            start: "top 80%",
            from: &[(Prop::Y, 50.0), (Prop::Opacity, 0.0)],
            batch: Stagger::new(Tween::new(1.0), 0.0, 1),
            clear_after: false,
        },
        RevealSpec {
            targets: TIMELINE_ITEM,
            trigger: TIMELINE_SECTION,
            start: "top 70%",
            from: &[(Prop::Y, 50.0), (Prop::Opacity, 0.0)],
            batch: Stagger::new(Tween::new(1.0), 0.3, 1),
            clear_after: false,
        },
        RevealSpec {
            targets: ".skill-card",
            trigger: ".skills-section",
            start: "top 80%",
            from: &[(Prop::Y, 60.0), (Prop::Opacity, 0.0)],
            batch: Stagger::new(Tween::new(0.8).with_ease(Ease::Power3Out), 0.15, 1),
            clear_after: true,
        },
        RevealSpec {
            targets: ".huge-link",
            trigger: ".footer-section",
            start: "top 60%",
            from: &[(Prop::Y, 100.0), (Prop::Opacity, 0.0)],
            batch: Stagger::new(Tween::new(1.0), 0.0, 1),
            clear_after: false,
        },
    ]
}

/// Numbers that count up from zero to their `data-val`.
pub const COUNTER_SELECTOR: &str = ".num";
pub const COUNTER_VALUE_ATTR: &str = "data-val";
pub const COUNTER_TRIGGER: &str = ".stats-grid";
pub const COUNTER_START: &str = "top 85%";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Counter {
    target: f64,
    tween: Tween,
}

impl Counter {
    pub fn new(target: f64) -> Self {
        Self { target, tween: Tween::new(2.0).with_ease(Ease::Power2Out) }
    }

    /// Parse a `data-val` attribute. Unparseable values count to zero.
    pub fn from_attr(attr: Option<&str>) -> Self {
        let target = attr
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        Self::new(target)
    }

    /// Displayed value, snapped to whole numbers.
    pub fn value_at(&self, elapsed: f64) -> i64 {
        (self.target * self.tween.progress(elapsed)).round() as i64
    }

    pub fn is_complete(&self, elapsed: f64) -> bool {
        self.tween.is_complete(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollTrigger;

    #[test]
    fn every_spec_has_a_valid_start() {
        for spec in reveal_specs() {
            assert!(ScrollTrigger::new(spec.start).is_ok(), "{}", spec.targets);
            assert!(!spec.from.is_empty());
        }
        assert!(ScrollTrigger::new(COUNTER_START).is_ok());
        assert!(ScrollTrigger::between(TIMELINE_START, TIMELINE_END).is_ok());
    }

    #[test]
    fn skill_cards_cascade() {
        let specs = reveal_specs();
        let skills = specs.iter().find(|s| s.targets == ".skill-card").unwrap();
        let batch = skills.batch_for(6);
        assert!((batch.total() - (0.8 + 5.0 * 0.15)).abs() < 1e-9);
        assert!(skills.clear_after);
    }

    #[test]
    fn counter_snaps_and_lands() {
        let c = Counter::from_attr(Some(" 150 "));
        assert_eq!(c.value_at(0.0), 0);
        let mid = c.value_at(1.0);
        assert!(mid > 75 && mid < 150, "power2.out leads linear: {mid}");
        assert_eq!(c.value_at(2.0), 150);
        assert!(c.is_complete(2.0));
    }

    #[test]
    fn bad_counter_attr_counts_to_zero() {
        assert_eq!(Counter::from_attr(Some("lots")).value_at(2.0), 0);
        assert_eq!(Counter::from_attr(None).value_at(2.0), 0);
    }
}
