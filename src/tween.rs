//! Time-based tween primitives and element style state.
//!
//! Times are in seconds. Nothing here reads a clock: callers pass elapsed
//! time, which keeps every animation reproducible in host tests.

use crate::ease::Ease;

/// A single eased interpolation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub delay: f64,
    pub duration: f64,
    pub ease: Ease,
}

impl Tween {
    pub const fn new(duration: f64) -> Self {
        Self { delay: 0.0, duration, ease: Ease::Power1Out }
    }

    pub const fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub const fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Time from start until the tween reaches its target.
    pub fn end(&self) -> f64 {
        self.delay.max(0.0) + self.duration.max(0.0)
    }

    /// Eased progress in [0, 1] at `elapsed` seconds after start.
    pub fn progress(&self, elapsed: f64) -> f64 {
        let local = elapsed - self.delay.max(0.0);
        if local <= 0.0 {
            // A zero-length tween still completes the instant it starts.
            return if self.duration <= 0.0 && local == 0.0 { 1.0 } else { 0.0 };
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.ease.apply(local / self.duration)
    }

    pub fn is_complete(&self, elapsed: f64) -> bool {
        elapsed >= self.end()
    }
}

/// The same tween applied to `count` targets, each offset by `stagger`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagger {
    pub tween: Tween,
    pub stagger: f64,
    pub count: usize,
}

impl Stagger {
    pub const fn new(tween: Tween, stagger: f64, count: usize) -> Self {
        Self { tween, stagger, count }
    }

    /// Offset of item `i` relative to the batch start.
    pub fn offset(&self, i: usize) -> f64 {
        self.stagger.max(0.0) * i as f64
    }

    /// Progress of item `i` at `elapsed` seconds after the batch started.
    pub fn progress(&self, i: usize, elapsed: f64) -> f64 {
        self.tween.progress(elapsed - self.offset(i))
    }

    /// Duration of the whole batch: the last item's end.
    pub fn total(&self) -> f64 {
        self.tween.end() + self.offset(self.count.saturating_sub(1))
    }

    pub fn is_complete(&self, elapsed: f64) -> bool {
        elapsed >= self.total()
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Animatable style properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    Opacity,
    /// Horizontal offset in px.
    X,
    /// Vertical offset in px.
    Y,
    /// Horizontal offset in percent of the element's own width.
    XPercent,
    /// Vertical offset in percent of the element's own height.
    YPercent,
    Scale,
    /// Letter spacing in px.
    LetterSpacing,
}

/// Inline style of one element, as far as animations touch it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleState {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub x_percent: f64,
    pub y_percent: f64,
    pub scale: f64,
    /// `None` leaves the stylesheet value alone.
    pub letter_spacing: Option<f64>,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            letter_spacing: None,
        }
    }
}

impl StyleState {
    pub fn get(&self, prop: Prop) -> f64 {
        match prop {
            Prop::Opacity => self.opacity,
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::XPercent => self.x_percent,
            Prop::YPercent => self.y_percent,
            Prop::Scale => self.scale,
            Prop::LetterSpacing => self.letter_spacing.unwrap_or(0.0),
        }
    }

    pub fn set(&mut self, prop: Prop, value: f64) {
        match prop {
            Prop::Opacity => self.opacity = value,
            Prop::X => self.x = value,
            Prop::Y => self.y = value,
            Prop::XPercent => self.x_percent = value,
            Prop::YPercent => self.y_percent = value,
            Prop::Scale => self.scale = value,
            Prop::LetterSpacing => self.letter_spacing = Some(value),
        }
    }

    /// CSS `transform` value. Percent translation comes first so pixel
    /// offsets are not scaled by it.
    pub fn transform_css(&self) -> String {
        let mut out = String::new();
        if self.x_percent != 0.0 || self.y_percent != 0.0 {
            out.push_str(&format!(
                "translate({}%, {}%) ",
                fmt_num(self.x_percent),
                fmt_num(self.y_percent)
            ));
        }
        out.push_str(&format!(
            "translate3d({}px, {}px, 0px)",
            fmt_num(self.x),
            fmt_num(self.y)
        ));
        if self.scale != 1.0 {
            out.push_str(&format!(" scale({})", fmt_num(self.scale)));
        }
        out
    }

    pub fn opacity_css(&self) -> String {
        fmt_num(self.opacity.clamp(0.0, 1.0))
    }

    pub fn letter_spacing_css(&self) -> Option<String> {
        self.letter_spacing.map(|v| format!("{}px", fmt_num(v)))
    }

    /// CSS property whose computed value holds `prop`.
    pub fn css_property(prop: Prop) -> &'static str {
        match prop {
            Prop::Opacity => "opacity",
            Prop::LetterSpacing => "letter-spacing",
            _ => "transform",
        }
    }

    /// Read `prop` back from a computed style value such as `"0.4"`,
    /// `"normal"` or `"matrix(1, 0, 0, 1, 0, 12)"`. Percent offsets are
    /// resolved to pixels by the browser and cannot be recovered.
    pub fn parse_computed(prop: Prop, css: &str) -> Option<f64> {
        let css = css.trim();
        match prop {
            Prop::Opacity => css.parse().ok(),
            Prop::LetterSpacing if css == "normal" => Some(0.0),
            Prop::LetterSpacing => css.strip_suffix("px")?.trim().parse().ok(),
            Prop::XPercent | Prop::YPercent => None,
            Prop::X | Prop::Y | Prop::Scale => {
                if css == "none" {
                    return Some(Self::default().get(prop));
                }
                let (args, tx, ty) = if let Some(rest) = css.strip_prefix("matrix3d(") {
                    (rest, 12, 13)
                } else {
                    (css.strip_prefix("matrix(")?, 4, 5)
                };
                let m: Vec<f64> = args
                    .strip_suffix(')')?
                    .split(',')
                    .map(|v| v.trim().parse::<f64>())
                    .collect::<Result<_, _>>()
                    .ok()?;
                match prop {
                    Prop::X => m.get(tx).copied(),
                    Prop::Y => m.get(ty).copied(),
                    _ => Some(m.first()?.hypot(*m.get(1)?)),
                }
            }
        }
    }
}

/// Pair each `from` value with the value the element rests at, giving the
/// start and end of a tween that animates in from `from`.
pub fn settle_from(from: &[(Prop, f64)], rest: impl Fn(Prop) -> f64) -> Vec<(Prop, f64, f64)> {
    from.iter().map(|&(p, v)| (p, v, rest(p))).collect()
}

/// Format with at most 4 decimals and no trailing zeros.
fn fmt_num(v: f64) -> String {
    let rounded = (v * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_holds_then_runs() {
        let t = Tween::new(1.0).with_ease(Ease::None).with_delay(0.5);
        assert_eq!(t.progress(0.25), 0.0);
        assert!((t.progress(1.0) - 0.5).abs() < 1e-12);
        assert_eq!(t.progress(2.0), 1.0);
        assert_eq!(t.end(), 1.5);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let t = Tween::new(0.0);
        assert_eq!(t.progress(0.0), 1.0);
        assert!(t.is_complete(0.0));
    }

    #[test]
    fn stagger_total_covers_last_item() {
        let s = Stagger::new(Tween::new(0.3), 0.05, 4);
        assert!((s.total() - 0.45).abs() < 1e-12);
        assert_eq!(s.progress(3, 0.1), 0.0);
        assert!(s.progress(0, 0.1) > 0.0);
        assert!(!s.is_complete(0.44));
        assert!(s.is_complete(0.45));
    }

    #[test]
    fn stagger_of_one_is_the_tween() {
        let s = Stagger::new(Tween::new(2.0), 0.3, 1);
        assert_eq!(s.total(), 2.0);
    }

    #[test]
    fn transform_css_composes_offsets() {
        let mut st = StyleState::default();
        assert_eq!(st.transform_css(), "translate3d(0px, 0px, 0px)");
        st.set(Prop::XPercent, -200.0);
        st.set(Prop::Y, -20.0);
        st.set(Prop::Scale, 1.5);
        assert_eq!(
            st.transform_css(),
            "translate(-200%, 0%) translate3d(0px, -20px, 0px) scale(1.5)"
        );
    }

    #[test]
    fn computed_values_parse() {
        assert_eq!(StyleState::parse_computed(Prop::Opacity, "0.4"), Some(0.4));
        assert_eq!(StyleState::parse_computed(Prop::LetterSpacing, "2px"), Some(2.0));
        assert_eq!(StyleState::parse_computed(Prop::LetterSpacing, "normal"), Some(0.0));
        assert_eq!(StyleState::parse_computed(Prop::Y, "none"), Some(0.0));
        assert_eq!(StyleState::parse_computed(Prop::Scale, "none"), Some(1.0));
        let m = "matrix(2, 0, 0, 2, 5, -12)";
        assert_eq!(StyleState::parse_computed(Prop::X, m), Some(5.0));
        assert_eq!(StyleState::parse_computed(Prop::Y, m), Some(-12.0));
        assert_eq!(StyleState::parse_computed(Prop::Scale, m), Some(2.0));
        let m3 = "matrix3d(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 3, 4, 0, 1)";
        assert_eq!(StyleState::parse_computed(Prop::Y, m3), Some(4.0));
        assert_eq!(StyleState::parse_computed(Prop::YPercent, "none"), None);
        assert_eq!(StyleState::parse_computed(Prop::Opacity, ""), None);
    }

    #[test]
    fn settle_from_ends_at_resting_values() {
        // Subtitle rests at 2px letter-spacing in the stylesheet.
        let rest = |p: Prop| match p {
            Prop::LetterSpacing => 2.0,
            _ => StyleState::default().get(p),
        };
        let props = settle_from(&[(Prop::Opacity, 0.0), (Prop::LetterSpacing, 10.0)], rest);
        assert_eq!(props, vec![(Prop::Opacity, 0.0, 1.0), (Prop::LetterSpacing, 10.0, 2.0)]);
    }

    #[test]
    fn numbers_are_trimmed() {
        let mut st = StyleState::default();
        st.set(Prop::Opacity, 0.333333);
        assert_eq!(st.opacity_css(), "0.3333");
        st.set(Prop::LetterSpacing, 10.0);
        assert_eq!(st.letter_spacing_css().as_deref(), Some("10px"));
    }
}
