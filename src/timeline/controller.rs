//! Scroll-synchronised timeline display.
//!
//! The four display fields (year, role, company, description) always show a
//! single entry. When scroll progress selects a different year the fields
//! fade out in a cascade, their text is replaced at the instant the fade-out
//! completes, and they fade back in.
//!
//! ```text
//! Idle(current) --year change--> FadingOut --phase A done--> Swapping
//!      ^                                                        |
//!      +------ phase B done ------ FadingIn <---- text set -----+
//! ```
//!
//! Progress updates that arrive mid-transition never start a second
//! sequence. The latest requested year is remembered and, if it still
//! differs once the running sequence lands, a new one starts toward it.

use serde::{Deserialize, Serialize};

use super::{ContentStore, IndexSet};
use crate::ease::Ease;
use crate::tween::{lerp, Stagger, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayField {
    Year,
    Role,
    Company,
    Description,
}

impl DisplayField {
    /// Cascade order.
    pub const ALL: [DisplayField; 4] = [
        DisplayField::Year,
        DisplayField::Role,
        DisplayField::Company,
        DisplayField::Description,
    ];
}

/// Visual prominence of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStyle {
    pub opacity: f64,
    /// Vertical offset in px.
    pub y: f64,
}

impl FieldStyle {
    pub const VISIBLE: FieldStyle = FieldStyle { opacity: 1.0, y: 0.0 };
}

/// Where the controller writes. Implementations must not fail; a sink that
/// can lose its targets should swallow the write.
pub trait DisplaySink {
    fn set_style(&mut self, field: DisplayField, style: FieldStyle);
    fn set_text(&mut self, field: DisplayField, text: &str);
}

/// Durations in seconds, offset in px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionTiming {
    pub fade_out: f64,
    pub fade_in: f64,
    pub stagger: f64,
    pub offset_y: f64,
    pub ease: Ease,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            fade_out: 0.3,
            fade_in: 0.4,
            stagger: 0.05,
            offset_y: 20.0,
            ease: Ease::Power1Out,
        }
    }
}

impl TransitionTiming {
    fn fade_out(&self) -> Stagger {
        Stagger::new(
            Tween::new(self.fade_out).with_ease(self.ease),
            self.stagger,
            DisplayField::ALL.len(),
        )
    }

    fn fade_in(&self) -> Stagger {
        Stagger::new(
            Tween::new(self.fade_in).with_ease(self.ease),
            self.stagger,
            DisplayField::ALL.len(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FadingOut,
    Swapping,
    FadingIn,
}

/// What the page currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub current_year: Option<String>,
}

#[derive(Debug, Clone)]
struct Transition {
    from: Option<String>,
    to: String,
    phase: Phase,
    /// Start of the current phase, seconds.
    phase_start: f64,
}

pub struct DisplayController<S> {
    index: IndexSet,
    store: ContentStore,
    sink: S,
    timing: TransitionTiming,
    state: DisplayState,
    transition: Option<Transition>,
    pending: Option<String>,
}

impl<S: DisplaySink> DisplayController<S> {
    pub fn new(index: IndexSet, store: ContentStore, sink: S, timing: TransitionTiming) -> Self {
        Self {
            index,
            store,
            sink,
            timing,
            state: DisplayState::default(),
            transition: None,
            pending: None,
        }
    }

    pub fn current_year(&self) -> Option<&str> {
        self.state.current_year.as_deref()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// `None` while idle.
    pub fn phase(&self) -> Option<Phase> {
        self.transition.as_ref().map(|t| t.phase)
    }

    /// `(from, to)` of the running transition.
    pub fn transition_years(&self) -> Option<(Option<&str>, &str)> {
        self.transition
            .as_ref()
            .map(|t| (t.from.as_deref(), t.to.as_str()))
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Feed a scroll progress sample. Returns `true` if a transition started.
    pub fn on_progress(&mut self, progress: f64, now: f64) -> bool {
        let Some(year) = self.index.year_at(progress) else {
            return false;
        };

        if let Some(t) = &self.transition {
            if year == t.to {
                self.pending = None;
            } else if self.store.contains(year) {
                self.pending = Some(year.to_string());
            }
            return false;
        }

        if self.state.current_year.as_deref() == Some(year) || !self.store.contains(year) {
            return false;
        }

        let year = year.to_string();
        self.begin(year, now);
        true
    }

    /// Advance the running transition to `now`. Cheap when idle.
    pub fn tick(&mut self, now: f64) {
        while let Some(mut t) = self.transition.take() {
            match t.phase {
                Phase::FadingOut => {
                    let batch = self.timing.fade_out();
                    let elapsed = now - t.phase_start;
                    if batch.is_complete(elapsed) {
                        self.render(&batch, batch.total(), 1.0, 0.0, 0.0, -self.timing.offset_y);
                        t.phase = Phase::Swapping;
                        t.phase_start += batch.total();
                        self.transition = Some(t);
                        continue;
                    }
                    self.render(&batch, elapsed, 1.0, 0.0, 0.0, -self.timing.offset_y);
                    self.transition = Some(t);
                    return;
                }
                Phase::Swapping => {
                    // Unknown years never start a transition, so this only
                    // misses if the store changed underneath us.
                    if let Some(entry) = self.store.get(&t.to) {
                        for field in DisplayField::ALL {
                            self.sink.set_text(field, entry.field(field));
                        }
                    }
                    t.phase = Phase::FadingIn;
                    self.transition = Some(t);
                }
                Phase::FadingIn => {
                    let batch = self.timing.fade_in();
                    let elapsed = now - t.phase_start;
                    if !batch.is_complete(elapsed) {
                        self.render(&batch, elapsed, 0.0, 1.0, -self.timing.offset_y, 0.0);
                        self.transition = Some(t);
                        return;
                    }
                    self.render(&batch, batch.total(), 0.0, 1.0, -self.timing.offset_y, 0.0);
                    let landed_at = t.phase_start + batch.total();
                    crate::log_debug!("timeline settled on {}", t.to);
                    self.state.current_year = Some(t.to);
                    if let Some(next) = self.pending.take() {
                        if self.state.current_year.as_deref() != Some(next.as_str())
                            && self.store.contains(&next)
                        {
                            self.begin(next, landed_at);
                        }
                    }
                }
            }
        }
    }

    /// Abandon any running transition and restore full prominence.
    /// A transition past its text swap counts as landed.
    pub fn cancel(&mut self) {
        self.pending = None;
        if let Some(t) = self.transition.take() {
            if t.phase == Phase::FadingIn {
                self.state.current_year = Some(t.to);
            }
            for field in DisplayField::ALL {
                self.sink.set_style(field, FieldStyle::VISIBLE);
            }
        }
    }

    fn begin(&mut self, to: String, now: f64) {
        crate::log_debug!(
            "timeline {} -> {}",
            self.state.current_year.as_deref().unwrap_or("-"),
            to
        );
        self.transition = Some(Transition {
            from: self.state.current_year.clone(),
            to,
            phase: Phase::FadingOut,
            phase_start: now,
        });
    }

    fn render(&mut self, batch: &Stagger, elapsed: f64, o0: f64, o1: f64, y0: f64, y1: f64) {
        for (i, field) in DisplayField::ALL.into_iter().enumerate() {
            let p = batch.progress(i, elapsed);
            self.sink.set_style(
                field,
                FieldStyle { opacity: lerp(o0, o1, p), y: lerp(y0, y1, p) },
            );
        }
    }
}
