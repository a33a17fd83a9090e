//! Intro sequence: the loading counter and the hero reveal that follows it.

use crate::config::PreloaderConfig;
use crate::ease::Ease;
use crate::tween::{Prop, Tween};

/// Elements the intro touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntroTarget {
    LoaderText,
    LoaderWrap,
    HeroTitle,
    HeroSubtitle,
    HeroTechStack,
}

impl IntroTarget {
    pub fn selector(self) -> &'static str {
        match self {
            IntroTarget::LoaderText => ".loader-text",
            IntroTarget::LoaderWrap => ".loader-wrap",
            IntroTarget::HeroTitle => ".hero-title",
            IntroTarget::HeroSubtitle => ".hero-subtitle",
            IntroTarget::HeroTechStack => ".hero-tech-stack",
        }
    }
}

/// Placement of a step relative to the sequence built so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// At the current end of the sequence.
    End,
    /// This many seconds before the current end (`"-=N"`).
    Overlap(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Tween from the current style to these values.
    To(Vec<(Prop, f64)>),
    /// Start at these values (applied up front) and tween to the resting style.
    From(Vec<(Prop, f64)>),
    /// Intro finished; release the page.
    Finish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub target: Option<IntroTarget>,
    pub action: Action,
    pub tween: Tween,
    pub position: Position,
}

/// A step with its absolute start time. `start` is when the step is
/// inserted; the tween's own delay is still applied by whoever runs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: f64,
    pub end: f64,
    pub step: Step,
}

/// Lay steps out in time, each placed relative to the end so far.
pub fn schedule(steps: Vec<Step>) -> Vec<Cue> {
    let mut end = 0.0_f64;
    steps
        .into_iter()
        .map(|step| {
            let start = match step.position {
                Position::End => end,
                Position::Overlap(s) => (end - s).max(0.0),
            };
            let step_end = start + step.tween.end();
            end = end.max(step_end);
            Cue { start, end: step_end, step }
        })
        .collect()
}

/// The intro as shipped.
pub fn intro_steps(cfg: &PreloaderConfig) -> Vec<Step> {
    use IntroTarget::*;
    vec![
        Step {
            target: Some(LoaderText),
            action: Action::To(vec![(Prop::Opacity, 0.0)]),
            tween: Tween::new(0.5).with_delay(cfg.hold),
            position: Position::End,
        },
        Step {
            target: Some(LoaderWrap),
            action: Action::To(vec![(Prop::YPercent, -100.0)]),
            tween: Tween::new(1.0).with_ease(Ease::Power4InOut),
            position: Position::End,
        },
        Step {
            target: Some(HeroTitle),
            action: Action::From(vec![(Prop::Y, 100.0), (Prop::Opacity, 0.0)]),
            tween: Tween::new(1.5).with_ease(Ease::Power4Out),
            position: Position::Overlap(0.5),
        },
        Step {
            target: Some(HeroSubtitle),
            action: Action::From(vec![(Prop::Opacity, 0.0), (Prop::LetterSpacing, 10.0)]),
            tween: Tween::new(1.0),
            position: Position::Overlap(1.0),
        },
        Step {
            target: Some(HeroTechStack),
            action: Action::From(vec![(Prop::Opacity, 0.0), (Prop::Y, 30.0)]),
            tween: Tween::new(1.0),
            position: Position::Overlap(0.5),
        },
        Step {
            target: None,
            action: Action::Finish,
            tween: Tween::new(0.0),
            position: Position::End,
        },
    ]
}

/// Plays a scheduled sequence against a clock that starts at zero.
#[derive(Debug, Clone)]
pub struct Intro {
    cues: Vec<Cue>,
    next: usize,
    count_to: f64,
    count_tween: Tween,
}

impl Intro {
    pub fn new(cfg: &PreloaderConfig) -> Self {
        Self {
            cues: schedule(intro_steps(cfg)),
            next: 0,
            count_to: cfg.count_to,
            count_tween: Tween::new(cfg.count_duration).with_ease(Ease::Power2InOut),
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Steps whose `From` values must be in place before the first frame.
    pub fn initial_states(&self) -> impl Iterator<Item = (IntroTarget, &[(Prop, f64)])> {
        self.cues.iter().filter_map(|c| match (&c.step.action, c.step.target) {
            (Action::From(props), Some(t)) => Some((t, props.as_slice())),
            _ => None,
        })
    }

    /// Cues that became due since the previous call, in order.
    pub fn advance(&mut self, elapsed: f64) -> &[Cue] {
        let from = self.next;
        while self.next < self.cues.len() && self.cues[self.next].start <= elapsed {
            self.next += 1;
        }
        &self.cues[from..self.next]
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.cues.len()
    }

    /// Loading counter reading at `elapsed` seconds.
    pub fn counter(&self, elapsed: f64) -> u32 {
        (self.count_tween.progress(elapsed) * self.count_to).round().max(0.0) as u32
    }

    pub fn counter_done(&self, elapsed: f64) -> bool {
        self.count_tween.is_complete(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn intro_timing_matches_overlaps() {
        let intro = Intro::new(&PreloaderConfig::default());
        let starts: Vec<f64> = intro.cues().iter().map(|c| c.start).collect();
        let ends: Vec<f64> = intro.cues().iter().map(|c| c.end).collect();
        // text fade [0, 2.7] incl. 2.2 hold, wrap [2.7, 3.7], title [3.2, 4.7],
        // subtitle [3.7, 4.7], tech stack [4.2, 5.2], finish at 5.2.
        let want_starts = [0.0, 2.7, 3.2, 3.7, 4.2, 5.2];
        let want_ends = [2.7, 3.7, 4.7, 4.7, 5.2, 5.2];
        for i in 0..6 {
            assert!(approx(starts[i], want_starts[i]), "start {i}: {}", starts[i]);
            assert!(approx(ends[i], want_ends[i]), "end {i}: {}", ends[i]);
        }
    }

    #[test]
    fn advance_releases_each_cue_once() {
        let mut intro = Intro::new(&PreloaderConfig::default());
        assert_eq!(intro.advance(0.0).len(), 1);
        assert!(intro.advance(1.0).is_empty());
        assert_eq!(intro.advance(3.3).len(), 2);
        assert!(!intro.is_done());
        let rest = intro.advance(10.0);
        assert_eq!(rest.len(), 3);
        assert_eq!(rest.last().unwrap().step.action, Action::Finish);
        assert!(intro.is_done());
        assert!(intro.advance(11.0).is_empty());
    }

    #[test]
    fn from_steps_expose_initial_state() {
        let intro = Intro::new(&PreloaderConfig::default());
        let targets: Vec<_> = intro.initial_states().map(|(t, _)| t).collect();
        assert_eq!(
            targets,
            vec![IntroTarget::HeroTitle, IntroTarget::HeroSubtitle, IntroTarget::HeroTechStack]
        );
    }

    #[test]
    fn counter_runs_zero_to_hundred() {
        let intro = Intro::new(&PreloaderConfig::default());
        assert_eq!(intro.counter(0.0), 0);
        assert_eq!(intro.counter(1.0), 50);
        assert_eq!(intro.counter(2.0), 100);
        assert_eq!(intro.counter(5.0), 100);
        assert!(intro.counter(0.5) < 25);
        assert!(intro.counter_done(2.0));
    }

    #[test]
    fn overlap_never_goes_negative() {
        let cues = schedule(vec![Step {
            target: None,
            action: Action::Finish,
            tween: Tween::new(1.0),
            position: Position::Overlap(3.0),
        }]);
        assert_eq!(cues[0].start, 0.0);
    }
}
