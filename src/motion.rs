//! Property tweens over a set of keyed targets.
//!
//! `Motion` tracks the current `StyleState` of every target it has touched
//! and the tweens still running against them. A new tween on the same
//! (target, property) pair replaces the running one and starts from wherever
//! the old one had got to, so pointer-driven tweens never fight each other.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::tween::{lerp, Prop, StyleState, Tween};

/// Identifies a tween so callers can react to its completion.
pub type TweenId = u64;

#[derive(Debug, Clone)]
struct Active {
    id: TweenId,
    start: f64,
    from: f64,
    to: f64,
    tween: Tween,
}

/// Result of advancing all tweens to a point in time.
#[derive(Debug, Default)]
pub struct Frame<K> {
    /// Targets whose style changed during this tick.
    pub dirty: Vec<K>,
    /// Tweens that reached their target during this tick.
    pub completed: Vec<TweenId>,
    /// Tweens whose every property was overwritten, set or cleared before
    /// finishing. These never appear in `completed`.
    pub cancelled: Vec<TweenId>,
}

#[derive(Debug)]
pub struct Motion<K> {
    styles: HashMap<K, StyleState>,
    active: HashMap<K, BTreeMap<Prop, Active>>,
    cancelled: Vec<TweenId>,
    next_id: TweenId,
}

impl<K> Default for Motion<K> {
    fn default() -> Self {
        Self {
            styles: HashMap::new(),
            active: HashMap::new(),
            cancelled: Vec::new(),
            next_id: 1,
        }
    }
}

impl<K: Copy + Eq + Hash> Motion<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, target: K) -> StyleState {
        self.styles.get(&target).copied().unwrap_or_default()
    }

    /// Set a property immediately, cancelling any tween on it.
    pub fn set(&mut self, target: K, prop: Prop, value: f64) {
        if let Some(props) = self.active.get_mut(&target) {
            if let Some(old) = props.remove(&prop) {
                retire(props, old.id, &mut self.cancelled);
            }
        }
        self.styles.entry(target).or_default().set(prop, value);
    }

    /// Drop all tweens and stored style for `target`.
    pub fn clear(&mut self, target: K) {
        if let Some(props) = self.active.remove(&target) {
            self.cancelled.extend(props.values().map(|a| a.id));
        }
        self.styles.remove(&target);
    }

    /// Tween `prop` from its current value to `to`, starting at `now`.
    /// Several properties started by one call share the returned id.
    pub fn to(&mut self, target: K, props: &[(Prop, f64)], tween: Tween, now: f64) -> TweenId {
        let id = self.alloc_id();
        let style = self.styles.entry(target).or_default();
        let slots = self.active.entry(target).or_default();
        for &(prop, to) in props {
            let prev = slots.insert(
                prop,
                Active { id, start: now, from: style.get(prop), to, tween },
            );
            if let Some(old) = prev {
                retire(slots, old.id, &mut self.cancelled);
            }
        }
        id
    }

    /// Apply `from` values immediately, then tween back to `to`.
    pub fn from_to(
        &mut self,
        target: K,
        props: &[(Prop, f64, f64)],
        tween: Tween,
        now: f64,
    ) -> TweenId {
        let id = self.alloc_id();
        let style = self.styles.entry(target).or_default();
        let slots = self.active.entry(target).or_default();
        for &(prop, from, to) in props {
            style.set(prop, from);
            if let Some(old) = slots.insert(prop, Active { id, start: now, from, to, tween }) {
                retire(slots, old.id, &mut self.cancelled);
            }
        }
        id
    }

    pub fn is_animating(&self, target: K) -> bool {
        self.active.get(&target).is_some_and(|p| !p.is_empty())
    }

    pub fn is_idle(&self) -> bool {
        self.active.values().all(BTreeMap::is_empty)
    }

    /// Advance every tween to `now`.
    pub fn tick(&mut self, now: f64) -> Frame<K> {
        self.cancelled.sort_unstable();
        self.cancelled.dedup();
        let mut frame = Frame {
            dirty: Vec::new(),
            completed: Vec::new(),
            cancelled: std::mem::take(&mut self.cancelled),
        };
        for (target, props) in self.active.iter_mut() {
            if props.is_empty() {
                continue;
            }
            let style = self.styles.entry(*target).or_default();
            let mut changed = false;
            props.retain(|prop, a| {
                let elapsed = now - a.start;
                if elapsed < a.tween.delay {
                    return true;
                }
                style.set(*prop, lerp(a.from, a.to, a.tween.progress(elapsed)));
                changed = true;
                if a.tween.is_complete(elapsed) {
                    style.set(*prop, a.to);
                    frame.completed.push(a.id);
                    false
                } else {
                    true
                }
            });
            if changed {
                frame.dirty.push(*target);
            }
        }
        frame.completed.sort_unstable();
        frame.completed.dedup();
        // Tweens sharing an id complete together; report only when none remain.
        let still_running: Vec<TweenId> = self
            .active
            .values()
            .flat_map(|p| p.values().map(|a| a.id))
            .collect();
        frame.completed.retain(|id| !still_running.contains(id));
        self.active.retain(|_, p| !p.is_empty());
        frame
    }

    fn alloc_id(&mut self) -> TweenId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Record `id` as cancelled once no property of `slots` still runs it.
/// Ids are allocated per call and a call targets one key, so looking at the
/// target's own slots is enough.
fn retire(slots: &BTreeMap<Prop, Active>, id: TweenId, cancelled: &mut Vec<TweenId>) {
    if !slots.values().any(|a| a.id == id) {
        cancelled.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Ease;

    fn linear(d: f64) -> Tween {
        Tween::new(d).with_ease(Ease::None)
    }

    #[test]
    fn to_interpolates_from_current_value() {
        let mut m = Motion::new();
        m.set(1u32, Prop::X, 10.0);
        m.to(1, &[(Prop::X, 20.0)], linear(1.0), 0.0);
        m.tick(0.5);
        assert!((m.style(1).x - 15.0).abs() < 1e-9);
        let frame = m.tick(1.0);
        assert_eq!(m.style(1).x, 20.0);
        assert_eq!(frame.completed.len(), 1);
        assert!(m.is_idle());
    }

    #[test]
    fn new_tween_overwrites_running_one() {
        let mut m = Motion::new();
        let first = m.to(1u32, &[(Prop::X, 100.0)], linear(1.0), 0.0);
        m.tick(0.5);
        let second = m.to(1, &[(Prop::X, 0.0)], linear(1.0), 0.5);
        let frame = m.tick(1.0);
        assert!(!frame.completed.contains(&first));
        assert!((m.style(1).x - 25.0).abs() < 1e-9);
        let frame = m.tick(1.5);
        assert_eq!(frame.completed, vec![second]);
        assert_eq!(m.style(1).x, 0.0);
    }

    #[test]
    fn fully_overwritten_tween_is_reported_cancelled() {
        let mut m = Motion::new();
        let first = m.to(1u32, &[(Prop::X, 1.0), (Prop::Y, 1.0)], linear(1.0), 0.0);
        let second = m.to(1, &[(Prop::X, 5.0)], linear(1.0), 0.1);
        let frame = m.tick(0.2);
        assert!(frame.cancelled.is_empty(), "Y still runs the first tween");

        m.to(1, &[(Prop::Y, 5.0)], linear(1.0), 0.3);
        let frame = m.tick(0.4);
        assert_eq!(frame.cancelled, vec![first]);

        m.clear(1);
        let frame = m.tick(0.5);
        assert!(frame.cancelled.contains(&second));
        assert!(!frame.completed.contains(&first));
        assert!(m.tick(0.6).cancelled.is_empty());
    }

    #[test]
    fn set_cancels_the_tween_it_interrupts() {
        let mut m = Motion::new();
        let id = m.to(1u32, &[(Prop::Opacity, 0.0)], linear(1.0), 0.0);
        m.set(1, Prop::Opacity, 0.5);
        let frame = m.tick(2.0);
        assert_eq!(frame.cancelled, vec![id]);
        assert!(frame.completed.is_empty());
        assert_eq!(m.style(1).opacity, 0.5);
    }

    #[test]
    fn from_to_applies_start_state_immediately() {
        let mut m = Motion::new();
        m.from_to(7u32, &[(Prop::Opacity, 0.0, 1.0), (Prop::Y, 50.0, 0.0)], linear(1.0), 0.0);
        assert_eq!(m.style(7).opacity, 0.0);
        assert_eq!(m.style(7).y, 50.0);
    }

    #[test]
    fn delayed_tween_does_not_touch_style_early() {
        let mut m = Motion::new();
        m.to(1u32, &[(Prop::Opacity, 0.0)], linear(0.5).with_delay(2.0), 0.0);
        let frame = m.tick(1.0);
        assert!(frame.dirty.is_empty());
        assert_eq!(m.style(1).opacity, 1.0);
        m.tick(2.5);
        assert_eq!(m.style(1).opacity, 0.0);
    }

    #[test]
    fn multi_prop_tween_completes_once() {
        let mut m = Motion::new();
        let id = m.to(1u32, &[(Prop::X, 1.0), (Prop::Y, 1.0)], linear(0.2), 0.0);
        let frame = m.tick(0.3);
        assert_eq!(frame.completed, vec![id]);
        assert_eq!(frame.dirty, vec![1]);
    }

    #[test]
    fn zero_duration_tween_lands_on_next_tick() {
        let mut m = Motion::new();
        m.to(1u32, &[(Prop::X, 42.0)], Tween::new(0.0), 3.0);
        m.tick(3.0);
        assert_eq!(m.style(1).x, 42.0);
    }
}
