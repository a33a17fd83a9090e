//! Wires the page's DOM to the animation state and runs the frame loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, Event, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::display::DisplayTarget;
use super::dom::{self, Listener};
use super::render::ParticleRenderer;
use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
use crate::cursor::{self, Cursor, CursorPart, Request};
use crate::error::SiteResult;
use crate::gallery::{self, Gallery};
use crate::motion::{Motion, TweenId};
use crate::preloader::{Action, Intro, IntroTarget};
use crate::reveals::{self, Counter, RevealSpec};
use crate::scroll::{Reveal, ScrollTrigger};
use crate::timeline::{DisplayController, IndexSet};
use crate::tween::{settle_from, Prop, StyleState};

/// Index into `Page::elements`.
type ElemId = usize;

/// Deferred work attached to a tween's completion.
enum OnComplete {
    ClearStyle(ElemId),
}

struct IntroRun {
    intro: Intro,
    started: f64,
    counter: Option<HtmlElement>,
    targets: HashMap<IntroTarget, ElemId>,
}

struct CursorRig {
    cursor: Cursor,
    dot: Option<ElemId>,
    follower: Option<ElemId>,
}

struct RevealRun {
    spec: RevealSpec,
    trigger: ScrollTrigger,
    section: HtmlElement,
    targets: Vec<ElemId>,
    latch: Reveal,
}

struct CounterRun {
    trigger: ScrollTrigger,
    section: HtmlElement,
    counters: Vec<(HtmlElement, Counter)>,
    latch: Reveal,
    started: Option<f64>,
}

struct GalleryRun {
    gallery: Gallery,
    container: HtmlElement,
    slides: Vec<HtmlElement>,
    last_x: Option<f64>,
}

struct TimelineRun {
    controller: DisplayController<DisplayTarget>,
    trigger: ScrollTrigger,
    section: HtmlElement,
}

pub struct Page {
    window: Window,
    document: Document,
    config: SiteConfig,
    elements: Vec<HtmlElement>,
    /// Stylesheet value of each property a "from" animation returns to.
    rest: HashMap<(ElemId, Prop), f64>,
    motion: Motion<ElemId>,
    on_complete: HashMap<TweenId, OnComplete>,
    intro: Option<IntroRun>,
    cursor: Option<CursorRig>,
    reveals: Vec<RevealRun>,
    counters: Option<CounterRun>,
    gallery: Option<GalleryRun>,
    timeline: Option<TimelineRun>,
    particles: Option<ParticleRenderer>,
    listeners: Vec<Listener>,
    frame: Option<FrameLoop>,
}

struct FrameLoop {
    handle: i32,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl Page {
    /// Read the config and find what this page variant contains. Features
    /// whose markup is absent are skipped.
    pub fn new(window: Window) -> SiteResult<Self> {
        let document = dom::document(&window)?;
        let config_json = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|e| e.text_content());
        let config = SiteConfig::load_or_default(config_json.as_deref());
        let now = dom::now(&window);

        let mut page = Self {
            window,
            document,
            config,
            elements: Vec::new(),
            rest: HashMap::new(),
            motion: Motion::new(),
            on_complete: HashMap::new(),
            intro: None,
            cursor: None,
            reveals: Vec::new(),
            counters: None,
            gallery: None,
            timeline: None,
            particles: None,
            listeners: Vec::new(),
            frame: None,
        };

        page.setup_intro(now);
        page.setup_cursor();
        page.setup_reveals();
        page.setup_counters();
        page.setup_gallery();
        page.setup_timeline();
        page.setup_particles(now);
        page.on_scroll();
        Ok(page)
    }

    /// Same element, same id: one style state per element.
    fn register(&mut self, el: HtmlElement) -> ElemId {
        if let Some(id) = self.elements.iter().position(|e| *e == el) {
            return id;
        }
        self.elements.push(el);
        self.elements.len() - 1
    }

    /// Record the computed value of each prop not seen yet for `id`. Must
    /// run before the element's first inline write.
    fn capture_rest(&mut self, id: ElemId, props: &[(Prop, f64)]) {
        for &(prop, _) in props {
            if self.rest.contains_key(&(id, prop)) {
                continue;
            }
            if let Some(v) = dom::resting_value(&self.window, &self.elements[id], prop) {
                self.rest.insert((id, prop), v);
            }
        }
    }

    fn setup_intro(&mut self, now: f64) {
        let intro = Intro::new(&self.config.preloader);
        let mut targets = HashMap::new();
        for cue in intro.cues() {
            if let Some(t) = cue.step.target {
                if let Some(el) = dom::query(&self.document, t.selector()) {
                    let id = self.register(el);
                    if let Action::From(props) = &cue.step.action {
                        self.capture_rest(id, props);
                    }
                    targets.insert(t, id);
                }
            }
        }
        for (t, props) in intro.initial_states() {
            if let Some(&id) = targets.get(&t) {
                for &(prop, v) in props {
                    self.motion.set(id, prop, v);
                }
                dom::apply_style(&self.elements[id], &self.motion.style(id));
            }
        }
        let counter = dom::query(&self.document, ".counter");
        self.intro = Some(IntroRun { intro, started: now, counter, targets });
    }

    fn setup_cursor(&mut self) {
        let dot = dom::query(&self.document, ".cursor").map(|e| self.register(e));
        let follower = dom::query(&self.document, ".cursor-follower").map(|e| self.register(e));
        self.cursor = Some(CursorRig { cursor: Cursor::new(self.config.cursor), dot, follower });
    }

    fn setup_reveals(&mut self) {
        for spec in reveals::reveal_specs() {
            let Some(section) = dom::query(&self.document, spec.trigger) else {
                crate::log_debug!("no {} on this page", spec.trigger);
                continue;
            };
            let trigger = match ScrollTrigger::new(spec.start) {
                Ok(t) => t,
                Err(e) => {
                    crate::log_warn!("reveal {}: {e}", spec.targets);
                    continue;
                }
            };
            let mut targets = Vec::new();
            for el in dom::query_all(&self.document, spec.targets) {
                let id = self.register(el);
                self.capture_rest(id, spec.from);
                for &(prop, v) in spec.from {
                    self.motion.set(id, prop, v);
                }
                dom::apply_style(&self.elements[id], &self.motion.style(id));
                targets.push(id);
            }
            self.reveals.push(RevealRun { spec, trigger, section, targets, latch: Reveal::default() });
        }
    }

    fn setup_counters(&mut self) {
        let Some(section) = dom::query(&self.document, reveals::COUNTER_TRIGGER) else {
            return;
        };
        let Ok(trigger) = ScrollTrigger::new(reveals::COUNTER_START) else {
            return;
        };
        let counters = dom::query_all(&self.document, reveals::COUNTER_SELECTOR)
            .into_iter()
            .map(|el| {
                let c = Counter::from_attr(el.get_attribute(reveals::COUNTER_VALUE_ATTR).as_deref());
                (el, c)
            })
            .collect();
        self.counters = Some(CounterRun { trigger, section, counters, latch: Reveal::default(), started: None });
    }

    fn setup_gallery(&mut self) {
        self.gallery = None;
        let (Some(container), Some(track)) = (
            dom::query(&self.document, gallery::CONTAINER_SELECTOR),
            dom::query(&self.document, gallery::TRACK_SELECTOR),
        ) else {
            return;
        };
        let slides = dom::query_all(&self.document, gallery::SLIDE_SELECTOR);
        let (_, vh) = dom::viewport(&self.window);
        let built = Gallery::new(
            slides.len(),
            dom::region(&container),
            track.offset_width() as f64,
            vh,
            self.config.gallery.scrub_lag,
        );
        match built {
            Ok(g) => {
                let _ = container
                    .style()
                    .set_property("margin-bottom", &format!("{}px", g.spacer()));
                self.gallery = Some(GalleryRun { gallery: g, container, slides, last_x: None });
            }
            Err(e) => crate::log_warn!("gallery disabled: {e}"),
        }
    }

    fn setup_timeline(&mut self) {
        let Some(section) = dom::query(&self.document, reveals::TIMELINE_SECTION) else {
            return;
        };
        let Some(target) = DisplayTarget::find(&self.document) else {
            crate::log_debug!("timeline display markup incomplete; display disabled");
            return;
        };
        let Ok(trigger) = ScrollTrigger::between(reveals::TIMELINE_START, reveals::TIMELINE_END) else {
            return;
        };
        let years = dom::query_all(&self.document, reveals::TIMELINE_ITEM)
            .into_iter()
            .map(|el| el.get_attribute("data-year").unwrap_or_default());
        let controller = DisplayController::new(
            IndexSet::new(years),
            self.config.content_store(),
            target,
            self.config.transition,
        );
        self.timeline = Some(TimelineRun { controller, trigger, section });
    }

    fn setup_particles(&mut self, now: f64) {
        let Some(canvas) = self
            .document
            .get_element_by_id("bg-canvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            return;
        };
        match ParticleRenderer::new(canvas, self.config.particles, now) {
            Ok(mut r) => {
                let (w, h) = dom::viewport(&self.window);
                r.resize(w, h, self.window.device_pixel_ratio());
                self.particles = Some(r);
            }
            Err(e) => crate::log_warn!("particle background disabled: {e}"),
        }
    }

    fn start(&mut self, target: ElemId, req: &Request<impl Sized>, now: f64) -> TweenId {
        self.motion.to(target, &req.props, req.tween, now)
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        let now = dom::now(&self.window);
        if let Some(rig) = &self.cursor {
            let parts = [(rig.dot, CursorPart::Dot), (rig.follower, CursorPart::Follower)];
            let reqs = rig.cursor.pointer_moved(x, y);
            for req in reqs {
                let id = parts.iter().find(|(_, p)| *p == req.target).and_then(|(id, _)| *id);
                if let Some(id) = id {
                    self.start(id, &req, now);
                }
            }
        }
        if let Some(r) = self.particles.as_mut() {
            let (w, h) = dom::viewport(&self.window);
            let (nx, ny) = cursor::normalized_pointer(x, y, w, h);
            r.set_pointer(nx, ny);
        }
    }

    fn hover_changed(&mut self, el: ElemId, entered: bool) {
        let now = dom::now(&self.window);
        let Some(rig) = &self.cursor else { return };
        let cursor = rig.cursor;
        let follower = rig.follower;
        if let Some(f) = follower {
            let classes = self.elements[f].class_list();
            let _ = if entered {
                classes.add_1(cursor::ACTIVE_CLASS)
            } else {
                classes.remove_1(cursor::ACTIVE_CLASS)
            };
        }
        if entered {
            if let Some(f) = follower {
                self.start(f, &cursor.hover_started(), now);
            }
        } else {
            let (shrink, release) = cursor.hover_ended();
            if let Some(f) = follower {
                self.start(f, &shrink, now);
            }
            self.start(el, &release, now);
        }
    }

    fn magnetic_moved(&mut self, el: ElemId, x: f64, y: f64) {
        let Some(rig) = &self.cursor else { return };
        let rect = dom::client_rect(&self.elements[el]);
        let req = rig.cursor.magnetic_moved(rect, x, y);
        let now = dom::now(&self.window);
        self.start(el, &req, now);
    }

    fn on_scroll(&mut self) {
        let now = dom::now(&self.window);
        let scroll = dom::scroll_y(&self.window);
        let (_, vh) = dom::viewport(&self.window);

        for run in self.reveals.iter_mut() {
            let range = run.trigger.range(dom::region(&run.section), vh);
            if !run.latch.check(&range, scroll) {
                continue;
            }
            let batch = run.spec.batch_for(run.targets.len());
            for (i, &id) in run.targets.iter().enumerate() {
                let props = settle_from(run.spec.from, |p| rest_of(&self.rest, id, p));
                let tween = batch.tween.with_delay(batch.tween.delay + batch.offset(i));
                let tid = self.motion.from_to(id, &props, tween, now);
                if run.spec.clear_after {
                    self.on_complete.insert(tid, OnComplete::ClearStyle(id));
                }
            }
        }

        if let Some(c) = self.counters.as_mut() {
            let range = c.trigger.range(dom::region(&c.section), vh);
            if c.latch.check(&range, scroll) {
                c.started = Some(now);
            }
        }

        if let Some(t) = self.timeline.as_mut() {
            let progress = t.trigger.range(dom::region(&t.section), vh).progress(scroll);
            t.controller.on_progress(progress, now);
        }
    }

    fn on_resize(&mut self) {
        let (w, h) = dom::viewport(&self.window);
        if let Some(r) = self.particles.as_mut() {
            r.resize(w, h, self.window.device_pixel_ratio());
        }
        // Pin distance depends on the track width.
        self.setup_gallery();
        self.on_scroll();
    }

    fn render_frame(&mut self) {
        let now = dom::now(&self.window);
        self.step_intro(now);
        self.step_counters(now);
        self.step_gallery(now);

        let frame = self.motion.tick(now);
        for id in frame.dirty {
            dom::apply_style(&self.elements[id], &self.motion.style(id));
        }
        for tid in frame.completed {
            if let Some(OnComplete::ClearStyle(id)) = self.on_complete.remove(&tid) {
                self.motion.clear(id);
                dom::clear_style(&self.elements[id]);
            }
        }
        for tid in frame.cancelled {
            self.on_complete.remove(&tid);
        }

        if let Some(t) = self.timeline.as_mut() {
            t.controller.tick(now);
        }
        if let Some(r) = &self.particles {
            r.draw(now);
        }
    }

    fn step_intro(&mut self, now: f64) {
        let Some(run) = self.intro.as_mut() else { return };
        let elapsed = now - run.started;
        if let Some(el) = &run.counter {
            el.set_text_content(Some(&run.intro.counter(elapsed).to_string()));
        }
        let due: Vec<_> = run.intro.advance(elapsed).to_vec();
        let targets = run.targets.clone();
        let finished = run.intro.is_done() && run.intro.counter_done(elapsed);
        let start = run.started;
        for cue in due {
            let id = cue.step.target.and_then(|t| targets.get(&t).copied());
            // Run as if started on schedule even if this frame is late.
            let at = start + cue.start;
            match (&cue.step.action, id) {
                (Action::To(props), Some(id)) => {
                    self.motion.to(id, props, cue.step.tween, at);
                }
                (Action::From(props), Some(id)) => {
                    let props = settle_from(props, |p| rest_of(&self.rest, id, p));
                    let tid = self.motion.from_to(id, &props, cue.step.tween, at);
                    self.on_complete.insert(tid, OnComplete::ClearStyle(id));
                }
                (Action::Finish, _) => {
                    if let Some(body) = self.document.body() {
                        let _ = body.class_list().remove_1("loading");
                    }
                    crate::log_info!("intro finished");
                }
                _ => {}
            }
        }
        if finished {
            self.intro = None;
        }
    }

    fn step_counters(&mut self, now: f64) {
        let Some(run) = self.counters.as_mut() else { return };
        let Some(started) = run.started else { return };
        let elapsed = now - started;
        for (el, c) in &run.counters {
            el.set_text_content(Some(&c.value_at(elapsed).to_string()));
        }
        if run.counters.iter().all(|(_, c)| c.is_complete(elapsed)) {
            self.counters = None;
        }
    }

    fn step_gallery(&mut self, now: f64) {
        let Some(run) = self.gallery.as_mut() else { return };
        let scroll = dom::scroll_y(&self.window);
        let f = run.gallery.frame(scroll, now);
        let pin = StyleState { y: f.pin_offset, ..StyleState::default() };
        let _ = run.container.style().set_property("transform", &pin.transform_css());
        if run.last_x != Some(f.x_percent) {
            let slide = StyleState { x_percent: f.x_percent, ..StyleState::default() };
            let css = slide.transform_css();
            for s in &run.slides {
                let _ = s.style().set_property("transform", &css);
            }
            run.last_x = Some(f.x_percent);
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    /// Stop the frame loop and abandon running transitions.
    pub fn halt(&mut self) {
        if let Some(f) = self.frame.take() {
            let _ = self.window.cancel_animation_frame(f.handle);
            f.callback.borrow_mut().take();
        }
        if let Some(t) = self.timeline.as_mut() {
            t.controller.cancel();
        }
    }

    /// `halt`, then detach every listener. Must not be called from inside
    /// one of the page's own event handlers.
    pub fn teardown(&mut self) {
        self.halt();
        self.listeners.clear();
        crate::log_info!("page torn down");
    }
}

/// Build the page, attach listeners and start the frame loop.
pub fn mount(window: Window) -> SiteResult<Rc<RefCell<Page>>> {
    let page = Rc::new(RefCell::new(Page::new(window.clone())?));
    let document = page.borrow().document.clone();

    let mut listeners = Vec::new();

    listeners.push(Listener::new(&document, "mousemove", on(&page, |p, e| {
        if let Some(m) = e.dyn_ref::<MouseEvent>() {
            p.pointer_moved(m.client_x() as f64, m.client_y() as f64);
        }
    }))?);
    listeners.push(Listener::new(&window, "scroll", on(&page, |p, _| p.on_scroll()))?);
    listeners.push(Listener::new(&window, "resize", on(&page, |p, _| p.on_resize()))?);
    listeners.push(Listener::new(&window, "pagehide", on(&page, |p, _| p.halt()))?);
    let weak = Rc::downgrade(&page);
    listeners.push(Listener::new(&window, "pageshow", move |_| {
        let Some(page) = weak.upgrade() else { return };
        if let Err(e) = resume(&page) {
            crate::log_error!("could not resume after pageshow: {e}");
        }
    })?);

    let hover: Vec<(ElemId, HtmlElement)> = dom::query_all(&document, cursor::HOVER_SELECTOR)
        .into_iter()
        .map(|el| {
            let id = page.borrow_mut().register(el.clone());
            (id, el)
        })
        .collect();
    for (id, el) in hover {
        listeners.push(Listener::new(&el, "mouseenter", on(&page, move |p, _| p.hover_changed(id, true)))?);
        listeners.push(Listener::new(&el, "mouseleave", on(&page, move |p, _| p.hover_changed(id, false)))?);
        if el.class_list().contains(cursor::MAGNETIC_CLASS) {
            listeners.push(Listener::new(&el, "mousemove", on(&page, move |p, e| {
                if let Some(m) = e.dyn_ref::<MouseEvent>() {
                    p.magnetic_moved(id, m.client_x() as f64, m.client_y() as f64);
                }
            }))?);
        }
    }
    page.borrow_mut().listeners = listeners;

    start_frames(&page)?;
    Ok(page)
}

/// Restart the frame loop after `halt`, e.g. when the page comes back from
/// the back/forward cache. No-op while the loop runs.
pub fn resume(page: &Rc<RefCell<Page>>) -> SiteResult<()> {
    let halted = page.try_borrow().is_ok_and(|p| p.frame.is_none());
    if !halted {
        return Ok(());
    }
    start_frames(page)?;
    if let Ok(mut p) = page.try_borrow_mut() {
        p.on_scroll();
    }
    crate::log_debug!("frame loop resumed");
    Ok(())
}

fn rest_of(rest: &HashMap<(ElemId, Prop), f64>, id: ElemId, prop: Prop) -> f64 {
    rest.get(&(id, prop))
        .copied()
        .unwrap_or_else(|| StyleState::default().get(prop))
}

/// Event handler that borrows the page. A handler firing while the page is
/// already borrowed drops the event.
fn on(
    page: &Rc<RefCell<Page>>,
    mut f: impl FnMut(&mut Page, &Event) + 'static,
) -> impl FnMut(Event) + 'static {
    let weak: Weak<RefCell<Page>> = Rc::downgrade(page);
    move |e: Event| {
        let Some(page) = weak.upgrade() else { return };
        let Ok(mut p) = page.try_borrow_mut() else { return };
        f(&mut p, &e);
    }
}

fn start_frames(page: &Rc<RefCell<Page>>) -> SiteResult<()> {
    // `callback` holds the animation-frame closure so it can re-register
    // itself each frame.
    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let inner = callback.clone();
    let weak = Rc::downgrade(page);
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(page) = weak.upgrade() else { return };
        let Ok(mut p) = page.try_borrow_mut() else { return };
        if p.frame.is_none() {
            return;
        }
        p.render_frame();
        let next = inner
            .borrow()
            .as_ref()
            .map(|cb| p.window.request_animation_frame(cb.as_ref().unchecked_ref()));
        match (next, p.frame.as_mut()) {
            (Some(Ok(handle)), Some(f)) => f.handle = handle,
            (Some(Err(e)), _) => crate::log_error!("frame loop stopped: {e:?}"),
            _ => {}
        }
    }) as Box<dyn FnMut()>));

    let handle = {
        let p = page.borrow();
        let cb = callback.borrow();
        let Some(cb) = cb.as_ref() else { return Ok(()) };
        p.window.request_animation_frame(cb.as_ref().unchecked_ref())?
    };
    page.borrow_mut().frame = Some(FrameLoop { handle, callback });
    Ok(())
}
