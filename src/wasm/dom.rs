use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::cursor::Rect;
use crate::error::{SiteError, SiteResult};
use crate::scroll::Region;
use crate::tween::{Prop, StyleState};

pub fn window() -> SiteResult<Window> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document(window: &Window) -> SiteResult<Document> {
    window.document().ok_or(SiteError::NoDocument)
}

/// First match as an `HtmlElement`; a bad selector counts as no match.
pub fn query(root: &Document, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

pub fn query_all(root: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Seconds since page load.
pub fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now() / 1000.0).unwrap_or(0.0)
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

pub fn viewport(window: &Window) -> (f64, f64) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

pub fn client_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect { left: r.left(), top: r.top(), width: r.width(), height: r.height() }
}

/// Layout box in document coordinates, ignoring any transform we applied.
pub fn region(el: &HtmlElement) -> Region {
    let mut top = 0.0;
    let mut node: Option<HtmlElement> = Some(el.clone());
    while let Some(n) = node {
        top += n.offset_top() as f64;
        node = n.offset_parent().and_then(|p| p.dyn_into::<HtmlElement>().ok());
    }
    Region { top, height: el.offset_height() as f64 }
}

pub fn apply_style(el: &HtmlElement, style: &StyleState) {
    let css = el.style();
    let _ = css.set_property("transform", &style.transform_css());
    let _ = css.set_property("opacity", &style.opacity_css());
    if let Some(ls) = style.letter_spacing_css() {
        let _ = css.set_property("letter-spacing", &ls);
    }
}

/// Value `prop` has under the element's computed style. Read this before
/// writing any inline style, or it reads back our own value.
pub fn resting_value(window: &Window, el: &Element, prop: Prop) -> Option<f64> {
    let style = window.get_computed_style(el).ok().flatten()?;
    let css = style.get_property_value(StyleState::css_property(prop)).ok()?;
    StyleState::parse_computed(prop, &css)
}

/// Remove every inline property `apply_style` may have written.
pub fn clear_style(el: &HtmlElement) {
    let css = el.style();
    for prop in ["transform", "opacity", "letter-spacing"] {
        let _ = css.remove_property(prop);
    }
}

/// An event listener removed when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        f: impl FnMut(Event) + 'static,
    ) -> SiteResult<Self> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}
