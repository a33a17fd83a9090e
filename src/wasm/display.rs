use web_sys::{Document, HtmlElement};

use super::dom;
use crate::timeline::{DisplayField, DisplaySink, FieldStyle};
use crate::tween::StyleState;

pub const YEAR_SELECTOR: &str = ".year-display";
pub const ROLE_SELECTOR: &str = ".timeline-role";
pub const COMPANY_SELECTOR: &str = ".timeline-company";
pub const DESC_SELECTOR: &str = ".timeline-desc";

/// The four timeline fields. Built only when all four exist, so the
/// controller never drives a partial display.
#[derive(Debug, Clone)]
pub struct DisplayTarget {
    year: HtmlElement,
    role: HtmlElement,
    company: HtmlElement,
    description: HtmlElement,
}

impl DisplayTarget {
    pub fn find(document: &Document) -> Option<Self> {
        Some(Self {
            year: dom::query(document, YEAR_SELECTOR)?,
            role: dom::query(document, ROLE_SELECTOR)?,
            company: dom::query(document, COMPANY_SELECTOR)?,
            description: dom::query(document, DESC_SELECTOR)?,
        })
    }

    pub fn element(&self, field: DisplayField) -> &HtmlElement {
        match field {
            DisplayField::Year => &self.year,
            DisplayField::Role => &self.role,
            DisplayField::Company => &self.company,
            DisplayField::Description => &self.description,
        }
    }
}

impl DisplaySink for DisplayTarget {
    fn set_style(&mut self, field: DisplayField, style: FieldStyle) {
        let state = StyleState { opacity: style.opacity, y: style.y, ..StyleState::default() };
        dom::apply_style(self.element(field), &state);
    }

    fn set_text(&mut self, field: DisplayField, text: &str) {
        self.element(field).set_text_content(Some(text));
    }
}
