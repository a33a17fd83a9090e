#![cfg(target_arch = "wasm32")]

use folio_wasm::motion::Motion;
use folio_wasm::timeline::{DisplayField, DisplaySink, FieldStyle};
use folio_wasm::tween::{settle_from, Prop, Tween};
use folio_wasm::wasm::{mount, resting_value, DisplayTarget};
use folio_wasm::{ContentStore, DisplayController, IndexSet, SiteConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const FIXTURE: &str = r#"
    <div class="year-display">2019</div>
    <div class="timeline-role">Web Developer</div>
    <div class="timeline-company">Freelance</div>
    <p class="timeline-desc">Old text</p>
"#;

fn fixture(html: &str) -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    host.set_inner_html(html);
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn text(selector: &str) -> String {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .query_selector(selector)
        .unwrap()
        .expect("fixture element")
        .text_content()
        .unwrap_or_default()
}

#[wasm_bindgen_test]
fn display_target_needs_all_four_fields() {
    let host = fixture(r#"<div class="year-display">2019</div>"#);
    let document = web_sys::window().unwrap().document().unwrap();
    assert!(DisplayTarget::find(&document).is_none());
    host.remove();
}

#[wasm_bindgen_test]
fn display_target_writes_text_and_style() {
    let host = fixture(FIXTURE);
    let document = web_sys::window().unwrap().document().unwrap();
    let mut target = DisplayTarget::find(&document).expect("complete fixture");

    target.set_text(DisplayField::Company, "Creative Agency");
    target.set_style(DisplayField::Role, FieldStyle { opacity: 0.5, y: -10.0 });

    assert_eq!(text(".timeline-company"), "Creative Agency");
    let style = target.element(DisplayField::Role).style();
    assert_eq!(style.get_property_value("opacity").unwrap(), "0.5");
    assert!(style
        .get_property_value("transform")
        .unwrap()
        .contains("-10px"));
    host.remove();
}

#[wasm_bindgen_test]
fn controller_drives_dom_fields() {
    let host = fixture(FIXTURE);
    let document = web_sys::window().unwrap().document().unwrap();
    let target = DisplayTarget::find(&document).expect("complete fixture");
    let cfg = SiteConfig::default();
    let mut controller = DisplayController::new(
        IndexSet::new(["2019", "2021", "2023"]),
        ContentStore::new(cfg.timeline.clone()),
        target,
        cfg.transition,
    );

    assert!(controller.on_progress(1.0, 0.0));
    controller.tick(0.2);
    assert_eq!(text(".year-display"), "2019", "no swap mid fade-out");
    controller.tick(0.5);
    assert_eq!(text(".year-display"), "2023");
    assert_eq!(text(".timeline-role"), "Senior Full Stack Dev");
    controller.tick(2.0);
    assert_eq!(controller.current_year(), Some("2023"));
    let style = controller.sink().element(DisplayField::Description).style();
    assert_eq!(style.get_property_value("opacity").unwrap(), "1");
    host.remove();
}

#[wasm_bindgen_test]
fn from_reveal_settles_at_stylesheet_value() {
    let host = fixture(
        r#"<style>
            .timeline-item { opacity: 0.4; }
            .hero-subtitle { letter-spacing: 2px; }
        </style>
        <li class="timeline-item" data-year="2019">2019</li>
        <p class="hero-subtitle">Developer</p>"#,
    );
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let item = document.query_selector(".timeline-item").unwrap().unwrap();
    let subtitle = document.query_selector(".hero-subtitle").unwrap().unwrap();

    assert_eq!(resting_value(&window, &item, Prop::Opacity), Some(0.4));
    assert_eq!(resting_value(&window, &subtitle, Prop::LetterSpacing), Some(2.0));

    let rest = |p| resting_value(&window, &item, p).unwrap_or(1.0);
    let props = settle_from(&[(Prop::Opacity, 0.0), (Prop::Y, 50.0)], rest);
    let mut motion = Motion::new();
    motion.from_to(0usize, &props, Tween::new(1.0), 0.0);
    motion.tick(2.0);
    assert_eq!(motion.style(0).opacity_css(), "0.4");
    assert_eq!(motion.style(0).y, 0.0);
    host.remove();
}

#[wasm_bindgen_test]
fn frame_loop_restarts_on_pageshow() {
    let window = web_sys::window().unwrap();
    let page = mount(window.clone()).expect("mount");
    assert!(page.borrow().is_running());

    page.borrow_mut().halt();
    assert!(!page.borrow().is_running());

    let show = web_sys::Event::new("pageshow").unwrap();
    window.dispatch_event(&show).unwrap();
    assert!(page.borrow().is_running());

    page.borrow_mut().teardown();
    assert!(!page.borrow().is_running());
}
