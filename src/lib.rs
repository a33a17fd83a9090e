#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Animated single-page portfolio, compiled to WebAssembly.
//!
//! Everything that decides *what* moves and *when* lives in host-testable
//! modules driven by an explicit clock. The `wasm` module binds them to the
//! DOM, the scroll position and a WebGL2 canvas.

pub mod log;

pub mod config;
pub mod cursor;
pub mod ease;
pub mod error;
pub mod gallery;
pub mod motion;
pub mod particles;
pub mod preloader;
pub mod reveals;
pub mod scroll;
pub mod timeline;
pub mod tween;

pub use config::SiteConfig;
pub use error::{SiteError, SiteResult};
pub use timeline::{select_index, ContentStore, DisplayController, IndexSet, TimelineEntry};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    mod dom;
    mod page;
    mod render;

    pub mod display;

    pub use display::DisplayTarget;
    pub use dom::resting_value;
    pub use page::{mount, Page};

    thread_local! {
        static PAGE: RefCell<Option<Rc<RefCell<Page>>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let window = dom::window()?;
        let page = page::mount(window)?;
        PAGE.with(|p| *p.borrow_mut() = Some(page));
        crate::log_info!("page mounted");
        Ok(())
    }

    /// Stop animations and detach listeners, e.g. before swapping the page
    /// out in a client-side router.
    #[wasm_bindgen]
    pub fn teardown() {
        if let Some(page) = PAGE.with(|p| p.borrow_mut().take()) {
            if let Ok(mut page) = page.try_borrow_mut() {
                page.teardown();
            }
        }
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
