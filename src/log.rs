//! Console logging.
//!
//! On wasm32 these forward to `console.*`; host builds (unit tests, the dev
//! server helper) compile them away.

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub fn emit(level: Level, msg: &str) {
    let v = wasm_bindgen::JsValue::from_str(msg);
    match level {
        Level::Debug => web_sys::console::debug_1(&v),
        Level::Info => web_sys::console::log_1(&v),
        Level::Warn => web_sys::console::warn_1(&v),
        Level::Error => web_sys::console::error_1(&v),
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[doc(hidden)]
pub fn emit(_level: Level, _msg: &str) {}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Debug, &format!("[folio] {}", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Info, &format!("[folio] {}", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Warn, &format!("[folio] {}", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::Error, &format!("[folio] {}", format_args!($($arg)*)))
    };
}
