#![forbid(unsafe_code)]

//! Browser host for DropNKeep.
//!
//! Adapts the live page, the browser timer, dropped `File` objects and
//! `localStorage` onto the core traits and exports the JS-callable entry
//! points. Off `wasm32` only the host-independent helpers compile, so a
//! native workspace build stays green.

mod envelope;

#[cfg(target_arch = "wasm32")]
mod api;
#[cfg(target_arch = "wasm32")]
mod clock;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod file;
#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod notify;
#[cfg(target_arch = "wasm32")]
mod settings;

pub use envelope::{console_line, result_json, settings_from_json, TOAST_DURATION};

#[cfg(target_arch = "wasm32")]
pub use api::{create_note, import_files, save_settings, seed_settings};
#[cfg(target_arch = "wasm32")]
pub use clock::WebClock;
#[cfg(target_arch = "wasm32")]
pub use dom::WebDocument;
#[cfg(target_arch = "wasm32")]
pub use file::WebFile;
#[cfg(target_arch = "wasm32")]
pub use notify::WebNotifier;
#[cfg(target_arch = "wasm32")]
pub use settings::LocalStorageSettings;
