//! JS-facing entry points of the content script.
//!
//! # Responsibility
//! - Wire the browser adapters into the core drop pipeline.
//! - Keep the `createNote(title, body)` contract used by page scripts.
//!
//! # Invariants
//! - Exported functions never panic across the JS boundary.
//! - Drop outcomes reach the user through a notice, not a rejected promise;
//!   only missing host objects (window, document) reject.

use crate::clock::WebClock;
use crate::dom::WebDocument;
use crate::envelope::{result_json, settings_from_json};
use crate::file::WebFile;
use crate::logger;
use crate::notify::WebNotifier;
use crate::settings::LocalStorageSettings;
use dropnkeep_core::{
    load_settings, save_settings as save_settings_inner, seed_default_settings, ComposerDriver,
    DropImporter, EncodingResolver, NoteComposer, NoteRequest, NoteResult,
};
use log::info;
use wasm_bindgen::prelude::*;
use web_sys::FileList;

fn driver() -> Result<ComposerDriver<WebDocument, WebClock>, JsValue> {
    Ok(ComposerDriver::new(WebDocument::current()?, WebClock::new()))
}

/// Handles one drop: picks a file, decodes it, drives the composer and
/// shows the resulting alert or toast.
#[wasm_bindgen(js_name = importFiles)]
pub async fn import_files(files: FileList) -> Result<(), JsValue> {
    logger::install();
    let notifier = WebNotifier::current()?;
    let files = WebFile::from_list(&files);
    let settings = load_settings(&LocalStorageSettings);

    let importer = DropImporter::new(EncodingResolver::default(), driver()?);
    let outcome = importer.import(&files, &settings).await;
    outcome.notice().deliver(&notifier);
    Ok(())
}

/// Creates one note from already-decoded text.
///
/// Resolves to `{success: true}` or `{success: false, error}`; an empty body
/// is reported as a failure without touching the page.
#[wasm_bindgen(js_name = createNote)]
pub async fn create_note(title: String, body: String) -> Result<JsValue, JsValue> {
    logger::install();
    let result = match NoteRequest::new(title, body) {
        Ok(request) => driver()?.create_note(&request).await,
        Err(err) => NoteResult::failed(err.to_string()),
    };
    js_sys::JSON::parse(&result_json(&result))
}

/// Install-time seeding of missing settings keys.
///
/// Same origin rule as `saveSettings`.
#[wasm_bindgen(js_name = seedSettings)]
pub fn seed_settings() -> Result<(), JsValue> {
    logger::install();
    let seeded = seed_default_settings(&LocalStorageSettings)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    info!(
        "event=settings_seed module=web status=ok use_filename_as_title={} max_file_size_mb={}",
        seeded.use_filename_as_title, seeded.max_file_size_mb
    );
    Ok(())
}

/// Persists settings sent by the options page as a JSON object.
///
/// Writes to the `localStorage` of the calling page's origin. Call it from
/// the same origin that runs `importFiles`; a write from the extension's
/// own options page is not visible to a content script.
#[wasm_bindgen(js_name = saveSettings)]
pub fn save_settings(settings_json: &str) -> Result<(), JsValue> {
    logger::install();
    let settings = settings_from_json(settings_json).map_err(|err| JsValue::from_str(&err))?;
    save_settings_inner(&LocalStorageSettings, &settings)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}
