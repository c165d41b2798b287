//! Command implementations.
//!
//! # Responsibility
//! - Run core use cases against local files and the settings database.
//! - Keep stdout for results; notices and errors go to stderr.
//!
//! # Invariants
//! - `preview` never touches a foreign document; it only renders the
//!   request a drop would send.

use crate::local_file::LocalFile;
use dropnkeep_core::db::open_db;
use dropnkeep_core::{
    core_version, load_settings, save_settings, seed_default_settings, DropImporter,
    DropOutcome, EncodingResolver, ImportSettings, NoteComposer, NoteRequest, NoteResult,
    SqliteSettingsStore, TextResolver,
};
use futures::executor::block_on;
use log::info;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "dropnkeep_settings.sqlite3";
const DB_PATH_ENV: &str = "DROPNKEEP_DB_PATH";

/// `--db`, then `DROPNKEEP_DB_PATH`, then the temp dir.
pub fn resolve_db_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn with_settings_store<T>(
    db_path: &Path,
    f: impl FnOnce(&SqliteSettingsStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("settings DB open failed: {err}"))?;
    f(&SqliteSettingsStore::new(&conn))
}

pub fn decode(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
    let decoded = EncodingResolver::default().resolve(&bytes);
    Ok(format!(
        "encoding={}\n{}",
        decoded.encoding().label(),
        decoded.as_str()
    ))
}

/// Composer that records the request as JSON instead of automating a page.
#[derive(Debug, Default)]
pub struct PreviewComposer {
    rendered: RefCell<Option<String>>,
}

impl PreviewComposer {
    pub fn rendered(&self) -> Option<String> {
        self.rendered.borrow().clone()
    }
}

impl NoteComposer for PreviewComposer {
    async fn create_note(&self, request: &NoteRequest) -> NoteResult {
        match serde_json::to_string_pretty(request) {
            Ok(json) => {
                *self.rendered.borrow_mut() = Some(json);
                NoteResult::created()
            }
            Err(err) => NoteResult::failed(err.to_string()),
        }
    }
}

/// Outcome of `preview`: the rendered request, if any, and the notice text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReport {
    pub request_json: Option<String>,
    pub notice: String,
    pub accepted: bool,
}

pub fn preview(paths: &[PathBuf], settings: &ImportSettings) -> Result<PreviewReport, String> {
    let files = paths
        .iter()
        .map(|path| {
            LocalFile::open(path).map_err(|err| format!("cannot use `{}`: {err}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let importer = DropImporter::new(EncodingResolver::default(), PreviewComposer::default());
    let outcome = block_on(importer.import(&files, settings));
    Ok(PreviewReport {
        request_json: importer.composer().rendered(),
        notice: outcome.notice().message().to_string(),
        accepted: matches!(outcome, DropOutcome::Completed(ref result) if result.success),
    })
}

pub fn preview_with_stored_settings(
    db_path: &Path,
    paths: &[PathBuf],
) -> Result<PreviewReport, String> {
    let settings = with_settings_store(db_path, |store| Ok(load_settings(store)))?;
    preview(paths, &settings)
}

pub fn show_settings(db_path: &Path) -> Result<String, String> {
    let settings = with_settings_store(db_path, |store| Ok(load_settings(store)))?;
    serde_json::to_string_pretty(&settings).map_err(|err| err.to_string())
}

pub fn update_settings(
    db_path: &Path,
    update: impl FnOnce(&mut ImportSettings),
) -> Result<ImportSettings, String> {
    with_settings_store(db_path, |store| {
        let mut settings = load_settings(store);
        update(&mut settings);
        save_settings(store, &settings).map_err(|err| err.to_string())?;
        info!(
            "event=settings_save module=cli status=ok use_filename_as_title={} max_file_size_mb={}",
            settings.use_filename_as_title, settings.max_file_size_mb
        );
        Ok(settings)
    })
}

pub fn seed_settings(db_path: &Path) -> Result<ImportSettings, String> {
    with_settings_store(db_path, |store| {
        seed_default_settings(store).map_err(|err| err.to_string())
    })
}

pub fn version() -> String {
    format!("dropnkeep {}", core_version())
}

#[cfg(test)]
mod tests {
    use super::{decode, preview, resolve_db_path, seed_settings, show_settings, update_settings};
    use dropnkeep_core::ImportSettings;
    use std::path::Path;

    #[test]
    fn explicit_db_flag_wins() {
        assert_eq!(
            resolve_db_path(Some(Path::new("/data/settings.db"))),
            Path::new("/data/settings.db")
        );
    }

    #[test]
    fn decode_reports_fallback_encoding() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sjis.txt");
        std::fs::write(&path, [0x93, 0xFA, 0x96, 0x7B]).expect("write file");

        let output = decode(&path).expect("decode");
        assert_eq!(output, "encoding=shift_jis\n日本");
    }

    #[test]
    fn preview_renders_request_for_text_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let image = dir.path().join("cover.png");
        let text = dir.path().join("Packing.txt");
        std::fs::write(&image, b"\x89PNG").expect("write image");
        std::fs::write(&text, "socks\ntent").expect("write text");

        let report = preview(&[image, text], &ImportSettings::default()).expect("preview");

        assert!(report.accepted);
        assert_eq!(report.notice, "Note created successfully");
        let json: serde_json::Value =
            serde_json::from_str(&report.request_json.expect("rendered request"))
                .expect("valid json");
        assert_eq!(json, serde_json::json!({ "title": "Packing", "body": "socks\ntent" }));
    }

    #[test]
    fn preview_rejects_oversized_file_without_request() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'a'; 1024 * 1024 + 1]).expect("write file");
        let settings = ImportSettings {
            max_file_size_mb: 1,
            ..ImportSettings::default()
        };

        let report = preview(&[path], &settings).expect("preview");

        assert!(!report.accepted);
        assert_eq!(report.request_json, None);
        assert_eq!(report.notice, "File is too large (max 1MB)");
    }

    #[test]
    fn settings_round_trip_through_database() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = dir.path().join("settings.db");

        let seeded = seed_settings(&db).expect("seed");
        assert_eq!(seeded, ImportSettings::default());

        let updated = update_settings(&db, |settings| settings.max_file_size_mb = 2)
            .expect("update");
        assert_eq!(updated.max_file_size_mb, 2);

        let shown: serde_json::Value =
            serde_json::from_str(&show_settings(&db).expect("show")).expect("valid json");
        assert_eq!(
            shown,
            serde_json::json!({ "useFilenameAsTitle": true, "maxFileSizeMB": 2 })
        );
    }
}
