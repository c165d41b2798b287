//! Host-independent shaping of values crossing the JS boundary.

use dropnkeep_core::{ImportSettings, NoteResult};
use log::Record;
use std::time::Duration;

/// How long a toast stays on screen before it starts fading out.
pub const TOAST_DURATION: Duration = Duration::from_millis(2500);

/// JSON text of a composer outcome: `{"success":true}` or
/// `{"success":false,"error":"..."}`.
pub fn result_json(result: &NoteResult) -> String {
    serde_json::to_string(result)
        .unwrap_or_else(|_| r#"{"success":false,"error":"unknown"}"#.to_string())
}

/// Parses settings sent from an options page. Missing keys keep their
/// defaults, so partial updates are accepted.
pub fn settings_from_json(raw: &str) -> Result<ImportSettings, String> {
    let mut settings = serde_json::to_value(ImportSettings::default())
        .map_err(|err| format!("invalid settings: {err}"))?;
    let patch: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| format!("invalid settings: {err}"))?;
    let Some(patch) = patch.as_object() else {
        return Err("invalid settings: expected an object".to_string());
    };
    if let Some(target) = settings.as_object_mut() {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
    let parsed: ImportSettings =
        serde_json::from_value(settings).map_err(|err| format!("invalid settings: {err}"))?;
    if parsed.max_file_size_mb == 0 {
        return Err("invalid settings: maxFileSizeMB must be positive".to_string());
    }
    Ok(parsed)
}

/// One console line per log record.
pub fn console_line(record: &Record<'_>) -> String {
    format!(
        "[dropnkeep] {} {}: {}",
        record.level(),
        record.target(),
        record.args()
    )
}
