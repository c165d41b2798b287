//! User settings model and key-value store contract.
//!
//! # Responsibility
//! - Define the import options read once per drop.
//! - Load, seed and save them through a host-provided key-value store.
//!
//! # Invariants
//! - Loading never fails; unreadable values fall back to defaults.
//! - Persisted key names match the browser extension storage keys.
//! - The drop pipeline receives settings by value and never writes them.

#[cfg(feature = "native")]
pub mod sqlite_store;

#[cfg(feature = "native")]
use crate::db::DbError;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key for the filename-as-title option.
pub const KEY_USE_FILENAME_AS_TITLE: &str = "useFilenameAsTitle";
/// Storage key for the drop size ceiling in MiB.
pub const KEY_MAX_FILE_SIZE_MB: &str = "maxFileSizeMB";

const DEFAULT_USE_FILENAME_AS_TITLE: bool = true;
const DEFAULT_MAX_FILE_SIZE_MB: u32 = 10;
const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Options consulted by the drop pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(rename = "useFilenameAsTitle")]
    pub use_filename_as_title: bool,
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: u32,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            use_filename_as_title: DEFAULT_USE_FILENAME_AS_TITLE,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl ImportSettings {
    /// Size ceiling in bytes; files strictly larger are rejected.
    pub fn max_file_size_bytes(&self) -> u64 {
        u64::from(self.max_file_size_mb) * BYTES_PER_MIB
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Settings persistence errors.
#[derive(Debug)]
pub enum SettingsError {
    #[cfg(feature = "native")]
    Db(DbError),
    Serialization(String),
    Storage(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "native")]
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(message) => write!(f, "invalid settings value: {message}"),
            Self::Storage(message) => write!(f, "settings storage failed: {message}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            #[cfg(feature = "native")]
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "native")]
impl From<DbError> for SettingsError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

#[cfg(feature = "native")]
impl From<rusqlite::Error> for SettingsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}

/// Host key-value store holding JSON values.
pub trait SettingsStore {
    fn get_value(&self, key: &str) -> SettingsResult<Option<Value>>;
    fn set_value(&self, key: &str, value: &Value) -> SettingsResult<()>;
}

/// In-process store, for tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RefCell<BTreeMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_value(&self, key: &str) -> SettingsResult<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: &Value) -> SettingsResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// Reads the import options, substituting defaults for anything missing
/// or malformed.
pub fn load_settings(store: &impl SettingsStore) -> ImportSettings {
    let defaults = ImportSettings::default();
    let use_filename_as_title = read_key(store, KEY_USE_FILENAME_AS_TITLE, Value::as_bool)
        .unwrap_or(defaults.use_filename_as_title);
    let max_file_size_mb = read_key(store, KEY_MAX_FILE_SIZE_MB, |value| {
        value
            .as_u64()
            .and_then(|mb| u32::try_from(mb).ok())
            .filter(|mb| *mb > 0)
    })
    .unwrap_or(defaults.max_file_size_mb);

    ImportSettings {
        use_filename_as_title,
        max_file_size_mb,
    }
}

/// Writes every option.
pub fn save_settings(store: &impl SettingsStore, settings: &ImportSettings) -> SettingsResult<()> {
    store.set_value(
        KEY_USE_FILENAME_AS_TITLE,
        &Value::Bool(settings.use_filename_as_title),
    )?;
    store.set_value(
        KEY_MAX_FILE_SIZE_MB,
        &Value::from(settings.max_file_size_mb),
    )?;
    Ok(())
}

/// Install-time seeding: keeps stored choices, fills missing keys with
/// defaults, and persists the merged result.
pub fn seed_default_settings(store: &impl SettingsStore) -> SettingsResult<ImportSettings> {
    let merged = load_settings(store);
    save_settings(store, &merged)?;
    Ok(merged)
}

fn read_key<T>(
    store: &impl SettingsStore,
    key: &str,
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    match store.get_value(key) {
        Ok(Some(value)) => {
            let parsed = parse(&value);
            if parsed.is_none() {
                warn!("event=settings_load module=settings status=invalid key={key}");
            }
            parsed
        }
        Ok(None) => None,
        Err(err) => {
            warn!("event=settings_load module=settings status=error key={key} error={err}");
            None
        }
    }
}
