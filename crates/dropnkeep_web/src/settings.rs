//! `localStorage`-backed settings for the content script.

use dropnkeep_core::{SettingsError, SettingsResult, SettingsStore};
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use serde_json::Value;

/// Stores each option under its extension storage key as JSON text.
///
/// `localStorage` is scoped to the origin of the page the script runs in.
/// Inside a content script that is the note app's origin, so every reader
/// and writer of these keys must run in that same origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageSettings;

impl SettingsStore for LocalStorageSettings {
    fn get_value(&self, key: &str) -> SettingsResult<Option<Value>> {
        match LocalStorage::get::<Value>(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(err)) => Err(SettingsError::from(err)),
            Err(err) => Err(SettingsError::Storage(err.to_string())),
        }
    }

    fn set_value(&self, key: &str, value: &Value) -> SettingsResult<()> {
        LocalStorage::set(key, value).map_err(|err| SettingsError::Storage(err.to_string()))
    }
}
