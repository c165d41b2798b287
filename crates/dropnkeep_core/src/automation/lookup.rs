//! Prioritized selector strategies for the foreign note composer.
//!
//! # Responsibility
//! - Keep every assumption about the foreign page structure in one table.
//! - Compile the textual table once into typed selectors.
//!
//! # Invariants
//! - Lists are tried in order; the first strategy yielding a match wins.
//! - The driver never hardcodes selectors outside this table.

use crate::automation::selector::{SelectorError, SelectorList};
use serde::{Deserialize, Serialize};

const ENTRY_POINT: &[&str] = &[
    r#"div[aria-label^="Take a note"]"#,
    r#"div[aria-label*="Take a note"]"#,
    r#"textarea[aria-label^="Take a note"]"#,
    r#"div[role="button"][data-se="create-note-button"]"#,
];
const COMPOSER_READY: &[&str] = &[
    r#"div[role="dialog"]"#,
    r#"div[role="textbox"]"#,
    r#"div[contenteditable="true"]"#,
];
const COMPOSER_SCOPE: &[&str] = &[r#"div[role="dialog"]"#];
const STRICT_EDITABLE: &[&str] = &[r#"div[contenteditable="true"][role="textbox"]"#];
const BROAD_EDITABLE: &[&str] = &[r#"div[contenteditable="true"]"#];
const COMMIT: &[&str] = &[
    r#"button[aria-label="Close"]"#,
    r#"div[aria-label="Close"]"#,
    r#"button[aria-label^="Close"]"#,
];

/// Textual strategy table, replaceable from JSON when the foreign UI drifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
    pub entry_point: Vec<String>,
    pub composer_ready: Vec<String>,
    pub composer_scope: Vec<String>,
    pub strict_editable: Vec<String>,
    pub broad_editable: Vec<String>,
    pub commit: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            entry_point: owned(ENTRY_POINT),
            composer_ready: owned(COMPOSER_READY),
            composer_scope: owned(COMPOSER_SCOPE),
            strict_editable: owned(STRICT_EDITABLE),
            broad_editable: owned(BROAD_EDITABLE),
            commit: owned(COMMIT),
        }
    }
}

/// Compiled strategy table consumed by the composer driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    /// "New note" affordance that opens the composer.
    pub entry_point: SelectorList,
    /// Anything whose presence means the composer has rendered.
    pub composer_ready: SelectorList,
    /// Container that scopes region and commit lookups; body when absent.
    pub composer_scope: SelectorList,
    /// Preferred editable regions.
    pub strict_editable: SelectorList,
    /// Used only when no strict region is visible.
    pub broad_editable: SelectorList,
    /// Close/save affordance.
    pub commit: SelectorList,
}

impl LookupTable {
    /// Compiles a textual table.
    ///
    /// # Errors
    /// - Returns the first `SelectorError` found in any list.
    pub fn compile(config: &LookupConfig) -> Result<Self, SelectorError> {
        Ok(Self {
            entry_point: SelectorList::parse(&config.entry_point)?,
            composer_ready: SelectorList::parse(&config.composer_ready)?,
            composer_scope: SelectorList::parse(&config.composer_scope)?,
            strict_editable: SelectorList::parse(&config.strict_editable)?,
            broad_editable: SelectorList::parse(&config.broad_editable)?,
            commit: SelectorList::parse(&config.commit)?,
        })
    }

    /// Parses a JSON table; missing lists keep their defaults.
    pub fn from_json(source: &str) -> Result<Self, LookupLoadError> {
        let config: LookupConfig =
            serde_json::from_str(source).map_err(|err| LookupLoadError::Json(err.to_string()))?;
        Self::compile(&config).map_err(LookupLoadError::Selector)
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        // The built-in table is covered by `default_table_compiles`.
        Self::compile(&LookupConfig::default()).expect("built-in lookup table is valid")
    }
}

/// Errors loading a replacement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupLoadError {
    Json(String),
    Selector(SelectorError),
}

impl std::fmt::Display for LookupLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(message) => write!(f, "invalid lookup table json: {message}"),
            Self::Selector(err) => write!(f, "invalid lookup table: {err}"),
        }
    }
}

impl std::error::Error for LookupLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(_) => None,
            Self::Selector(err) => Some(err),
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
