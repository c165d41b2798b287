//! Core logic for DropNKeep: decode a dropped text file and create a note
//! from it through a foreign note-taking page.
//! This crate owns every decision; hosts only adapt I/O onto its traits.

pub mod automation;
#[cfg(feature = "native")]
pub mod db;
pub mod encoding;
pub mod import;
#[cfg(feature = "native")]
pub mod logging;
pub mod model;
pub mod settings;

pub use automation::clock::{bounded_wait, Clock, ManualClock, WaitError, WaitPolicy, WaitTimeout};
pub use automation::document::{DocumentError, DocumentResult, ForeignDocument};
pub use automation::driver::{
    plan_population, AutomationError, AutomationReport, ComposerDriver, ComposerState,
    DriverConfig, NoteComposer, RegionWrite,
};
pub use automation::lookup::{LookupConfig, LookupLoadError, LookupTable};
pub use automation::selector::{ElementAttributes, Selector, SelectorError, SelectorList};
pub use encoding::resolver::{resolve, DecodedText, EncodingResolver, SourceEncoding, TextResolver};
pub use import::pipeline::{
    DropImporter, DropOutcome, DroppedFile, FileReadError, ImportError, Notifier, UserNotice,
};
pub use import::selection::{derive_title, has_text_extension, select_file, NamedFile};
#[cfg(feature = "native")]
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NoteRequest, NoteRequestError, NoteResult};
#[cfg(feature = "native")]
pub use settings::sqlite_store::SqliteSettingsStore;
pub use settings::{
    load_settings, save_settings, seed_default_settings, ImportSettings, MemorySettingsStore,
    SettingsError, SettingsResult, SettingsStore,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
