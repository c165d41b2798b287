//! File choice and title derivation for one drop.

use crate::settings::ImportSettings;
use once_cell::sync::Lazy;
use regex::Regex;

static TEXT_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:txt|text)$").expect("valid text extension regex"));

/// Minimal view of a dropped file needed to pick one.
pub trait NamedFile {
    fn name(&self) -> &str;
}

/// Whether the name ends in a recognised plain-text extension.
pub fn has_text_extension(file_name: &str) -> bool {
    TEXT_EXTENSION_RE.is_match(file_name)
}

/// Picks the first text-like file, else the first file overall.
pub fn select_file<F: NamedFile>(files: &[F]) -> Option<&F> {
    files
        .iter()
        .find(|file| has_text_extension(file.name()))
        .or_else(|| files.first())
}

/// Note title for a dropped file: its name without the text extension,
/// or empty when filename-as-title is disabled.
pub fn derive_title(file_name: &str, settings: &ImportSettings) -> String {
    if !settings.use_filename_as_title {
        return String::new();
    }
    TEXT_EXTENSION_RE.replace(file_name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::{derive_title, has_text_extension, select_file, NamedFile};
    use crate::settings::ImportSettings;

    struct Named(&'static str);

    impl NamedFile for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn recognises_text_extensions_case_insensitively() {
        assert!(has_text_extension("notes.TXT"));
        assert!(has_text_extension("readme.text"));
        assert!(!has_text_extension("photo.png"));
        assert!(!has_text_extension("txt"));
    }

    #[test]
    fn prefers_first_text_file_over_earlier_others() {
        let files = [Named("a.png"), Named("b.txt"), Named("c.txt")];
        assert_eq!(select_file(&files).map(|file| file.0), Some("b.txt"));
    }

    #[test]
    fn falls_back_to_first_file() {
        let files = [Named("a.csv"), Named("b.png")];
        assert_eq!(select_file(&files).map(|file| file.0), Some("a.csv"));
        assert!(select_file::<Named>(&[]).is_none());
    }

    #[test]
    fn title_strips_only_trailing_extension() {
        let settings = ImportSettings::default();
        assert_eq!(derive_title("Meeting.txt", &settings), "Meeting");
        assert_eq!(derive_title("a.txt.TXT", &settings), "a.txt");
        assert_eq!(derive_title("data.csv", &settings), "data.csv");
    }

    #[test]
    fn title_is_empty_when_disabled() {
        let settings = ImportSettings {
            use_filename_as_title: false,
            ..ImportSettings::default()
        };
        assert_eq!(derive_title("Meeting.txt", &settings), "");
    }
}
