//! Drop-to-note pipeline.
//!
//! # Responsibility
//! - Reject unusable drops before any side effect.
//! - Decode the chosen file and hand one `NoteRequest` to the composer.
//! - Map the outcome to the user-visible channel it belongs to.
//!
//! # Invariants
//! - Oversized files are never read, decoded or sent to the composer.
//! - The composer is awaited at most once per drop.
//! - Pre-flight rejections surface as blocking alerts; composer outcomes
//!   surface as transient toasts.

use crate::automation::driver::NoteComposer;
use crate::encoding::resolver::TextResolver;
use crate::import::selection::{derive_title, select_file, NamedFile};
use crate::model::note::{NoteRequest, NoteResult};
use crate::settings::ImportSettings;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

const TOAST_CREATED: &str = "Note created successfully";

/// A dropped file whose size is known before its bytes are read.
pub trait DroppedFile: NamedFile {
    fn size(&self) -> u64;
    fn read_bytes(&self) -> impl Future<Output = Result<Vec<u8>, FileReadError>>;
}

/// Host failure while reading a dropped file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadError {
    pub message: String,
}

impl FileReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for FileReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for FileReadError {}

/// Pre-flight rejections. None of these produce a `NoteResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    NoFile,
    FileTooLarge { size: u64, limit_mb: u32 },
    EmptyFile,
    ReadFailed(FileReadError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFile => write!(f, "No file was dropped"),
            Self::FileTooLarge { limit_mb, .. } => {
                write!(f, "File is too large (max {limit_mb}MB)")
            }
            Self::EmptyFile => write!(f, "File is empty"),
            Self::ReadFailed(err) => write!(f, "Failed to read file: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Message for the end user, tagged with its delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotice {
    /// Blocking; used when nothing was attempted.
    Alert(String),
    /// Transient and dismissible; used after an automation attempt.
    Toast(String),
}

impl UserNotice {
    pub fn message(&self) -> &str {
        match self {
            Self::Alert(message) | Self::Toast(message) => message,
        }
    }

    pub fn deliver(&self, notifier: &impl Notifier) {
        match self {
            Self::Alert(message) => notifier.alert(message),
            Self::Toast(message) => notifier.toast(message),
        }
    }
}

/// Host surface for user-visible notices.
pub trait Notifier {
    fn alert(&self, message: &str);
    fn toast(&self, message: &str);
}

/// Result of handling one drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Rejected(ImportError),
    Completed(NoteResult),
}

impl DropOutcome {
    pub fn notice(&self) -> UserNotice {
        match self {
            Self::Rejected(err) => UserNotice::Alert(err.to_string()),
            Self::Completed(result) if result.success => UserNotice::Toast(TOAST_CREATED.into()),
            Self::Completed(result) => UserNotice::Toast(format!(
                "Failed to create note: {}",
                result.error.as_deref().unwrap_or("unknown")
            )),
        }
    }
}

/// Turns dropped files into composer requests.
pub struct DropImporter<R: TextResolver, C: NoteComposer> {
    resolver: R,
    composer: C,
}

impl<R: TextResolver, C: NoteComposer> DropImporter<R, C> {
    pub fn new(resolver: R, composer: C) -> Self {
        Self { resolver, composer }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Handles one drop with settings read once by the caller.
    pub async fn import<F: DroppedFile>(
        &self,
        files: &[F],
        settings: &ImportSettings,
    ) -> DropOutcome {
        match self.prepare(files, settings).await {
            Ok(request) => DropOutcome::Completed(self.composer.create_note(&request).await),
            Err(err) => {
                warn!("event=drop_import module=import status=rejected error={err}");
                DropOutcome::Rejected(err)
            }
        }
    }

    /// Runs the pre-flight checks and builds the request.
    pub async fn prepare<F: DroppedFile>(
        &self,
        files: &[F],
        settings: &ImportSettings,
    ) -> Result<NoteRequest, ImportError> {
        let file = select_file(files).ok_or(ImportError::NoFile)?;

        let size = file.size();
        if size > settings.max_file_size_bytes() {
            return Err(ImportError::FileTooLarge {
                size,
                limit_mb: settings.max_file_size_mb,
            });
        }

        let bytes = file.read_bytes().await.map_err(ImportError::ReadFailed)?;
        let decoded = self.resolver.resolve(&bytes);
        info!(
            "event=drop_import module=import status=decoded files={} bytes={} encoding={}",
            files.len(),
            bytes.len(),
            decoded.encoding().label()
        );

        let title = derive_title(file.name(), settings);
        NoteRequest::new(title, decoded.into_string()).map_err(|_| ImportError::EmptyFile)
    }
}
