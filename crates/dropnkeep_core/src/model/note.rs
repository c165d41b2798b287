//! Note request/result model.
//!
//! # Responsibility
//! - Carry resolved title/body text into the composer driver.
//! - Report one terminal outcome per automation attempt.
//!
//! # Invariants
//! - `NoteRequest::body` is never empty, including requests deserialized
//!   from JSON; empty drops are rejected before a request is formed.
//!   Whitespace-only bodies are kept verbatim.
//! - `NoteRequest::title` is the empty string when filename-as-title is off.
//! - `NoteResult::error` is `Some` (and non-empty) exactly when `success`
//!   is `false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validated input for one note creation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNoteRequest")]
pub struct NoteRequest {
    title: String,
    body: String,
}

impl NoteRequest {
    /// Builds a request, rejecting empty bodies.
    ///
    /// # Errors
    /// - Returns `NoteRequestError::EmptyBody` when `body` is empty.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, NoteRequestError> {
        let body = body.into();
        if body.is_empty() {
            return Err(NoteRequestError::EmptyBody);
        }
        Ok(Self {
            title: title.into(),
            body,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns whether a non-empty title was supplied.
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}

#[derive(Deserialize)]
struct RawNoteRequest {
    #[serde(default)]
    title: String,
    body: String,
}

impl TryFrom<RawNoteRequest> for NoteRequest {
    type Error = NoteRequestError;

    fn try_from(raw: RawNoteRequest) -> Result<Self, Self::Error> {
        Self::new(raw.title, raw.body)
    }
}

/// Request construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRequestError {
    EmptyBody,
}

impl Display for NoteRequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "note body must not be empty"),
        }
    }
}

impl Error for NoteRequestError {}

/// Terminal outcome of one composer automation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NoteResult {
    pub fn created() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Builds a failure result; an empty description is replaced so the
    /// error string is never blank.
    pub fn failed(description: impl Into<String>) -> Self {
        let description = description.into();
        let error = if description.trim().is_empty() {
            "unknown".to_string()
        } else {
            description
        };
        Self {
            success: false,
            error: Some(error),
        }
    }
}
