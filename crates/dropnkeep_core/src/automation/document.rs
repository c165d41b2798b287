//! Contract for the foreign document the composer driver automates.
//!
//! Implemented by the browser host over the live DOM and by simulated
//! documents in tests. Element handles are transient: the foreign page may
//! re-render at any time, so callers must not keep them across attempts.

use crate::automation::selector::Selector;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Failure of one operation against the foreign document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentError {
    pub operation: &'static str,
    pub message: String,
}

impl DocumentError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}

impl Error for DocumentError {}

/// Discovery and mutation surface of the foreign page.
pub trait ForeignDocument {
    /// Transient handle to one element.
    type Element: Clone;

    /// First element in document order matching `selector`.
    fn query_first(&self, selector: &Selector) -> DocumentResult<Option<Self::Element>>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all_within(
        &self,
        scope: &Self::Element,
        selector: &Selector,
    ) -> DocumentResult<Vec<Self::Element>>;

    /// Document body, used as the fallback scope and blur target.
    fn body(&self) -> DocumentResult<Self::Element>;

    /// Whether the element currently has a layout box.
    fn is_rendered(&self, element: &Self::Element) -> bool;

    fn click(&self, element: &Self::Element) -> DocumentResult<()>;

    fn focus(&self, element: &Self::Element) -> DocumentResult<()>;

    /// Removes all existing content of an editable element.
    fn clear_editable(&self, element: &Self::Element) -> DocumentResult<()>;

    /// Inserts text through the page's native editing pipeline.
    ///
    /// Returns `Ok(false)` when that mechanism is unavailable, in which
    /// case nothing was inserted.
    fn insert_text(&self, element: &Self::Element, text: &str) -> DocumentResult<bool>;

    /// Replaces element content directly.
    fn replace_text(&self, element: &Self::Element, text: &str) -> DocumentResult<()>;

    /// Emits a bubbling `input` notification from the element.
    fn notify_input(&self, element: &Self::Element) -> DocumentResult<()>;
}
