//! Value objects exchanged between the drop pipeline and the composer.
//!
//! # Responsibility
//! - Define the request/result shapes for one note creation attempt.
//!
//! # Invariants
//! - A `NoteRequest` never carries an empty body.
//! - A `NoteResult` is produced once per request and never updated.

pub mod note;
