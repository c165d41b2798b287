//! Byte-to-text decoding for dropped files.
//!
//! # Responsibility
//! - Turn an undeclared-charset byte buffer into text without ever failing.
//!
//! # Invariants
//! - Strict UTF-8 always wins when the buffer is valid UTF-8.
//! - The last step is a single-byte decode defined for every byte value.
//!
//! The candidate order is a policy, not detection: legacy buffers that
//! happen to decode under an earlier candidate are accepted as-is.

pub mod resolver;
