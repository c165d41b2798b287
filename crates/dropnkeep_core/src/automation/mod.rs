//! Note composer automation over a foreign, unversioned document.
//!
//! # Responsibility
//! - Describe the foreign page through a replaceable selector table.
//! - Drive the composer through an explicit, bounded state machine.
//!
//! # Invariants
//! - Every wait is bounded and yields through the injected `Clock`.
//! - Faults inside an attempt become an unsuccessful `NoteResult`.

pub mod clock;
pub mod document;
pub mod driver;
pub mod lookup;
pub mod selector;
