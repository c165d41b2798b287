//! Drop handling: file choice, pre-flight checks, decode and hand-off.

pub mod pipeline;
pub mod selection;
