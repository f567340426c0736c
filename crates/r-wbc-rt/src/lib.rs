//! ---
//! wbc_section: "01-core-functionality"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Runtime helpers supporting command sequencing."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
//! Pacing helpers for the R-WBC runtime.

pub mod pacing;

pub use pacing::{Pacer, ThreadPacer, VirtualClock};
