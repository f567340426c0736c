//! ---
//! wbc_section: "01-core-functionality"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Shared primitives and utilities for the control runtime."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
//! Core shared primitives for the R-WBC workspace.
//! This crate exposes configuration loading and tracing setup consumed by
//! the controller crates and the operator CLI.

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, ClampPolicy, FrameConfig, JointConfig, LimbsConfig, LoggingConfig, RobotConfig,
    SafetyConfig, SequencingConfig,
};
pub use logging::{init_tracing, LogFormat};
