//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Failure taxonomy for trajectory synthesis."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_msg::MessagingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ControlError>;

/// A frame, transform or joint state the state provider could not supply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lookup of {frame} relative to {reference} failed: {reason}")]
pub struct LookupError {
    pub frame: String,
    pub reference: String,
    pub reason: String,
}

impl LookupError {
    pub fn new(
        frame: impl Into<String>,
        reference: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            frame: frame.into(),
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("joint sequence violation in {group}: expected {expected:?}, found {found:?}")]
    SequenceViolation {
        group: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("joint {joint} target {value} outside [{lower}, {upper}]")]
    LimitViolation {
        joint: String,
        value: f64,
        lower: f64,
        upper: f64,
    },
    #[error("invalid joint limits for {group}: {reason}")]
    InvalidLimits { group: &'static str, reason: String },
    #[error("unknown joint index {index} for {group} ({count} joints)")]
    UnknownJoint {
        group: &'static str,
        index: usize,
        count: usize,
    },
    #[error("messaging error: {0}")]
    Messaging(#[from] MessagingError),
}

impl ControlError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput(reason.into())
    }
}
