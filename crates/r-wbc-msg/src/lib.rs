//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Controller message schema, identity and publishing."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
#![warn(missing_docs)]

pub mod bus;
pub mod identity;
pub mod logging;
pub mod topics;
pub mod transport;
pub mod types;

/// Shared result type for messaging operations.
pub type Result<T> = std::result::Result<T, MessagingError>;

/// Errors raised while handing messages to the middleware.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Wrapper for IO errors encountered by a publisher.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wrapper for JSON serialization problems.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Raised when a bus has nowhere to deliver a message.
    #[error("no publishers registered")]
    NoPublishers,
}

pub use bus::{BusMetrics, CommandBus};
pub use identity::MessageIdGenerator;
pub use logging::{log_message, CommandMetricsExporter};
pub use topics::{ControlTopic, TopicResolver};
pub use transport::{InMemoryPublisher, JsonLinesPublisher, PublishedMessage, Publisher};
pub use types::{
    ArmTrajectory, BaseForControl, BodyPart, ChestTrajectory, ControllerMessage, ExecutionMode,
    FootTrajectory, GoHome, HandTrajectory, HeadTrajectory, JointTrajectory, JointTrajectoryPoint,
    MessageId, NeckTrajectory, OneDofJointTrajectory, PelvisHeightTrajectory, Point, Pose,
    Quaternion, RobotSide, Se3TrajectoryPoint, So3TrajectoryPoint, TrajectoryPoint1D,
    WholeBodyTrajectory, INVALID_MESSAGE_ID,
};
