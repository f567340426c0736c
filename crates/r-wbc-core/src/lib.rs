//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Limb controllers, joint-limit safety and whole-body composition."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
//! Trajectory synthesis and command sequencing for a humanoid whole-body
//! controller.
//!
//! Every limb controller shares one [`ControlContext`]: the command bus,
//! the message id generator, the pacer used for settle delays, and the
//! robot description and state providers. Joint-space inputs are always
//! passed through a [`JointLimitTable`] before they reach a message.

pub mod arm;
pub mod chest;
pub mod context;
pub mod description;
pub mod errors;
pub mod geometry;
pub mod head;
pub mod leg;
pub mod limits;
pub mod pelvis;
pub mod sequencer;
pub mod state;
#[cfg(test)]
mod test_support;
pub mod trajectory;
pub mod wholebody;

pub use arm::{ArmController, ArmJointData, ArmTaskSpaceData, NamedPose, NudgeDirection};
pub use chest::{ChestController, CHEST_JOINTS};
pub use context::ControlContext;
pub use description::{ConfiguredDescription, FrameRole, LimbGroup, RobotDescriptionProvider};
pub use errors::{ControlError, LookupError, Result};
pub use head::HeadController;
pub use leg::LegController;
pub use limits::{ClampOutcome, JointLimit, JointLimitTable};
pub use pelvis::PelvisController;
pub use sequencer::PublicationSequencer;
pub use state::{StateProvider, StaticStateProvider};
pub use wholebody::{GroupSlice, WholeBodyComposer};
