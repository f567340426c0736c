//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Whole-body trajectory composition."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
//! Whole-body composition.
//!
//! A combined planner trajectory is split into contiguous per-limb column
//! slices (chest, left arm, right arm). A limb whose first joint name is
//! absent is skipped and keeps id `0`. A limb whose names are present but
//! out of order aborts the whole composition. All limbs share the source
//! trajectory's time axis; no per-limb renormalisation is applied.
//!
//! Sub-messages are built on the side and only committed to the outgoing
//! message once every point of every limb has been appended, so a failure
//! never leaves a partially populated message behind.

use r_wbc_logging::{log_command_event, wbc_error, wbc_info, CommandOutcome, LogContext};
use r_wbc_msg::{
    ArmTrajectory, ChestTrajectory, ControllerMessage, ExecutionMode, JointTrajectory, Pose,
    RobotSide, WholeBodyTrajectory,
};

use crate::arm::ArmController;
use crate::chest::ChestController;
use crate::context::ControlContext;
use crate::description::{FrameRole, LimbGroup};
use crate::errors::{ControlError, Result};
use crate::sequencer::PublicationSequencer;

/// Composition order of the limb groups.
const GROUP_ORDER: [LimbGroup; 3] = [LimbGroup::Chest, LimbGroup::LeftArm, LimbGroup::RightArm];

/// Column range of one limb inside a combined trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSlice {
    pub group: LimbGroup,
    pub start: usize,
    pub len: usize,
}

impl GroupSlice {
    fn columns<'a>(&self, positions: &'a [f64]) -> &'a [f64] {
        &positions[self.start..self.start + self.len]
    }
}

pub struct WholeBodyComposer {
    ctx: ControlContext,
    arms: ArmController,
    chest: ChestController,
    sequencer: PublicationSequencer,
}

impl WholeBodyComposer {
    pub fn new(ctx: ControlContext) -> Result<Self> {
        let arms = ArmController::new(ctx.clone())?;
        let chest = ChestController::new(ctx.clone())?;
        let sequencer = PublicationSequencer::from_context(&ctx);
        Ok(Self {
            ctx,
            arms,
            chest,
            sequencer,
        })
    }

    pub fn arms(&self) -> &ArmController {
        &self.arms
    }

    pub fn chest(&self) -> &ChestController {
        &self.chest
    }

    fn expected_names(&self, group: LimbGroup) -> &[String] {
        match group {
            LimbGroup::Chest => self.chest.limits().names(),
            LimbGroup::LeftArm => self.arms.limits(RobotSide::Left).names(),
            LimbGroup::RightArm => self.arms.limits(RobotSide::Right).names(),
            LimbGroup::Neck => &[],
        }
    }

    /// Whole-body message with a fresh top-level id and every sub-message
    /// in OVERRIDE mode with id `0`.
    pub fn initialize_message(&self) -> WholeBodyTrajectory {
        WholeBodyTrajectory::empty(self.ctx.ids.next_id())
    }

    /// Locate each known limb's contiguous columns in `joint_names`.
    pub fn locate_groups(&self, joint_names: &[String]) -> Result<Vec<GroupSlice>> {
        let mut slices = Vec::new();
        for group in GROUP_ORDER {
            let expected = self.expected_names(group);
            let Some(first) = expected.first() else {
                continue;
            };
            let Some(start) = joint_names.iter().position(|name| name == first) else {
                continue;
            };
            let end = (start + expected.len()).min(joint_names.len());
            let found = &joint_names[start..end];
            if found != expected {
                wbc_error!(
                    context = LogContext::new()
                        .with_limb(group.as_str())
                        .with_command("parse_trajectory"),
                    "joints in the trajectory are not in the expected sequence"
                );
                return Err(ControlError::SequenceViolation {
                    group: group.as_str(),
                    expected: expected.to_vec(),
                    found: found.to_vec(),
                });
            }
            slices.push(GroupSlice {
                group,
                start,
                len: expected.len(),
            });
        }
        Ok(slices)
    }

    /// Populate `msg` from a combined trajectory.
    ///
    /// On error `msg` is left exactly as it was.
    pub fn parse_trajectory(
        &self,
        trajectory: &JointTrajectory,
        msg: &mut WholeBodyTrajectory,
    ) -> Result<()> {
        if trajectory.points.is_empty() {
            return Err(ControlError::malformed("whole-body trajectory has no points"));
        }
        let width = trajectory.joint_names.len();
        if let Some(index) = trajectory
            .points
            .iter()
            .position(|point| point.positions.len() != width)
        {
            return Err(ControlError::malformed(format!(
                "trajectory point {} carries {} positions for {} joint names",
                index,
                trajectory.points[index].positions.len(),
                width
            )));
        }

        let slices = self.locate_groups(&trajectory.joint_names)?;
        if slices.is_empty() {
            return Err(ControlError::malformed(
                "trajectory names no chest or arm joints",
            ));
        }

        let mut chest: Option<(GroupSlice, ChestTrajectory)> = None;
        let mut left: Option<(GroupSlice, ArmTrajectory)> = None;
        let mut right: Option<(GroupSlice, ArmTrajectory)> = None;
        for slice in &slices {
            match slice.group {
                LimbGroup::Chest => {
                    chest = Some((*slice, self.chest.setup_message(ExecutionMode::Override)))
                }
                LimbGroup::LeftArm => {
                    left = Some((*slice, self.arms.setup_message(RobotSide::Left)))
                }
                LimbGroup::RightArm => {
                    right = Some((*slice, self.arms.setup_message(RobotSide::Right)))
                }
                LimbGroup::Neck => {}
            }
        }

        for point in &trajectory.points {
            let time = point.time_from_start;
            if let Some((slice, chest_msg)) = chest.as_mut() {
                self.chest
                    .append_joint_point(chest_msg, time, slice.columns(&point.positions))?;
            }
            if let Some((slice, arm_msg)) = left.as_mut() {
                self.arms
                    .append_joint_waypoint(arm_msg, time, slice.columns(&point.positions))?;
            }
            if let Some((slice, arm_msg)) = right.as_mut() {
                self.arms
                    .append_joint_waypoint(arm_msg, time, slice.columns(&point.positions))?;
            }
        }

        if let Some((_, chest_msg)) = chest {
            msg.chest_trajectory = chest_msg;
        }
        if let Some((_, arm_msg)) = left {
            msg.left_arm_trajectory = arm_msg;
        }
        if let Some((_, arm_msg)) = right {
            msg.right_arm_trajectory = arm_msg;
        }
        Ok(())
    }

    /// Build a complete whole-body message without publishing it.
    pub fn compose(&self, trajectory: &JointTrajectory) -> Result<WholeBodyTrajectory> {
        let mut msg = self.initialize_message();
        self.parse_trajectory(trajectory, &mut msg)?;
        Ok(msg)
    }

    /// Compose, publish once, then block for the whole-body settle time.
    /// Nothing is published when composition fails.
    pub fn execute_trajectory(&self, trajectory: &JointTrajectory) -> Result<()> {
        let msg = match self.compose(trajectory) {
            Ok(msg) => msg,
            Err(err) => {
                log_command_event(
                    Some(&LogContext::new().with_command("execute_trajectory")),
                    "wholebody.compose",
                    &err.to_string(),
                    CommandOutcome::Aborted,
                );
                return Err(err);
            }
        };
        wbc_info!(
            context = LogContext::new()
                .with_limb("whole_body")
                .with_message_id(msg.unique_id)
                .with_command("execute_trajectory"),
            "publishing whole-body trajectory with {} points",
            trajectory.points.len()
        );
        self.sequencer
            .publish_whole_body(&ControllerMessage::WholeBody(msg))
    }

    /// Every known joint position.
    pub fn joint_space_state(&self) -> Result<Vec<f64>> {
        Ok(self.ctx.state.all_joint_positions()?)
    }

    /// Pelvis pose expressed in `fixed_frame`.
    pub fn task_space_state(&self, fixed_frame: &str) -> Result<Pose> {
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        Ok(self.ctx.state.current_pose(&pelvis, fixed_frame)?)
    }
}
