//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Head orientation and neck joint commands."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_logging::{wbc_warn, LogContext};
use r_wbc_msg::{
    ControllerMessage, ExecutionMode, HeadTrajectory, NeckTrajectory, OneDofJointTrajectory,
    Point, Pose, Quaternion, So3TrajectoryPoint,
};

use crate::context::ControlContext;
use crate::description::{FrameRole, LimbGroup};
use crate::errors::{ControlError, Result};
use crate::geometry::quaternion_from_rpy;
use crate::limits::JointLimitTable;
use crate::sequencer::PublicationSequencer;
use crate::trajectory::{append_limited_point, evenly_spaced_time};

pub struct HeadController {
    ctx: ControlContext,
    neck: JointLimitTable,
    sequencer: PublicationSequencer,
}

impl HeadController {
    pub fn new(ctx: ControlContext) -> Result<Self> {
        let neck = JointLimitTable::load(
            ctx.description.as_ref(),
            LimbGroup::Neck,
            ctx.safety.limit_margin,
            ctx.safety.clamp_policy,
        )?;
        let sequencer = PublicationSequencer::from_context(&ctx);
        Ok(Self {
            ctx,
            neck,
            sequencer,
        })
    }

    pub fn neck_joint_count(&self) -> usize {
        self.neck.joint_count()
    }

    /// Evenly spaced neck move, limit-enforced per joint.
    pub fn move_neck_joints(&self, waypoints: &[Vec<f64>], total_time: f64) -> Result<()> {
        let ctx = LogContext::new().with_limb(LimbGroup::Neck.as_str());
        if waypoints.is_empty() {
            wbc_warn!(context = ctx, "neck waypoint list is empty");
            return Err(ControlError::malformed("neck waypoint list is empty"));
        }
        let expected = self.neck.joint_count();
        if let Some(bad) = waypoints.iter().position(|w| w.len() != expected) {
            wbc_warn!(
                context = ctx,
                "neck waypoint {} has {} joints, expected {}",
                bad,
                waypoints[bad].len(),
                expected
            );
            return Err(ControlError::malformed(format!(
                "neck waypoint {} has {} joints, expected {}",
                bad,
                waypoints[bad].len(),
                expected
            )));
        }
        for positions in waypoints {
            self.neck.enforce(positions)?;
        }

        let mut msg = NeckTrajectory {
            joint_trajectories: vec![OneDofJointTrajectory::default(); expected],
            unique_id: self.ctx.ids.next_id(),
        };
        let count = waypoints.len();
        for (index, positions) in waypoints.iter().enumerate() {
            append_limited_point(
                &mut msg.joint_trajectories,
                &self.neck,
                &self.ctx.ids,
                msg.unique_id,
                evenly_spaced_time(total_time, count, index + 1),
                positions,
                &[],
            )?;
        }
        self.sequencer.publish(&ControllerMessage::Neck(msg))
    }

    pub fn move_head_rpy(&self, roll: f64, pitch: f64, yaw: f64, time: f64) -> Result<()> {
        self.move_head(&quaternion_from_rpy(roll, pitch, yaw), time)
    }

    pub fn move_head(&self, orientation: &Quaternion, time: f64) -> Result<()> {
        let msg = self.head_message(vec![(*orientation, time)]);
        self.sequencer.publish(&ControllerMessage::Head(msg))
    }

    /// Evenly spaced head trajectory from `[roll, pitch, yaw]` waypoints.
    pub fn move_head_trajectory(&self, rpy_waypoints: &[[f64; 3]], total_time: f64) -> Result<()> {
        if rpy_waypoints.is_empty() {
            return Err(ControlError::malformed("head waypoint list is empty"));
        }
        let count = rpy_waypoints.len();
        let targets = rpy_waypoints
            .iter()
            .enumerate()
            .map(|(index, [roll, pitch, yaw])| {
                (
                    quaternion_from_rpy(*roll, *pitch, *yaw),
                    evenly_spaced_time(total_time, count, index + 1),
                )
            })
            .collect();
        let msg = self.head_message(targets);
        self.sequencer.publish(&ControllerMessage::Head(msg))
    }

    fn head_message(&self, targets: Vec<(Quaternion, f64)>) -> HeadTrajectory {
        let unique_id = self.ctx.ids.next_id();
        let taskspace_trajectory_points = targets
            .into_iter()
            .map(|(orientation, time)| So3TrajectoryPoint {
                time,
                orientation,
                angular_velocity: Point::default(),
                unique_id: self.ctx.ids.next_id(),
            })
            .collect();
        HeadTrajectory {
            execution_mode: ExecutionMode::Override,
            taskspace_trajectory_points,
            unique_id,
        }
    }

    pub fn joint_space_state(&self) -> Result<Vec<f64>> {
        Ok(self.ctx.state.joint_positions(LimbGroup::Neck)?)
    }

    pub fn task_space_state(&self, fixed_frame: &str) -> Result<Pose> {
        let head = self.ctx.frame(FrameRole::Head);
        Ok(self.ctx.state.current_pose(&head, fixed_frame)?)
    }
}
