//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Chest orientation command construction."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_logging::{wbc_debug, LogContext};
use r_wbc_msg::{
    BodyPart, ChestTrajectory, ControllerMessage, ExecutionMode, GoHome, Point, Pose, Quaternion,
    RobotSide, So3TrajectoryPoint,
};

use crate::context::ControlContext;
use crate::description::{FrameRole, LimbGroup};
use crate::errors::{ControlError, Result};
use crate::geometry::quaternion_from_rpy;
use crate::limits::JointLimitTable;
use crate::sequencer::PublicationSequencer;

/// Chest joints in table order: yaw, pitch, roll.
pub const CHEST_JOINTS: usize = 3;

/// Builds chest orientation messages. Orientations are supplied in the
/// pelvis frame and sent in the world frame.
pub struct ChestController {
    ctx: ControlContext,
    limits: JointLimitTable,
    sequencer: PublicationSequencer,
}

impl ChestController {
    pub fn new(ctx: ControlContext) -> Result<Self> {
        let limits = JointLimitTable::load(
            ctx.description.as_ref(),
            LimbGroup::Chest,
            ctx.safety.limit_margin,
            ctx.safety.clamp_policy,
        )?;
        if limits.joint_count() != CHEST_JOINTS {
            return Err(ControlError::InvalidLimits {
                group: LimbGroup::Chest.as_str(),
                reason: format!(
                    "expected yaw, pitch and roll joints, found {}",
                    limits.joint_count()
                ),
            });
        }
        let sequencer = PublicationSequencer::from_context(&ctx);
        Ok(Self {
            ctx,
            limits,
            sequencer,
        })
    }

    pub fn limits(&self) -> &JointLimitTable {
        &self.limits
    }

    /// Empty message in `mode` with a fresh id.
    pub fn setup_message(&self, mode: ExecutionMode) -> ChestTrajectory {
        ChestTrajectory {
            execution_mode: mode,
            taskspace_trajectory_points: Vec::new(),
            unique_id: self.ctx.ids.next_id(),
        }
    }

    /// Append a pelvis-frame orientation at `time`, converted to world frame.
    pub fn append_orientation(
        &self,
        msg: &mut ChestTrajectory,
        orientation: &Quaternion,
        time: f64,
    ) -> Result<()> {
        let point = self.world_point(orientation, time)?;
        msg.taskspace_trajectory_points.push(point);
        Ok(())
    }

    fn world_point(&self, orientation: &Quaternion, time: f64) -> Result<So3TrajectoryPoint> {
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        let world = self.ctx.frame(FrameRole::World);
        let orientation = self
            .ctx
            .state
            .transform_quaternion(orientation, &pelvis, &world)?;
        Ok(So3TrajectoryPoint {
            time,
            orientation,
            angular_velocity: Point::default(),
            unique_id: self.ctx.ids.next_id(),
        })
    }

    /// Limit-enforce `[yaw, pitch, roll]` joint angles and return the
    /// pelvis-frame orientation they produce.
    pub fn chest_quaternion_from_joints(&self, positions: &[f64]) -> Result<Quaternion> {
        let limited = self.limits.enforce(positions)?;
        let (yaw, pitch, roll) = (limited[0], limited[1], limited[2]);
        Ok(quaternion_from_rpy(roll, pitch, yaw))
    }

    /// Append a joint-space chest waypoint as an orientation point.
    pub fn append_joint_point(
        &self,
        msg: &mut ChestTrajectory,
        time: f64,
        positions: &[f64],
    ) -> Result<()> {
        let orientation = self.chest_quaternion_from_joints(positions)?;
        self.append_orientation(msg, &orientation, time)
    }

    pub fn control_chest_rpy(
        &self,
        roll: f64,
        pitch: f64,
        yaw: f64,
        time: f64,
        mode: ExecutionMode,
    ) -> Result<()> {
        self.control_chest(&quaternion_from_rpy(roll, pitch, yaw), time, mode)
    }

    /// Single-point orientation move; `orientation` is in the pelvis frame.
    pub fn control_chest(
        &self,
        orientation: &Quaternion,
        time: f64,
        mode: ExecutionMode,
    ) -> Result<()> {
        let point = self.world_point(orientation, time)?;
        let mut msg = self.setup_message(mode);
        msg.taskspace_trajectory_points.push(point);
        self.execute_message(msg)
    }

    /// Message from pre-built pelvis-frame points. Times are kept; every
    /// orientation is converted to world frame. Fails without consuming an
    /// id when a transform is unavailable.
    pub fn from_points(
        &self,
        points: &[So3TrajectoryPoint],
        mode: ExecutionMode,
    ) -> Result<ChestTrajectory> {
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        let world = self.ctx.frame(FrameRole::World);
        let converted = points
            .iter()
            .map(|point| {
                let orientation =
                    self.ctx
                        .state
                        .transform_quaternion(&point.orientation, &pelvis, &world)?;
                Ok(So3TrajectoryPoint {
                    orientation,
                    ..*point
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut msg = self.setup_message(mode);
        msg.taskspace_trajectory_points = converted;
        Ok(msg)
    }

    pub fn execute_message(&self, msg: ChestTrajectory) -> Result<()> {
        wbc_debug!(
            context = LogContext::new()
                .with_limb("chest")
                .with_message_id(msg.unique_id),
            "publishing chest trajectory with {} points",
            msg.taskspace_trajectory_points.len()
        );
        self.sequencer.publish(&ControllerMessage::Chest(msg))
    }

    /// Send the chest home and block for the go-home settle time.
    pub fn reset_pose(&self, time: f64) -> Result<()> {
        let message = ControllerMessage::GoHome(GoHome {
            body_part: BodyPart::Chest,
            robot_side: RobotSide::Left,
            trajectory_time: time,
            unique_id: self.ctx.ids.next_id(),
        });
        self.sequencer.publish_go_home(&message)
    }

    /// Torso orientation relative to the pelvis.
    pub fn orientation(&self) -> Result<Quaternion> {
        let torso = self.ctx.frame(FrameRole::Torso);
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        Ok(self.ctx.state.current_pose(&torso, &pelvis)?.orientation)
    }

    pub fn joint_space_state(&self) -> Result<Vec<f64>> {
        Ok(self.ctx.state.joint_positions(LimbGroup::Chest)?)
    }

    pub fn task_space_state(&self, fixed_frame: &str) -> Result<Pose> {
        let torso = self.ctx.frame(FrameRole::Torso);
        Ok(self.ctx.state.current_pose(&torso, fixed_frame)?)
    }
}
