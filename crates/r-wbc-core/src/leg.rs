//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Task-space foot commands."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_msg::{
    ControllerMessage, ExecutionMode, FootTrajectory, Point, Pose, Quaternion, RobotSide,
    Se3TrajectoryPoint,
};

use crate::context::ControlContext;
use crate::description::FrameRole;
use crate::errors::{ControlError, Result};
use crate::sequencer::PublicationSequencer;
use crate::trajectory::evenly_spaced_time;

/// Toe-down orientation used when curling a leg, in the pelvis frame.
const CURL_ORIENTATION: Quaternion = Quaternion::new(0.0, 0.5, 0.0, 0.866);

pub struct LegController {
    ctx: ControlContext,
    sequencer: PublicationSequencer,
}

impl LegController {
    pub fn new(ctx: ControlContext) -> Self {
        let sequencer = PublicationSequencer::from_context(&ctx);
        Self { ctx, sequencer }
    }

    /// Evenly spaced world-frame foot targets.
    pub fn move_foot(&self, side: RobotSide, poses: &[Pose], total_time: f64) -> Result<()> {
        if poses.is_empty() {
            return Err(ControlError::malformed("foot pose list is empty"));
        }
        let count = poses.len();
        let points = poses
            .iter()
            .enumerate()
            .map(|(index, pose)| {
                self.point(pose, evenly_spaced_time(total_time, count, index + 1))
            })
            .collect();
        self.publish(side, points)
    }

    /// Lift the foot `offset` meters straight up from its current pose.
    pub fn raise_leg(&self, side: RobotSide, offset: f64, time: f64) -> Result<()> {
        let foot = self.ctx.frame(FrameRole::Foot(side));
        let world = self.ctx.frame(FrameRole::World);
        let mut goal = self.ctx.state.current_pose(&foot, &world)?;
        goal.position.z += offset;
        self.move_foot(side, &[goal], time)
    }

    /// Lower the foot `offset` meters.
    pub fn place_leg(&self, side: RobotSide, offset: f64, time: f64) -> Result<()> {
        self.raise_leg(side, -offset, time)
    }

    /// Swing the foot back and up by `radius`, pointing the toe down.
    pub fn curl_leg(&self, side: RobotSide, radius: f64, time: f64) -> Result<()> {
        let foot = self.ctx.frame(FrameRole::Foot(side));
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        let world = self.ctx.frame(FrameRole::World);
        let current = self.ctx.state.current_pose(&foot, &pelvis)?;
        let goal = Pose::new(
            Point::new(
                current.position.x - radius,
                current.position.y,
                current.position.z + radius,
            ),
            CURL_ORIENTATION,
        );
        let goal = self.ctx.state.transform_pose(&goal, &pelvis, &world)?;
        let point = self.point(&goal, time);
        self.publish(side, vec![point])
    }

    pub fn task_space_state(&self, side: RobotSide, fixed_frame: &str) -> Result<Pose> {
        let foot = self.ctx.frame(FrameRole::Foot(side));
        Ok(self.ctx.state.current_pose(&foot, fixed_frame)?)
    }

    fn point(&self, pose: &Pose, time: f64) -> Se3TrajectoryPoint {
        Se3TrajectoryPoint {
            time,
            position: pose.position,
            orientation: pose.orientation,
            linear_velocity: Point::default(),
            angular_velocity: Point::default(),
            unique_id: self.ctx.ids.next_id(),
        }
    }

    fn publish(&self, side: RobotSide, points: Vec<Se3TrajectoryPoint>) -> Result<()> {
        let msg = FootTrajectory {
            robot_side: side,
            execution_mode: ExecutionMode::Override,
            taskspace_trajectory_points: points,
            unique_id: self.ctx.ids.next_id(),
        };
        self.sequencer.publish(&ControllerMessage::Foot(msg))
    }
}
