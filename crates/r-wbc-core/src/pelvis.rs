//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Pelvis height commands."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_msg::{
    BodyPart, ControllerMessage, ExecutionMode, GoHome, PelvisHeightTrajectory, Pose, RobotSide,
    TrajectoryPoint1D,
};
use tracing::debug;

use crate::context::ControlContext;
use crate::description::FrameRole;
use crate::errors::Result;
use crate::sequencer::PublicationSequencer;

pub struct PelvisController {
    ctx: ControlContext,
    sequencer: PublicationSequencer,
}

impl PelvisController {
    pub fn new(ctx: ControlContext) -> Self {
        let sequencer = PublicationSequencer::from_context(&ctx);
        Self { ctx, sequencer }
    }

    /// Move the pelvis to `height` meters above the left foot sole.
    pub fn control_pelvis_height(&self, height: f64, duration: f64) -> Result<()> {
        let foot = self.ctx.frame(FrameRole::Foot(RobotSide::Left));
        let world = self.ctx.frame(FrameRole::World);
        let foot_pose = self.ctx.state.current_pose(&foot, &world)?;
        let target = height + foot_pose.position.z - self.ctx.description.foot_frame_offset();
        debug!(height, target, "pelvis height target");

        let point = TrajectoryPoint1D {
            time: duration,
            position: target,
            velocity: 0.0,
            unique_id: self.ctx.ids.next_id(),
        };
        let msg = PelvisHeightTrajectory {
            execution_mode: ExecutionMode::Override,
            trajectory_points: vec![point],
            unique_id: self.ctx.ids.next_id(),
        };
        self.sequencer
            .publish(&ControllerMessage::PelvisHeight(msg))
    }

    /// Send the pelvis home and block for the go-home settle time.
    pub fn reset_pose(&self, time: f64) -> Result<()> {
        let message = ControllerMessage::GoHome(GoHome {
            body_part: BodyPart::Pelvis,
            robot_side: RobotSide::Left,
            trajectory_time: time,
            unique_id: self.ctx.ids.next_id(),
        });
        self.sequencer.publish_go_home(&message)
    }

    pub fn task_space_state(&self, fixed_frame: &str) -> Result<Pose> {
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        Ok(self.ctx.state.current_pose(&pelvis, fixed_frame)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use r_wbc_common::RobotConfig;
    use r_wbc_msg::{CommandBus, InMemoryPublisher, Point, Quaternion};
    use r_wbc_rt::VirtualClock;

    use super::*;
    use crate::description::ConfiguredDescription;
    use crate::errors::ControlError;
    use crate::state::StaticStateProvider;

    fn controller(
        state: StaticStateProvider,
    ) -> (PelvisController, Arc<InMemoryPublisher>, Arc<VirtualClock>) {
        let mut robot = RobotConfig::default();
        robot.frames.foot_frame_offset = 0.09;
        let mut bus = CommandBus::new("/ctrl");
        let publisher = Arc::new(InMemoryPublisher::new());
        bus.register_publisher(publisher.clone());
        let clock = Arc::new(VirtualClock::new());
        let ctx = ControlContext::new(
            Arc::new(bus),
            clock.clone(),
            Arc::new(ConfiguredDescription::new(robot)),
            Arc::new(state),
        );
        (PelvisController::new(ctx), publisher, clock)
    }

    #[test]
    fn height_is_relative_to_left_foot_sole() {
        let state = StaticStateProvider::new("world").with_frame(
            "leftFoot",
            Pose::new(Point::new(0.0, 0.1, 0.19), Quaternion::IDENTITY),
        );
        let (pelvis, publisher, _) = controller(state);
        pelvis.control_pelvis_height(0.9, 2.0).expect("height");

        let sent = publisher.recv().expect("pelvis message");
        assert_eq!(sent.topic, "/ctrl/pelvis_height_trajectory");
        let ControllerMessage::PelvisHeight(msg) = sent.message else {
            panic!("expected pelvis message");
        };
        let point = msg.trajectory_points[0];
        assert!((point.position - 1.0).abs() < 1e-9);
        assert_eq!(point.time, 2.0);
    }

    #[test]
    fn missing_foot_frame_is_lookup_error() {
        let (pelvis, publisher, _) = controller(StaticStateProvider::new("world"));
        assert!(matches!(
            pelvis.control_pelvis_height(0.9, 1.0),
            Err(ControlError::Lookup(_))
        ));
        assert!(publisher.is_empty());
    }

    #[test]
    fn reset_pose_settles() {
        let (pelvis, publisher, clock) = controller(StaticStateProvider::new("world"));
        pelvis.reset_pose(1.0).expect("reset");
        assert_eq!(publisher.len(), 1);
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
    }
}
