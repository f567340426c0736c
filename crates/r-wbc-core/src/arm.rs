//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Joint-space and task-space arm command construction."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
//! Arm commands.
//!
//! Joint-space messages carry one point list per arm joint. Every appended
//! waypoint is limit-enforced as a whole: either all joints receive a point
//! or none do. Task-space (hand) messages are not limit-checked.

use r_wbc_logging::{wbc_debug, wbc_warn, LogContext};
use r_wbc_msg::{
    ArmTrajectory, BaseForControl, BodyPart, ControllerMessage, ExecutionMode, GoHome,
    HandTrajectory, JointTrajectory, JointTrajectoryPoint, OneDofJointTrajectory, Point, Pose,
    RobotSide, Se3TrajectoryPoint,
};

use crate::context::ControlContext;
use crate::description::{FrameRole, LimbGroup};
use crate::errors::{ControlError, Result};
use crate::limits::JointLimitTable;
use crate::sequencer::PublicationSequencer;
use crate::trajectory::{append_limited_point, evenly_spaced_time};

/// One timed joint-space waypoint for one arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmJointData {
    pub side: RobotSide,
    pub positions: Vec<f64>,
    /// Seconds since trajectory start.
    pub time: f64,
}

/// One timed task-space target for one hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmTaskSpaceData {
    pub side: RobotSide,
    pub pose: Pose,
    pub time: f64,
}

/// Axis offsets for [`ArmController::nudge_arm`], in the pelvis frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
    Front,
    Back,
}

impl NudgeDirection {
    fn offset(&self, step: f64) -> Point {
        match self {
            NudgeDirection::Left => Point::new(0.0, step, 0.0),
            NudgeDirection::Right => Point::new(0.0, -step, 0.0),
            NudgeDirection::Up => Point::new(0.0, 0.0, step),
            NudgeDirection::Down => Point::new(0.0, 0.0, -step),
            NudgeDirection::Front => Point::new(step, 0.0, 0.0),
            NudgeDirection::Back => Point::new(-step, 0.0, 0.0),
        }
    }
}

/// Predefined arm configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedPose {
    /// Controller-defined home, requested with a go-home command.
    Home,
    /// Every joint at zero (limit-enforced).
    Zero,
}

pub struct ArmController {
    ctx: ControlContext,
    left: JointLimitTable,
    right: JointLimitTable,
    sequencer: PublicationSequencer,
}

impl ArmController {
    /// Load both arms' limit tables. Fails when either table is empty or
    /// inconsistent with its joint names.
    pub fn new(ctx: ControlContext) -> Result<Self> {
        let load = |group| {
            JointLimitTable::load(
                ctx.description.as_ref(),
                group,
                ctx.safety.limit_margin,
                ctx.safety.clamp_policy,
            )
        };
        let left = load(LimbGroup::LeftArm)?;
        let right = load(LimbGroup::RightArm)?;
        let sequencer = PublicationSequencer::from_context(&ctx);
        Ok(Self {
            ctx,
            left,
            right,
            sequencer,
        })
    }

    pub fn limits(&self, side: RobotSide) -> &JointLimitTable {
        match side {
            RobotSide::Left => &self.left,
            RobotSide::Right => &self.right,
        }
    }

    pub fn joint_count(&self, side: RobotSide) -> usize {
        self.limits(side).joint_count()
    }

    /// Fresh OVERRIDE message with one empty list per joint and a new id.
    pub fn setup_message(&self, side: RobotSide) -> ArmTrajectory {
        let mut msg = ArmTrajectory::empty(side, self.joint_count(side));
        msg.unique_id = self.ctx.ids.next_id();
        msg
    }

    /// Append one waypoint at `time`, limit-enforcing every joint.
    ///
    /// On a joint-count mismatch the message is left untouched and no id is
    /// consumed.
    pub fn append_joint_waypoint(
        &self,
        msg: &mut ArmTrajectory,
        time: f64,
        positions: &[f64],
    ) -> Result<()> {
        self.append(msg, time, positions, &[])
    }

    /// Append a planner-supplied point. Time comes from the point itself.
    pub fn append_planned_point(
        &self,
        msg: &mut ArmTrajectory,
        point: &JointTrajectoryPoint,
    ) -> Result<()> {
        self.append(
            msg,
            point.time_from_start,
            &point.positions,
            &point.velocities,
        )
    }

    fn append(
        &self,
        msg: &mut ArmTrajectory,
        time: f64,
        positions: &[f64],
        velocities: &[f64],
    ) -> Result<()> {
        let side = msg.robot_side;
        let owner = msg.unique_id;
        append_limited_point(
            &mut msg.joint_trajectories,
            self.limits(side),
            &self.ctx.ids,
            owner,
            time,
            positions,
            velocities,
        )
        .map_err(|err| {
            let ctx = LogContext::new()
                .with_limb(LimbGroup::arm(side).as_str())
                .with_side(side.as_str())
                .with_message_id(owner);
            wbc_warn!(context = ctx, "arm waypoint discarded: {}", err);
            err
        })
    }

    /// Evenly spaced message: the k-th of n waypoints lands at `total_time / n * k`.
    pub fn generate_message(
        &self,
        side: RobotSide,
        waypoints: &[Vec<f64>],
        total_time: f64,
    ) -> Result<ArmTrajectory> {
        self.check_waypoints(side, waypoints)?;
        let mut msg = self.setup_message(side);
        let count = waypoints.len();
        for (index, positions) in waypoints.iter().enumerate() {
            let time = evenly_spaced_time(total_time, count, index + 1);
            self.append_joint_waypoint(&mut msg, time, positions)?;
        }
        Ok(msg)
    }

    fn check_waypoints(&self, side: RobotSide, waypoints: &[Vec<f64>]) -> Result<()> {
        let ctx = LogContext::new()
            .with_limb(LimbGroup::arm(side).as_str())
            .with_side(side.as_str());
        if waypoints.is_empty() {
            wbc_warn!(context = ctx, "arm waypoint list is empty");
            return Err(ControlError::malformed("arm waypoint list is empty"));
        }
        let expected = self.joint_count(side);
        if let Some(bad) = waypoints.iter().position(|w| w.len() != expected) {
            wbc_warn!(
                context = ctx,
                "waypoint {} has {} joints, expected {}",
                bad,
                waypoints[bad].len(),
                expected
            );
            return Err(ControlError::malformed(format!(
                "waypoint {} has {} joints, expected {}",
                bad,
                waypoints[bad].len(),
                expected
            )));
        }
        for positions in waypoints {
            self.limits(side).enforce(positions)?;
        }
        Ok(())
    }

    /// Build and publish an evenly spaced joint-space move.
    pub fn move_arm_joints(
        &self,
        side: RobotSide,
        waypoints: &[Vec<f64>],
        total_time: f64,
    ) -> Result<()> {
        let msg = self.generate_message(side, waypoints, total_time)?;
        self.execute_message(msg)
    }

    /// Move both arms. Every entry is validated before anything is built;
    /// the right arm is published first, then the left after the pair gap.
    pub fn move_arm_pair(&self, data: &[ArmJointData]) -> Result<()> {
        if data.is_empty() {
            return Err(ControlError::malformed("arm pair data is empty"));
        }
        for entry in data {
            let expected = self.joint_count(entry.side);
            if entry.positions.len() != expected {
                wbc_warn!(
                    context = LogContext::new()
                        .with_side(entry.side.as_str())
                        .with_command("move_arm_pair"),
                    "expected {} joints, received {}",
                    expected,
                    entry.positions.len()
                );
                return Err(ControlError::malformed(format!(
                    "{} arm expects {} joints, received {}",
                    entry.side.as_str(),
                    expected,
                    entry.positions.len()
                )));
            }
            self.limits(entry.side).enforce(&entry.positions)?;
        }

        let has = |side| data.iter().any(|entry| entry.side == side);
        let mut right = has(RobotSide::Right).then(|| self.setup_message(RobotSide::Right));
        let mut left = has(RobotSide::Left).then(|| self.setup_message(RobotSide::Left));
        for entry in data {
            let target = match entry.side {
                RobotSide::Right => right.as_mut(),
                RobotSide::Left => left.as_mut(),
            };
            if let Some(msg) = target {
                self.append_joint_waypoint(msg, entry.time, &entry.positions)?;
            }
        }

        let right = right.map(ControllerMessage::Arm);
        let left = left.map(ControllerMessage::Arm);
        self.sequencer
            .publish_pair(right.as_ref(), left.as_ref(), "move_arm_pair")
    }

    /// Wrap already limit-checked joint lists verbatim. No clamping is applied.
    pub fn raw_message(
        &self,
        side: RobotSide,
        joint_trajectories: Vec<OneDofJointTrajectory>,
    ) -> ArmTrajectory {
        ArmTrajectory {
            robot_side: side,
            execution_mode: ExecutionMode::Override,
            joint_trajectories,
            unique_id: self.ctx.ids.next_id(),
        }
    }

    pub fn move_arm_raw(
        &self,
        side: RobotSide,
        joint_trajectories: Vec<OneDofJointTrajectory>,
    ) -> Result<()> {
        let msg = self.raw_message(side, joint_trajectories);
        self.execute_message(msg)
    }

    /// Publish an already built arm message.
    pub fn execute_message(&self, msg: ArmTrajectory) -> Result<()> {
        wbc_debug!(
            context = LogContext::new()
                .with_side(msg.robot_side.as_str())
                .with_message_id(msg.unique_id),
            "publishing arm trajectory with {} points",
            msg.point_count()
        );
        self.sequencer.publish(&ControllerMessage::Arm(msg))
    }

    /// Publish a planner trajectory. Joint names, when present, must match the
    /// arm's joint order exactly.
    pub fn move_arm_trajectory(&self, side: RobotSide, trajectory: &JointTrajectory) -> Result<()> {
        let table = self.limits(side);
        if !trajectory.joint_names.is_empty() && trajectory.joint_names != table.names() {
            return Err(ControlError::SequenceViolation {
                group: table.group().as_str(),
                expected: table.names().to_vec(),
                found: trajectory.joint_names.clone(),
            });
        }
        if trajectory.points.is_empty() {
            return Err(ControlError::malformed("arm trajectory has no points"));
        }
        if trajectory
            .points
            .iter()
            .any(|point| point.positions.len() != table.joint_count())
        {
            return Err(ControlError::malformed(format!(
                "arm trajectory points must carry {} positions",
                table.joint_count()
            )));
        }
        for point in &trajectory.points {
            table.enforce(&point.positions)?;
        }

        let mut msg = self.setup_message(side);
        for point in &trajectory.points {
            self.append_planned_point(&mut msg, point)?;
        }
        self.execute_message(msg)
    }

    /// Move one joint to `angle`, holding the others at their current positions.
    pub fn move_arm_joint(&self, side: RobotSide, index: usize, angle: f64, time: f64) -> Result<()> {
        let group = LimbGroup::arm(side);
        let count = self.joint_count(side);
        if index >= count {
            return Err(ControlError::UnknownJoint {
                group: group.as_str(),
                index,
                count,
            });
        }
        let mut positions = self.ctx.state.joint_positions(group)?;
        if positions.len() != count {
            return Err(ControlError::malformed(format!(
                "state reports {} {} joints, expected {}",
                positions.len(),
                group.as_str(),
                count
            )));
        }
        positions[index] = angle;
        self.move_arm_joints(side, &[positions], time)
    }

    /// Task-space point copied from `pose` with a fresh id. Not limit-checked.
    pub fn to_task_space_point(&self, pose: &Pose, time: f64) -> Se3TrajectoryPoint {
        Se3TrajectoryPoint {
            time,
            position: pose.position,
            orientation: pose.orientation,
            linear_velocity: Point::default(),
            angular_velocity: Point::default(),
            unique_id: self.ctx.ids.next_id(),
        }
    }

    fn hand_message(&self, side: RobotSide) -> HandTrajectory {
        HandTrajectory {
            robot_side: side,
            base_for_control: BaseForControl::Chest,
            execution_mode: ExecutionMode::Override,
            taskspace_trajectory_points: Vec::new(),
            unique_id: self.ctx.ids.next_id(),
        }
    }

    pub fn move_arm_in_task_space(&self, side: RobotSide, pose: &Pose, time: f64) -> Result<()> {
        let point = self.to_task_space_point(pose, time);
        let mut msg = self.hand_message(side);
        msg.taskspace_trajectory_points.push(point);
        self.sequencer.publish(&ControllerMessage::Hand(msg))
    }

    /// Task-space move for both hands, right published first.
    pub fn move_arm_pair_in_task_space(&self, data: &[ArmTaskSpaceData]) -> Result<()> {
        if data.is_empty() {
            return Err(ControlError::malformed("task-space pair data is empty"));
        }
        let mut right = self.hand_message(RobotSide::Right);
        let mut left = self.hand_message(RobotSide::Left);
        for entry in data {
            let point = self.to_task_space_point(&entry.pose, entry.time);
            match entry.side {
                RobotSide::Right => right.taskspace_trajectory_points.push(point),
                RobotSide::Left => left.taskspace_trajectory_points.push(point),
            }
        }

        let right = (!right.taskspace_trajectory_points.is_empty()).then_some(right);
        let left = (!left.taskspace_trajectory_points.is_empty()).then_some(left);
        self.sequencer.publish_pair(
            right.map(ControllerMessage::Hand).as_ref(),
            left.map(ControllerMessage::Hand).as_ref(),
            "move_arm_pair_in_task_space",
        )
    }

    /// Offset the end effector by `step` meters along a pelvis-frame axis.
    /// The resulting pose is sent in world frame with zero trajectory time.
    pub fn nudge_arm(&self, side: RobotSide, direction: NudgeDirection, step: f64) -> Result<()> {
        let end_effector = self.ctx.frame(FrameRole::EndEffector(side));
        let pelvis = self.ctx.frame(FrameRole::Pelvis);
        let world = self.ctx.frame(FrameRole::World);

        let mut pose = self.ctx.state.current_pose(&end_effector, &pelvis)?;
        let offset = direction.offset(step);
        pose.position.x += offset.x;
        pose.position.y += offset.y;
        pose.position.z += offset.z;
        wbc_debug!(
            context = LogContext::new()
                .with_side(side.as_str())
                .with_command("nudge_arm"),
            "nudged palm target in pelvis frame: x={:.3} y={:.3} z={:.3}",
            pose.position.x,
            pose.position.y,
            pose.position.z
        );

        let target = self.ctx.state.transform_pose(&pose, &pelvis, &world)?;
        self.move_arm_in_task_space(side, &target, 0.0)
    }

    /// Send the arm to a predefined pose and block for the go-home settle time.
    pub fn move_to_named_pose(&self, side: RobotSide, pose: NamedPose, time: f64) -> Result<()> {
        let message = match pose {
            NamedPose::Home => ControllerMessage::GoHome(GoHome {
                body_part: BodyPart::Arm,
                robot_side: side,
                trajectory_time: time,
                unique_id: self.ctx.ids.next_id(),
            }),
            NamedPose::Zero => {
                let zero = vec![0.0; self.joint_count(side)];
                let mut msg = self.setup_message(side);
                self.append_joint_waypoint(&mut msg, time, &zero)?;
                ControllerMessage::Arm(msg)
            }
        };
        self.sequencer.publish_go_home(&message)
    }

    pub fn move_to_default_pose(&self, side: RobotSide, time: f64) -> Result<()> {
        self.move_to_named_pose(side, NamedPose::Home, time)
    }

    pub fn joint_space_state(&self, side: RobotSide) -> Result<Vec<f64>> {
        Ok(self.ctx.state.joint_positions(LimbGroup::arm(side))?)
    }

    /// End-effector pose expressed in `fixed_frame`.
    pub fn task_space_state(&self, side: RobotSide, fixed_frame: &str) -> Result<Pose> {
        let end_effector = self.ctx.frame(FrameRole::EndEffector(side));
        Ok(self.ctx.state.current_pose(&end_effector, fixed_frame)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use r_wbc_common::{ClampPolicy, JointConfig, RobotConfig};
    use r_wbc_msg::{CommandBus, InMemoryPublisher, Quaternion};
    use r_wbc_rt::VirtualClock;

    use super::*;
    use crate::description::ConfiguredDescription;
    use crate::state::StaticStateProvider;

    struct Rig {
        arm: ArmController,
        ctx: ControlContext,
        publisher: Arc<InMemoryPublisher>,
        clock: Arc<VirtualClock>,
    }

    fn robot() -> RobotConfig {
        let mut robot = RobotConfig::default();
        robot.limbs.left_arm = vec![
            JointConfig::new("l0", -1.01, 1.01),
            JointConfig::new("l1", -2.01, 0.51),
            JointConfig::new("l2", -0.51, 0.51),
        ];
        robot.limbs.right_arm = vec![
            JointConfig::new("r0", -1.01, 1.01),
            JointConfig::new("r1", -0.51, 2.01),
            JointConfig::new("r2", -0.51, 0.51),
        ];
        robot.limbs.chest = vec![JointConfig::new("torsoYaw", -1.0, 1.0)];
        robot
    }

    fn rig_with(policy: ClampPolicy, state: StaticStateProvider) -> Rig {
        let mut bus = CommandBus::new("/ctrl");
        let publisher = Arc::new(InMemoryPublisher::new());
        bus.register_publisher(publisher.clone());
        let clock = Arc::new(VirtualClock::new());
        let mut ctx = ControlContext::new(
            Arc::new(bus),
            clock.clone(),
            Arc::new(ConfiguredDescription::new(robot())),
            Arc::new(state),
        );
        ctx.safety.clamp_policy = policy;
        let arm = ArmController::new(ctx.clone()).expect("arm controller");
        Rig {
            arm,
            ctx,
            publisher,
            clock,
        }
    }

    fn rig() -> Rig {
        rig_with(ClampPolicy::Clamp, StaticStateProvider::new("world"))
    }

    fn arm_message(message: &ControllerMessage) -> &ArmTrajectory {
        match message {
            ControllerMessage::Arm(msg) => msg,
            other => panic!("expected arm message, got {}", other.kind()),
        }
    }

    #[test]
    fn generated_waypoints_are_evenly_spaced_and_clamped() {
        let rig = rig();
        let msg = rig
            .arm
            .generate_message(
                RobotSide::Left,
                &[vec![0.0, 0.0, 0.0], vec![1.5, -3.0, 0.2], vec![0.1, 0.1, 0.1]],
                3.0,
            )
            .expect("message");

        assert_eq!(msg.unique_id, 1);
        assert_eq!(msg.joint_trajectories.len(), 3);
        let times: Vec<_> = msg.joint_trajectories[0]
            .trajectory_points
            .iter()
            .map(|p| p.time)
            .collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);

        let second = &msg.joint_trajectories[0].trajectory_points[1];
        assert!((second.position - 1.0).abs() < 1e-9);
        let lower = &msg.joint_trajectories[1].trajectory_points[1];
        assert!((lower.position + 2.0).abs() < 1e-9);
        assert!(msg.joint_trajectories.iter().all(|j| j.unique_id == 1));
        // message id 1, then 9 point ids
        assert_eq!(rig.ctx.ids.peek(), 11);
    }

    #[test]
    fn mismatched_waypoint_leaves_message_and_counter_untouched() {
        let rig = rig();
        let mut msg = rig.arm.setup_message(RobotSide::Right);
        let before = rig.ctx.ids.peek();

        let result = rig.arm.append_joint_waypoint(&mut msg, 1.0, &[0.1, 0.2]);

        assert!(matches!(result, Err(ControlError::MalformedInput(_))));
        assert_eq!(msg.point_count(), 0);
        assert_eq!(rig.ctx.ids.peek(), before);
    }

    #[test]
    fn generate_message_rejects_bad_waypoint_before_consuming_ids() {
        let rig = rig();
        let result = rig.arm.generate_message(
            RobotSide::Left,
            &[vec![0.0, 0.0, 0.0], vec![0.0, 0.0]],
            2.0,
        );
        assert!(matches!(result, Err(ControlError::MalformedInput(_))));
        assert!(matches!(
            rig.arm.generate_message(RobotSide::Left, &[], 2.0),
            Err(ControlError::MalformedInput(_))
        ));
        assert_eq!(rig.ctx.ids.peek(), 1);
        assert!(rig.publisher.is_empty());
    }

    #[test]
    fn reject_policy_refuses_out_of_range_waypoint() {
        let rig = rig_with(ClampPolicy::Reject, StaticStateProvider::new("world"));
        let result = rig
            .arm
            .move_arm_joints(RobotSide::Left, &[vec![1.5, 0.0, 0.0]], 1.0);
        assert!(matches!(result, Err(ControlError::LimitViolation { .. })));
        assert!(rig.publisher.is_empty());
    }

    #[test]
    fn planned_points_keep_their_own_time_and_velocity() {
        let rig = rig();
        let trajectory = JointTrajectory {
            joint_names: vec!["r0".into(), "r1".into(), "r2".into()],
            points: vec![
                JointTrajectoryPoint {
                    positions: vec![0.1, 0.2, 0.3],
                    velocities: vec![0.5, 0.5, 0.5],
                    time_from_start: 0.7,
                },
                JointTrajectoryPoint {
                    positions: vec![0.2, 0.3, 0.4],
                    velocities: Vec::new(),
                    time_from_start: 1.9,
                },
            ],
        };
        rig.arm
            .move_arm_trajectory(RobotSide::Right, &trajectory)
            .expect("trajectory");

        let sent = rig.publisher.recv().expect("published");
        assert_eq!(sent.topic, "/ctrl/arm_trajectory");
        let msg = arm_message(&sent.message);
        let points = &msg.joint_trajectories[2].trajectory_points;
        assert_eq!(points[0].time, 0.7);
        assert_eq!(points[0].velocity, 0.5);
        assert_eq!(points[1].time, 1.9);
        assert_eq!(points[1].velocity, 0.0);
    }

    #[test]
    fn planner_trajectory_with_foreign_joint_order_is_refused() {
        let rig = rig();
        let trajectory = JointTrajectory {
            joint_names: vec!["r1".into(), "r0".into(), "r2".into()],
            points: vec![JointTrajectoryPoint {
                positions: vec![0.0; 3],
                velocities: Vec::new(),
                time_from_start: 1.0,
            }],
        };
        assert!(matches!(
            rig.arm.move_arm_trajectory(RobotSide::Right, &trajectory),
            Err(ControlError::SequenceViolation { .. })
        ));
        assert!(rig.publisher.is_empty());
    }

    #[test]
    fn arm_pair_publishes_right_first_with_gap() {
        let rig = rig();
        rig.arm
            .move_arm_pair(&[
                ArmJointData {
                    side: RobotSide::Left,
                    positions: vec![0.1, 0.1, 0.1],
                    time: 1.0,
                },
                ArmJointData {
                    side: RobotSide::Right,
                    positions: vec![0.2, 0.2, 0.2],
                    time: 1.0,
                },
            ])
            .expect("pair");

        let sent = rig.publisher.drain();
        assert_eq!(sent.len(), 2);
        assert_eq!(arm_message(&sent[0].message).robot_side, RobotSide::Right);
        assert_eq!(arm_message(&sent[1].message).robot_side, RobotSide::Left);
        assert_eq!(rig.clock.pauses(), vec![Duration::from_millis(20)]);
    }

    #[test]
    fn arm_pair_with_bad_entry_publishes_nothing() {
        let rig = rig();
        let result = rig.arm.move_arm_pair(&[
            ArmJointData {
                side: RobotSide::Right,
                positions: vec![0.2, 0.2, 0.2],
                time: 1.0,
            },
            ArmJointData {
                side: RobotSide::Left,
                positions: vec![0.1],
                time: 1.0,
            },
        ]);
        assert!(result.is_err());
        assert!(rig.publisher.is_empty());
        assert!(rig.clock.pauses().is_empty());
    }

    #[test]
    fn raw_message_is_passed_through_unclamped() {
        let rig = rig();
        let mut joint = OneDofJointTrajectory::default();
        joint.trajectory_points.push(r_wbc_msg::TrajectoryPoint1D {
            time: 1.0,
            position: 9.0,
            velocity: 0.0,
            unique_id: 77,
        });
        let msg = rig.arm.raw_message(RobotSide::Left, vec![joint]);
        assert_eq!(msg.execution_mode, ExecutionMode::Override);
        assert_eq!(msg.joint_trajectories[0].trajectory_points[0].position, 9.0);
        assert_eq!(msg.unique_id, 1);
    }

    #[test]
    fn go_home_blocks_for_settle_time() {
        let rig = rig();
        rig.arm
            .move_to_default_pose(RobotSide::Left, 2.0)
            .expect("go home");
        let sent = rig.publisher.recv().expect("go home sent");
        assert_eq!(sent.topic, "/ctrl/go_home");
        match sent.message {
            ControllerMessage::GoHome(home) => {
                assert_eq!(home.body_part, BodyPart::Arm);
                assert_eq!(home.robot_side, RobotSide::Left);
                assert_eq!(home.trajectory_time, 2.0);
            }
            other => panic!("unexpected {}", other.kind()),
        }
        assert_eq!(rig.clock.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn move_arm_joint_replaces_one_joint_of_current_state() {
        let state = StaticStateProvider::new("world")
            .with_joint_positions(LimbGroup::LeftArm, vec![0.3, -0.4, 0.1]);
        let rig = rig_with(ClampPolicy::Clamp, state);
        rig.arm
            .move_arm_joint(RobotSide::Left, 1, -0.2, 1.5)
            .expect("joint move");

        let sent = rig.publisher.recv().expect("published");
        let msg = arm_message(&sent.message);
        let positions: Vec<_> = msg
            .joint_trajectories
            .iter()
            .map(|j| j.trajectory_points[0].position)
            .collect();
        assert_eq!(positions, vec![0.3, -0.2, 0.1]);
        assert_eq!(msg.joint_trajectories[0].trajectory_points[0].time, 1.5);
        assert!(matches!(
            rig.arm.move_arm_joint(RobotSide::Left, 3, 0.0, 1.0),
            Err(ControlError::UnknownJoint { index: 3, .. })
        ));
    }

    #[test]
    fn nudge_offsets_in_pelvis_frame_and_sends_world_pose() {
        let state = StaticStateProvider::new("world")
            .with_frame(
                "pelvis",
                Pose::new(Point::new(0.0, 0.0, 1.0), Quaternion::IDENTITY),
            )
            .with_frame(
                "leftPalm",
                Pose::new(Point::new(0.4, 0.3, 1.2), Quaternion::IDENTITY),
            );
        let rig = rig_with(ClampPolicy::Clamp, state);
        rig.arm
            .nudge_arm(RobotSide::Left, NudgeDirection::Up, 0.05)
            .expect("nudge");

        let sent = rig.publisher.recv().expect("hand message");
        assert_eq!(sent.topic, "/ctrl/hand_trajectory");
        let ControllerMessage::Hand(hand) = sent.message else {
            panic!("expected hand message");
        };
        let target = hand.taskspace_trajectory_points[0].position;
        assert!((target.x - 0.4).abs() < 1e-9);
        assert!((target.y - 0.3).abs() < 1e-9);
        assert!((target.z - 1.25).abs() < 1e-9);
        assert_eq!(hand.base_for_control, BaseForControl::Chest);
    }

    #[test]
    fn nudge_without_palm_frame_is_lookup_error() {
        let rig = rig();
        assert!(matches!(
            rig.arm.nudge_arm(RobotSide::Right, NudgeDirection::Left, 0.1),
            Err(ControlError::Lookup(_))
        ));
        assert!(rig.publisher.is_empty());
    }

    #[test]
    fn task_space_pair_orders_right_before_left() {
        let rig = rig();
        let pose = Pose::new(Point::new(0.5, 0.0, 1.0), Quaternion::IDENTITY);
        rig.arm
            .move_arm_pair_in_task_space(&[
                ArmTaskSpaceData {
                    side: RobotSide::Left,
                    pose,
                    time: 1.0,
                },
                ArmTaskSpaceData {
                    side: RobotSide::Right,
                    pose,
                    time: 1.0,
                },
            ])
            .expect("pair");
        let sides: Vec<_> = rig
            .publisher
            .drain()
            .into_iter()
            .map(|m| match m.message {
                ControllerMessage::Hand(hand) => hand.robot_side,
                other => panic!("unexpected {}", other.kind()),
            })
            .collect();
        assert_eq!(sides, vec![RobotSide::Right, RobotSide::Left]);
        assert_eq!(rig.clock.pauses(), vec![Duration::from_millis(20)]);
    }
}
