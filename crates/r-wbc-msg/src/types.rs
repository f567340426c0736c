//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Controller message schema and planner-side trajectory inputs."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::topics::ControlTopic;

/// Correlation identifier carried by every message and trajectory point.
pub type MessageId = u64;

/// Identifier the controller treats as "do not execute".
pub const INVALID_MESSAGE_ID: MessageId = 0;

/// Side of the robot a sided limb belongs to. Discriminants match the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotSide {
    /// Left side (`0` on the wire).
    Left = 0,
    /// Right side (`1` on the wire).
    Right = 1,
}

impl RobotSide {
    /// Lowercase name used in logs and frame lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            RobotSide::Left => "left",
            RobotSide::Right => "right",
        }
    }
}

impl std::str::FromStr for RobotSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(RobotSide::Left),
            "right" | "r" => Ok(RobotSide::Right),
            other => Err(format!("unknown robot side: {}", other)),
        }
    }
}

/// Whether a new trajectory replaces the running one or is queued behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Replace the currently executing trajectory.
    #[default]
    Override,
    /// Execute after the currently executing trajectory.
    Queue,
}

/// Body the hand trajectory is controlled relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseForControl {
    /// Hand motion follows the chest.
    #[default]
    Chest,
    /// Hand motion is fixed in world.
    World,
    /// Hand motion follows the walking frame.
    Walking,
}

/// Body part addressed by a go-home command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// An arm (sided).
    Arm,
    /// The chest.
    Chest,
    /// The pelvis.
    Pelvis,
}

/// Cartesian position or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Point {
    /// Construct a point from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Orientation quaternion in `(x, y, z, w)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// Scalar component.
    pub w: f64,
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Construct a quaternion from components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position component.
    pub position: Point,
    /// Orientation component.
    pub orientation: Quaternion,
}

impl Pose {
    /// Construct a pose from a position and orientation.
    pub const fn new(position: Point, orientation: Quaternion) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Single-joint trajectory waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryPoint1D {
    /// Seconds since trajectory start.
    pub time: f64,
    /// Joint position in radians (meters for prismatic targets).
    pub position: f64,
    /// Joint velocity at the waypoint.
    pub velocity: f64,
    /// Process-unique point identifier.
    pub unique_id: MessageId,
}

/// Ordered waypoint list for one joint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OneDofJointTrajectory {
    /// Waypoints in time order.
    pub trajectory_points: Vec<TrajectoryPoint1D>,
    /// Identifier of the owning message.
    pub unique_id: MessageId,
}

/// Orientation-only task-space waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct So3TrajectoryPoint {
    /// Seconds since trajectory start.
    pub time: f64,
    /// Target orientation.
    pub orientation: Quaternion,
    /// Angular velocity at the waypoint.
    pub angular_velocity: Point,
    /// Process-unique point identifier.
    pub unique_id: MessageId,
}

/// Position and orientation task-space waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Se3TrajectoryPoint {
    /// Seconds since trajectory start.
    pub time: f64,
    /// Target position.
    pub position: Point,
    /// Target orientation.
    pub orientation: Quaternion,
    /// Linear velocity at the waypoint.
    pub linear_velocity: Point,
    /// Angular velocity at the waypoint.
    pub angular_velocity: Point,
    /// Process-unique point identifier.
    pub unique_id: MessageId,
}

/// Joint-space arm command. One [`OneDofJointTrajectory`] per arm joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmTrajectory {
    /// Arm addressed by this message.
    pub robot_side: RobotSide,
    /// Override or queue.
    pub execution_mode: ExecutionMode,
    /// Per-joint waypoint lists, in the arm's joint order.
    pub joint_trajectories: Vec<OneDofJointTrajectory>,
    /// Message identifier; `0` means "do not execute".
    pub unique_id: MessageId,
}

impl ArmTrajectory {
    /// Empty, non-executable arm message with `joint_count` empty joint lists.
    pub fn empty(robot_side: RobotSide, joint_count: usize) -> Self {
        Self {
            robot_side,
            execution_mode: ExecutionMode::Override,
            joint_trajectories: vec![OneDofJointTrajectory::default(); joint_count],
            unique_id: INVALID_MESSAGE_ID,
        }
    }

    /// Total number of waypoints across all joints.
    pub fn point_count(&self) -> usize {
        self.joint_trajectories
            .iter()
            .map(|joint| joint.trajectory_points.len())
            .sum()
    }
}

/// Task-space hand command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandTrajectory {
    /// Hand addressed by this message.
    pub robot_side: RobotSide,
    /// Body the trajectory is expressed relative to.
    pub base_for_control: BaseForControl,
    /// Override or queue.
    pub execution_mode: ExecutionMode,
    /// Task-space waypoints.
    pub taskspace_trajectory_points: Vec<Se3TrajectoryPoint>,
    /// Message identifier; `0` means "do not execute".
    pub unique_id: MessageId,
}

impl HandTrajectory {
    /// Empty, non-executable hand message.
    pub fn empty(robot_side: RobotSide) -> Self {
        Self {
            robot_side,
            base_for_control: BaseForControl::Chest,
            execution_mode: ExecutionMode::Override,
            taskspace_trajectory_points: Vec::new(),
            unique_id: INVALID_MESSAGE_ID,
        }
    }
}

/// Chest orientation command. Orientations are expressed in world frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChestTrajectory {
    /// Override or queue.
    pub execution_mode: ExecutionMode,
    /// Orientation waypoints.
    pub taskspace_trajectory_points: Vec<So3TrajectoryPoint>,
    /// Message identifier; `0` means "do not execute".
    pub unique_id: MessageId,
}

/// Head orientation command.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadTrajectory {
    /// Override or queue.
    pub execution_mode: ExecutionMode,
    /// Orientation waypoints.
    pub taskspace_trajectory_points: Vec<So3TrajectoryPoint>,
    /// Message identifier.
    pub unique_id: MessageId,
}

/// Joint-space neck command.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NeckTrajectory {
    /// Per-joint waypoint lists, in the neck's joint order.
    pub joint_trajectories: Vec<OneDofJointTrajectory>,
    /// Message identifier.
    pub unique_id: MessageId,
}

/// Pelvis height command.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PelvisHeightTrajectory {
    /// Override or queue.
    pub execution_mode: ExecutionMode,
    /// Height waypoints; `position` is the height in world frame.
    pub trajectory_points: Vec<TrajectoryPoint1D>,
    /// Message identifier.
    pub unique_id: MessageId,
}

/// Task-space foot command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootTrajectory {
    /// Foot addressed by this message.
    pub robot_side: RobotSide,
    /// Override or queue.
    pub execution_mode: ExecutionMode,
    /// Task-space waypoints in world frame.
    pub taskspace_trajectory_points: Vec<Se3TrajectoryPoint>,
    /// Message identifier; `0` means "do not execute".
    pub unique_id: MessageId,
}

impl FootTrajectory {
    /// Empty, non-executable foot message.
    pub fn empty(robot_side: RobotSide) -> Self {
        Self {
            robot_side,
            execution_mode: ExecutionMode::Override,
            taskspace_trajectory_points: Vec::new(),
            unique_id: INVALID_MESSAGE_ID,
        }
    }
}

/// Request to move a body part back to its home configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoHome {
    /// Body part to move.
    pub body_part: BodyPart,
    /// Side, meaningful for arms only.
    pub robot_side: RobotSide,
    /// Duration of the homing motion in seconds.
    pub trajectory_time: f64,
    /// Message identifier.
    pub unique_id: MessageId,
}

/// Combined multi-limb command. Sub-messages with `unique_id == 0` are ignored
/// by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WholeBodyTrajectory {
    /// Left arm joint-space sub-message.
    pub left_arm_trajectory: ArmTrajectory,
    /// Right arm joint-space sub-message.
    pub right_arm_trajectory: ArmTrajectory,
    /// Chest orientation sub-message.
    pub chest_trajectory: ChestTrajectory,
    /// Left foot placeholder.
    pub left_foot_trajectory: FootTrajectory,
    /// Right foot placeholder.
    pub right_foot_trajectory: FootTrajectory,
    /// Left hand placeholder.
    pub left_hand_trajectory: HandTrajectory,
    /// Right hand placeholder.
    pub right_hand_trajectory: HandTrajectory,
    /// Top-level message identifier.
    pub unique_id: MessageId,
}

impl WholeBodyTrajectory {
    /// Whole-body message with every sub-message in OVERRIDE mode and id `0`.
    pub fn empty(unique_id: MessageId) -> Self {
        Self {
            left_arm_trajectory: ArmTrajectory::empty(RobotSide::Left, 0),
            right_arm_trajectory: ArmTrajectory::empty(RobotSide::Right, 0),
            chest_trajectory: ChestTrajectory::default(),
            left_foot_trajectory: FootTrajectory::empty(RobotSide::Left),
            right_foot_trajectory: FootTrajectory::empty(RobotSide::Right),
            left_hand_trajectory: HandTrajectory::empty(RobotSide::Left),
            right_hand_trajectory: HandTrajectory::empty(RobotSide::Right),
            unique_id,
        }
    }
}

/// Every message kind the controller accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ControllerMessage {
    /// Joint-space arm command.
    Arm(ArmTrajectory),
    /// Task-space hand command.
    Hand(HandTrajectory),
    /// Chest orientation command.
    Chest(ChestTrajectory),
    /// Head orientation command.
    Head(HeadTrajectory),
    /// Neck joint command.
    Neck(NeckTrajectory),
    /// Pelvis height command.
    PelvisHeight(PelvisHeightTrajectory),
    /// Foot command.
    Foot(FootTrajectory),
    /// Go-home command.
    GoHome(GoHome),
    /// Whole-body command.
    WholeBody(WholeBodyTrajectory),
}

impl ControllerMessage {
    /// Convenience accessor returning the message kind as a static string.
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerMessage::Arm(_) => "arm",
            ControllerMessage::Hand(_) => "hand",
            ControllerMessage::Chest(_) => "chest",
            ControllerMessage::Head(_) => "head",
            ControllerMessage::Neck(_) => "neck",
            ControllerMessage::PelvisHeight(_) => "pelvis_height",
            ControllerMessage::Foot(_) => "foot",
            ControllerMessage::GoHome(_) => "go_home",
            ControllerMessage::WholeBody(_) => "whole_body",
        }
    }

    /// Top-level correlation identifier.
    pub fn unique_id(&self) -> MessageId {
        match self {
            ControllerMessage::Arm(msg) => msg.unique_id,
            ControllerMessage::Hand(msg) => msg.unique_id,
            ControllerMessage::Chest(msg) => msg.unique_id,
            ControllerMessage::Head(msg) => msg.unique_id,
            ControllerMessage::Neck(msg) => msg.unique_id,
            ControllerMessage::PelvisHeight(msg) => msg.unique_id,
            ControllerMessage::Foot(msg) => msg.unique_id,
            ControllerMessage::GoHome(msg) => msg.unique_id,
            ControllerMessage::WholeBody(msg) => msg.unique_id,
        }
    }

    /// Topic the message is published on.
    pub fn topic(&self) -> ControlTopic {
        match self {
            ControllerMessage::Arm(_) => ControlTopic::ArmTrajectory,
            ControllerMessage::Hand(_) => ControlTopic::HandTrajectory,
            ControllerMessage::Chest(_) => ControlTopic::ChestTrajectory,
            ControllerMessage::Head(_) => ControlTopic::HeadTrajectory,
            ControllerMessage::Neck(_) => ControlTopic::NeckTrajectory,
            ControllerMessage::PelvisHeight(_) => ControlTopic::PelvisHeightTrajectory,
            ControllerMessage::Foot(_) => ControlTopic::FootTrajectory,
            ControllerMessage::GoHome(_) => ControlTopic::GoHome,
            ControllerMessage::WholeBody(_) => ControlTopic::WholeBodyTrajectory,
        }
    }
}

/// Planner-supplied waypoint covering every joint of a [`JointTrajectory`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JointTrajectoryPoint {
    /// Positions aligned with the trajectory's joint names.
    pub positions: Vec<f64>,
    /// Velocities aligned with the trajectory's joint names. May be empty.
    #[serde(default)]
    pub velocities: Vec<f64>,
    /// Seconds since trajectory start.
    pub time_from_start: f64,
}

/// Planner-supplied multi-joint trajectory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JointTrajectory {
    /// Joint names, defining the column order of every point.
    pub joint_names: Vec<String>,
    /// Waypoints in time order.
    pub points: Vec<JointTrajectoryPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_message_is_tagged_by_kind() {
        let message = ControllerMessage::GoHome(GoHome {
            body_part: BodyPart::Arm,
            robot_side: RobotSide::Right,
            trajectory_time: 2.0,
            unique_id: 9,
        });
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["kind"], "go_home");
        assert_eq!(json["data"]["robot_side"], "right");
        assert_eq!(json["data"]["body_part"], "arm");
        assert_eq!(message.unique_id(), 9);
        assert_eq!(message.topic(), ControlTopic::GoHome);
    }

    #[test]
    fn empty_whole_body_defaults_to_override_and_invalid_ids() {
        let msg = WholeBodyTrajectory::empty(42);
        assert_eq!(msg.unique_id, 42);
        assert_eq!(msg.left_arm_trajectory.unique_id, INVALID_MESSAGE_ID);
        assert_eq!(msg.right_arm_trajectory.unique_id, INVALID_MESSAGE_ID);
        assert_eq!(msg.chest_trajectory.unique_id, INVALID_MESSAGE_ID);
        assert_eq!(msg.left_hand_trajectory.unique_id, INVALID_MESSAGE_ID);
        assert_eq!(msg.right_foot_trajectory.unique_id, INVALID_MESSAGE_ID);
        assert_eq!(msg.left_arm_trajectory.robot_side, RobotSide::Left);
        assert_eq!(msg.right_hand_trajectory.robot_side, RobotSide::Right);
        assert_eq!(msg.chest_trajectory.execution_mode, ExecutionMode::Override);
        assert_eq!(
            msg.left_foot_trajectory.execution_mode,
            ExecutionMode::Override
        );
    }

    #[test]
    fn planner_trajectory_velocities_are_optional() {
        let traj: JointTrajectory = serde_json::from_str(
            r#"{"joint_names":["torsoYaw"],"points":[{"positions":[0.1],"time_from_start":0.5}]}"#,
        )
        .expect("deserialize");
        assert!(traj.points[0].velocities.is_empty());
        assert_eq!(traj.points[0].time_from_start, 0.5);
    }

    #[test]
    fn robot_side_parses_short_names() {
        assert_eq!("L".parse::<RobotSide>(), Ok(RobotSide::Left));
        assert_eq!("right".parse::<RobotSide>(), Ok(RobotSide::Right));
        assert!("up".parse::<RobotSide>().is_err());
        assert_eq!(RobotSide::Right as i32, 1);
    }

    #[test]
    fn arm_point_count_sums_joints() {
        let mut msg = ArmTrajectory::empty(RobotSide::Left, 3);
        msg.joint_trajectories[0]
            .trajectory_points
            .push(TrajectoryPoint1D::default());
        msg.joint_trajectories[2]
            .trajectory_points
            .push(TrajectoryPoint1D::default());
        assert_eq!(msg.point_count(), 2);
    }
}
