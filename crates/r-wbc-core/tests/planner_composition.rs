//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "integration-tests"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Whole-body composition from serialized planner output."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::sync::Arc;

use anyhow::Result;
use r_wbc_common::{JointConfig, RobotConfig};
use r_wbc_core::{ConfiguredDescription, ControlContext, StaticStateProvider, WholeBodyComposer};
use r_wbc_msg::{
    CommandBus, ControllerMessage, InMemoryPublisher, JointTrajectory, Point, Pose, Quaternion,
    INVALID_MESSAGE_ID,
};
use r_wbc_rt::VirtualClock;

const PLAN: &str = r#"{
    "joint_names": [
        "leftHipYaw",
        "torsoYaw", "torsoPitch", "torsoRoll",
        "leftShoulderPitch", "leftShoulderRoll", "leftElbowPitch",
        "rightShoulderPitch", "rightShoulderRoll", "rightElbowPitch"
    ],
    "points": [
        {
            "positions": [0.3, 0.0, 0.1, 0.0, -0.2, -1.2, -0.4, 0.2, 1.2, 0.4],
            "velocities": [0.0, 0.0, 0.0, 0.0, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1],
            "time_from_start": 0.75
        },
        {
            "positions": [0.3, 0.0, 0.2, 0.0, -0.4, -1.4, -0.8, 0.4, 1.4, 0.8],
            "time_from_start": 1.5
        }
    ]
}"#;

fn robot() -> RobotConfig {
    let mut robot = RobotConfig::default();
    robot.limbs.chest = vec![
        JointConfig::new("torsoYaw", -1.329, 1.181),
        JointConfig::new("torsoPitch", -0.13, 0.666),
        JointConfig::new("torsoRoll", -0.23, 0.255),
    ];
    robot.limbs.left_arm = vec![
        JointConfig::new("leftShoulderPitch", -2.85, 2.0),
        JointConfig::new("leftShoulderRoll", -1.519, 1.266),
        JointConfig::new("leftElbowPitch", -2.174, 0.12),
    ];
    robot.limbs.right_arm = vec![
        JointConfig::new("rightShoulderPitch", -2.85, 2.0),
        JointConfig::new("rightShoulderRoll", -1.266, 1.519),
        JointConfig::new("rightElbowPitch", -0.12, 2.174),
    ];
    robot
}

fn composer() -> (WholeBodyComposer, Arc<InMemoryPublisher>) {
    let mut bus = CommandBus::new("/ihmc_ros/valkyrie/control");
    let publisher = Arc::new(InMemoryPublisher::new());
    bus.register_publisher(publisher.clone());
    let state = StaticStateProvider::new("world").with_frame(
        "pelvis",
        Pose::new(Point::new(0.0, 0.0, 1.0), Quaternion::IDENTITY),
    );
    let ctx = ControlContext::new(
        Arc::new(bus),
        Arc::new(VirtualClock::new()),
        Arc::new(ConfiguredDescription::new(robot())),
        Arc::new(state),
    );
    (WholeBodyComposer::new(ctx).expect("composer"), publisher)
}

#[test]
fn serialized_plan_populates_every_limb_on_one_time_axis() -> Result<()> {
    let plan: JointTrajectory = serde_json::from_str(PLAN)?;
    let (composer, _) = composer();

    let msg = composer.compose(&plan)?;

    for id in [
        msg.unique_id,
        msg.chest_trajectory.unique_id,
        msg.left_arm_trajectory.unique_id,
        msg.right_arm_trajectory.unique_id,
    ] {
        assert_ne!(id, INVALID_MESSAGE_ID);
    }
    assert_eq!(msg.left_hand_trajectory.unique_id, INVALID_MESSAGE_ID);
    assert_eq!(msg.left_foot_trajectory.unique_id, INVALID_MESSAGE_ID);

    let chest_times: Vec<_> = msg
        .chest_trajectory
        .taskspace_trajectory_points
        .iter()
        .map(|point| point.time)
        .collect();
    assert_eq!(chest_times, vec![0.75, 1.5]);

    let left_roll = &msg.left_arm_trajectory.joint_trajectories[1].trajectory_points;
    assert_eq!(left_roll[0].time, 0.75);
    assert_eq!(left_roll[1].time, 1.5);
    assert!((left_roll[1].position + 1.4).abs() < 1e-9);

    let right_elbow = &msg.right_arm_trajectory.joint_trajectories[2].trajectory_points;
    assert!((right_elbow[0].position - 0.4).abs() < 1e-9);
    assert_eq!(right_elbow[0].velocity, 0.0);
    Ok(())
}

#[test]
fn published_whole_body_message_is_tagged_on_the_wire() -> Result<()> {
    let plan: JointTrajectory = serde_json::from_str(PLAN)?;
    let (composer, publisher) = composer();

    composer.execute_trajectory(&plan)?;

    let sent = publisher.recv().expect("whole-body message");
    assert_eq!(
        sent.topic,
        "/ihmc_ros/valkyrie/control/whole_body_trajectory"
    );
    let wire = serde_json::to_value(&sent.message)?;
    assert_eq!(wire["kind"], "whole_body");
    let decoded: ControllerMessage = serde_json::from_value(wire)?;
    assert_eq!(decoded, sent.message);
    Ok(())
}
