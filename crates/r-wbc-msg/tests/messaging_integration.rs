//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "test"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Bus, identity and publisher integration tests."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::sync::Arc;

use r_wbc_msg::{
    ArmTrajectory, CommandBus, ControllerMessage, InMemoryPublisher, MessageIdGenerator,
    RobotSide, TrajectoryPoint1D,
};

fn bus_with_publisher() -> (CommandBus, Arc<InMemoryPublisher>) {
    let mut bus = CommandBus::new("/ihmc_ros/valkyrie/control");
    let publisher = Arc::new(InMemoryPublisher::new());
    bus.register_publisher(publisher.clone());
    (bus, publisher)
}

#[test]
fn shared_generator_stamps_message_and_points() -> anyhow::Result<()> {
    let (bus, publisher) = bus_with_publisher();
    let ids = Arc::new(MessageIdGenerator::new());

    let mut message = ArmTrajectory::empty(RobotSide::Right, 2);
    message.unique_id = ids.next_id();
    for joint in &mut message.joint_trajectories {
        joint.trajectory_points.push(TrajectoryPoint1D {
            time: 1.0,
            position: 0.2,
            velocity: 0.0,
            unique_id: ids.next_id(),
        });
        joint.unique_id = message.unique_id;
    }
    bus.publish(&ControllerMessage::Arm(message))?;

    let published = publisher.recv().expect("arm message");
    assert_eq!(published.topic, "/ihmc_ros/valkyrie/control/arm_trajectory");
    let ControllerMessage::Arm(arm) = published.message else {
        panic!("expected an arm message");
    };
    assert_eq!(arm.unique_id, 1);
    assert_eq!(arm.joint_trajectories[0].trajectory_points[0].unique_id, 2);
    assert_eq!(arm.joint_trajectories[1].trajectory_points[0].unique_id, 3);
    assert!(arm.joint_trajectories.iter().all(|j| j.unique_id == 1));
    assert_eq!(ids.peek(), 4);
    Ok(())
}

#[test]
fn wire_json_survives_a_publish_cycle() -> anyhow::Result<()> {
    let (bus, publisher) = bus_with_publisher();
    let message = ControllerMessage::Arm(ArmTrajectory::empty(RobotSide::Left, 7));
    bus.publish(&message)?;

    let captured = publisher.drain();
    let json = serde_json::to_string(&captured[0].message)?;
    let decoded: ControllerMessage = serde_json::from_str(&json)?;
    assert_eq!(decoded, message);
    Ok(())
}
