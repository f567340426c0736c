//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Robot description capability and its configuration-backed implementation."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_common::{JointConfig, RobotConfig};
use r_wbc_msg::RobotSide;
use serde::{Deserialize, Serialize};

/// Independently addressed joint group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimbGroup {
    LeftArm,
    RightArm,
    Chest,
    Neck,
}

impl LimbGroup {
    pub fn arm(side: RobotSide) -> Self {
        match side {
            RobotSide::Left => LimbGroup::LeftArm,
            RobotSide::Right => LimbGroup::RightArm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LimbGroup::LeftArm => "left_arm",
            LimbGroup::RightArm => "right_arm",
            LimbGroup::Chest => "chest",
            LimbGroup::Neck => "neck",
        }
    }
}

/// Named frames the controllers look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRole {
    World,
    Pelvis,
    Torso,
    Head,
    EndEffector(RobotSide),
    Foot(RobotSide),
}

/// Static robot facts: joint names, joint limits and frame names.
pub trait RobotDescriptionProvider: Send + Sync {
    /// Raw `(lower, upper)` limits in joint order, before any safety margin.
    fn joint_limits(&self, group: LimbGroup) -> Vec<(f64, f64)>;
    fn joint_names(&self, group: LimbGroup) -> Vec<String>;
    fn frame(&self, role: FrameRole) -> String;
    /// Height of the foot frame above the sole.
    fn foot_frame_offset(&self) -> f64;
}

/// Description backed by the `[robot]` configuration section.
#[derive(Debug, Clone)]
pub struct ConfiguredDescription {
    robot: RobotConfig,
}

impl ConfiguredDescription {
    pub fn new(robot: RobotConfig) -> Self {
        Self { robot }
    }

    fn joints(&self, group: LimbGroup) -> &[JointConfig] {
        let limbs = &self.robot.limbs;
        match group {
            LimbGroup::LeftArm => &limbs.left_arm,
            LimbGroup::RightArm => &limbs.right_arm,
            LimbGroup::Chest => &limbs.chest,
            LimbGroup::Neck => &limbs.neck,
        }
    }
}

impl RobotDescriptionProvider for ConfiguredDescription {
    fn joint_limits(&self, group: LimbGroup) -> Vec<(f64, f64)> {
        self.joints(group)
            .iter()
            .map(|joint| (joint.lower, joint.upper))
            .collect()
    }

    fn joint_names(&self, group: LimbGroup) -> Vec<String> {
        self.joints(group)
            .iter()
            .map(|joint| joint.name.clone())
            .collect()
    }

    fn frame(&self, role: FrameRole) -> String {
        let frames = &self.robot.frames;
        match role {
            FrameRole::World => frames.world.clone(),
            FrameRole::Pelvis => frames.pelvis.clone(),
            FrameRole::Torso => frames.torso.clone(),
            FrameRole::Head => frames.head.clone(),
            FrameRole::EndEffector(RobotSide::Left) => frames.left_end_effector.clone(),
            FrameRole::EndEffector(RobotSide::Right) => frames.right_end_effector.clone(),
            FrameRole::Foot(RobotSide::Left) => frames.left_foot.clone(),
            FrameRole::Foot(RobotSide::Right) => frames.right_foot.clone(),
        }
    }

    fn foot_frame_offset(&self) -> f64 {
        self.robot.frames.foot_frame_offset
    }
}

#[cfg(test)]
mod tests {
    use r_wbc_common::AppConfig;

    use super::*;

    const CONFIG: &str = r#"
[robot.frames]
left_foot = "leftFoot"
foot_frame_offset = 0.09

[[robot.limbs.left_arm]]
name = "leftShoulderPitch"
lower = -2.85
upper = 2.0

[[robot.limbs.right_arm]]
name = "rightShoulderPitch"
lower = -2.85
upper = 2.0

[[robot.limbs.chest]]
name = "torsoYaw"
lower = -1.329
upper = 1.181
"#;

    #[test]
    fn configured_description_reads_limbs_and_frames() {
        let config: AppConfig = CONFIG.parse().expect("config parses");
        let description = ConfiguredDescription::new(config.robot);

        assert_eq!(
            description.joint_names(LimbGroup::LeftArm),
            vec!["leftShoulderPitch".to_owned()]
        );
        assert_eq!(
            description.joint_limits(LimbGroup::Chest),
            vec![(-1.329, 1.181)]
        );
        assert!(description.joint_limits(LimbGroup::Neck).is_empty());
        assert_eq!(
            description.frame(FrameRole::Foot(RobotSide::Left)),
            "leftFoot"
        );
        assert_eq!(description.foot_frame_offset(), 0.09);
        assert_eq!(LimbGroup::arm(RobotSide::Right), LimbGroup::RightArm);
    }
}
