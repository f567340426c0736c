//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Controller topic naming."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

/// Controller input topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlTopic {
    /// Joint-space arm commands.
    ArmTrajectory,
    /// Task-space hand commands.
    HandTrajectory,
    /// Chest orientation commands.
    ChestTrajectory,
    /// Head orientation commands.
    HeadTrajectory,
    /// Neck joint commands.
    NeckTrajectory,
    /// Pelvis height commands.
    PelvisHeightTrajectory,
    /// Combined whole-body commands.
    WholeBodyTrajectory,
    /// Go-home commands.
    GoHome,
    /// Foot commands.
    FootTrajectory,
}

impl ControlTopic {
    /// Suffix appended to the controller topic prefix.
    pub fn suffix(&self) -> &'static str {
        match self {
            ControlTopic::ArmTrajectory => "/arm_trajectory",
            ControlTopic::HandTrajectory => "/hand_trajectory",
            ControlTopic::ChestTrajectory => "/chest_trajectory",
            ControlTopic::HeadTrajectory => "/head_trajectory",
            ControlTopic::NeckTrajectory => "/neck_trajectory",
            ControlTopic::PelvisHeightTrajectory => "/pelvis_height_trajectory",
            ControlTopic::WholeBodyTrajectory => "/whole_body_trajectory",
            ControlTopic::GoHome => "/go_home",
            ControlTopic::FootTrajectory => "/foot_trajectory",
        }
    }
}

/// Resolves [`ControlTopic`]s to fully qualified topic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicResolver {
    prefix: String,
}

impl TopicResolver {
    /// Create a resolver for the given prefix. A trailing `/` is dropped.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    /// Fully qualified topic name.
    pub fn resolve(&self, topic: ControlTopic) -> String {
        format!("{}{}", self.prefix, topic.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_joins_prefix_and_suffix() {
        let resolver = TopicResolver::new("/ihmc_ros/valkyrie/control/");
        assert_eq!(
            resolver.resolve(ControlTopic::WholeBodyTrajectory),
            "/ihmc_ros/valkyrie/control/whole_body_trajectory"
        );
        assert_eq!(
            resolver.resolve(ControlTopic::GoHome),
            "/ihmc_ros/valkyrie/control/go_home"
        );
    }
}
