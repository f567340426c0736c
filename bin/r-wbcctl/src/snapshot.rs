//! ---
//! wbc_section: "05-operator-interfaces"
//! wbc_subsection: "binary"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Robot state snapshots consumed by the operator CLI."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
//! Offline robot state.
//!
//! The CLI has no live feedback, so frame poses and joint positions come
//! from an optional JSON snapshot. Frames the snapshot omits fall back to a
//! robot standing at the world origin: pelvis, torso and head at identity,
//! feet with their sole on the ground.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use r_wbc_common::FrameConfig;
use r_wbc_core::{LimbGroup, StaticStateProvider};
use r_wbc_msg::{Point, Pose, Quaternion};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct StateSnapshot {
    /// Frame poses in world coordinates, keyed by frame name.
    #[serde(default)]
    pub frames: IndexMap<String, Pose>,
    #[serde(default)]
    pub joints: IndexMap<LimbGroup, Vec<f64>>,
}

impl StateSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("unable to read state snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse state snapshot {}", path.display()))
    }

    pub fn into_provider(self, frames: &FrameConfig) -> StaticStateProvider {
        let identity = Pose::new(Point::default(), Quaternion::IDENTITY);
        let sole = Pose::new(
            Point::new(0.0, 0.0, frames.foot_frame_offset),
            Quaternion::IDENTITY,
        );
        let defaults = [
            (&frames.pelvis, identity),
            (&frames.torso, identity),
            (&frames.head, identity),
            (&frames.left_end_effector, identity),
            (&frames.right_end_effector, identity),
            (&frames.left_foot, sole),
            (&frames.right_foot, sole),
        ];

        let provider = StaticStateProvider::new(frames.world.clone());
        for (frame, pose) in defaults {
            if !self.frames.contains_key(frame.as_str()) {
                provider.set_frame(frame.clone(), pose);
            }
        }
        for (frame, pose) in self.frames {
            provider.set_frame(frame, pose);
        }
        for (group, positions) in self.joints {
            provider.set_joint_positions(group, positions);
        }
        provider
    }
}

#[cfg(test)]
mod tests {
    use r_wbc_core::StateProvider;

    use super::*;

    #[test]
    fn missing_frames_fall_back_to_standing_defaults() {
        let mut frames = FrameConfig::default();
        frames.foot_frame_offset = 0.09;
        let provider = StateSnapshot::default().into_provider(&frames);

        let foot = provider.current_pose("leftFoot", "world").expect("foot");
        assert!((foot.position.z - 0.09).abs() < 1e-12);
        let pelvis = provider.current_pose("pelvis", "world").expect("pelvis");
        assert_eq!(pelvis.position, Point::default());
    }

    #[test]
    fn snapshot_frames_and_joints_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{
                "frames": {
                    "pelvis": {
                        "position": {"x": 0.0, "y": 0.0, "z": 1.05},
                        "orientation": {"x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0}
                    }
                },
                "joints": {"neck": [0.1, 0.0, -0.1]}
            }"#,
        )
        .expect("write");

        let provider = StateSnapshot::load(&path)
            .expect("load")
            .into_provider(&FrameConfig::default());
        let pelvis = provider.current_pose("pelvis", "world").expect("pelvis");
        assert!((pelvis.position.z - 1.05).abs() < 1e-12);
        assert_eq!(
            provider.joint_positions(LimbGroup::Neck).expect("neck"),
            vec![0.1, 0.0, -0.1]
        );
    }
}
