//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Robot state capability and an in-memory implementation."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use indexmap::IndexMap;
use nalgebra::Isometry3;
use parking_lot::RwLock;
use r_wbc_msg::{Pose, Quaternion};

use crate::description::LimbGroup;
use crate::errors::LookupError;
use crate::geometry::{from_isometry, from_unit_quaternion, to_isometry, to_unit_quaternion};

/// Live robot state: joint positions and frame transforms.
pub trait StateProvider: Send + Sync {
    fn joint_positions(&self, group: LimbGroup) -> Result<Vec<f64>, LookupError>;

    /// Every known joint position. Defaults to chest, left arm, right arm, neck.
    fn all_joint_positions(&self) -> Result<Vec<f64>, LookupError> {
        let mut joints = Vec::new();
        for group in [
            LimbGroup::Chest,
            LimbGroup::LeftArm,
            LimbGroup::RightArm,
            LimbGroup::Neck,
        ] {
            joints.extend(self.joint_positions(group)?);
        }
        Ok(joints)
    }

    /// Pose of `frame` expressed in `reference`.
    fn current_pose(&self, frame: &str, reference: &str) -> Result<Pose, LookupError>;

    /// Re-express an orientation given in `from` in frame `to`.
    fn transform_quaternion(
        &self,
        quaternion: &Quaternion,
        from: &str,
        to: &str,
    ) -> Result<Quaternion, LookupError>;

    /// Re-express a pose given in `from` in frame `to`.
    fn transform_pose(&self, pose: &Pose, from: &str, to: &str) -> Result<Pose, LookupError>;
}

/// State provider holding fixed frame poses and joint positions.
///
/// Every frame is stored relative to the world frame, which is always known.
pub struct StaticStateProvider {
    world: String,
    frames: RwLock<IndexMap<String, Isometry3<f64>>>,
    joints: RwLock<IndexMap<LimbGroup, Vec<f64>>>,
}

impl StaticStateProvider {
    pub fn new(world: impl Into<String>) -> Self {
        Self {
            world: world.into(),
            frames: RwLock::new(IndexMap::new()),
            joints: RwLock::new(IndexMap::new()),
        }
    }

    pub fn with_frame(self, frame: impl Into<String>, pose_in_world: Pose) -> Self {
        self.set_frame(frame, pose_in_world);
        self
    }

    pub fn with_joint_positions(self, group: LimbGroup, positions: Vec<f64>) -> Self {
        self.set_joint_positions(group, positions);
        self
    }

    pub fn set_frame(&self, frame: impl Into<String>, pose_in_world: Pose) {
        self.frames
            .write()
            .insert(frame.into(), to_isometry(&pose_in_world));
    }

    pub fn set_joint_positions(&self, group: LimbGroup, positions: Vec<f64>) {
        self.joints.write().insert(group, positions);
    }

    fn world_from(&self, frame: &str, reference: &str) -> Result<Isometry3<f64>, LookupError> {
        if frame == self.world {
            return Ok(Isometry3::identity());
        }
        self.frames
            .read()
            .get(frame)
            .copied()
            .ok_or_else(|| LookupError::new(frame, reference, "frame is not published"))
    }

    /// Transform mapping coordinates in `from` to coordinates in `to`.
    fn relative(&self, from: &str, to: &str) -> Result<Isometry3<f64>, LookupError> {
        let world_from_source = self.world_from(from, to)?;
        let world_from_target = self.world_from(to, from)?;
        Ok(world_from_target.inverse() * world_from_source)
    }
}

impl StateProvider for StaticStateProvider {
    fn joint_positions(&self, group: LimbGroup) -> Result<Vec<f64>, LookupError> {
        self.joints.read().get(&group).cloned().ok_or_else(|| {
            LookupError::new(group.as_str(), "joint_states", "no joint state received")
        })
    }

    /// Groups are concatenated in the order they were recorded.
    fn all_joint_positions(&self) -> Result<Vec<f64>, LookupError> {
        let joints = self.joints.read();
        if joints.is_empty() {
            return Err(LookupError::new(
                "all",
                "joint_states",
                "no joint state received",
            ));
        }
        Ok(joints.values().flatten().copied().collect())
    }

    fn current_pose(&self, frame: &str, reference: &str) -> Result<Pose, LookupError> {
        Ok(from_isometry(&self.relative(frame, reference)?))
    }

    fn transform_quaternion(
        &self,
        quaternion: &Quaternion,
        from: &str,
        to: &str,
    ) -> Result<Quaternion, LookupError> {
        let rotation = self.relative(from, to)?.rotation * to_unit_quaternion(quaternion);
        Ok(from_unit_quaternion(&rotation))
    }

    fn transform_pose(&self, pose: &Pose, from: &str, to: &str) -> Result<Pose, LookupError> {
        Ok(from_isometry(
            &(self.relative(from, to)? * to_isometry(pose)),
        ))
    }
}
