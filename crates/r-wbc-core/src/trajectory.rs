//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Shared joint-space point construction."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_msg::{MessageId, MessageIdGenerator, OneDofJointTrajectory, TrajectoryPoint1D};

use crate::errors::{ControlError, Result};
use crate::limits::JointLimitTable;

/// Time of the k-th (1-indexed) of `count` evenly spaced waypoints.
pub fn evenly_spaced_time(total_time: f64, count: usize, k: usize) -> f64 {
    total_time / count as f64 * k as f64
}

/// Enforce limits on one waypoint and append it to per-joint lists.
///
/// Every value is checked before any list is touched, so a failure leaves
/// `joints` unchanged and consumes no ids. Each point gets a fresh id; each
/// list is stamped with `owner`.
pub fn append_limited_point(
    joints: &mut [OneDofJointTrajectory],
    table: &JointLimitTable,
    ids: &MessageIdGenerator,
    owner: MessageId,
    time: f64,
    positions: &[f64],
    velocities: &[f64],
) -> Result<()> {
    if joints.len() != table.joint_count() {
        return Err(ControlError::malformed(format!(
            "{} message carries {} joint lists, expected {}",
            table.group().as_str(),
            joints.len(),
            table.joint_count()
        )));
    }
    let limited = table.enforce(positions)?;

    for (index, (joint, position)) in joints.iter_mut().zip(limited).enumerate() {
        joint.trajectory_points.push(TrajectoryPoint1D {
            time,
            position,
            velocity: velocities.get(index).copied().unwrap_or(0.0),
            unique_id: ids.next_id(),
        });
        joint.unique_id = owner;
    }
    Ok(())
}
