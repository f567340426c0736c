//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Per-limb joint limit tables and clamp enforcement."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use r_wbc_common::ClampPolicy;
use tracing::debug;

use crate::description::{LimbGroup, RobotDescriptionProvider};
use crate::errors::{ControlError, Result};

/// Admissible range of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimit {
    pub lower: f64,
    pub upper: f64,
}

/// Where a requested position fell relative to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampOutcome {
    Within,
    WrappedLower,
    WrappedUpper,
}

impl JointLimit {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Pin `value` to the nearest boundary. In-range values are returned unchanged.
    pub fn clamp(&self, value: f64) -> (f64, ClampOutcome) {
        if value < self.lower {
            (self.lower, ClampOutcome::WrappedLower)
        } else if value > self.upper {
            (self.upper, ClampOutcome::WrappedUpper)
        } else {
            (value, ClampOutcome::Within)
        }
    }
}

/// Ordered joint names and margin-shrunk limits for one limb.
///
/// Immutable after construction. Its length is the limb's joint count.
#[derive(Debug, Clone)]
pub struct JointLimitTable {
    group: LimbGroup,
    names: Vec<String>,
    limits: Vec<JointLimit>,
    policy: ClampPolicy,
}

impl JointLimitTable {
    /// Load raw limits from the description and shrink them by `margin`.
    pub fn load(
        description: &dyn RobotDescriptionProvider,
        group: LimbGroup,
        margin: f64,
        policy: ClampPolicy,
    ) -> Result<Self> {
        Self::from_raw(
            group,
            description.joint_names(group),
            description.joint_limits(group),
            margin,
            policy,
        )
    }

    pub fn from_raw(
        group: LimbGroup,
        names: Vec<String>,
        raw: Vec<(f64, f64)>,
        margin: f64,
        policy: ClampPolicy,
    ) -> Result<Self> {
        let invalid = |reason: String| ControlError::InvalidLimits {
            group: group.as_str(),
            reason,
        };
        if raw.is_empty() {
            return Err(invalid("description returned no joint limits".into()));
        }
        if raw.len() != names.len() {
            return Err(invalid(format!(
                "{} limits for {} joint names",
                raw.len(),
                names.len()
            )));
        }

        let limits = raw
            .into_iter()
            .zip(&names)
            .map(|((lower, upper), name)| {
                let shrunk = JointLimit::new(lower + margin, upper - margin);
                if !shrunk.lower.is_finite() || !shrunk.upper.is_finite() {
                    return Err(invalid(format!("joint {name} has non-finite limits")));
                }
                if shrunk.lower >= shrunk.upper {
                    return Err(invalid(format!(
                        "joint {name} range [{lower}, {upper}] collapses under margin {margin}"
                    )));
                }
                Ok(shrunk)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            group = group.as_str(),
            joints = limits.len(),
            margin,
            "joint limit table loaded"
        );
        Ok(Self {
            group,
            names,
            limits,
            policy,
        })
    }

    pub fn group(&self) -> LimbGroup {
        self.group
    }

    pub fn joint_count(&self) -> usize {
        self.limits.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn limits(&self) -> &[JointLimit] {
        &self.limits
    }

    pub fn policy(&self) -> ClampPolicy {
        self.policy
    }

    /// Apply the table's policy to a full joint vector.
    ///
    /// Fails without side effects when the vector length differs from the
    /// joint count, when a value is not finite, or, under
    /// [`ClampPolicy::Reject`], when any value is out of range.
    pub fn enforce(&self, positions: &[f64]) -> Result<Vec<f64>> {
        if positions.len() != self.joint_count() {
            return Err(ControlError::malformed(format!(
                "{} expects {} joint positions, received {}",
                self.group.as_str(),
                self.joint_count(),
                positions.len()
            )));
        }

        positions
            .iter()
            .enumerate()
            .map(|(index, &value)| self.enforce_joint(index, value))
            .collect()
    }

    /// Apply the table's policy to a single joint.
    pub fn enforce_joint(&self, index: usize, value: f64) -> Result<f64> {
        let limit = self
            .limits
            .get(index)
            .ok_or_else(|| ControlError::UnknownJoint {
                group: self.group.as_str(),
                index,
                count: self.joint_count(),
            })?;
        let joint = self.names[index].as_str();
        if !value.is_finite() {
            return Err(ControlError::malformed(format!(
                "joint {joint} target {value} is not finite"
            )));
        }

        let (clamped, outcome) = limit.clamp(value);
        if outcome == ClampOutcome::Within {
            return Ok(value);
        }
        if self.policy == ClampPolicy::Reject {
            return Err(ControlError::LimitViolation {
                joint: joint.to_owned(),
                value,
                lower: limit.lower,
                upper: limit.upper,
            });
        }
        match outcome {
            ClampOutcome::WrappedLower => debug!(
                joint,
                requested = value,
                boundary = clamped,
                "wrapped lower point"
            ),
            ClampOutcome::WrappedUpper => debug!(
                joint,
                requested = value,
                boundary = clamped,
                "wrapped upper point"
            ),
            ClampOutcome::Within => {}
        }
        Ok(clamped)
    }
}
