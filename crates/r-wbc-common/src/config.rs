//! ---
//! wbc_section: "01-core-functionality"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Shared primitives and utilities for the control runtime."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_robot_name() -> String {
    "valkyrie".to_owned()
}

fn default_topic_prefix() -> String {
    "/ihmc_ros/valkyrie/control".to_owned()
}

fn default_world_frame() -> String {
    "world".to_owned()
}

fn default_pelvis_frame() -> String {
    "pelvis".to_owned()
}

fn default_torso_frame() -> String {
    "torso".to_owned()
}

fn default_left_ee_frame() -> String {
    "leftPalm".to_owned()
}

fn default_right_ee_frame() -> String {
    "rightPalm".to_owned()
}

fn default_left_foot_frame() -> String {
    "leftFoot".to_owned()
}

fn default_right_foot_frame() -> String {
    "rightFoot".to_owned()
}

fn default_head_frame() -> String {
    "head".to_owned()
}

fn default_limit_margin() -> f64 {
    0.01
}

fn default_arm_pair_gap() -> Duration {
    Duration::from_millis(20)
}

fn default_go_home_settle() -> Duration {
    Duration::from_millis(500)
}

fn default_whole_body_settle() -> Duration {
    Duration::from_millis(100)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for the R-WBC runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub sequencing: SequencingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "R_WBC_CONFIG";

    /// Load configuration from disk, respecting the `R_WBC_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.robot.validate()?;
        self.safety.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Static description of the robot: naming, frames and per-limb joint tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default = "default_robot_name")]
    pub name: String,
    /// Prefix prepended to every controller topic suffix.
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    #[serde(default)]
    pub frames: FrameConfig,
    #[serde(default)]
    pub limbs: LimbsConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: default_robot_name(),
            topic_prefix: default_topic_prefix(),
            frames: FrameConfig::default(),
            limbs: LimbsConfig::default(),
        }
    }
}

impl RobotConfig {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("left_arm", &self.limbs.left_arm),
            ("right_arm", &self.limbs.right_arm),
            ("chest", &self.limbs.chest),
        ];
        for (limb, joints) in required {
            if joints.is_empty() {
                return Err(anyhow!(
                    "robot '{}' must declare at least one {} joint",
                    self.name,
                    limb
                ));
            }
        }
        if self.limbs.left_arm.len() != self.limbs.right_arm.len() {
            return Err(anyhow!(
                "left arm declares {} joints but right arm declares {}",
                self.limbs.left_arm.len(),
                self.limbs.right_arm.len()
            ));
        }

        let all = [
            ("left_arm", &self.limbs.left_arm),
            ("right_arm", &self.limbs.right_arm),
            ("chest", &self.limbs.chest),
            ("neck", &self.limbs.neck),
        ];
        for (limb, joints) in all {
            validate_joint_table(limb, joints)?;
        }
        Ok(())
    }
}

fn validate_joint_table(limb: &str, joints: &[JointConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for joint in joints {
        if !seen.insert(joint.name.as_str()) {
            return Err(anyhow!("{} declares joint '{}' twice", limb, joint.name));
        }
        if !joint.lower.is_finite() || !joint.upper.is_finite() {
            return Err(anyhow!(
                "{} joint '{}' has non-finite limits",
                limb,
                joint.name
            ));
        }
        if joint.lower >= joint.upper {
            return Err(anyhow!(
                "{} joint '{}' lower limit {} must be below upper limit {}",
                limb,
                joint.name,
                joint.lower,
                joint.upper
            ));
        }
    }
    Ok(())
}

/// Named coordinate frames used by the controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default = "default_world_frame")]
    pub world: String,
    #[serde(default = "default_pelvis_frame")]
    pub pelvis: String,
    #[serde(default = "default_torso_frame")]
    pub torso: String,
    #[serde(default = "default_left_ee_frame")]
    pub left_end_effector: String,
    #[serde(default = "default_right_ee_frame")]
    pub right_end_effector: String,
    #[serde(default = "default_left_foot_frame")]
    pub left_foot: String,
    #[serde(default = "default_right_foot_frame")]
    pub right_foot: String,
    #[serde(default = "default_head_frame")]
    pub head: String,
    /// Height of the foot frame above the sole, in meters.
    #[serde(default)]
    pub foot_frame_offset: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            world: default_world_frame(),
            pelvis: default_pelvis_frame(),
            torso: default_torso_frame(),
            left_end_effector: default_left_ee_frame(),
            right_end_effector: default_right_ee_frame(),
            left_foot: default_left_foot_frame(),
            right_foot: default_right_foot_frame(),
            head: default_head_frame(),
            foot_frame_offset: 0.0,
        }
    }
}

/// Ordered joint tables per limb. Order matters: it is the order the
/// controller expects joint trajectories in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimbsConfig {
    #[serde(default)]
    pub left_arm: Vec<JointConfig>,
    #[serde(default)]
    pub right_arm: Vec<JointConfig>,
    #[serde(default)]
    pub chest: Vec<JointConfig>,
    #[serde(default)]
    pub neck: Vec<JointConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

impl JointConfig {
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }
}

/// How out-of-range joint positions are handled.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClampPolicy {
    /// Pin the value to the nearest limit boundary.
    #[default]
    Clamp,
    /// Refuse the whole waypoint.
    Reject,
}

impl std::str::FromStr for ClampPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(ClampPolicy::Clamp),
            "reject" => Ok(ClampPolicy::Reject),
            other => Err(format!("unknown clamp policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Margin (radians) subtracted from both ends of every joint range.
    #[serde(default = "default_limit_margin")]
    pub limit_margin: f64,
    #[serde(default)]
    pub clamp_policy: ClampPolicy,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            limit_margin: default_limit_margin(),
            clamp_policy: ClampPolicy::default(),
        }
    }
}

impl SafetyConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.limit_margin.is_finite() || self.limit_margin < 0.0 {
            return Err(anyhow!(
                "safety limit_margin must be a non-negative finite value, got {}",
                self.limit_margin
            ));
        }
        Ok(())
    }
}

/// Fixed pauses the controller intake expects between coupled publications.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencingConfig {
    #[serde(rename = "arm_pair_gap_ms", default = "default_arm_pair_gap")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub arm_pair_gap: Duration,
    #[serde(rename = "go_home_settle_ms", default = "default_go_home_settle")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub go_home_settle: Duration,
    #[serde(rename = "whole_body_settle_ms", default = "default_whole_body_settle")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub whole_body_settle: Duration,
}

impl Default for SequencingConfig {
    fn default() -> Self {
        Self {
            arm_pair_gap: default_arm_pair_gap(),
            go_home_settle: default_go_home_settle(),
            whole_body_settle: default_whole_body_settle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_enabled: bool,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_enabled: false,
            file_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[robot]
name = "bench"

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
    fn minimal_config_uses_documented_defaults() {
        let config: AppConfig = MINIMAL.parse().expect("parse config");
        assert_eq!(config.robot.name, "bench");
        assert_eq!(config.robot.topic_prefix, "/ihmc_ros/valkyrie/control");
        assert_eq!(config.safety.limit_margin, 0.01);
        assert_eq!(config.safety.clamp_policy, ClampPolicy::Clamp);
        assert_eq!(config.sequencing.arm_pair_gap, Duration::from_millis(20));
        assert_eq!(config.sequencing.go_home_settle, Duration::from_millis(500));
        assert_eq!(
            config.sequencing.whole_body_settle,
            Duration::from_millis(100)
        );
        assert!(config.robot.limbs.neck.is_empty());
    }

    #[test]
    fn sequencing_overrides_are_milliseconds() {
        let content = format!(
            "{}\n[sequencing]\narm_pair_gap_ms = 50\n\n[safety]\nclamp_policy = \"reject\"\n",
            MINIMAL
        );
        let config: AppConfig = content.parse().expect("parse config");
        assert_eq!(config.sequencing.arm_pair_gap, Duration::from_millis(50));
        assert_eq!(config.safety.clamp_policy, ClampPolicy::Reject);
    }

    #[test]
    fn missing_chest_is_rejected() {
        let content = MINIMAL.replace("robot.limbs.chest", "robot.limbs.neck");
        let err = content.parse::<AppConfig>().unwrap_err();
        assert!(err.to_string().contains("chest"));
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let content = MINIMAL.replace("lower = -1.329", "lower = 1.5");
        assert!(content.parse::<AppConfig>().is_err());
    }

    #[test]
    fn mismatched_arm_tables_are_rejected() {
        let content = MINIMAL.replace(
            "[[robot.limbs.right_arm]]",
            "[[robot.limbs.left_arm]]\nname = \"leftShoulderRoll\"\nlower = -1.5\nupper = 1.2\n\n[[robot.limbs.right_arm]]",
        );
        let err = content.parse::<AppConfig>().unwrap_err();
        assert!(err.to_string().contains("right arm"));
    }

    #[test]
    fn load_prefers_first_existing_candidate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("robot.toml");
        std::fs::write(&path, MINIMAL).expect("write config");

        let missing = dir.path().join("missing.toml");
        let loaded = AppConfig::load_with_source(&[missing, path.clone()]).expect("load config");
        assert_eq!(loaded.source, path);
        assert_eq!(loaded.config.robot.limbs.chest[0].name, "torsoYaw");
    }

    #[test]
    fn clamp_policy_from_str() {
        assert_eq!("Clamp".parse::<ClampPolicy>(), Ok(ClampPolicy::Clamp));
        assert_eq!("reject".parse::<ClampPolicy>(), Ok(ClampPolicy::Reject));
        assert!("ignore".parse::<ClampPolicy>().is_err());
    }
}
