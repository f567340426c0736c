//! ---
//! wbc_section: "05-operator-interfaces"
//! wbc_subsection: "binary"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Operator CLI for composing and publishing controller commands."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use r_wbc_common::AppConfig;
use r_wbc_core::{
    ArmController, ChestController, ControlContext, HeadController, NamedPose, PelvisController,
    WholeBodyComposer,
};
use r_wbc_logging::{wbc_info, LogContext};
use r_wbc_msg::{CommandBus, ExecutionMode, JointTrajectory, JsonLinesPublisher, RobotSide};
use r_wbc_rt::ThreadPacer;
use serde::de::DeserializeOwned;

use crate::snapshot::StateSnapshot;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compose a combined planner trajectory into one whole-body command.
    Compose(ComposeArgs),
    /// Evenly spaced joint-space move for one arm.
    Arm(ArmArgs),
    /// Send a limb to its home posture.
    Home(HomeArgs),
    /// Orient the chest from roll, pitch and yaw (pelvis frame).
    Chest(ChestArgs),
    /// Move the pelvis to a height above the left foot sole.
    Pelvis(PelvisArgs),
    /// Evenly spaced neck joint move.
    Neck(NeckArgs),
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// JSON file holding `joint_names` and `points`.
    #[arg(long, value_name = "FILE")]
    pub trajectory: PathBuf,
    /// Print the composed message instead of publishing it.
    #[arg(long = "dry-run", action = clap::ArgAction::SetTrue)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ArmArgs {
    #[arg(long, value_enum)]
    pub side: SideArg,
    /// JSON file holding a list of joint-position waypoints.
    #[arg(long, value_name = "FILE")]
    pub waypoints: PathBuf,
    /// Total trajectory time in seconds.
    #[arg(long, default_value_t = 2.0)]
    pub time: f64,
}

#[derive(Debug, Args)]
pub struct HomeArgs {
    #[arg(long, value_enum, default_value_t = PartArg::Arm)]
    pub part: PartArg,
    /// Arm side; ignored for chest and pelvis.
    #[arg(long, value_enum, default_value_t = SideArg::Left)]
    pub side: SideArg,
    #[arg(long, default_value_t = 2.0)]
    pub time: f64,
}

#[derive(Debug, Args)]
pub struct ChestArgs {
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub roll: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub pitch: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub yaw: f64,
    #[arg(long, default_value_t = 2.0)]
    pub time: f64,
    /// Queue behind the running chest trajectory instead of replacing it.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub queue: bool,
}

#[derive(Debug, Args)]
pub struct PelvisArgs {
    /// Target height in meters above the left foot sole.
    #[arg(long)]
    pub height: f64,
    #[arg(long, default_value_t = 2.0)]
    pub time: f64,
}

#[derive(Debug, Args)]
pub struct NeckArgs {
    /// JSON file holding a list of neck joint-position waypoints.
    #[arg(long, value_name = "FILE")]
    pub waypoints: PathBuf,
    #[arg(long, default_value_t = 2.0)]
    pub time: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for RobotSide {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Left => RobotSide::Left,
            SideArg::Right => RobotSide::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PartArg {
    Arm,
    Chest,
    Pelvis,
}

/// Dispatch a parsed command against a freshly built control context.
pub fn run(command: Commands, config: &AppConfig, snapshot: StateSnapshot) -> Result<()> {
    let ctx = build_context(config, snapshot);
    match command {
        Commands::Compose(args) => compose(ctx, args),
        Commands::Arm(args) => {
            let waypoints: Vec<Vec<f64>> = read_json(&args.waypoints)?;
            let arms = ArmController::new(ctx)?;
            arms.move_arm_joints(args.side.into(), &waypoints, args.time)
                .context("arm move failed")
        }
        Commands::Home(args) => home(ctx, args),
        Commands::Chest(args) => {
            let mode = if args.queue {
                ExecutionMode::Queue
            } else {
                ExecutionMode::Override
            };
            ChestController::new(ctx)?
                .control_chest_rpy(args.roll, args.pitch, args.yaw, args.time, mode)
                .context("chest move failed")
        }
        Commands::Pelvis(args) => PelvisController::new(ctx)
            .control_pelvis_height(args.height, args.time)
            .context("pelvis move failed"),
        Commands::Neck(args) => {
            let waypoints: Vec<Vec<f64>> = read_json(&args.waypoints)?;
            HeadController::new(ctx)?
                .move_neck_joints(&waypoints, args.time)
                .context("neck move failed")
        }
    }
}

fn build_context(config: &AppConfig, snapshot: StateSnapshot) -> ControlContext {
    let mut bus = CommandBus::new(config.robot.topic_prefix.clone());
    bus.register_publisher(Arc::new(JsonLinesPublisher::stdout()));
    let state = snapshot.into_provider(&config.robot.frames);
    ControlContext::from_config(
        config,
        Arc::new(bus),
        Arc::new(ThreadPacer),
        Arc::new(state),
    )
}

fn compose(ctx: ControlContext, args: ComposeArgs) -> Result<()> {
    let trajectory: JointTrajectory = read_json(&args.trajectory)?;
    let composer = WholeBodyComposer::new(ctx)?;
    if args.dry_run {
        let msg = composer
            .compose(&trajectory)
            .context("whole-body composition failed")?;
        println!("{}", serde_json::to_string_pretty(&msg)?);
        wbc_info!(
            context = LogContext::new()
                .with_command("compose")
                .with_message_id(msg.unique_id),
            "dry run; whole-body message not published"
        );
        return Ok(());
    }
    composer
        .execute_trajectory(&trajectory)
        .context("whole-body execution failed")
}

fn home(ctx: ControlContext, args: HomeArgs) -> Result<()> {
    match args.part {
        PartArg::Arm => ArmController::new(ctx)?
            .move_to_named_pose(args.side.into(), NamedPose::Home, args.time)
            .context("arm go-home failed"),
        PartArg::Chest => ChestController::new(ctx)?
            .reset_pose(args.time)
            .context("chest go-home failed"),
        PartArg::Pelvis => PelvisController::new(ctx)
            .reset_pose(args.time)
            .context("pelvis go-home failed"),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_trajectory_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        fs::write(
            &path,
            r#"{"joint_names":["torsoYaw"],"points":[{"positions":[0.1],"time_from_start":1.0}]}"#,
        )
        .expect("write");

        let trajectory: JointTrajectory = read_json(&path).expect("read");
        assert_eq!(trajectory.joint_names, vec!["torsoYaw".to_string()]);
        assert!(trajectory.points[0].velocities.is_empty());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = read_json::<JointTrajectory>(Path::new("/nonexistent/plan.json"))
            .expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/plan.json"));
    }
}
