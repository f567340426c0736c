//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Shared collaborators handed to every controller."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::sync::Arc;

use r_wbc_common::{AppConfig, SafetyConfig, SequencingConfig};
use r_wbc_msg::{CommandBus, MessageIdGenerator};
use r_wbc_rt::Pacer;

use crate::description::{ConfiguredDescription, FrameRole, RobotDescriptionProvider};
use crate::state::StateProvider;

/// Everything a controller needs besides its own limit tables.
///
/// Cloning is cheap and every clone shares the same id generator, so
/// controllers built from one context never hand out the same id twice.
#[derive(Clone)]
pub struct ControlContext {
    pub bus: Arc<CommandBus>,
    pub ids: Arc<MessageIdGenerator>,
    pub pacer: Arc<dyn Pacer>,
    pub description: Arc<dyn RobotDescriptionProvider>,
    pub state: Arc<dyn StateProvider>,
    pub safety: SafetyConfig,
    pub sequencing: SequencingConfig,
}

impl ControlContext {
    pub fn new(
        bus: Arc<CommandBus>,
        pacer: Arc<dyn Pacer>,
        description: Arc<dyn RobotDescriptionProvider>,
        state: Arc<dyn StateProvider>,
    ) -> Self {
        Self {
            bus,
            ids: Arc::new(MessageIdGenerator::new()),
            pacer,
            description,
            state,
            safety: SafetyConfig::default(),
            sequencing: SequencingConfig::default(),
        }
    }

    /// Context whose description, safety and sequencing come from configuration.
    pub fn from_config(
        config: &AppConfig,
        bus: Arc<CommandBus>,
        pacer: Arc<dyn Pacer>,
        state: Arc<dyn StateProvider>,
    ) -> Self {
        Self::new(
            bus,
            pacer,
            Arc::new(ConfiguredDescription::new(config.robot.clone())),
            state,
        )
        .with_safety(config.safety.clone())
        .with_sequencing(config.sequencing.clone())
    }

    pub fn with_ids(mut self, ids: Arc<MessageIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_safety(mut self, safety: SafetyConfig) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_sequencing(mut self, sequencing: SequencingConfig) -> Self {
        self.sequencing = sequencing;
        self
    }

    pub fn frame(&self, role: FrameRole) -> String {
        self.description.frame(role)
    }
}
