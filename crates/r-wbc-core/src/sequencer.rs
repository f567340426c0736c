//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Ordered, paced publication of controller messages."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use r_wbc_common::SequencingConfig;
use r_wbc_logging::{log_command_event, CommandOutcome, LogContext};
use r_wbc_msg::{CommandBus, ControllerMessage};
use r_wbc_rt::Pacer;

use crate::context::ControlContext;
use crate::errors::Result;

/// Publishes composed messages with the fixed pauses the controller intake expects.
///
/// Pauses block the caller and cannot be cancelled.
#[derive(Clone)]
pub struct PublicationSequencer {
    bus: Arc<CommandBus>,
    pacer: Arc<dyn Pacer>,
    timing: SequencingConfig,
}

impl PublicationSequencer {
    pub fn new(bus: Arc<CommandBus>, pacer: Arc<dyn Pacer>, timing: SequencingConfig) -> Self {
        Self { bus, pacer, timing }
    }

    pub fn from_context(ctx: &ControlContext) -> Self {
        Self::new(
            Arc::clone(&ctx.bus),
            Arc::clone(&ctx.pacer),
            ctx.sequencing.clone(),
        )
    }

    pub fn timing(&self) -> &SequencingConfig {
        &self.timing
    }

    /// Publish a single message without pacing.
    pub fn publish(&self, message: &ControllerMessage) -> Result<()> {
        self.bus.publish(message)?;
        Ok(())
    }

    /// Publish `message`, then block for `settle`.
    pub fn publish_then_settle(&self, message: &ControllerMessage, settle: Duration) -> Result<()> {
        self.bus.publish(message)?;
        self.pacer.pause(settle);
        Ok(())
    }

    pub fn publish_go_home(&self, message: &ControllerMessage) -> Result<()> {
        self.publish_then_settle(message, self.timing.go_home_settle)
    }

    pub fn publish_whole_body(&self, message: &ControllerMessage) -> Result<()> {
        self.publish_then_settle(message, self.timing.whole_body_settle)
    }

    /// Publish a right/left pair: right side first, the arm-pair gap, then left.
    ///
    /// Either side may be absent; the gap is observed whenever the right side
    /// was sent.
    pub fn publish_pair(
        &self,
        right: Option<&ControllerMessage>,
        left: Option<&ControllerMessage>,
        command: &str,
    ) -> Result<()> {
        let ctx = LogContext::new().with_command(command);
        if let Some(right) = right {
            if let Err(err) = self.bus.publish(right) {
                log_command_event(
                    Some(&ctx.clone().with_side("right")),
                    "sequencer.pair",
                    &err.to_string(),
                    CommandOutcome::Aborted,
                );
                return Err(err.into());
            }
            self.pacer.pause(self.timing.arm_pair_gap);
        }
        if let Some(left) = left {
            self.bus.publish(left)?;
        }
        log_command_event(
            Some(&ctx),
            "sequencer.pair",
            "paired publication dispatched",
            CommandOutcome::Dispatched,
        );
        Ok(())
    }
}
