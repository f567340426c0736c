//! ---
//! wbc_section: "03-logging"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Structured logging adapters and sinks."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for development.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Limb the event concerns (`left_arm`, `chest`, ...).
    pub limb: Option<&'a str>,
    /// Robot side, when the limb is sided.
    pub side: Option<&'a str>,
    /// Correlation id of the controller message being built or sent.
    pub message_id: Option<u64>,
    /// High-level command that triggered the event.
    pub command: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a limb name.
    pub fn with_limb(mut self, limb: &'a str) -> Self {
        self.limb = Some(limb);
        self
    }

    /// Attach a robot side.
    pub fn with_side(mut self, side: &'a str) -> Self {
        self.side = Some(side);
        self
    }

    /// Attach a message correlation id.
    pub fn with_message_id(mut self, message_id: u64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    /// Attach the originating command name.
    pub fn with_command(mut self, command: &'a str) -> Self {
        self.command = Some(command);
        self
    }
}

/// High-level outcome used when emitting command lifecycle log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command was handed to the controller.
    Dispatched,
    /// The command was aborted before anything was published.
    Aborted,
}

impl CommandOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            CommandOutcome::Dispatched => "dispatched",
            CommandOutcome::Aborted => "aborted",
        }
    }
}

/// Emit a standardized command event with a dispatched/aborted outcome.
pub fn log_command_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: CommandOutcome,
) {
    let default_ctx = LogContext::default();
    let ctx = context.unwrap_or(&default_ctx);
    match outcome {
        CommandOutcome::Dispatched => tracing::event!(
            Level::INFO,
            event,
            outcome = outcome.as_str(),
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %message
        ),
        CommandOutcome::Aborted => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome.as_str(),
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new()
            .with_limb("left_arm")
            .with_side("left")
            .with_message_id(7);
        wbc_info!(context = ctx.clone(), "arm trajectory ready");
        wbc_debug!("debug message");
        wbc_warn!(context = ctx.clone(), "expected {} joints", 7);
        wbc_error!(context = ctx, "error code: {}", 42);
    }

    #[test]
    fn context_builder_sets_fields() {
        let ctx = LogContext::new()
            .with_limb("chest")
            .with_message_id(11)
            .with_command("execute_trajectory");
        assert_eq!(ctx.limb, Some("chest"));
        assert_eq!(ctx.side, None);
        assert_eq!(ctx.message_id, Some(11));
        assert_eq!(ctx.command, Some("execute_trajectory"));
    }

    #[test]
    fn command_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_command("move_arm_pair");
        log_command_event(
            Some(&ctx),
            "sequencer.pair",
            "pair dispatched",
            CommandOutcome::Dispatched,
        );
        log_command_event(
            None,
            "sequencer.pair",
            "pair aborted",
            CommandOutcome::Aborted,
        );
    }
}
