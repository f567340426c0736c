//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Structured publish logging and prometheus metrics."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry};
use tracing::debug;

use crate::types::ControllerMessage;

/// Emit a structured log entry for an outgoing controller message.
pub fn log_message(topic: &str, publisher: &str, message: &ControllerMessage) {
    debug!(
        message_id = message.unique_id(),
        kind = message.kind(),
        topic = %topic,
        publisher = publisher,
        "controller message published"
    );
}

/// Prometheus metric handles for controller command traffic.
#[derive(Clone)]
pub struct CommandMetricsExporter {
    published: IntCounter,
    dropped: IntCounter,
    latency: Histogram,
}

impl CommandMetricsExporter {
    /// Register command metrics with the provided registry.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let published = IntCounter::with_opts(Opts::new(
            "controller_messages_published_total",
            "Controller messages handed to publishers",
        ))?;
        let dropped = IntCounter::with_opts(Opts::new(
            "controller_messages_dropped_total",
            "Controller messages a publisher failed to accept",
        ))?;
        let latency = Histogram::with_opts(HistogramOpts::new(
            "controller_publish_latency_seconds",
            "Time spent handing one message to all publishers",
        ))?;

        registry.register(Box::new(published.clone()))?;
        registry.register(Box::new(dropped.clone()))?;
        registry.register(Box::new(latency.clone()))?;

        Ok(Self {
            published,
            dropped,
            latency,
        })
    }

    /// Record a published message.
    pub fn observe_published(&self) {
        self.published.inc();
    }

    /// Record a dropped message.
    pub fn observe_dropped(&self) {
        self.dropped.inc();
    }

    /// Record publish latency.
    pub fn observe_latency(&self, duration: Duration) {
        self.latency.observe(duration.as_secs_f64());
    }
}
