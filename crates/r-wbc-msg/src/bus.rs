//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Fan-out of controller messages to registered publishers."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::logging::{log_message, CommandMetricsExporter};
use crate::topics::TopicResolver;
use crate::transport::Publisher;
use crate::types::ControllerMessage;
use crate::{MessagingError, Result};

/// Snapshot of publish counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BusMetrics {
    /// Number of messages accepted by a publisher.
    pub published: u64,
    /// Number of messages a publisher failed to accept.
    pub dropped: u64,
}

struct Counters {
    published: AtomicU64,
    dropped: AtomicU64,
}

impl Counters {
    fn new() -> Self {
        Self {
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    fn snapshot(&self) -> BusMetrics {
        BusMetrics {
            published: self.published.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Routes controller messages to their topic on every registered publisher.
pub struct CommandBus {
    topics: TopicResolver,
    publishers: Vec<Arc<dyn Publisher>>,
    counters: Counters,
    exporter: Option<CommandMetricsExporter>,
}

impl CommandBus {
    /// Construct a bus publishing below `topic_prefix`.
    pub fn new(topic_prefix: impl Into<String>) -> Self {
        Self {
            topics: TopicResolver::new(topic_prefix),
            publishers: Vec::new(),
            counters: Counters::new(),
            exporter: None,
        }
    }

    /// Register a publisher.
    pub fn register_publisher<P>(&mut self, publisher: Arc<P>)
    where
        P: Publisher + 'static,
    {
        self.publishers.push(publisher as Arc<dyn Publisher>);
    }

    /// Mirror publish counters into prometheus.
    pub fn with_metrics(mut self, exporter: CommandMetricsExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Topic resolver used by this bus.
    pub fn topics(&self) -> &TopicResolver {
        &self.topics
    }

    /// Publish a message to every registered publisher.
    ///
    /// Delivery is fire-and-forget: a failing publisher is logged and counted
    /// as dropped, it does not fail the call. Fails only when no publisher is
    /// registered.
    pub fn publish(&self, message: &ControllerMessage) -> Result<()> {
        if self.publishers.is_empty() {
            return Err(MessagingError::NoPublishers);
        }

        let topic = self.topics.resolve(message.topic());
        let started = Instant::now();
        for publisher in &self.publishers {
            match publisher.publish(&topic, message) {
                Ok(()) => {
                    log_message(&topic, publisher.name(), message);
                    self.counters.published.fetch_add(1, Ordering::Relaxed);
                    if let Some(exporter) = &self.exporter {
                        exporter.observe_published();
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        publisher = publisher.name(),
                        topic = %topic,
                        message_id = message.unique_id(),
                        error = %err,
                        "publisher rejected controller message"
                    );
                    self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                    if let Some(exporter) = &self.exporter {
                        exporter.observe_dropped();
                    }
                }
            }
        }
        if let Some(exporter) = &self.exporter {
            exporter.observe_latency(started.elapsed());
        }
        Ok(())
    }

    /// Return the current metrics snapshot.
    pub fn metrics(&self) -> BusMetrics {
        self.counters.snapshot()
    }
}
