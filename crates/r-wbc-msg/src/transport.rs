//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Publisher abstraction and bundled publishers."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::ControllerMessage;
use crate::Result;

/// Fire-and-forget sink for controller messages.
pub trait Publisher: Send + Sync {
    /// Hand a message to the middleware on the given topic.
    fn publish(&self, topic: &str, message: &ControllerMessage) -> Result<()>;
    /// Human-readable publisher name for logging/metrics.
    fn name(&self) -> &'static str;
}

/// A message as captured by a publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedMessage {
    /// Fully qualified topic name.
    pub topic: String,
    /// The published message.
    pub message: ControllerMessage,
    /// Wall-clock capture time.
    pub published_at: DateTime<Utc>,
}

/// In-memory publisher backed by a mutex protected queue.
#[derive(Clone, Default)]
pub struct InMemoryPublisher {
    queue: Arc<Mutex<VecDeque<PublishedMessage>>>,
}

impl InMemoryPublisher {
    /// Create a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest captured message.
    pub fn recv(&self) -> Option<PublishedMessage> {
        self.queue.lock().pop_front()
    }

    /// Remove and return every captured message in publish order.
    pub fn drain(&self) -> Vec<PublishedMessage> {
        self.queue.lock().drain(..).collect()
    }

    /// Copy of every captured message in publish order.
    pub fn snapshot(&self) -> Vec<PublishedMessage> {
        self.queue.lock().iter().cloned().collect()
    }

    /// Number of captured messages.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Publisher for InMemoryPublisher {
    fn publish(&self, topic: &str, message: &ControllerMessage) -> Result<()> {
        self.queue.lock().push_back(PublishedMessage {
            topic: topic.to_owned(),
            message: message.clone(),
            published_at: Utc::now(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    topic: &'a str,
    message: &'a ControllerMessage,
}

/// Writes each message as one JSON object per line.
pub struct JsonLinesPublisher<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesPublisher<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesPublisher<std::io::Stdout> {
    /// Publisher writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Publisher for JsonLinesPublisher<W> {
    fn publish(&self, topic: &str, message: &ControllerMessage) -> Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, &JsonLine { topic, message })?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json_lines"
    }
}
