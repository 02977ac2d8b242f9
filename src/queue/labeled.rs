//! Label-addressed queue variant
//!
//! A simpler addressing mode: one FIFO queue per kind holding serialized
//! events directly, plus an independent bidirectional label index
//! (id → labels it was published under, label → ids published under it).
//! There is no namespace grouping and no blocking read; callers wanting
//! backoff wrap [`LabeledQueueService::consume`] themselves.

use std::sync::Arc;

use crate::event::Event;
use crate::event::Queueable;
use crate::queue::error::{QueueError, QueueResult};
use crate::storage::Storage;

/// Configuration used to create a new [`LabeledQueueService`]
pub struct LabeledServiceConfig {
    // Dependencies.
    pub storage: Option<Arc<dyn Storage>>,

    // Settings.
    pub kind: String,
}

impl Default for LabeledServiceConfig {
    fn default() -> Self {
        Self {
            storage: None,
            kind: String::new(),
        }
    }
}

/// Per-kind event queue service, label addressed
pub struct LabeledQueueService {
    // Dependencies.
    storage: Arc<dyn Storage>,

    // Settings.
    kind: String,
}

impl LabeledQueueService {
    /// Create a new configured service
    pub fn new(config: LabeledServiceConfig) -> QueueResult<Self> {
        let storage = config
            .storage
            .ok_or_else(|| QueueError::invalid_config("storage must not be empty"))?;

        if config.kind.is_empty() {
            return Err(QueueError::invalid_config("kind must not be empty"));
        }

        Ok(Self {
            storage,
            kind: config.kind,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Append the event's serialized form to the kind's FIFO queue
    pub fn publish(&self, event: &dyn Queueable) -> QueueResult<()> {
        self.storage
            .push_to_list(&self.queue_key(), event.payload())?;

        Ok(())
    }

    /// Publish the event and index it under every given label
    ///
    /// Rejects an empty label list; use [`publish`](Self::publish) for
    /// unlabelled events.
    pub fn publish_with_labels(
        &self,
        event: &dyn Queueable,
        labels: &[&str],
    ) -> QueueResult<()> {
        if labels.is_empty() {
            return Err(QueueError::invalid_execution("labels must not be empty"));
        }

        self.publish(event)?;

        // Record which labels the id was published under, then index the
        // id under each of them.
        for label in labels {
            self.storage
                .push_to_list(&self.event_key(event.id()), label)?;
        }
        for label in labels {
            self.storage
                .push_to_list(&self.label_key(label), event.id())?;
        }

        Ok(())
    }

    /// Pop and deserialize the head of the FIFO queue
    ///
    /// Fails `NotFound` when the queue is empty; this layer never retries.
    pub fn consume(&self) -> QueueResult<Event> {
        let raw = self.storage.pop_from_list(&self.queue_key())?;

        Ok(Event::from_payload(&raw)?)
    }

    /// Remove a published event and all its index entries
    ///
    /// The serialized form leaves the FIFO queue by value; the id leaves
    /// every label index list it was published under, and a label's index
    /// list disappears entirely with its last entry, keeping
    /// [`exists_any_with_label`](Self::exists_any_with_label) accurate.
    pub fn delete(&self, event: &dyn Queueable) -> QueueResult<()> {
        self.storage
            .remove_from_list(&self.queue_key(), event.payload())?;

        let labels = self.storage.get_all_from_list(&self.event_key(event.id()))?;
        for label in labels {
            self.storage
                .remove_from_list(&self.label_key(&label), event.id())?;
        }

        self.storage.remove(&self.event_key(event.id()))?;

        Ok(())
    }

    /// Whether any event is currently indexed under the label
    pub fn exists_any_with_label(&self, label: &str) -> QueueResult<bool> {
        Ok(self.storage.exists(&self.label_key(label))?)
    }

    fn queue_key(&self) -> String {
        format!("queue:{}", self.kind)
    }

    fn event_key(&self, event_id: &str) -> String {
        format!("event:{}", event_id)
    }

    fn label_key(&self, label: &str) -> String {
        format!("label:{}", label)
    }
}
