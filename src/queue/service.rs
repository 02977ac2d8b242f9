//! Namespace-addressed event queue service
//!
//! One `EventQueueService` instance serves one kind. Producers publish
//! events under a set of labels; the service derives the namespace, records
//! it in the kind's lookup table, queues the event id and stores the
//! payload. Consumers block on [`EventQueueService::search`], which retries
//! under the configured backoff policy until an event can be popped and
//! resolved or the policy gives up.
//!
//! # Delivery and cleanup invariants
//!
//! - A namespace is in the lookup table exactly while its queue is
//!   non-empty. `search` garbage-collects the table entry after popping the
//!   last id; the removal is idempotent, so racing consumers cannot break
//!   the invariant.
//! - `delete` removes only the stored payload. It must only be called on an
//!   event already consumed via `search`; deleting a still-queued event
//!   leaves a dangling id whose later resolution fails as `NotFound` and is
//!   absorbed by the retry loop.
//! - Composite operations are chains of individually atomic backend calls,
//!   not transactions. Concurrent callers can interleave between steps;
//!   every interleaving leaves the structures consistent, at the price of
//!   at-least-once rather than exactly-once delivery.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::core::retry::{retry_backoff, BackoffFactory, BackoffPolicy, StopBackoff};
use crate::event::Event;
use crate::event::Queueable;
use crate::queue::error::{QueueError, QueueResult};
use crate::storage::Storage;

/// Conventional kind for activator events
pub const KIND_ACTIVATOR: &str = "activator";
/// Conventional kind for network events
pub const KIND_NETWORK: &str = "network";
/// Namespace for signals not queued under any custom label set
pub const NAMESPACE_DEFAULT: &str = "default";
/// Wildcard label consuming events regardless of their labelling; legal
/// only for [`EventQueueService::search`]
pub const LABEL_WILDCARD: &str = "*";

/// Lifecycle of a service instance
///
/// Transitions run `Created → Booted → ShuttingDown → Shutdown`, each
/// taken at most once; repeated or out-of-order calls are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ServiceState {
    Created = 0,
    Booted = 1,
    ShuttingDown = 2,
    Shutdown = 3,
}

impl ServiceState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ServiceState::Created,
            1 => ServiceState::Booted,
            2 => ServiceState::ShuttingDown,
            _ => ServiceState::Shutdown,
        }
    }
}

/// Configuration used to create a new [`EventQueueService`]
///
/// The default carries a stop-immediately backoff factory (blocking reads
/// become single attempts) and no storage; storage and a non-empty kind
/// must be supplied.
pub struct ServiceConfig {
    // Dependencies.
    pub storage: Option<Arc<dyn Storage>>,
    pub backoff: Option<BackoffFactory>,

    // Settings.
    pub kind: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage: None,
            backoff: Some(Arc::new(|| {
                Box::new(StopBackoff) as Box<dyn BackoffPolicy>
            })),
            kind: String::new(),
        }
    }
}

/// Derive the canonical namespace from a label set
///
/// Labels are sorted lexicographically and concatenated with no separator,
/// so equal label sets in any order derive the same namespace. Duplicates
/// are kept; only the lookup table's set semantics normalise them.
pub fn namespace_from_labels(labels: &[&str]) -> String {
    let mut sorted: Vec<&str> = labels.to_vec();
    sorted.sort_unstable();
    sorted.concat()
}

/// Per-kind event queue service, namespace addressed
///
/// Safe for concurrent invocation from any number of producer and consumer
/// tasks; share it as `Arc<EventQueueService>`.
pub struct EventQueueService {
    // Dependencies.
    backoff: BackoffFactory,
    storage: Arc<dyn Storage>,

    // Internals.
    state: AtomicU8,

    // Settings.
    kind: String,
}

impl EventQueueService {
    /// Create a new configured service
    ///
    /// Fails with `InvalidConfig` when storage or the backoff factory is
    /// missing, or the kind is empty.
    pub fn new(config: ServiceConfig) -> QueueResult<Self> {
        // Dependencies.
        let storage = config
            .storage
            .ok_or_else(|| QueueError::invalid_config("storage must not be empty"))?;
        let backoff = config
            .backoff
            .ok_or_else(|| QueueError::invalid_config("backoff factory must not be empty"))?;

        // Settings.
        if config.kind.is_empty() {
            return Err(QueueError::invalid_config("kind must not be empty"));
        }

        Ok(Self {
            backoff,
            storage,
            state: AtomicU8::new(ServiceState::Created as u8),
            kind: config.kind,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn state(&self) -> ServiceState {
        ServiceState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Initialise the service; repeated calls are no-ops
    pub fn boot(&self) {
        let transitioned = self
            .state
            .compare_exchange(
                ServiceState::Created as u8,
                ServiceState::Booted as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if transitioned {
            log::debug!("event queue service booted (kind: {})", self.kind);
        }
    }

    /// End the service; repeated calls are no-ops
    pub fn shutdown(&self) {
        let entered = self
            .state
            .compare_exchange(
                ServiceState::Booted as u8,
                ServiceState::ShuttingDown as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
            || self
                .state
                .compare_exchange(
                    ServiceState::Created as u8,
                    ServiceState::ShuttingDown as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok();

        if entered {
            // Service specific teardown goes here.
            self.state
                .store(ServiceState::Shutdown as u8, Ordering::Release);
            log::debug!("event queue service shut down (kind: {})", self.kind);
        }
    }

    /// Publish an event under the given labels
    pub fn create(&self, event: &dyn Queueable, labels: &[&str]) -> QueueResult<()> {
        let namespace = namespace_from_labels(labels);
        Self::reject_wildcard(&namespace)?;

        // Register the namespace in the lookup table. Duplicated members
        // are ignored, so this is fire and forget.
        self.storage.push_to_set(&self.table_key(), &namespace)?;

        // Queue the event id in its namespaced queue.
        self.storage
            .push_to_list(&self.namespace_key(&namespace), event.id())?;

        // Store the event payload.
        self.storage.set(&self.event_key(event.id()), event.payload())?;

        Ok(())
    }

    /// Remove the stored payload of an already-consumed event
    ///
    /// Does NOT unqueue: the event must have been popped out of its queue
    /// via [`search`](Self::search) first. Deleting a still-queued event
    /// leaves a dangling id; see the module docs.
    pub fn delete(&self, event: &dyn Queueable, labels: &[&str]) -> QueueResult<()> {
        let namespace = namespace_from_labels(labels);
        Self::reject_wildcard(&namespace)?;

        self.storage.remove(&self.event_key(event.id()))?;

        Ok(())
    }

    /// Whether any event is queued under the given labels
    pub fn exists_any(&self, labels: &[&str]) -> QueueResult<bool> {
        let namespace = namespace_from_labels(labels);
        Self::reject_wildcard(&namespace)?;

        // The backend removes a queue the moment it drains, so existence of
        // the key answers the question directly.
        Ok(self.storage.exists(&self.namespace_key(&namespace))?)
    }

    /// Bound the backlog of a labelled queue to at most `max` entries,
    /// discarding the oldest excess
    pub fn limit(&self, max: usize, labels: &[&str]) -> QueueResult<()> {
        if max < 1 {
            return Err(QueueError::invalid_execution("max must be 1 or greater"));
        }

        let namespace = namespace_from_labels(labels);
        Self::reject_wildcard(&namespace)?;

        self.storage
            .trim_end_of_list(&self.namespace_key(&namespace), max)?;

        Ok(())
    }

    /// Block until the next event under the given labels can be returned
    ///
    /// With [`LABEL_WILDCARD`] as the only label, consumes from any
    /// currently non-empty namespace. Each attempt pops an id, collects the
    /// lookup-table entry if the queue drained, resolves the payload and
    /// deserializes it; any failure asks the backoff policy for the next
    /// delay, and policy exhaustion surfaces the last failure.
    pub async fn search(&self, labels: &[&str]) -> QueueResult<Event> {
        let namespace = namespace_from_labels(labels);

        let mut policy = (self.backoff)();
        retry_backoff("search", policy.as_mut(), || self.search_attempt(&namespace)).await
    }

    fn search_attempt(&self, namespace: &str) -> QueueResult<Event> {
        // A wildcard read picks one namespace at random; with nothing
        // queued anywhere this is the NotFound that drives the retry loop.
        let namespace = if namespace == LABEL_WILDCARD {
            self.storage.get_random_from_set(&self.table_key())?
        } else {
            namespace.to_string()
        };

        let event_id = self.storage.pop_from_list(&self.namespace_key(&namespace))?;

        // Drained queues leave the lookup table together. Racing consumers
        // may both observe the drain; removing an absent member is a no-op.
        if !self.storage.exists(&self.namespace_key(&namespace))? {
            self.storage.remove_from_set(&self.table_key(), &namespace)?;
            log::debug!(
                "namespace '{}' drained, lookup entry removed (kind: {})",
                namespace,
                self.kind
            );
        }

        // Resolution fails when the caller already deleted the event; the
        // NotFound is retried like any other attempt failure.
        let raw = self.storage.get(&self.event_key(&event_id))?;

        Ok(Event::from_payload(&raw)?)
    }

    /// All events under the given labels, in queue order, without consuming
    ///
    /// Fails `NotFound` when nothing is queued, keeping a clear distinction
    /// from a successful empty read. Any single resolution failure aborts
    /// the whole call.
    pub fn search_all(&self, labels: &[&str]) -> QueueResult<Vec<Event>> {
        let namespace = namespace_from_labels(labels);
        Self::reject_wildcard(&namespace)?;

        if !self.exists_any(labels)? {
            return Err(QueueError::not_found(format!(
                "no events queued for namespace {}",
                namespace
            )));
        }

        let event_ids = self
            .storage
            .get_all_from_list(&self.namespace_key(&namespace))?;

        let mut events = Vec::with_capacity(event_ids.len());
        for event_id in event_ids {
            let raw = self.storage.get(&self.event_key(&event_id))?;
            events.push(Event::from_payload(&raw)?);
        }

        Ok(events)
    }

    /// Replace the whole backlog under the given labels
    ///
    /// Drains the namespace through search+delete cycles, then publishes
    /// the given events in order. The two phases are not atomic with
    /// respect to each other or to concurrent callers; a failure partway
    /// through leaves the observable intermediate state.
    pub async fn write_all(
        &self,
        events: &[&dyn Queueable],
        labels: &[&str],
    ) -> QueueResult<()> {
        let namespace = namespace_from_labels(labels);
        Self::reject_wildcard(&namespace)?;

        while self.exists_any(labels)? {
            let event = self.search(labels).await?;
            self.delete(&event, labels)?;
        }

        for event in events {
            self.create(*event, labels)?;
        }

        Ok(())
    }

    fn reject_wildcard(namespace: &str) -> QueueResult<()> {
        if namespace == LABEL_WILDCARD {
            return Err(QueueError::invalid_execution(
                "wildcard namespace must only be used for search",
            ));
        }
        Ok(())
    }

    fn event_key(&self, event_id: &str) -> String {
        format!("service:event:kind:{}:event:{}", self.kind, event_id)
    }

    fn namespace_key(&self, namespace: &str) -> String {
        format!("service:event:kind:{}:namespace:{}", self.kind, namespace)
    }

    fn table_key(&self) -> String {
        format!("service:event:kind:{}:table", self.kind)
    }
}
