//! Event Queue Services
//!
//! A queue layer that multiplexes events over a key/value storage backend,
//! in two addressing modes with at-least-once delivery semantics:
//!
//! - **Namespace addressed** ([`EventQueueService`]): producers publish
//!   under a set of labels; the sorted, concatenated labels form the
//!   namespace owning one FIFO queue. A per-kind lookup table tracks every
//!   currently non-empty namespace, enabling existence checks and wildcard
//!   consumption from "any namespace". The blocking read retries under a
//!   caller-supplied backoff policy.
//! - **Label addressed** ([`LabeledQueueService`]): one FIFO queue per kind
//!   holding serialized events, with a bidirectional label index on the
//!   side. Non-blocking.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │  Producer A  │                      │  Producer B  │
//! └──────┬───────┘                      └──────┬───────┘
//!        │ create(event, ["x","y"])            │ create(event, ["z"])
//!        ▼                                     ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │              EventQueueService (kind: k)                │
//! │   lookup table ──▶ { "xy", "z" }                        │
//! │   namespace "xy" ──▶ [ id1, id2, ... ]                  │
//! │   namespace "z"  ──▶ [ id3, ... ]                       │
//! │   payloads       ──▶ id -> serialized event             │
//! └────────┬───────────────────────────────┬────────────────┘
//!          │ search(["x","y"])             │ search(["*"])
//! ┌────────┴──────┐                ┌───────┴───────┐
//! │  Consumer A   │                │  Consumer B   │ (any namespace)
//! └───────────────┘                └───────────────┘
//! ```
//!
//! Composite operations are short chains of individually atomic backend
//! calls, deliberately without an enclosing transaction; the cleanup steps
//! are idempotent so concurrent consumers interleave safely. The
//! [`EventQueueService`] docs spell out the delivery and cleanup
//! invariants.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use eventmux::event::Event;
//! use eventmux::queue::{EventQueueService, ServiceConfig};
//! use eventmux::storage::MemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = ServiceConfig::default();
//! config.storage = Some(Arc::new(MemoryStorage::new()));
//! config.kind = "activator".to_string();
//! let service = EventQueueService::new(config)?;
//! service.boot();
//!
//! // Publish an event under a label set.
//! let event = Event::new()?;
//! service.create(&event, &["worker", "fast"])?;
//!
//! // Consume it back (single attempt under the default stop backoff).
//! let consumed = service.search(&["fast", "worker"]).await?;
//! service.delete(&consumed, &["worker", "fast"])?;
//! # Ok(())
//! # }
//! ```

mod error;
mod labeled;
mod registry;
mod service;

pub use error::{QueueError, QueueResult};
pub use labeled::{LabeledQueueService, LabeledServiceConfig};
pub use registry::{RegistryConfig, ServiceRegistry};
pub use service::{
    namespace_from_labels, EventQueueService, ServiceConfig, ServiceState, KIND_ACTIVATOR,
    KIND_NETWORK, LABEL_WILDCARD, NAMESPACE_DEFAULT,
};

pub mod api;

#[cfg(test)]
mod tests;
