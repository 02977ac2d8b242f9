//! Traits for the event data model
//!
//! The `Queueable` trait is the seam between the data model and the queue
//! services: anything exposing an identifier, a creation time and a cached
//! serialized payload can be published, stored and deleted.

use chrono::{DateTime, Utc};

/// An entity the queue services can publish and resolve
///
/// Implemented by [`Event`](crate::event::Event) and
/// [`Signal`](crate::event::Signal). The payload must be the exact
/// serialized form of the entity as last constructed or received; services
/// store it verbatim and hand it back to `from_payload` constructors on the
/// consuming side.
pub trait Queueable: Send + Sync {
    /// Process-unique identifier of the entity
    fn id(&self) -> &str;

    /// Creation timestamp of the entity
    fn created(&self) -> DateTime<Utc>;

    /// Exact serialized form of the entity
    fn payload(&self) -> &str;
}
