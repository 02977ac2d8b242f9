//! Public API for the queue services
//!
//! This module provides the complete public API for the event queue layer.
//! External modules should import from here rather than directly from
//! internal modules.

// Namespace-addressed service
pub use crate::queue::service::{
    namespace_from_labels, EventQueueService, ServiceConfig, ServiceState, KIND_ACTIVATOR,
    KIND_NETWORK, LABEL_WILDCARD, NAMESPACE_DEFAULT,
};

// Label-addressed variant
pub use crate::queue::labeled::{LabeledQueueService, LabeledServiceConfig};

// Registry
pub use crate::queue::registry::{RegistryConfig, ServiceRegistry};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
