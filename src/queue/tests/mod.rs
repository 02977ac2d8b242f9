//! Test modules for the queue services
//!
//! Tests are organized by functional area: core operations, the blocking
//! read protocol, the label-addressed variant, lifecycle handling and
//! concurrency behaviour.

mod concurrent;
mod lifecycle;
mod search;

use std::sync::Arc;
use std::time::Duration;

use crate::core::retry::{BackoffPolicy, ConstantBackoff};
use crate::queue::api::{EventQueueService, ServiceConfig};
use crate::storage::{MemoryStorage, Storage};

/// Service over a fresh in-memory backend with the default stop backoff
/// (blocking reads become single attempts).
pub(crate) fn test_service(kind: &str) -> EventQueueService {
    test_service_on(kind, Arc::new(MemoryStorage::new()))
}

/// Service over a caller-provided backend, for tests that inspect or share
/// the keyspace.
pub(crate) fn test_service_on(kind: &str, storage: Arc<dyn Storage>) -> EventQueueService {
    let mut config = ServiceConfig::default();
    config.storage = Some(storage);
    config.kind = kind.to_string();
    EventQueueService::new(config).expect("Should create service")
}

/// Service with a short bounded retry budget for blocking-read tests.
pub(crate) fn test_service_with_retries(kind: &str, max_retries: usize) -> EventQueueService {
    let mut config = ServiceConfig::default();
    config.storage = Some(Arc::new(MemoryStorage::new()));
    config.backoff = Some(Arc::new(move || {
        Box::new(ConstantBackoff::new(Duration::from_millis(10), max_retries))
            as Box<dyn BackoffPolicy>
    }));
    config.kind = kind.to_string();
    EventQueueService::new(config).expect("Should create service")
}
