//! Registry bundling kind-tagged service instances
//!
//! Thin coordination layer: one [`EventQueueService`] per kind, sharing the
//! same storage backend and backoff factory. Boot and shutdown fan out to
//! every constituent concurrently and join before returning; each fan-out
//! runs at most once regardless of how many callers race into it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;

use crate::core::retry::{BackoffFactory, BackoffPolicy, StopBackoff};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::service::{EventQueueService, ServiceConfig, KIND_ACTIVATOR, KIND_NETWORK};
use crate::storage::Storage;

/// Configuration used to create a new [`ServiceRegistry`]
///
/// Defaults to the two conventional kinds (activator, network) and a
/// stop-immediately backoff factory; storage must be supplied.
pub struct RegistryConfig {
    // Dependencies.
    pub storage: Option<Arc<dyn Storage>>,
    pub backoff: Option<BackoffFactory>,

    // Settings.
    pub kinds: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            storage: None,
            backoff: Some(Arc::new(|| {
                Box::new(StopBackoff) as Box<dyn BackoffPolicy>
            })),
            kinds: vec![KIND_ACTIVATOR.to_string(), KIND_NETWORK.to_string()],
        }
    }
}

/// Bundle of per-kind queue services with coordinated lifecycle
pub struct ServiceRegistry {
    // Internals.
    booted: AtomicBool,
    shut_down: AtomicBool,

    services: HashMap<String, Arc<EventQueueService>>,
}

impl ServiceRegistry {
    /// Create a registry with one service per configured kind
    pub fn new(config: RegistryConfig) -> QueueResult<Self> {
        let storage = config
            .storage
            .ok_or_else(|| QueueError::invalid_config("storage must not be empty"))?;
        let backoff = config
            .backoff
            .ok_or_else(|| QueueError::invalid_config("backoff factory must not be empty"))?;

        if config.kinds.is_empty() {
            return Err(QueueError::invalid_config("kinds must not be empty"));
        }

        let mut services = HashMap::new();
        for kind in config.kinds {
            let service = EventQueueService::new(ServiceConfig {
                storage: Some(Arc::clone(&storage)),
                backoff: Some(Arc::clone(&backoff)),
                kind: kind.clone(),
            })?;
            services.insert(kind, Arc::new(service));
        }

        Ok(Self {
            booted: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            services,
        })
    }

    /// The service registered for a kind, if any
    pub fn service(&self, kind: &str) -> Option<&Arc<EventQueueService>> {
        self.services.get(kind)
    }

    /// All registered kinds
    pub fn kinds(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Boot every constituent concurrently and wait for all of them
    ///
    /// Runs at most once; later calls return immediately.
    pub async fn boot(&self) {
        if self.booted.swap(true, Ordering::AcqRel) {
            return;
        }

        let handles: Vec<_> = self
            .services
            .values()
            .cloned()
            .map(|service| {
                tokio::spawn(async move {
                    service.boot();
                })
            })
            .collect();

        let _ = join_all(handles).await;
    }

    /// Shut every constituent down concurrently and wait for all of them
    ///
    /// Runs at most once; later calls return immediately.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let handles: Vec<_> = self
            .services
            .values()
            .cloned()
            .map(|service| {
                tokio::spawn(async move {
                    service.shutdown();
                })
            })
            .collect();

        let _ = join_all(handles).await;
    }
}
