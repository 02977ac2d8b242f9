//! Lifecycle tests for services and the registry

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::queue::api::{RegistryConfig, ServiceRegistry, ServiceState, KIND_ACTIVATOR, KIND_NETWORK};
    use crate::queue::tests::test_service;
    use crate::storage::MemoryStorage;

    fn registry() -> ServiceRegistry {
        let mut config = RegistryConfig::default();
        config.storage = Some(Arc::new(MemoryStorage::new()));
        ServiceRegistry::new(config).expect("Should create registry")
    }

    #[test]
    fn test_service_walks_the_state_machine() {
        let service = test_service("activator");
        assert_eq!(service.state(), ServiceState::Created);

        service.boot();
        assert_eq!(service.state(), ServiceState::Booted);

        service.shutdown();
        assert_eq!(service.state(), ServiceState::Shutdown);
    }

    #[test]
    fn test_boot_and_shutdown_are_idempotent() {
        let service = test_service("activator");

        service.boot();
        service.boot();
        assert_eq!(service.state(), ServiceState::Booted);

        service.shutdown();
        service.shutdown();
        assert_eq!(service.state(), ServiceState::Shutdown);

        // A shut-down service stays shut down.
        service.boot();
        assert_eq!(service.state(), ServiceState::Shutdown);
    }

    #[test]
    fn test_shutdown_without_boot_still_completes() {
        let service = test_service("activator");

        service.shutdown();
        assert_eq!(service.state(), ServiceState::Shutdown);
    }

    #[test]
    fn test_registry_requires_storage_and_kinds() {
        let result = ServiceRegistry::new(RegistryConfig::default());
        assert!(result.err().unwrap().is_invalid_config());

        let mut config = RegistryConfig::default();
        config.storage = Some(Arc::new(MemoryStorage::new()));
        config.kinds = Vec::new();
        let result = ServiceRegistry::new(config);
        assert!(result.err().unwrap().is_invalid_config());
    }

    #[test]
    fn test_registry_bundles_default_kinds() {
        let registry = registry();

        assert!(registry.service(KIND_ACTIVATOR).is_some());
        assert!(registry.service(KIND_NETWORK).is_some());
        assert!(registry.service("unknown").is_none());

        let mut kinds = registry.kinds();
        kinds.sort_unstable();
        assert_eq!(kinds, vec![KIND_ACTIVATOR, KIND_NETWORK]);
    }

    #[tokio::test]
    async fn test_registry_boot_boots_every_constituent() {
        let registry = registry();

        registry.boot().await;

        for kind in [KIND_ACTIVATOR, KIND_NETWORK] {
            let service = registry.service(kind).unwrap();
            assert_eq!(service.state(), ServiceState::Booted);
        }
    }

    #[tokio::test]
    async fn test_registry_shutdown_stops_every_constituent() {
        let registry = registry();

        registry.boot().await;
        registry.shutdown().await;

        for kind in [KIND_ACTIVATOR, KIND_NETWORK] {
            let service = registry.service(kind).unwrap();
            assert_eq!(service.state(), ServiceState::Shutdown);
        }
    }

    #[tokio::test]
    async fn test_registry_lifecycle_is_idempotent() {
        let registry = registry();

        registry.boot().await;
        registry.boot().await;
        registry.shutdown().await;
        registry.shutdown().await;

        let service = registry.service(KIND_ACTIVATOR).unwrap();
        assert_eq!(service.state(), ServiceState::Shutdown);
    }

    #[tokio::test]
    async fn test_concurrent_registry_boots_settle_once() {
        let registry = Arc::new(registry());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.boot().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for kind in [KIND_ACTIVATOR, KIND_NETWORK] {
            let service = registry.service(kind).unwrap();
            assert_eq!(service.state(), ServiceState::Booted);
        }
    }
}
