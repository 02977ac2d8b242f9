//! Concurrency behaviour tests
//!
//! Composite operations are chains of atomic backend calls without a
//! transaction; these tests pin down the guarantees that survive that
//! model: unique delivery of each event, idempotent garbage collection and
//! a lookup table that ends up empty once everything drains.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::event::Event;
    use crate::queue::api::LABEL_WILDCARD;
    use crate::queue::tests::test_service;

    #[tokio::test]
    async fn test_concurrent_consumers_never_share_an_event() {
        let service = Arc::new(test_service("activator"));

        let mut expected = HashSet::new();
        for _ in 0..40 {
            let event = Event::new().unwrap();
            service.create(&event, &["x"]).unwrap();
            expected.insert(event.id().to_string());
        }

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let mut consumed = Vec::new();
                loop {
                    match service.search(&["x"]).await {
                        Ok(event) => {
                            service.delete(&event, &["x"]).unwrap();
                            consumed.push(event.id().to_string());
                        }
                        Err(err) => {
                            assert!(err.is_not_found());
                            break;
                        }
                    }
                }
                consumed
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                // Each event is delivered to exactly one consumer.
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen, expected);

        // Queue and lookup table fully drained; the racing GC attempts
        // collapsed into one effective removal.
        assert!(!service.exists_any(&["x"]).unwrap());
        let wildcard_read = service.search(&[LABEL_WILDCARD]).await;
        assert!(wildcard_read.err().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_producers_fill_one_namespace() {
        let service = Arc::new(test_service("activator"));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    let event = Event::new().unwrap();
                    service.create(&event, &["x"]).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let events = service.search_all(&["x"]).unwrap();
        assert_eq!(events.len(), 40);

        let unique: HashSet<_> = events.iter().map(|event| event.id()).collect();
        assert_eq!(unique.len(), 40);
    }

    #[tokio::test]
    async fn test_producers_and_consumers_interleave() {
        let service = Arc::new(test_service("activator"));

        let producer = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                for _ in 0..20 {
                    let event = Event::new().unwrap();
                    service.create(&event, &["x"]).unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        let consumer = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let mut consumed = 0usize;
                while consumed < 20 {
                    match service.search(&["x"]).await {
                        Ok(_) => consumed += 1,
                        Err(err) => {
                            assert!(err.is_not_found());
                            tokio::task::yield_now().await;
                        }
                    }
                }
                consumed
            })
        };

        producer.await.unwrap();
        assert_eq!(consumer.await.unwrap(), 20);
        assert!(!service.exists_any(&["x"]).unwrap());
    }
}
