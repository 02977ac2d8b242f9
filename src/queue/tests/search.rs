//! Blocking-read protocol tests
//!
//! `search` is the only retrying operation; these tests cover the retry
//! loop, wildcard consumption, lookup-table garbage collection and the
//! documented dangling-identifier behaviour of `delete`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::event::{Context, Event, Signal};
    use crate::queue::api::LABEL_WILDCARD;
    use crate::queue::tests::{test_service, test_service_with_retries};

    #[tokio::test]
    async fn test_search_returns_oldest_event_first() {
        let service = test_service("activator");

        let first = Event::new().unwrap();
        let second = Event::new().unwrap();
        service.create(&first, &["x"]).unwrap();
        service.create(&second, &["x"]).unwrap();

        let consumed = service.search(&["x"]).await.unwrap();
        assert_eq!(consumed.id(), first.id());
        assert_eq!(consumed.payload(), first.payload());

        let consumed = service.search(&["x"]).await.unwrap();
        assert_eq!(consumed.id(), second.id());
    }

    #[tokio::test]
    async fn test_draining_removes_queue_and_lookup_entry() {
        let service = test_service("activator");

        let event = Event::new().unwrap();
        service.create(&event, &["x"]).unwrap();
        assert!(service.exists_any(&["x"]).unwrap());

        let _ = service.search(&["x"]).await.unwrap();

        // Queue and lookup entry are both gone.
        assert!(!service.exists_any(&["x"]).unwrap());
        let wildcard_read = service.search(&[LABEL_WILDCARD]).await;
        assert!(wildcard_read.err().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_search_on_empty_queue_is_not_found() {
        let service = test_service("activator");

        let result = service.search(&["nothing"]).await;
        assert!(result.err().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_wildcard_search_on_empty_system_exhausts_retries() {
        let service = test_service_with_retries("activator", 3);

        // Nothing queued anywhere: every attempt fails, the policy runs
        // dry and the last NotFound surfaces. No panic, no infinite block.
        let result = service.search(&[LABEL_WILDCARD]).await;
        assert!(result.err().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_wildcard_search_consumes_from_some_namespace() {
        let service = test_service("activator");

        let event = Event::new().unwrap();
        service.create(&event, &["x", "y"]).unwrap();

        let consumed = service.search(&[LABEL_WILDCARD]).await.unwrap();
        assert_eq!(consumed.id(), event.id());
        assert!(!service.exists_any(&["x", "y"]).unwrap());
    }

    #[tokio::test]
    async fn test_search_blocks_until_an_event_arrives() {
        let service = Arc::new(test_service_with_retries("activator", 20));
        let event = Event::new().unwrap();

        let producer = {
            let service = Arc::clone(&service);
            let event = event.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                service.create(&event, &["x"]).unwrap();
            })
        };

        // The consumer starts before the producer has published; the retry
        // loop bridges the gap.
        let consumed = service.search(&["x"]).await.unwrap();
        assert_eq!(consumed.id(), event.id());

        producer.await.unwrap();
    }

    #[tokio::test]
    async fn test_deleting_a_queued_event_leaves_a_dangling_id() {
        let service = test_service("activator");

        let event = Event::new().unwrap();
        service.create(&event, &["x"]).unwrap();

        // Contract violation: delete without an intervening search. The
        // queue still holds the id, but the payload is gone.
        service.delete(&event, &["x"]).unwrap();
        assert!(service.exists_any(&["x"]).unwrap());

        // Resolution of the dangling id fails and is treated as NotFound
        // rather than returning the already-deleted event.
        let result = service.search(&["x"]).await;
        assert!(result.err().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_retries_absorb_a_dangling_id_before_a_live_event() {
        let service = test_service_with_retries("activator", 5);

        let dangling = Event::new().unwrap();
        let live = Event::new().unwrap();
        service.create(&dangling, &["x"]).unwrap();
        service.create(&live, &["x"]).unwrap();
        service.delete(&dangling, &["x"]).unwrap();

        // First attempt pops the dangling id and fails to resolve it; the
        // retry pops the live event.
        let consumed = service.search(&["x"]).await.unwrap();
        assert_eq!(consumed.id(), live.id());
    }

    #[tokio::test]
    async fn test_consumed_signal_round_trips_through_search() {
        let service = test_service("activator");

        let mut context = Context::new();
        context.set("trace", "t-1");
        let signal = Signal::new(vec!["payload".into()], context).unwrap();

        service.create(&signal, &["x"]).unwrap();

        let consumed = service.search(&["x"]).await.unwrap();
        assert_eq!(consumed.payload(), signal.payload());

        let restored = Signal::from_event(&consumed).unwrap();
        assert_eq!(restored, signal);
    }
}
