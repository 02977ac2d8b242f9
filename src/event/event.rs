//! The base event entity
//!
//! An event is an identified, timestamped carrier for a serialized payload.
//! Serialization goes through a plain wire record with no custom hooks; the
//! entity itself keeps the exact serialized text it was constructed from or
//! serialized to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::error::{EventError, EventResult};
use crate::event::traits::Queueable;

/// Wire form of an event. The cached payload is intentionally not part of
/// the record; it IS the record's serialized text.
#[derive(Debug, Serialize, Deserialize)]
struct EventRecord {
    created: DateTime<Utc>,
    id: String,
}

/// Generate a process-unique opaque identifier
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A zero `created` timestamp marks an entity that was never properly
/// constructed; reject it the same way an empty id is rejected.
pub(crate) fn is_zero_created(created: &DateTime<Utc>) -> bool {
    created.timestamp() == 0 && created.timestamp_subsec_nanos() == 0
}

/// An event queued and resolved by the queue services
///
/// The payload is captured once, at construction or at deserialization, and
/// is byte-identical to the text the entity round-trips through storage as.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    created: DateTime<Utc>,
    id: String,
    payload: String,
}

impl Event {
    /// Create a new event with a generated identifier and the current time
    pub fn new() -> EventResult<Self> {
        Self::from_parts(generate_id(), Utc::now())
    }

    /// Create an event from explicit parts
    ///
    /// Fails with `InvalidConfig` when the id is empty or the timestamp is
    /// zero.
    pub fn from_parts(id: String, created: DateTime<Utc>) -> EventResult<Self> {
        if id.is_empty() {
            return Err(EventError::invalid_config("id must not be empty"));
        }
        if is_zero_created(&created) {
            return Err(EventError::invalid_config("created must not be empty"));
        }

        let payload = serde_json::to_string(&EventRecord {
            created,
            id: id.clone(),
        })?;

        Ok(Self {
            created,
            id,
            payload,
        })
    }

    /// Reconstruct an event from its serialized form
    ///
    /// The incoming text is cached verbatim as the payload; the entity is
    /// never re-serialized on this path.
    pub fn from_payload(raw: &str) -> EventResult<Self> {
        let record: EventRecord = serde_json::from_str(raw)?;

        if record.id.is_empty() {
            return Err(EventError::invalid_config("id must not be empty"));
        }
        if is_zero_created(&record.created) {
            return Err(EventError::invalid_config("created must not be empty"));
        }

        Ok(Self {
            created: record.created,
            id: record.id,
            payload: raw.to_string(),
        })
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl Queueable for Event {
    fn id(&self) -> &str {
        &self.id
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn payload(&self) -> &str {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_event_has_id_and_payload() {
        let event = Event::new().unwrap();

        assert!(!event.id().is_empty());
        assert!(!event.payload().is_empty());
        assert!(!is_zero_created(&event.created()));
    }

    #[test]
    fn test_from_parts_rejects_empty_id() {
        let result = Event::from_parts(String::new(), Utc::now());

        assert!(matches!(
            result,
            Err(EventError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_from_parts_rejects_zero_created() {
        let zero = Utc.timestamp_opt(0, 0).unwrap();
        let result = Event::from_parts("some-id".to_string(), zero);

        assert!(matches!(
            result,
            Err(EventError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_round_trip_payload_is_byte_identical() {
        let event = Event::new().unwrap();
        let restored = Event::from_payload(event.payload()).unwrap();

        assert_eq!(restored.payload(), event.payload());
        assert_eq!(restored.id(), event.id());
        assert_eq!(restored.created(), event.created());
    }

    #[test]
    fn test_from_payload_caches_incoming_text_verbatim() {
        // Whitespace that re-serialization would normalise away.
        let raw = format!(
            "{{ \"created\": \"{}\",   \"id\": \"abc\" }}",
            Utc::now().to_rfc3339()
        );
        let event = Event::from_payload(&raw).unwrap();

        assert_eq!(event.payload(), raw);
    }

    #[test]
    fn test_from_payload_rejects_garbage() {
        assert!(Event::from_payload("not json").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
