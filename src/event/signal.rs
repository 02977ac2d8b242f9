//! Signals: events carrying invocation arguments and a propagation context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::context::Context;
use crate::event::error::{EventError, EventResult};
use crate::event::event::{generate_id, is_zero_created, Event};
use crate::event::traits::Queueable;
use crate::event::value::ArgumentValue;

/// Wire form of a signal; see `EventRecord` for the payload convention.
#[derive(Debug, Serialize, Deserialize)]
struct SignalRecord {
    arguments: Vec<ArgumentValue>,
    context: Context,
    created: DateTime<Utc>,
    id: String,
}

/// A signal carries the inputs for a downstream invocation through a queue
///
/// Arguments are an ordered sequence of typed values and may be empty. The
/// context is an opaque propagation bag and is always present. Like an
/// [`Event`], a signal caches its exact serialized form as its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    arguments: Vec<ArgumentValue>,
    context: Context,
    created: DateTime<Utc>,
    id: String,
    payload: String,
}

impl Signal {
    /// Create a new signal with a generated identifier and the current time
    pub fn new(arguments: Vec<ArgumentValue>, context: Context) -> EventResult<Self> {
        Self::from_parts(generate_id(), Utc::now(), arguments, context)
    }

    /// Create a signal from explicit parts
    pub fn from_parts(
        id: String,
        created: DateTime<Utc>,
        arguments: Vec<ArgumentValue>,
        context: Context,
    ) -> EventResult<Self> {
        if id.is_empty() {
            return Err(EventError::invalid_config("id must not be empty"));
        }
        if is_zero_created(&created) {
            return Err(EventError::invalid_config("created must not be empty"));
        }

        let payload = serde_json::to_string(&SignalRecord {
            arguments: arguments.clone(),
            context: context.clone(),
            created,
            id: id.clone(),
        })?;

        Ok(Self {
            arguments,
            context,
            created,
            id,
            payload,
        })
    }

    /// Reconstruct a signal from its serialized form, caching the incoming
    /// text verbatim as the payload
    pub fn from_payload(raw: &str) -> EventResult<Self> {
        let record: SignalRecord = serde_json::from_str(raw)?;

        if record.id.is_empty() {
            return Err(EventError::invalid_config("id must not be empty"));
        }
        if is_zero_created(&record.created) {
            return Err(EventError::invalid_config("created must not be empty"));
        }

        Ok(Self {
            arguments: record.arguments,
            context: record.context,
            created: record.created,
            id: record.id,
            payload: raw.to_string(),
        })
    }

    /// Reconstruct the signal a consumed event was published as
    ///
    /// Fails when the event's payload is not a signal record.
    pub fn from_event(event: &Event) -> EventResult<Self> {
        Self::from_payload(event.payload())
    }

    /// Build one signal out of several
    ///
    /// Arguments are concatenated in input order, each signal's own order
    /// preserved. The context starts empty and merges every input signal's
    /// context in input order, so later signals win conflicting keys. The
    /// result gets a fresh identifier and the current timestamp; it is not
    /// addressed to any namespace until explicitly published.
    pub fn compose(signals: &[Signal]) -> EventResult<Self> {
        if signals.is_empty() {
            return Err(EventError::invalid_config("signals must not be empty"));
        }

        let mut arguments = Vec::new();
        for signal in signals {
            arguments.extend_from_slice(&signal.arguments);
        }

        let mut context = Context::new();
        for signal in signals {
            context.merge(&signal.context);
        }

        Self::new(arguments, context)
    }

    pub fn arguments(&self) -> &[ArgumentValue] {
        &self.arguments
    }

    pub fn context(&self) -> &Context {
        &self.context
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

impl Queueable for Signal {
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
