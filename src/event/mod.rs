//! Event and signal data model
//!
//! The data unit flowing through the queue services. An `Event` is an
//! identified, timestamped payload carrier; a `Signal` specializes it with
//! invocation arguments and a propagation context for downstream calls.
//!
//! Both types cache their own serialized form at construction time: the
//! payload of an entity is the exact text it was built from or serialized
//! to, never a re-encoding. This makes the serialize/deserialize round trip
//! byte-identical, which the queue services rely on when storing and
//! resolving payloads.

mod context;
mod error;
mod event;
mod signal;
mod traits;
mod value;

pub use context::Context;
pub use error::{EventError, EventResult};
pub use event::Event;
pub use signal::Signal;
pub use traits::Queueable;
pub use value::ArgumentValue;

pub mod api;
