//! Public API for the event data model
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::event::context::Context;
pub use crate::event::error::{EventError, EventResult};
pub use crate::event::event::Event;
pub use crate::event::signal::Signal;
pub use crate::event::traits::Queueable;
pub use crate::event::value::ArgumentValue;
