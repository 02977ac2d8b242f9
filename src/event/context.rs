//! Propagation context carried by signals
//!
//! An opaque bag of request-scoped key/values (trace identifiers,
//! causation hints). The queue core never inspects the contents; it only
//! stores the bag alongside a signal and orchestrates merges when signals
//! are composed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request-scoped propagation bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one key, overwriting any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another context into this one, last writer wins per key
    pub fn merge(&mut self, other: &Context) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}
