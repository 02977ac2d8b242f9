//! Synchronization utilities for robust mutex handling
//!
//! This module provides utilities for handling mutex poisoning in a
//! consistent manner across the codebase.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts mutex poison errors into application-specific errors using a
/// provided error constructor, so callers never unwrap a lock result.
///
/// # Arguments
/// * `result` - The result from a mutex lock operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Returns
/// The mutex guard on success, or an application error on poison/failure
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
