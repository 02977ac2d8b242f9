//! The storage capability set consumed by the queue services

use crate::storage::error::StorageResult;

/// Key/value backend with scalar, ordered-list and set primitives
///
/// Keys are opaque strings. Each method is an individually atomic
/// operation; implementations must be safe for concurrent callers.
///
/// Draining semantics: `pop_from_list`, `remove_from_list`,
/// `trim_end_of_list` and `remove_from_set` remove the key itself when the
/// collection under it becomes empty. `exists` consequently answers "does
/// this key hold a non-empty value".
pub trait Storage: Send + Sync {
    // Scalar entries.

    /// Store or overwrite the value under the key
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Fetch the value under the key; `NotFound` when absent
    fn get(&self, key: &str) -> StorageResult<String>;

    /// Remove the key and whatever it holds; absent keys are a no-op
    fn remove(&self, key: &str) -> StorageResult<()>;

    // Ordered lists.

    /// Append the element at the list's tail, creating the list on demand
    fn push_to_list(&self, key: &str, element: &str) -> StorageResult<()>;

    /// Pop the element at the list's head; `NotFound` when the list does
    /// not exist
    fn pop_from_list(&self, key: &str) -> StorageResult<String>;

    /// All elements in list order; an absent list reads as empty
    fn get_all_from_list(&self, key: &str) -> StorageResult<Vec<String>>;

    /// Remove every occurrence of the element; absent lists and absent
    /// elements are a no-op
    fn remove_from_list(&self, key: &str, element: &str) -> StorageResult<()>;

    /// Discard elements from the head until at most `max` newest entries
    /// remain; absent lists are a no-op
    fn trim_end_of_list(&self, key: &str, max: usize) -> StorageResult<()>;

    // Sets.

    /// Add the member, creating the set on demand; duplicates are ignored
    fn push_to_set(&self, key: &str, member: &str) -> StorageResult<()>;

    /// Remove the member; absent sets and absent members are a no-op
    fn remove_from_set(&self, key: &str, member: &str) -> StorageResult<()>;

    /// One member chosen uniformly at random; `NotFound` when the set does
    /// not exist
    fn get_random_from_set(&self, key: &str) -> StorageResult<String>;

    // Keyspace.

    /// Whether the key currently holds a value of any kind
    fn exists(&self, key: &str) -> StorageResult<bool>;
}
