//! In-memory reference backend
//!
//! A single mutex over one keyspace keeps every primitive atomic, matching
//! what a networked single-threaded store would provide. Not built for
//! throughput; built to honour the draining semantics exactly.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use rand::seq::IteratorRandom;

use crate::core::sync::handle_mutex_poison;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::Storage;

/// One keyspace slot: a key holds exactly one kind of value at a time
#[derive(Debug, Clone)]
enum Entry {
    Scalar(String),
    List(VecDeque<String>),
    Set(HashSet<String>),
}

/// In-memory `Storage` implementation
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<String, Entry>>> {
        handle_mutex_poison(self.entries.lock(), |message| StorageError::Internal {
            message,
        })
    }

    fn wrong_kind(key: &str, expected: &'static str) -> StorageError {
        StorageError::WrongKind {
            key: key.to_string(),
            expected,
        }
    }
}

impl Storage for MemoryStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), Entry::Scalar(value.to_string()));
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<String> {
        let entries = self.lock()?;
        match entries.get(key) {
            Some(Entry::Scalar(value)) => Ok(value.clone()),
            Some(_) => Err(Self::wrong_kind(key, "scalar")),
            None => Err(StorageError::not_found(key)),
        }
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;
        entries.remove(key);
        Ok(())
    }

    fn push_to_list(&self, key: &str, element: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(VecDeque::new()))
        {
            Entry::List(list) => {
                list.push_back(element.to_string());
                Ok(())
            }
            _ => Err(Self::wrong_kind(key, "list")),
        }
    }

    fn pop_from_list(&self, key: &str) -> StorageResult<String> {
        let mut entries = self.lock()?;
        let (element, now_empty) = match entries.get_mut(key) {
            Some(Entry::List(list)) => match list.pop_front() {
                Some(element) => (element, list.is_empty()),
                None => return Err(StorageError::not_found(key)),
            },
            Some(_) => return Err(Self::wrong_kind(key, "list")),
            None => return Err(StorageError::not_found(key)),
        };

        // Drained lists disappear with the call that drained them.
        if now_empty {
            entries.remove(key);
        }

        Ok(element)
    }

    fn get_all_from_list(&self, key: &str) -> StorageResult<Vec<String>> {
        let entries = self.lock()?;
        match entries.get(key) {
            Some(Entry::List(list)) => Ok(list.iter().cloned().collect()),
            Some(_) => Err(Self::wrong_kind(key, "list")),
            None => Ok(Vec::new()),
        }
    }

    fn remove_from_list(&self, key: &str, element: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;
        let now_empty = match entries.get_mut(key) {
            Some(Entry::List(list)) => {
                list.retain(|existing| existing != element);
                list.is_empty()
            }
            Some(_) => return Err(Self::wrong_kind(key, "list")),
            None => return Ok(()),
        };

        if now_empty {
            entries.remove(key);
        }

        Ok(())
    }

    fn trim_end_of_list(&self, key: &str, max: usize) -> StorageResult<()> {
        let mut entries = self.lock()?;
        let now_empty = match entries.get_mut(key) {
            Some(Entry::List(list)) => {
                while list.len() > max {
                    list.pop_front();
                }
                list.is_empty()
            }
            Some(_) => return Err(Self::wrong_kind(key, "list")),
            None => return Ok(()),
        };

        if now_empty {
            entries.remove(key);
        }

        Ok(())
    }

    fn push_to_set(&self, key: &str, member: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(HashSet::new()))
        {
            Entry::Set(set) => {
                set.insert(member.to_string());
                Ok(())
            }
            _ => Err(Self::wrong_kind(key, "set")),
        }
    }

    fn remove_from_set(&self, key: &str, member: &str) -> StorageResult<()> {
        let mut entries = self.lock()?;
        let now_empty = match entries.get_mut(key) {
            Some(Entry::Set(set)) => {
                set.remove(member);
                set.is_empty()
            }
            Some(_) => return Err(Self::wrong_kind(key, "set")),
            None => return Ok(()),
        };

        if now_empty {
            entries.remove(key);
        }

        Ok(())
    }

    fn get_random_from_set(&self, key: &str) -> StorageResult<String> {
        let entries = self.lock()?;
        match entries.get(key) {
            Some(Entry::Set(set)) => set
                .iter()
                .choose(&mut rand::thread_rng())
                .cloned()
                .ok_or_else(|| StorageError::not_found(key)),
            Some(_) => Err(Self::wrong_kind(key, "set")),
            None => Err(StorageError::not_found(key)),
        }
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let entries = self.lock()?;
        Ok(entries.contains_key(key))
    }
}
