// src/application/query_cache.rs
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

use crate::domain::note::ListQuery;
use crate::domain::Note;

struct Entry<V> {
    value: V,
    stale: bool,
}

/// Last-fetched server responses keyed by query.
///
/// Stale entries are kept so callers can inspect them, but `get` only hands
/// out fresh ones; a stale key is re-fetched on the next `fetch`.
pub struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries()
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.clone())
    }

    /// `Some(true)` for a stale entry, `None` when the key was never cached
    pub fn is_stale(&self, key: &K) -> Option<bool> {
        self.entries().get(key).map(|entry| entry.stale)
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries()
            .insert(key, Entry { value, stale: false });
    }

    pub fn invalidate(&self, key: &K) {
        if let Some(entry) = self.entries().get_mut(key) {
            trace!(?key, "Marking cache entry stale");
            entry.stale = true;
        }
    }

    pub fn invalidate_all(&self) {
        for entry in self.entries().values_mut() {
            entry.stale = true;
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries().remove(key).map(|entry| entry.value)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Return the fresh entry for `key`, or run `fetch` and cache its result.
    ///
    /// Errors are passed through and leave the cache untouched.
    pub async fn fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            trace!(?key, "Cache hit");
            return Ok(value);
        }
        trace!(?key, "Cache miss");
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// The two caches the client keeps: note lists per query and single notes per id
#[derive(Default)]
pub struct NoteCache {
    pub lists: QueryCache<ListQuery, Vec<Note>>,
    pub notes: QueryCache<i64, Note>,
}

impl NoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_created(&self, note: &Note) {
        self.lists.invalidate_all();
        self.notes.insert(note.id, note.clone());
    }

    pub fn note_updated(&self, id: i64) {
        self.lists.invalidate_all();
        self.notes.invalidate(&id);
    }

    pub fn note_deleted(&self, id: i64) {
        self.lists.invalidate_all();
        self.notes.remove(&id);
    }

    pub fn clear(&self) {
        self.lists.clear();
        self.notes.clear();
    }
}
