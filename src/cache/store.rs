use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::traits::{Cacheable, QueryKey};

/// A cached query result.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
  pub items: Vec<T>,
  /// When the entry was last written, by a fetch or a mutation
  pub updated_at: DateTime<Utc>,
}

/// Key-value cache of entity lists.
#[derive(Debug)]
pub struct QueryCache<T: Cacheable> {
  entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Cacheable> Default for QueryCache<T> {
  fn default() -> Self {
    Self {
      entries: HashMap::new(),
    }
  }
}

impl<T: Cacheable> QueryCache<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Items stored under `key`, if the query has ever been written.
  pub fn get(&self, key: &impl QueryKey) -> Option<&[T]> {
    self.entry(key).map(|e| e.items.as_slice())
  }

  pub fn entry(&self, key: &impl QueryKey) -> Option<&CacheEntry<T>> {
    self.entries.get(&key.cache_hash())
  }

  /// Replace the whole entry.
  pub fn set(&mut self, key: &impl QueryKey, items: Vec<T>) {
    debug!(
      query = %key.description(),
      count = items.len(),
      "cache set {}",
      T::entity_type()
    );
    self.entries.insert(
      key.cache_hash(),
      CacheEntry {
        items,
        updated_at: Utc::now(),
      },
    );
  }

  /// Edit an existing entry in place.
  ///
  /// Returns false (and does not call `f`) when nothing is cached under `key`.
  pub fn update<F>(&mut self, key: &impl QueryKey, f: F) -> bool
  where
    F: FnOnce(&mut Vec<T>),
  {
    match self.entries.get_mut(&key.cache_hash()) {
      Some(entry) => {
        f(&mut entry.items);
        entry.updated_at = Utc::now();
        true
      }
      None => false,
    }
  }

  /// Insert `item` at the front of the entry.
  pub fn prepend(&mut self, key: &impl QueryKey, item: T) -> bool {
    self.update(key, |items| items.insert(0, item))
  }

  /// Replace, in place, every item whose key matches `item`'s key.
  ///
  /// Returns how many items were replaced.
  pub fn replace(&mut self, key: &impl QueryKey, item: T) -> usize {
    let target = item.cache_key();
    let mut replaced = 0;
    self.update(key, |items| {
      for existing in items.iter_mut().filter(|e| e.cache_key() == target) {
        *existing = item.clone();
        replaced += 1;
      }
    });
    replaced
  }

  /// Remove every item with the given key. Returns how many were removed.
  pub fn remove(&mut self, key: &impl QueryKey, entity_key: &T::Key) -> usize {
    let mut removed = 0;
    self.update(key, |items| {
      let before = items.len();
      items.retain(|e| &e.cache_key() != entity_key);
      removed = before - items.len();
    });
    removed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Item {
    id: u32,
    name: &'static str,
  }

  impl Cacheable for Item {
    type Key = u32;

    fn cache_key(&self) -> u32 {
      self.id
    }

    fn entity_type() -> &'static str {
      "item"
    }
  }

  struct Key(&'static str);

  impl QueryKey for Key {
    fn cache_hash(&self) -> String {
      self.0.to_string()
    }

    fn description(&self) -> String {
      self.0.to_string()
    }
  }

  fn item(id: u32, name: &'static str) -> Item {
    Item { id, name }
  }

  fn ids(cache: &QueryCache<Item>, key: &Key) -> Vec<u32> {
    cache.get(key).unwrap().iter().map(|i| i.id).collect()
  }

  #[test]
  fn test_get_missing_entry() {
    let cache: QueryCache<Item> = QueryCache::new();
    assert!(cache.get(&Key("items")).is_none());
  }

  #[test]
  fn test_set_replaces_entry() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a"), item(2, "b")]);
    cache.set(&key, vec![item(3, "c")]);
    assert_eq!(ids(&cache, &key), vec![3]);
  }

  #[test]
  fn test_entries_are_independent() {
    let mut cache = QueryCache::new();
    cache.set(&Key("a"), vec![item(1, "a")]);
    cache.set(&Key("b"), vec![item(2, "b")]);
    cache.remove(&Key("a"), &1);
    assert!(cache.get(&Key("a")).unwrap().is_empty());
    assert_eq!(ids(&cache, &Key("b")), vec![2]);
  }

  #[test]
  fn test_prepend() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a")]);
    assert!(cache.prepend(&key, item(2, "b")));
    assert_eq!(ids(&cache, &key), vec![2, 1]);
  }

  #[test]
  fn test_prepend_keeps_duplicates() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a")]);
    cache.prepend(&key, item(1, "again"));
    assert_eq!(ids(&cache, &key), vec![1, 1]);
  }

  #[test]
  fn test_mutations_without_entry_are_noops() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    assert!(!cache.prepend(&key, item(1, "a")));
    assert_eq!(cache.replace(&key, item(1, "a")), 0);
    assert_eq!(cache.remove(&key, &1), 0);
    assert!(cache.get(&key).is_none());
  }

  #[test]
  fn test_replace_in_place() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a"), item(2, "b"), item(3, "c")]);

    assert_eq!(cache.replace(&key, item(2, "B")), 1);
    assert_eq!(
      cache.get(&key).unwrap(),
      &[item(1, "a"), item(2, "B"), item(3, "c")]
    );
  }

  #[test]
  fn test_replace_is_idempotent() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a"), item(2, "b")]);

    cache.replace(&key, item(2, "B"));
    cache.replace(&key, item(2, "B"));
    assert_eq!(cache.get(&key).unwrap(), &[item(1, "a"), item(2, "B")]);
  }

  #[test]
  fn test_replace_unknown_key() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a")]);
    assert_eq!(cache.replace(&key, item(9, "z")), 0);
    assert_eq!(cache.get(&key).unwrap(), &[item(1, "a")]);
  }

  #[test]
  fn test_remove() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(5, "a"), item(7, "b"), item(9, "c")]);
    assert_eq!(cache.remove(&key, &7), 1);
    assert_eq!(ids(&cache, &key), vec![5, 9]);
  }

  #[test]
  fn test_update_touches_timestamp() {
    let mut cache = QueryCache::new();
    let key = Key("items");
    cache.set(&key, vec![item(1, "a")]);
    let before = cache.entry(&key).unwrap().updated_at;
    cache.prepend(&key, item(2, "b"));
    assert!(cache.entry(&key).unwrap().updated_at >= before);
  }
}
