//! Core traits for the caching system.

/// Trait for entities that can be held in a cache entry.
pub trait Cacheable: Clone {
  /// Identity of an entity within a list
  type Key: PartialEq + std::fmt::Debug;

  /// Unique identifier for this entity (e.g. product id)
  fn cache_key(&self) -> Self::Key;

  /// Entity type name, used in logs
  fn entity_type() -> &'static str;
}

/// Logical identity of a cached query result.
pub trait QueryKey {
  /// Stable key the entry is stored under
  fn cache_hash(&self) -> String;

  /// Human-readable description for logs
  fn description(&self) -> String;
}
