//! Concurrent namespace+locale context cache.
//!
//! Point operations go straight to a sharded [`DashMap`]. Bulk operations
//! (snapshot, clear, namespace invalidation) additionally take one internal
//! lock so they never interleave with each other; point operations never
//! wait on it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use polyglot_core::{
    CacheConfig, ContextFactory, Locale, LocalizedContext, PolyglotResult, ValidationError,
};
use tracing::{debug, trace, warn};

use crate::key::ContextKey;
use crate::stats::{CacheStats, StatsRecorder};

/// Thread-safe cache of localization contexts keyed by namespace and locale.
///
/// Values are shared as `Arc<V>`; the cache holds a reference but never
/// inspects or mutates them. There is no eviction and no expiry: entries
/// stay until [`remove`](Self::remove), [`invalidate_namespace`](Self::invalidate_namespace)
/// or [`clear`](Self::clear).
///
/// # Example
///
/// ```ignore
/// let cache: ContextCache<Catalog> = ContextCache::new();
/// let catalog = cache.get_or_create("org.example.app", &locale, &loader)?;
///
/// // Later, push a refresh to every live catalog.
/// cache.visit(|catalog| catalog.reload());
/// ```
pub struct ContextCache<V: LocalizedContext> {
    entries: DashMap<ContextKey, Arc<V>>,
    /// Serializes bulk operations; guards no data of its own.
    bulk: Mutex<()>,
    stats: StatsRecorder,
    config: CacheConfig,
}

impl<V: LocalizedContext> ContextCache<V> {
    /// Create an empty cache with default configuration.
    pub fn new() -> Self {
        Self::build(CacheConfig::default())
    }

    /// Create an empty cache with the given configuration.
    pub fn with_config(config: CacheConfig) -> PolyglotResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CacheConfig) -> Self {
        let entries = match config.shard_amount {
            Some(shards) => DashMap::with_capacity_and_shard_amount(config.initial_capacity, shards),
            None => DashMap::with_capacity(config.initial_capacity),
        };
        Self {
            entries,
            bulk: Mutex::new(()),
            stats: StatsRecorder::new(config.record_stats),
            config,
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get the context cached for `namespace` in `locale`.
    ///
    /// An absent locale is a caller bug and fails with
    /// [`ValidationError::InvalidArgument`], whatever the cache holds.
    /// Locales match exactly: a stored `en` does not answer for `en_US`.
    pub fn get(&self, namespace: &str, locale: Option<&Locale>) -> PolyglotResult<Option<Arc<V>>> {
        let locale = locale.ok_or_else(|| ValidationError::missing("locale"))?;
        Ok(self.lookup(namespace, locale))
    }

    /// Infallible form of [`get`](Self::get) for callers that hold a locale.
    pub fn lookup(&self, namespace: &str, locale: &Locale) -> Option<Arc<V>> {
        let key = ContextKey::new(namespace, locale);
        let found = self.entries.get(&key).map(|entry| Arc::clone(entry.value()));
        self.stats.record_lookup(found.is_some());
        trace!(key = %key, hit = found.is_some(), "context lookup");
        found
    }

    /// Returns true if a context is cached for `namespace` in `locale`.
    pub fn contains(&self, namespace: &str, locale: &Locale) -> bool {
        self.entries.contains_key(&ContextKey::new(namespace, locale))
    }

    /// Store a context under `namespace` and the context's own locale.
    ///
    /// Overwrites any context already stored for that pair and returns it.
    pub fn put(&self, namespace: &str, context: impl Into<Arc<V>>) -> Option<Arc<V>> {
        let context = context.into();
        let key = ContextKey::new(namespace, context.locale());
        let previous = self.entries.insert(key, context);
        self.stats.record_insert();

        if let Some(replaced) = &previous {
            debug!(namespace, locale = %replaced.locale(), "replaced cached context");
        }
        previous
    }

    /// Get the cached context, building it with `factory` on a miss.
    ///
    /// The factory runs without any map lock held. If two callers miss at
    /// the same time both build, the first insert wins, and both get that
    /// `Arc` back. Factory errors are returned as-is and nothing is cached.
    pub fn get_or_create<F>(
        &self,
        namespace: &str,
        locale: &Locale,
        factory: &F,
    ) -> PolyglotResult<Arc<V>>
    where
        F: ContextFactory<V> + ?Sized,
    {
        if let Some(existing) = self.lookup(namespace, locale) {
            return Ok(existing);
        }

        debug!(namespace, locale = %locale, "building localization context");
        let created = factory.create(namespace, locale)?;

        if created.locale() != locale {
            warn!(
                namespace,
                requested = %locale,
                produced = %created.locale(),
                "factory built a context for the wrong locale"
            );
            return Err(ValidationError::LocaleMismatch {
                requested: locale.to_string(),
                produced: created.locale().to_string(),
            }
            .into());
        }

        let stored = self
            .entries
            .entry(ContextKey::new(namespace, locale))
            .or_insert_with(|| {
                self.stats.record_insert();
                Arc::new(created)
            });
        Ok(Arc::clone(stored.value()))
    }

    /// Drop the context cached for `namespace` in `locale`, returning it.
    pub fn remove(&self, namespace: &str, locale: &Locale) -> Option<Arc<V>> {
        self.entries
            .remove(&ContextKey::new(namespace, locale))
            .map(|(_, context)| context)
    }

    /// Drop every context cached for `namespace`. Returns how many went.
    pub fn invalidate_namespace(&self, namespace: &str) -> usize {
        let _guard = self.bulk_guard();
        let mut removed = 0;
        self.entries.retain(|key, _| {
            let keep = !key.belongs_to(namespace);
            if !keep {
                removed += 1;
            }
            keep
        });
        debug!(namespace, removed, "invalidated namespace");
        removed
    }

    /// Remove all entries. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let _guard = self.bulk_guard();
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        debug!(removed, "cleared context cache");
        removed
    }

    /// Copy out every cached context.
    ///
    /// Later puts and clears do not change the returned set. Order is
    /// unspecified.
    pub fn snapshot(&self) -> Vec<Arc<V>> {
        let _guard = self.bulk_guard();
        let values: Vec<Arc<V>> = self
            .entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        trace!(count = values.len(), "took context snapshot");
        values
    }

    /// Call `visitor` once for every context in a fresh [`snapshot`](Self::snapshot).
    ///
    /// The visitor runs with no cache lock held, so it may call back into
    /// the cache.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&V),
    {
        for context in self.snapshot() {
            visitor(&context);
        }
    }

    /// Number of cached contexts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    fn bulk_guard(&self) -> MutexGuard<'_, ()> {
        // The mutex protects no data, so a poisoned lock is still usable.
        self.bulk.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: LocalizedContext> Default for ContextCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: LocalizedContext> fmt::Debug for ContextCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextCache")
            .field("len", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}
