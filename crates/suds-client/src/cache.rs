//! Read-through cache for widget init and auth payloads.
//!
//! ## Entries
//!
//! - **Init**: one entry per article id. The payload is not element-specific;
//!   the gateway rewrites `el` on every read.
//! - **Auth**: a single slot holding the auth payload of the session it was
//!   fetched for. Lookups for any other session miss.
//!
//! ## Invalidation
//!
//! Entries are replaced by newer successful responses. The auth slot is
//! emptied whenever a response that should have carried a token did not.
//! With a TTL configured, stale entries read as absent and are dropped lazily
//! or by [`LocalSudsCache::cleanup_expired`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use dashmap::DashMap;
use suds_config::CacheSettings;

use crate::types::{AuthResult, InitResult};

/// Storage used by the gateway for cacheable responses.
#[async_trait]
pub trait SudsCache: Send + Sync {
    /// Get the cached init payload of an article.
    async fn get_init(&self, article_id: &str) -> Option<InitResult>;

    /// Store (or replace) the init payload of an article.
    async fn cache_init(&self, article_id: &str, init: InitResult);

    /// Get the cached auth payload if it belongs to `session_id`.
    async fn get_auth(&self, session_id: &str) -> Option<AuthResult>;

    /// Replace the auth slot with a payload fetched for `session_id`.
    async fn cache_auth(&self, session_id: &str, auth: AuthResult);

    /// Empty the auth slot.
    async fn remove_auth(&self);

    /// Drop every entry.
    async fn clear(&self);

    fn stats(&self) -> CacheStats;
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of init entries currently stored.
    pub init_entries: usize,
    /// Whether the auth slot is occupied.
    pub has_auth: bool,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because their TTL elapsed.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct CachedInit {
    init: InitResult,
    expires_at: Option<Instant>,
}

struct CachedAuth {
    session_id: String,
    auth: AuthResult,
    expires_at: Option<Instant>,
}

fn is_expired(expires_at: Option<Instant>, now: Instant) -> bool {
    expires_at.is_some_and(|at| at <= now)
}

/// In-memory cache, safe to share between tasks.
pub struct LocalSudsCache {
    init: DashMap<String, CachedInit>,
    auth: ArcSwapOption<CachedAuth>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl LocalSudsCache {
    /// Entries live until replaced or removed.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Entries additionally expire `ttl` after being written.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::build(Some(ttl))
    }

    fn build(ttl: Option<Duration>) -> Self {
        Self {
            init: DashMap::new(),
            auth: ArcSwapOption::empty(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn expiry(&self) -> Option<Instant> {
        self.ttl.map(|ttl| Instant::now() + ttl)
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.init.retain(|_, entry| {
            if is_expired(entry.expires_at, now) {
                removed += 1;
                false
            } else {
                true
            }
        });

        let auth_expired = match &*self.auth.load() {
            Some(slot) => is_expired(slot.expires_at, now),
            None => false,
        };
        if auth_expired {
            self.auth.store(None);
            removed += 1;
        }

        if removed > 0 {
            self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }
}

impl Default for LocalSudsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SudsCache for LocalSudsCache {
    async fn get_init(&self, article_id: &str) -> Option<InitResult> {
        let now = Instant::now();

        if let Some(entry) = self.init.get(article_id) {
            if !is_expired(entry.expires_at, now) {
                self.record(true);
                return Some(entry.init.clone());
            }
            drop(entry);
            self.init.remove(article_id);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        self.record(false);
        None
    }

    async fn cache_init(&self, article_id: &str, init: InitResult) {
        let entry = CachedInit {
            init,
            expires_at: self.expiry(),
        };
        self.init.insert(article_id.to_string(), entry);
    }

    async fn get_auth(&self, session_id: &str) -> Option<AuthResult> {
        let now = Instant::now();
        let slot = self.auth.load_full();

        match slot {
            Some(slot) if slot.session_id == session_id => {
                if !is_expired(slot.expires_at, now) {
                    self.record(true);
                    return Some(slot.auth.clone());
                }
                // only clear the slot if nobody replaced it meanwhile
                let prev = self.auth.compare_and_swap(&Some(Arc::clone(&slot)), None);
                if matches!(&*prev, Some(p) if Arc::ptr_eq(p, &slot)) {
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
            }
            _ => {}
        }

        self.record(false);
        None
    }

    async fn cache_auth(&self, session_id: &str, auth: AuthResult) {
        self.auth.store(Some(Arc::new(CachedAuth {
            session_id: session_id.to_string(),
            auth,
            expires_at: self.expiry(),
        })));
    }

    async fn remove_auth(&self) {
        self.auth.store(None);
    }

    async fn clear(&self) {
        self.init.clear();
        self.auth.store(None);
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            init_entries: self.init.len(),
            has_auth: self.auth.load().is_some(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// A cache that never stores anything.
pub struct NoOpSudsCache;

#[async_trait]
impl SudsCache for NoOpSudsCache {
    async fn get_init(&self, _article_id: &str) -> Option<InitResult> {
        None
    }

    async fn cache_init(&self, _article_id: &str, _init: InitResult) {}

    async fn get_auth(&self, _session_id: &str) -> Option<AuthResult> {
        None
    }

    async fn cache_auth(&self, _session_id: &str, _auth: AuthResult) {}

    async fn remove_auth(&self) {}

    async fn clear(&self) {}

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// Create the shared cache described by `settings`.
pub fn create_cache(settings: &CacheSettings) -> Arc<dyn SudsCache> {
    match settings.ttl() {
        Some(ttl) => Arc::new(LocalSudsCache::with_ttl(ttl)),
        None => Arc::new(LocalSudsCache::new()),
    }
}
