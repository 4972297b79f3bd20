//! The SUDS gateway: request assembly plus the cache decisions around it.
//!
//! ```text
//! caller → SudsGateway ─┬─ cache hit ──────────────────────────→ caller
//!                       └─ miss / force → Transport → cache write → caller
//! ```
//!
//! Caching is engaged only when the configuration enables it *and* the
//! session provider reports a session. `force` skips the read, never the
//! write.
//!
//! Operations are grouped like the service's endpoints:
//! - `livefyre`: widget init and comment counts
//! - `user`: auth and user settings

mod livefyre;
mod user;

use std::sync::Arc;

use suds_config::{ConfigSource, StaticConfigSource, SudsConfig};
use tracing::debug;

use crate::batch::BatchPlanner;
use crate::cache::{SudsCache, create_cache};
use crate::error::Result;
use crate::lock::KeyedLocks;
use crate::session::{AnonymousSession, SessionProvider};
use crate::transport::{HttpTransport, Transport};

const AUTH_LOCK_KEY: &str = "auth";

fn init_lock_key(article_id: &str) -> String {
    format!("init:{article_id}")
}

/// Per-call view of the session and cache switch.
#[derive(Debug, Clone)]
struct CallContext {
    config: Arc<SudsConfig>,
    session_id: Option<String>,
    cache_enabled: bool,
}

impl CallContext {
    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Session the cache is engaged for, if any.
    fn cache_session(&self) -> Option<&str> {
        if self.cache_enabled {
            self.session_id()
        } else {
            None
        }
    }
}

/// Access layer for the SUDS service.
///
/// Cheap to share behind an `Arc`; all state lives in the injected
/// collaborators.
pub struct SudsGateway {
    config: Arc<dyn ConfigSource>,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionProvider>,
    cache: Arc<dyn SudsCache>,
    locks: KeyedLocks,
}

impl SudsGateway {
    pub fn builder() -> SudsGatewayBuilder {
        SudsGatewayBuilder::new()
    }

    /// The cache this gateway reads and writes.
    pub fn cache(&self) -> &Arc<dyn SudsCache> {
        &self.cache
    }

    fn context(&self) -> CallContext {
        let config = self.config.get();
        let session_id = self.session.session_id().filter(|s| !s.is_empty());
        let cache_enabled = config.cache_enabled() && session_id.is_some();
        debug!(
            config_source = self.config.name(),
            cache_enabled,
            anonymous = session_id.is_none(),
            "SUDS call context"
        );
        CallContext {
            config,
            session_id,
            cache_enabled,
        }
    }

    fn planner(config: &SudsConfig) -> BatchPlanner {
        BatchPlanner::new(config.batching.max_url_size)
    }
}

impl std::fmt::Debug for SudsGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SudsGateway")
            .field("config_source", &self.config.name())
            .field("cache", &self.cache.stats())
            .finish()
    }
}

/// Builder for [`SudsGateway`].
///
/// Unset collaborators default to: built-in configuration, an
/// [`HttpTransport`] using the configured timeout, an anonymous session and a
/// [`LocalSudsCache`](crate::LocalSudsCache) with the configured TTL.
#[derive(Default)]
pub struct SudsGatewayBuilder {
    config: Option<Arc<dyn ConfigSource>>,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Arc<dyn SessionProvider>>,
    cache: Option<Arc<dyn SudsCache>>,
}

impl SudsGatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed configuration.
    pub fn with_config(mut self, config: SudsConfig) -> Self {
        self.config = Some(Arc::new(StaticConfigSource::new(config)));
        self
    }

    pub fn with_config_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.config = Some(source);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn SudsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<SudsGateway> {
        let config: Arc<dyn ConfigSource> = match self.config {
            Some(config) => config,
            None => Arc::new(StaticConfigSource::default()),
        };
        let snapshot = config.get();
        snapshot.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&snapshot.http)?),
        };
        let cache: Arc<dyn SudsCache> = match self.cache {
            Some(cache) => cache,
            None => create_cache(&snapshot.cache),
        };
        let session: Arc<dyn SessionProvider> = match self.session {
            Some(session) => session,
            None => Arc::new(AnonymousSession),
        };

        Ok(SudsGateway {
            config,
            transport,
            session,
            cache,
            locks: KeyedLocks::new(),
        })
    }
}
