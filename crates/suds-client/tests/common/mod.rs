#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use suds_client::suds_config::SudsConfig;
use suds_client::{
    AnonymousSession, LocalSudsCache, Payload, SessionProvider, StaticSession, SudsCache,
    SudsGateway, Transport, TransportError,
};

pub const SESSION: &str = "sess-1";

type Handler = Arc<dyn Fn(&Payload) -> Result<Value, TransportError> + Send + Sync>;

/// Transport answering from scripted handlers matched by URL suffix, recording every call.
#[derive(Default)]
pub struct RecordingTransport {
    handlers: Mutex<Vec<(String, Handler)>>,
    calls: Mutex<Vec<(String, Payload)>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer calls whose URL ends with `suffix`; later registrations win.
    pub fn on<F>(&self, suffix: &str, handler: F)
    where
        F: Fn(&Payload) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        self.handlers
            .lock()
            .unwrap()
            .insert(0, (suffix.to_string(), handler));
    }

    pub fn respond(&self, suffix: &str, response: Value) {
        self.on(suffix, move |_| Ok(response.clone()));
    }

    pub fn calls(&self) -> Vec<(String, Payload)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, suffix: &str) -> Vec<Payload> {
        self.calls()
            .into_iter()
            .filter(|(url, _)| url.ends_with(suffix))
            .map(|(_, payload)| payload)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn call(&self, target: &str, payload: &Payload) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.to_string(), payload.clone()));
        let handler = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .find(|(suffix, _)| target.ends_with(suffix.as_str()))
            .map(|(_, handler)| Arc::clone(handler));
        match handler {
            Some(handler) => handler(payload),
            None => Err(TransportError::other(format!("no handler for {target}"))),
        }
    }
}

pub fn cached_config() -> SudsConfig {
    let mut config = SudsConfig::default();
    config.cache.enabled = true;
    config
}

pub struct Harness {
    pub gateway: SudsGateway,
    pub transport: Arc<RecordingTransport>,
    pub cache: Arc<LocalSudsCache>,
}

fn harness(config: SudsConfig, session: Arc<dyn SessionProvider>) -> Harness {
    let transport = RecordingTransport::new();
    let cache = Arc::new(LocalSudsCache::new());
    let gateway = SudsGateway::builder()
        .with_config(config)
        .with_transport(transport.clone())
        .with_session(session)
        .with_cache(cache.clone() as Arc<dyn SudsCache>)
        .build()
        .expect("gateway");
    Harness {
        gateway,
        transport,
        cache,
    }
}

/// Cache enabled, logged in as [`SESSION`].
pub fn logged_in() -> Harness {
    harness(cached_config(), Arc::new(StaticSession::new(SESSION)))
}

/// Cache enabled, no session.
pub fn anonymous() -> Harness {
    harness(cached_config(), Arc::new(AnonymousSession))
}

/// Logged in, cache switched off.
pub fn uncached() -> Harness {
    harness(SudsConfig::default(), Arc::new(StaticSession::new(SESSION)))
}
