//! Session id providers.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Supplies the current user's session id, `None` for anonymous visitors.
pub trait SessionProvider: Send + Sync {
    fn session_id(&self) -> Option<String>;
}

/// Always anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSession;

impl SessionProvider for AnonymousSession {
    fn session_id(&self) -> Option<String> {
        None
    }
}

/// Fixed session id.
#[derive(Debug, Clone)]
pub struct StaticSession(String);

impl StaticSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self(session_id.into())
    }
}

impl SessionProvider for StaticSession {
    fn session_id(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Session id that changes as the user logs in and out.
#[derive(Debug, Default)]
pub struct SessionHandle {
    current: ArcSwapOption<String>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(session_id: impl Into<String>) -> Self {
        let handle = Self::new();
        handle.set(session_id);
        handle
    }

    pub fn set(&self, session_id: impl Into<String>) {
        self.current.store(Some(Arc::new(session_id.into())));
    }

    pub fn clear(&self) {
        self.current.store(None);
    }
}

impl SessionProvider for SessionHandle {
    fn session_id(&self) -> Option<String> {
        self.current.load_full().map(|s| String::clone(&s))
    }
}
