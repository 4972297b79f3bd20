//! Client access layer for SUDS, the session user data service behind the
//! comment widgets.
//!
//! [`SudsGateway`] exposes the service operations:
//! - [`get_init_config`](SudsGateway::get_init_config): widget initialization data
//! - [`get_comment_count`](SudsGateway::get_comment_count) and
//!   [`get_comment_counts`](SudsGateway::get_comment_counts): single and batched counts
//! - [`get_auth`](SudsGateway::get_auth): auth data of the current session
//! - [`update_user`](SudsGateway::update_user): save user settings
//!
//! Init and auth responses go through a [`SudsCache`] when caching is
//! enabled and the user has a session.
//!
//! ```no_run
//! use std::sync::Arc;
//! use suds_client::{InitRequest, SessionHandle, SudsGateway};
//!
//! # async fn run() -> suds_client::Result<()> {
//! let config = suds_client::suds_config::load_config(None)?;
//! let gateway = SudsGateway::builder()
//!     .with_config(config)
//!     .with_session(Arc::new(SessionHandle::logged_in("session-id")))
//!     .build()?;
//!
//! let request = InitRequest::new("comments", "article-1", "https://www.ft.com/content/article-1", "Title");
//! let init = gateway.get_init_config(&request).await?;
//! let counts = gateway.get_comment_counts(&["article-1", "article-2"]).await?;
//! # let _ = (init, counts);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cache;
pub mod error;
pub mod gateway;
mod lock;
pub mod session;
pub mod transport;
pub mod types;

pub use batch::{ArticleIdBatch, BatchPlanner};
pub use cache::{CacheStats, LocalSudsCache, NoOpSudsCache, SudsCache, create_cache};
pub use error::{Result, SudsError, TransportError};
pub use gateway::{SudsGateway, SudsGatewayBuilder};
pub use session::{AnonymousSession, SessionHandle, SessionProvider, StaticSession};
pub use transport::{HttpTransport, Payload, Transport};
pub use types::{
    AuthOptions, AuthResult, CommentCounts, InitRequest, InitResult, StreamType,
    UpdateUserResponse, UserSettings,
};

pub use suds_config;
