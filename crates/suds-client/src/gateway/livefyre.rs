//! Widget initialization and comment count operations.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{CallContext, SudsGateway, init_lock_key};
use crate::error::{Result, SudsError};
use crate::transport::Payload;
use crate::types::{AuthResult, CommentCounts, InitRequest, InitResult};

/// Envelope of the init endpoint.
#[derive(Debug, Default, Deserialize)]
struct InitResponse {
    #[serde(default)]
    init: Option<InitResult>,
    /// Auth data of the requesting session, sent along with classified
    /// articles. Only looked at when the cache is engaged.
    #[serde(default)]
    auth: Option<Value>,
}

fn decode_init_response(response: Value) -> Result<InitResponse> {
    if !response.is_object() {
        return Err(SudsError::NoData);
    }
    serde_json::from_value(response).map_err(|e| SudsError::invalid_response(e.to_string()))
}

impl SudsGateway {
    /// Widget initialization data for an article, read through the cache.
    ///
    /// The returned payload's `el` is always the request's element id, also
    /// when it comes from the cache.
    ///
    /// # Errors
    ///
    /// - [`SudsError::Validation`] naming the first missing required field
    /// - [`SudsError::Transport`] when the call fails
    /// - [`SudsError::NoData`] when the response carries no `init` payload
    pub async fn get_init_config(&self, request: &InitRequest) -> Result<InitResult> {
        request.validate()?;
        let ctx = self.context();

        if !ctx.cache_enabled {
            return self.fetch_init(&ctx, request).await;
        }

        let _guard = self.locks.lock(&init_lock_key(&request.article_id)).await;
        if request.force {
            debug!(article_id = %request.article_id, "Init cache read skipped (force)");
        } else if let Some(mut cached) = self.cache.get_init(&request.article_id).await {
            debug!(article_id = %request.article_id, "Init served from cache");
            cached.el = Some(request.element_id.clone());
            return Ok(cached);
        }

        self.fetch_init(&ctx, request).await
    }

    async fn fetch_init(&self, ctx: &CallContext, request: &InitRequest) -> Result<InitResult> {
        let url = ctx.config.suds.init_url();
        let payload = request.to_payload(ctx.session_id());

        let response = self.transport.call(&url, &payload).await.map_err(|e| {
            warn!(article_id = %request.article_id, error = %e, "Init request failed");
            SudsError::from(e)
        })?;

        let InitResponse { init, auth } = decode_init_response(response)?;
        let Some(mut init) = init else {
            warn!(article_id = %request.article_id, "Init response without init data");
            return Err(SudsError::NoData);
        };

        if let Some(session_id) = ctx.cache_session() {
            if init.is_cacheable() {
                self.cache.cache_init(&request.article_id, init.clone()).await;
                match auth
                    .and_then(AuthResult::from_payload)
                    .filter(AuthResult::has_token)
                {
                    Some(auth) => self.cache.cache_auth(session_id, auth).await,
                    None => self.cache.remove_auth().await,
                }
                debug!(article_id = %request.article_id, "Init cached");
            } else {
                debug!(
                    article_id = %request.article_id,
                    unclassified = init.is_unclassified(),
                    not_allowed = init.is_not_allowed(),
                    "Init not cacheable"
                );
            }
        }

        init.el = Some(request.element_id.clone());
        Ok(init)
    }

    /// Number of comments on one article.
    pub async fn get_comment_count(&self, article_id: &str) -> Result<u64> {
        if article_id.trim().is_empty() {
            return Err(SudsError::validation("Article ID not provided"));
        }
        let config = self.config.get();
        let url = config.suds.comment_count_url();

        let mut payload = Payload::new();
        payload.insert("articleId".into(), Value::from(article_id));

        let response = self.transport.call(&url, &payload).await.map_err(|e| {
            warn!(article_id, error = %e, "Comment count request failed");
            SudsError::from(e)
        })?;

        match response.get("count") {
            None | Some(Value::Null) => Err(SudsError::NoData),
            Some(count) => count.as_u64().ok_or_else(|| {
                SudsError::invalid_response(format!("comment count is not a non-negative integer: {count}"))
            }),
        }
    }

    /// Comment counts of many articles, fetched in size-bounded concurrent batches.
    ///
    /// An empty id list resolves to an empty mapping without any request. If
    /// one batch fails the whole lookup fails with that batch's error.
    pub async fn get_comment_counts<S: AsRef<str>>(
        &self,
        article_ids: &[S],
    ) -> Result<CommentCounts> {
        if article_ids.is_empty() {
            return Ok(CommentCounts::new());
        }
        let config = self.config.get();
        let url = config.suds.comment_counts_url();

        Self::planner(&config)
            .fetch_counts(self.transport.as_ref(), &url, article_ids)
            .await
            .inspect_err(|e| warn!(ids = article_ids.len(), error = %e, "Comment counts lookup failed"))
    }
}
