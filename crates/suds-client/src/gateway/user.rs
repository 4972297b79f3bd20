//! User authentication and settings operations.

use serde_json::Value;
use tracing::{debug, warn};

use super::{AUTH_LOCK_KEY, CallContext, SudsGateway};
use crate::error::{Result, SudsError};
use crate::transport::Payload;
use crate::types::{AuthOptions, AuthResult, UpdateUserResponse, UserSettings};

impl SudsGateway {
    /// Auth data of the current session, read through the cache.
    ///
    /// Call with `AuthOptions::default()` when no options apply.
    pub async fn get_auth(&self, options: AuthOptions) -> Result<AuthResult> {
        let ctx = self.context();

        let Some(session_id) = ctx.cache_session() else {
            return self.fetch_auth(&ctx).await;
        };

        let _guard = self.locks.lock(AUTH_LOCK_KEY).await;
        if options.force {
            debug!("Auth cache read skipped (force)");
        } else if let Some(cached) = self.cache.get_auth(session_id).await {
            debug!("Auth served from cache");
            return Ok(cached);
        }

        self.fetch_auth(&ctx).await
    }

    async fn fetch_auth(&self, ctx: &CallContext) -> Result<AuthResult> {
        let url = ctx.config.suds.get_auth_url();
        let mut payload = Payload::new();
        if let Some(session_id) = ctx.session_id() {
            payload.insert("sessionId".into(), Value::from(session_id));
        }

        let response = self.transport.call(&url, &payload).await.map_err(|e| {
            warn!(error = %e, "Auth request failed");
            SudsError::from(e)
        })?;

        let auth = AuthResult::from_payload(response).ok_or(SudsError::NoData);

        if let Some(session_id) = ctx.cache_session() {
            match &auth {
                Ok(auth) if auth.has_token() => {
                    self.cache.cache_auth(session_id, auth.clone()).await;
                    debug!("Auth cached");
                }
                _ => {
                    self.cache.remove_auth().await;
                    debug!("Auth response without token, cached auth removed");
                }
            }
        }

        auth
    }

    /// Save the user's settings.
    ///
    /// A pseudonym is trimmed before sending; one that is present but null,
    /// falsy or blank after trimming is refused locally with
    /// [`SudsError::Rejected`] and nothing is sent.
    pub async fn update_user(&self, settings: UserSettings) -> Result<UpdateUserResponse> {
        let settings = settings.normalized().inspect_err(|e| {
            warn!(error = %e, "User update refused");
        })?;
        let ctx = self.context();
        let url = ctx.config.suds.update_user_url();
        let payload = settings.into_payload(ctx.session_id());

        let response = self.transport.call(&url, &payload).await.map_err(|e| {
            warn!(error = %e, "User update request failed");
            SudsError::from(e)
        })?;

        if !response.is_object() {
            return Err(SudsError::NoData);
        }
        let response: UpdateUserResponse = serde_json::from_value(response)
            .map_err(|e| SudsError::invalid_response(e.to_string()))?;

        if response.is_ok() {
            return Ok(response);
        }
        match response.error_message() {
            Some(message) => {
                warn!(error = %message, "User update rejected by SUDS");
                Err(SudsError::rejected(message))
            }
            None => Err(SudsError::Failed),
        }
    }
}
