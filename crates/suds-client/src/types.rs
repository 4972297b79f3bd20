//! Request and response types exchanged with SUDS.
//!
//! Response payloads are mostly opaque: the fields the access layer makes
//! decisions on are typed, everything else is kept verbatim in `extra` so a
//! cached payload round-trips unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{Result, SudsError};
use crate::transport::Payload;

/// Comment counts keyed by article id.
pub type CommentCounts = HashMap<String, u64>;

/// Kind of stream a widget is initialized for.
///
/// Values the service knows but this enum does not are kept in `Other` and
/// forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StreamType {
    LiveComments,
    LiveChat,
    LiveBlog,
    Other(String),
}

impl StreamType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LiveComments => "livecomments",
            Self::LiveChat => "livechat",
            Self::LiveBlog => "liveblog",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for StreamType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "livecomments" => Self::LiveComments,
            "livechat" => Self::LiveChat,
            "liveblog" => Self::LiveBlog,
            _ => Self::Other(value),
        }
    }
}

impl From<StreamType> for String {
    fn from(value: StreamType) -> Self {
        match value {
            StreamType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Widget initialization request.
///
/// Deserializes from the host page configuration shape
/// (`elId`, `articleId`, `url`, `title`, ...). Absent required fields become
/// empty strings and are reported by [`InitRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitRequest {
    /// Id of the element the widget is rendered into
    #[serde(rename = "elId", default)]
    pub element_id: String,
    #[serde(rename = "articleId", default)]
    pub article_id: String,
    /// Canonical URL of the page
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<StreamType>,
    /// Explicit primary section, overriding the service's own mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Skip the cache read (the response is still cached)
    #[serde(default)]
    pub force: bool,
}

impl InitRequest {
    pub fn new(
        element_id: impl Into<String>,
        article_id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            article_id: article_id.into(),
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_stream_type(mut self, stream_type: StreamType) -> Self {
        self.stream_type = Some(stream_type);
        self
    }

    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Check required fields, stopping at the first missing one.
    pub fn validate(&self) -> Result<()> {
        let required = [
            (&self.article_id, "Article ID not provided"),
            (&self.url, "Article URL not provided"),
            (&self.element_id, "Element ID not provided"),
            (&self.title, "Article title not provided"),
        ];
        for (value, message) in required {
            if value.trim().is_empty() {
                return Err(SudsError::validation(message));
            }
        }
        Ok(())
    }

    pub(crate) fn to_payload(&self, session_id: Option<&str>) -> Payload {
        let mut payload = Payload::new();
        payload.insert("title".into(), Value::from(self.title.as_str()));
        payload.insert("url".into(), Value::from(self.url.as_str()));
        payload.insert("articleId".into(), Value::from(self.article_id.as_str()));
        payload.insert("el".into(), Value::from(self.element_id.as_str()));
        if let Some(session_id) = session_id {
            payload.insert("sessionId".into(), Value::from(session_id));
        }
        if let Some(stream_type) = &self.stream_type {
            payload.insert("stream_type".into(), Value::from(stream_type.as_str()));
        }
        if let Some(section) = &self.section {
            payload.insert("section".into(), Value::from(section.as_str()));
        }
        if let Some(tags) = &self.tags {
            payload.insert("tags".into(), Value::from(tags.clone()));
        }
        payload
    }
}

/// Widget initialization data returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitResult {
    /// Element the payload was returned for; rewritten on every response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub el: Option<String>,
    #[serde(
        rename = "unclassifiedArticle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unclassified_article: Option<Value>,
    #[serde(
        rename = "notAllowedToCreateCollection",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub not_allowed_to_create_collection: Option<Value>,
    #[serde(rename = "collectionMeta", default, skip_serializing_if = "Option::is_none")]
    pub collection_meta: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InitResult {
    pub fn is_unclassified(&self) -> bool {
        matches!(self.unclassified_article, Some(Value::Bool(true)))
    }

    pub fn is_not_allowed(&self) -> bool {
        matches!(self.not_allowed_to_create_collection, Some(Value::Bool(true)))
    }

    pub fn has_collection_meta(&self) -> bool {
        self.collection_meta.as_ref().is_some_and(is_truthy)
    }

    /// Only classified articles with a usable collection are worth caching.
    pub fn is_cacheable(&self) -> bool {
        !self.is_unclassified() && !self.is_not_allowed() && self.has_collection_meta()
    }
}

/// Authentication data for the current session.
///
/// The payload is opaque; `token` is kept as sent and only checked for
/// truthiness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthResult {
    pub fn has_token(&self) -> bool {
        self.token.as_ref().is_some_and(is_truthy)
    }

    /// The token, when the service sent it as a string.
    pub fn token_str(&self) -> Option<&str> {
        self.token.as_ref().and_then(Value::as_str)
    }

    /// Lenient decoding for auth data piggybacked on other responses:
    /// anything but a mapping is treated as absent.
    pub(crate) fn from_payload(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(map)).ok(),
            _ => None,
        }
    }
}

/// Options of [`SudsGateway::get_auth`](crate::SudsGateway::get_auth).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOptions {
    /// Skip the cache read (the response is still cached)
    #[serde(default)]
    pub force: bool,
}

impl AuthOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// User settings sent to the update endpoint.
///
/// `pseudonym` is the display name; everything else (`emailcomments`,
/// `emailreplies`, `emaillikes`, `emailautofollow`, ...) is forwarded as is.
/// A pseudonym that is present but `null` is kept as `Some(Value::Null)`,
/// distinct from an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub pseudonym: Option<Value>,
    #[serde(flatten)]
    pub preferences: Map<String, Value>,
}

impl UserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from loosely typed input; anything but a mapping is refused.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map_err(|e| SudsError::validation(format!("Invalid settings: {e}"))),
            _ => Err(SudsError::validation("Settings not provided.")),
        }
    }

    #[must_use]
    pub fn with_pseudonym(mut self, pseudonym: impl Into<String>) -> Self {
        self.pseudonym = Some(Value::String(pseudonym.into()));
        self
    }

    #[must_use]
    pub fn with_preference(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.preferences.insert(key.into(), value.into());
        self
    }

    /// Trim the pseudonym and refuse a present one that is blank or falsy.
    pub(crate) fn normalized(mut self) -> Result<Self> {
        match self.pseudonym.take() {
            None => {}
            Some(Value::String(pseudonym)) => {
                let trimmed = pseudonym.trim();
                if trimmed.is_empty() {
                    return Err(SudsError::rejected("Pseudonym is blank."));
                }
                self.pseudonym = Some(Value::from(trimmed));
            }
            Some(other) if !is_truthy(&other) => {
                return Err(SudsError::rejected("Pseudonym is blank."));
            }
            Some(other) => {
                return Err(SudsError::validation(format!(
                    "Pseudonym must be a string, got {other}"
                )));
            }
        }
        Ok(self)
    }

    pub(crate) fn into_payload(self, session_id: Option<&str>) -> Payload {
        let mut payload = self.preferences;
        if let Some(pseudonym) = self.pseudonym {
            payload.insert("pseudonym".into(), pseudonym);
        }
        if let Some(session_id) = session_id {
            payload.insert("sessionId".into(), Value::from(session_id));
        }
        payload
    }
}

/// Response of the user update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateUserResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }

    /// Error reported by the service, if any.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; absence falls back to `default`.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JavaScript-style truthiness, which is what the service's flags are written for.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
