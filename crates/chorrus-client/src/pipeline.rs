//! Authenticated request pipeline.
//!
//! Every backend call goes through [`ApiClient::send`]:
//!
//! 1. **pre-request**: when the session holds an identity, a fresh token is
//!    requested from the provider and attached as `Authorization: Bearer`.
//!    Without an identity the request goes out unauthenticated.
//! 2. **send** over the shared `reqwest` client.
//! 3. **post-response**: a 401 emits one [`SessionInvalidated`] event and fails
//!    the call with [`AuthError::Unauthorized`]; any other non-2xx becomes
//!    [`RequestError::Status`].
//!
//! Tokens are never cached here and nothing is retried.

use std::sync::Arc;

use chorrus_auth::{AuthError, SessionStore};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::chores::ChoreService;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, RequestError};
use crate::households::HouseholdService;
use crate::invalidation::{InvalidationBroadcaster, InvalidationHook, SessionInvalidated};

/// One outbound call, relative to the API base URL.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, RequestError> {
        let value = serde_json::to_value(body).map_err(|e| RequestError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Backend client bound to one session.
pub struct ApiClient {
    http: reqwest::Client,
    root_url: String,
    base_url: String,
    session: Arc<SessionStore>,
    invalidation: Arc<dyn InvalidationHook>,
}

impl ApiClient {
    /// Builds a client for `config`. 401s are published on a fresh
    /// [`InvalidationBroadcaster`] until another hook is installed.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        config.validate().map_err(RequestError::configuration)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(RequestError::Transport)?;

        Ok(Self {
            http,
            root_url: config.root_url(),
            base_url: config.api_base_url(),
            session,
            invalidation: Arc::new(InvalidationBroadcaster::new()),
        })
    }

    /// Replaces the hook notified on 401 responses.
    #[must_use]
    pub fn with_invalidation_hook(mut self, hook: Arc<dyn InvalidationHook>) -> Self {
        self.invalidation = hook;
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chores(&self) -> ChoreService<'_> {
        ChoreService::new(self)
    }

    pub fn households(&self) -> HouseholdService<'_> {
        HouseholdService::new(self)
    }

    /// `GET /health` on the server root, unauthenticated.
    pub async fn health(&self) -> ClientResult<(u16, String)> {
        let url = format!("{}/health", self.root_url);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok((status, body))
    }

    /// Sends `ctx` and decodes the JSON response.
    pub async fn send<T: DeserializeOwned>(&self, ctx: RequestContext) -> ClientResult<T> {
        let body = self.execute(&ctx).await?;
        serde_json::from_str(&body).map_err(|e| {
            ClientError::from(RequestError::Decode(format!(
                "{} {}: {e}",
                ctx.method, ctx.path
            )))
        })
    }

    /// Sends `ctx` and ignores the response body.
    pub async fn send_discarding(&self, ctx: RequestContext) -> ClientResult<()> {
        self.execute(&ctx).await.map(|_| ())
    }

    async fn execute(&self, ctx: &RequestContext) -> ClientResult<String> {
        let url = format!("{}{}", self.base_url, ctx.path);
        let mut builder = self
            .http
            .request(ctx.method.clone(), &url)
            .header(ACCEPT, "application/json");
        if !ctx.query.is_empty() {
            builder = builder.query(&ctx.query);
        }
        if let Some(body) = &ctx.body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder).await?;

        let resp = builder.send().await.map_err(|e| {
            tracing::debug!(method = %ctx.method, path = %ctx.path, error = %e, "request failed");
            RequestError::Transport(e)
        })?;
        let status = resp.status();
        let body = resp.text().await.map_err(RequestError::Transport)?;
        tracing::debug!(
            method = %ctx.method,
            path = %ctx.path,
            status = status.as_u16(),
            "request completed"
        );

        self.check_response(ctx, status, &body)?;
        Ok(body)
    }

    /// Pre-request hook.
    async fn authorize(&self, builder: RequestBuilder) -> ClientResult<RequestBuilder> {
        if self.session.identity().is_none() {
            return Ok(builder);
        }
        let token = self.session.provider().id_token().await?;
        Ok(builder.bearer_auth(token.as_str()))
    }

    /// Post-response hook.
    fn check_response(
        &self,
        ctx: &RequestContext,
        status: StatusCode,
        body: &str,
    ) -> ClientResult<()> {
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(method = %ctx.method, path = %ctx.path, "session rejected by backend");
            self.invalidation.session_invalidated(&SessionInvalidated {
                method: ctx.method.clone(),
                path: ctx.path.clone(),
            });
            return Err(AuthError::unauthorized(format!(
                "{} {}: {}",
                ctx.method,
                ctx.path,
                error_detail(body)
            ))
            .into());
        }
        if !status.is_success() {
            return Err(RequestError::status(status.as_u16(), error_detail(body)).into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

/// Human-readable reason from an error body.
///
/// Understands `{"detail": "..."}` and the validation form
/// `{"detail": [{"loc": [...], "msg": "..."}]}`; falls back to the raw body.
pub(crate) fn error_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(detail) = json.get("detail")
    {
        if let Some(text) = detail.as_str() {
            return text.to_string();
        }
        if let Some(items) = detail.as_array() {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg").and_then(|m| m.as_str())?;
                    let loc = item
                        .get("loc")
                        .and_then(|l| l.as_array())
                        .map(|parts| {
                            parts
                                .iter()
                                .map(|p| match p {
                                    Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect::<Vec<_>>()
                                .join(".")
                        });
                    Some(match loc {
                        Some(loc) if !loc.is_empty() => format!("{loc}: {msg}"),
                        _ => msg.to_string(),
                    })
                })
                .collect();
            if !msgs.is_empty() {
                return msgs.join("; ");
            }
        }
    }
    if body.is_empty() {
        "(empty response)".to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Chore not found"}"#),
            "Chore not found"
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "title"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "due_date"], "msg": "invalid date format"}
        ]}"#;
        assert_eq!(
            error_detail(body),
            "body.title: field required; body.due_date: invalid date format"
        );
    }

    #[test]
    fn test_error_detail_fallbacks() {
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(""), "(empty response)");
        assert_eq!(error_detail(r#"{"message": "x"}"#), r#"{"message": "x"}"#);
    }

    #[test]
    fn test_request_context_builders() {
        let ctx = RequestContext::get("/chores/").with_query("include_completed", false);
        assert_eq!(ctx.method, Method::GET);
        assert_eq!(
            ctx.query,
            vec![("include_completed".to_string(), "false".to_string())]
        );
        assert!(ctx.body.is_none());

        let ctx = RequestContext::post("/households/")
            .with_json(&serde_json::json!({ "name": "Flat 4" }))
            .unwrap();
        assert_eq!(ctx.body, Some(serde_json::json!({ "name": "Flat 4" })));
    }
}
