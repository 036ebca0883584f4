//! Tenant authorization check against the remote validation API

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::AuthorizationConfig;
use crate::io::HttpClient;

/// Outcome of a reachable authorization API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Granted,
    Denied(String),
}

impl AuthorizationOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationOutcome::Granted)
    }
}

/// Gate in front of every alarm batch.
///
/// `Err` means the API could not be reached; a reachable API that refuses
/// the tenant yields `Ok(Denied)`.
#[async_trait]
pub trait Authorizer: Send + Sync + std::fmt::Debug {
    async fn authorize(&self) -> crate::Result<AuthorizationOutcome>;
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    #[serde(default)]
    status: serde_json::Value,
    #[serde(default)]
    param: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Authorizer that posts a probe to the tenant validation endpoint
pub struct TenantAuthorizer {
    url: String,
    config: AuthorizationConfig,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TenantAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantAuthorizer")
            .field("url", &self.url)
            .field("tenant", &self.config.tenant)
            .finish()
    }
}

impl TenantAuthorizer {
    pub fn new(config: &AuthorizationConfig, http: Arc<dyn HttpClient>) -> Self {
        let url = config.url();
        tracing::debug!(
            "Created TenantAuthorizer for tenant '{}' at {}",
            config.tenant,
            url
        );
        Self {
            url,
            config: config.clone(),
            http,
        }
    }

    fn probe(&self) -> serde_json::Value {
        json!({
            "username": self.config.username,
            "nvalue": self.config.probe_address,
            "token": self.config.shared_secret,
            "type": self.config.probe_type,
            "tenant": self.config.tenant,
        })
    }

    /// Decide on a 2xx body: truthy `status`, non-empty `param`, matching token
    fn evaluate(&self, body: &str) -> AuthorizationOutcome {
        let response: ValidationResponse = match serde_json::from_str(body) {
            Ok(r) => r,
            Err(e) => {
                return AuthorizationOutcome::Denied(format!("unreadable response: {}", e))
            }
        };

        if !is_truthy(&response.status) {
            return AuthorizationOutcome::Denied("status is not true".to_string());
        }
        let param = match response.param {
            Some(param) if !param.is_empty() => param,
            _ => return AuthorizationOutcome::Denied("response has no param".to_string()),
        };

        match param.get("token").and_then(serde_json::Value::as_str) {
            Some(token) if token == self.config.shared_secret => AuthorizationOutcome::Granted,
            Some(_) => AuthorizationOutcome::Denied("API token mismatch".to_string()),
            None => AuthorizationOutcome::Denied("param has no token".to_string()),
        }
    }
}

#[async_trait]
impl Authorizer for TenantAuthorizer {
    async fn authorize(&self) -> crate::Result<AuthorizationOutcome> {
        let headers = [
            ("tenant", self.config.tenant.as_str()),
            ("Authorization", self.config.auth_code.as_str()),
            ("token", self.config.auth_token.as_str()),
        ];

        let response = self
            .http
            .post_json(&self.url, &headers, &self.probe())
            .await
            .inspect_err(|e| tracing::error!("Error contacting authorization API: {}", e))?;

        let outcome = if response.is_success() {
            self.evaluate(&response.body)
        } else {
            AuthorizationOutcome::Denied(format!("API returned status {}", response.status))
        };

        match &outcome {
            AuthorizationOutcome::Granted => {
                tracing::debug!("Tenant '{}' authorized", self.config.tenant)
            }
            AuthorizationOutcome::Denied(reason) => tracing::warn!(
                "Authorization denied for tenant '{}': {}",
                self.config.tenant,
                reason
            ),
        }
        Ok(outcome)
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
