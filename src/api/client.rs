use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use ureq::Agent;
use ureq::http::Response;

use crate::config::Config;
use crate::consts::{API_KEY_ENV, DEFAULT_MODEL, INFERENCE_BASE_URL};
use crate::error::ApiError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The three API endpoints, derived from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub models: String,
    pub chat_completions: String,
    pub responses: String,
}

impl Endpoints {
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            models: format!("{base}/models"),
            chat_completions: format!("{base}/chat/completions"),
            responses: format!("{base}/responses"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_base(INFERENCE_BASE_URL)
    }
}

/// Pick the credential: a non-empty explicit key wins over the environment.
pub fn resolve_api_key(explicit: Option<&str>, env_value: Option<String>) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .or_else(|| {
            env_value
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        })
}

/// Blocking client for the inference API.
pub struct GradientClient {
    agent: Agent,
    api_key: Option<String>,
    endpoints: Endpoints,
    default_model: String,
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

impl GradientClient {
    /// Client with exactly the given key; the environment is not consulted.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            agent: build_agent(DEFAULT_TIMEOUT),
            api_key: resolve_api_key(api_key.as_deref(), None),
            endpoints: Endpoints::default(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Client keyed from `explicit`, falling back to `$GRADIENT_API_KEY`.
    pub fn from_env(explicit: Option<&str>) -> Self {
        Self::new(resolve_api_key(explicit, std::env::var(API_KEY_ENV).ok()))
    }

    pub fn from_config(config: &Config, explicit: Option<&str>) -> Self {
        Self::from_env(explicit)
            .with_endpoints(config.endpoints())
            .with_default_model(config.model())
            .with_timeout(config.request_timeout())
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn require_key(&self) -> Result<&str, ApiError> {
        self.api_key.as_deref().ok_or(ApiError::MissingApiKey)
    }

    pub(super) fn get_json(&self, url: &str, operation: &'static str) -> Result<Value, ApiError> {
        let key = self.require_key()?;
        tracing::debug!(url, "{operation}");
        let response = self
            .agent
            .get(url)
            .header("Authorization", format!("Bearer {key}"))
            .header("Accept", "application/json")
            .call()
            .map_err(|source| ApiError::Transport { operation, source })?;
        read_json(operation, response)
    }

    pub(super) fn post_json<T: Serialize>(
        &self,
        url: &str,
        operation: &'static str,
        payload: &T,
    ) -> Result<Value, ApiError> {
        let key = self.require_key()?;
        tracing::debug!(url, "{operation}");
        let response = self
            .agent
            .post(url)
            .header("Authorization", format!("Bearer {key}"))
            .header("Accept", "application/json")
            .send_json(payload)
            .map_err(|source| ApiError::Transport { operation, source })?;
        read_json(operation, response)
    }
}

fn read_json(operation: &'static str, mut response: Response<ureq::Body>) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|source| ApiError::Transport { operation, source })?;

    if !status.is_success() {
        return Err(ApiError::Status {
            operation,
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
        operation,
        detail: e.to_string(),
    })
}
