use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

use super::client::GradientClient;

const OPERATION: &str = "Listing models";

/// One entry of the models endpoint. Only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ModelRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owned_by: None,
            name: None,
        }
    }
}

/// Normalize a models response. The list may sit under `data` (OpenAI style)
/// or `models`; a bare array is accepted too. Entries without an `id` are
/// dropped. Returns `None` when no list container is present.
pub fn parse_models_response(data: &Value) -> Option<Vec<ModelRecord>> {
    let list = data
        .get("data")
        .and_then(|v| v.as_array())
        .or_else(|| data.get("models").and_then(|v| v.as_array()))
        .or_else(|| data.as_array())?;

    let models = list
        .iter()
        .filter_map(|entry| {
            let Some(id) = entry.get("id").and_then(|v| v.as_str()) else {
                tracing::debug!("Skipping model entry without id: {entry}");
                return None;
            };
            Some(ModelRecord {
                id: id.to_string(),
                owned_by: entry
                    .get("owned_by")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                name: entry.get("name").and_then(|v| v.as_str()).map(String::from),
            })
        })
        .collect();

    Some(models)
}

impl GradientClient {
    /// GET `{base}/models`.
    pub fn list_models(&self) -> Result<Vec<ModelRecord>, ApiError> {
        let data = self.get_json(&self.endpoints().models, OPERATION)?;
        let models = parse_models_response(&data).ok_or_else(|| ApiError::InvalidResponse {
            operation: OPERATION,
            detail: "expected a `data` or `models` list".to_string(),
        })?;
        tracing::debug!("Listed {} models", models.len());
        Ok(models)
    }
}
