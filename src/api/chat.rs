use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{CHAT_COMPLETIONS_URL, RESPONSES_URL};
use crate::error::ApiError;

use super::client::GradientClient;

const CHAT_OPERATION: &str = "Chat completion";
const RESPONSES_OPERATION: &str = "Responses request";

/// Which completion endpoint produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Api {
    #[serde(rename = "chat/completions")]
    ChatCompletions,
    #[serde(rename = "responses")]
    Responses,
}

impl Api {
    pub fn as_str(self) -> &'static str {
        match self {
            Api::ChatCompletions => "chat/completions",
            Api::Responses => "responses",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default endpoint URL for the chosen API.
pub fn pick_api(use_responses: bool) -> &'static str {
    if use_responses {
        RESPONSES_URL
    } else {
        CHAT_COMPLETIONS_URL
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Falls back to the client's default model
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ResponsesOptions {
    pub model: Option<String>,
    /// Ask the server to keep the response for prompt caching
    pub store: bool,
}

/// Token accounting. Accepts both chat-style and responses-style field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, alias = "input_tokens")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, alias = "output_tokens")]
    pub completion_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub api: Api,
    pub cached: bool,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "is_false")]
    store: bool,
}

fn parse_usage(data: &Value) -> Option<Usage> {
    let usage = data.get("usage")?;
    serde_json::from_value(usage.clone()).ok()
}

/// Extract `choices[0].message.content` and any usage block.
pub fn parse_chat_response(data: &Value) -> Option<(String, Option<Usage>)> {
    let content = data.pointer("/choices/0/message/content")?.as_str()?;
    Some((content.to_string(), parse_usage(data)))
}

/// Extract text from the responses shape (`output[].content[].text`), falling
/// back to the chat shape when no output text is present.
pub fn parse_responses_response(data: &Value) -> Option<(String, Option<Usage>)> {
    let texts: Vec<&str> = data
        .get("output")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(|v| v.as_array()))
        .flatten()
        .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
        .collect();

    if texts.is_empty() {
        return parse_chat_response(data);
    }
    Some((texts.join("\n"), parse_usage(data)))
}

impl GradientClient {
    /// POST to the chat-completions endpoint.
    pub fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<Completion, ApiError> {
        let payload = ChatRequest {
            model: options.model.as_deref().unwrap_or(self.default_model()),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };
        let data = self.post_json(&self.endpoints().chat_completions, CHAT_OPERATION, &payload)?;

        let (content, usage) =
            parse_chat_response(&data).ok_or_else(|| ApiError::InvalidResponse {
                operation: CHAT_OPERATION,
                detail: "missing choices[0].message.content".to_string(),
            })?;

        Ok(Completion {
            content,
            usage,
            api: Api::ChatCompletions,
            cached: false,
        })
    }

    /// POST to the responses endpoint. `store` is only sent when set.
    pub fn responses_api(
        &self,
        input: &str,
        options: &ResponsesOptions,
    ) -> Result<Completion, ApiError> {
        let payload = ResponsesRequest {
            input,
            model: options.model.as_deref(),
            store: options.store,
        };
        let data = self.post_json(&self.endpoints().responses, RESPONSES_OPERATION, &payload)?;

        let (content, usage) =
            parse_responses_response(&data).ok_or_else(|| ApiError::InvalidResponse {
                operation: RESPONSES_OPERATION,
                detail: "no output text or choices content".to_string(),
            })?;

        Ok(Completion {
            content,
            usage,
            api: Api::Responses,
            cached: options.store,
        })
    }
}
