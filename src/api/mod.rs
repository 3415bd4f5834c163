mod chat;
mod client;
mod models;

pub use chat::{
    Api, ChatMessage, ChatOptions, Completion, ResponsesOptions, Usage, parse_chat_response,
    parse_responses_response, pick_api,
};
pub use client::{Endpoints, GradientClient, resolve_api_key};
pub use models::{ModelRecord, parse_models_response};
