//! Client utilities for the Gradient inference API.
//!
//! Covers model listing, chat-completions and responses-API calls, and a
//! pricing table scraped from the public pricing page. The table is cached on
//! disk with a bundled snapshot as the last resort.

pub mod api;
pub mod config;
pub mod consts;
pub mod error;
pub mod filter;
pub mod output;
pub mod pricing;

pub use api::{
    Api, ChatMessage, ChatOptions, Completion, Endpoints, GradientClient, ModelRecord,
    ResponsesOptions, Usage, pick_api,
};
pub use config::Config;
pub use error::{ApiError, PricingError};
pub use filter::{filter_models, filter_pricing};
pub use output::{format_model_table, format_pricing_table};
pub use pricing::{
    FallbackSnapshot, PageLayout, ParsedPrice, PricingFetcher, PricingRecord, PricingReport,
    PricingSnapshot, PricingSource, PricingStore, parse_price,
};
