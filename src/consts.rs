/// Environment variable holding the default API credential
pub const API_KEY_ENV: &str = "GRADIENT_API_KEY";

/// Environment variable holding the log filter for the CLI
pub const LOG_ENV: &str = "GRADIENT_LOG";

/// Base URL of the serverless inference API
pub const INFERENCE_BASE_URL: &str = "https://inference.do-ai.run/v1";

pub const CHAT_COMPLETIONS_URL: &str = "https://inference.do-ai.run/v1/chat/completions";
pub const RESPONSES_URL: &str = "https://inference.do-ai.run/v1/responses";

/// Model used when a completion request doesn't name one
pub const DEFAULT_MODEL: &str = "openai-gpt-oss-120b";

/// Public pricing page scraped for per-model token prices
pub const PRICING_URL: &str = "https://www.digitalocean.com/pricing/gradient-platform";

/// Heading that anchors the model pricing section on the pricing page
pub const PRICING_SECTION_HEADING: &str = "Foundation Model Usage";

/// Unit assumed when a price cell doesn't spell one out
pub const DEFAULT_PRICE_UNIT: &str = "per 1M tokens";

/// Directory name used under the user's cache and config dirs
pub const APP_DIR: &str = "gradient-inference";

/// Fallback value when a provider label is missing
pub const UNKNOWN: &str = "Unknown";
