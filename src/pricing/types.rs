use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the pricing table. Prices are USD per `unit`; `None` means the
/// cell had no numeric price (e.g. "Contact sales").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecord {
    pub provider: String,
    pub model: String,
    pub input_price: Option<f64>,
    pub output_price: Option<f64>,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    crate::consts::DEFAULT_PRICE_UNIT.to_string()
}

/// On-disk shape shared by the cache file and the fallback snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub models: Vec<PricingRecord>,
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Unix seconds at which the entry was written to the cache
    #[serde(default)]
    pub cached_at: Option<f64>,
}

/// Where a pricing report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingSource {
    Live,
    Cache,
    Fallback,
}

impl fmt::Display for PricingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Cache => write!(f, "cache"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingReport {
    pub source: PricingSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub models: Vec<PricingRecord>,
}
