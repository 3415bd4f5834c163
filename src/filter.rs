//! Case-insensitive substring filters over model and pricing lists

use crate::api::ModelRecord;
use crate::pricing::PricingRecord;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Models whose `id` or `name` contains `query`. An empty query keeps everything.
pub fn filter_models(models: &[ModelRecord], query: &str) -> Vec<ModelRecord> {
    let needle = query.trim().to_lowercase();
    models
        .iter()
        .filter(|m| {
            contains_ci(&m.id, &needle)
                || m.name.as_deref().is_some_and(|n| contains_ci(n, &needle))
        })
        .cloned()
        .collect()
}

/// Pricing rows whose `model` or `provider` contains `query`.
pub fn filter_pricing(records: &[PricingRecord], query: &str) -> Vec<PricingRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| contains_ci(&r.model, &needle) || contains_ci(&r.provider, &needle))
        .cloned()
        .collect()
}
