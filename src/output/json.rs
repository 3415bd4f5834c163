use serde_json::json;

use crate::api::{Completion, ModelRecord};
use crate::pricing::PricingReport;

pub fn output_models_json(models: &[ModelRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(models)
}

/// Pricing report plus a `count` field.
pub fn output_pricing_json(report: &PricingReport) -> Result<String, serde_json::Error> {
    let mut value = serde_json::to_value(report)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("count".to_string(), json!(report.models.len()));
    }
    serde_json::to_string_pretty(&value)
}

/// Completion with the model that was requested.
pub fn output_completion_json(
    completion: &Completion,
    model: Option<&str>,
) -> Result<String, serde_json::Error> {
    let mut value = serde_json::to_value(completion)?;
    if let (Some(obj), Some(model)) = (value.as_object_mut(), model) {
        obj.insert("model".to_string(), json!(model));
    }
    serde_json::to_string_pretty(&value)
}
