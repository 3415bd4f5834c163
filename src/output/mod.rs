mod format;
mod json;
mod table;

pub use format::format_price;
pub use json::{output_completion_json, output_models_json, output_pricing_json};
pub use table::{format_model_table, format_pricing_table};
