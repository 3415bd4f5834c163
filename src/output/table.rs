use comfy_table::{Cell, Color};

use crate::api::ModelRecord;
use crate::pricing::PricingRecord;

use super::format::{count_line, create_styled_table, format_price, header_cell, right_cell, styled_cell};

const NO_MODELS: &str = "No models available.";
const NO_PRICING: &str = "No pricing data available.";
const MISSING: &str = "-";

/// Render models as a table followed by a count line.
pub fn format_model_table(models: &[ModelRecord], use_color: bool) -> String {
    if models.is_empty() {
        return NO_MODELS.to_string();
    }

    let show_name = models.iter().any(|m| m.name.is_some());
    let mut table = create_styled_table(use_color);

    let mut header = vec![header_cell("Model", use_color)];
    if show_name {
        header.push(header_cell("Name", use_color));
    }
    header.push(header_cell("Owned By", use_color));
    table.set_header(header);

    let id_color = use_color.then_some(Color::Green);
    for model in models {
        let mut row = vec![styled_cell(&model.id, id_color, false)];
        if show_name {
            row.push(Cell::new(model.name.as_deref().unwrap_or(MISSING)));
        }
        row.push(Cell::new(model.owned_by.as_deref().unwrap_or(MISSING)));
        table.add_row(row);
    }

    format!("{table}\n\n  {}", count_line(models.len()))
}

/// Render pricing rows grouped visually by provider, followed by a count line.
pub fn format_pricing_table(records: &[PricingRecord], use_color: bool) -> String {
    if records.is_empty() {
        return NO_PRICING.to_string();
    }

    let mut table = create_styled_table(use_color);
    table.set_header(vec![
        header_cell("Provider", use_color),
        header_cell("Model", use_color),
        header_cell("Input", use_color),
        header_cell("Output", use_color),
        header_cell("Unit", use_color),
    ]);

    let provider_color = use_color.then_some(Color::Cyan);
    let price_color = use_color.then_some(Color::Green);
    let mut last_provider: Option<&str> = None;

    for record in records {
        // Provider is printed once per run of rows
        let provider = if last_provider == Some(record.provider.as_str()) {
            ""
        } else {
            record.provider.as_str()
        };
        last_provider = Some(record.provider.as_str());

        table.add_row(vec![
            styled_cell(provider, provider_color, true),
            Cell::new(&record.model),
            right_cell(&format_price(record.input_price), price_color, false),
            right_cell(&format_price(record.output_price), price_color, false),
            Cell::new(&record.unit),
        ]);
    }

    format!("{table}\n\n  {}", count_line(records.len()))
}
