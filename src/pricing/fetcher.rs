use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use ureq::Agent;

use crate::config::Config;
use crate::consts::{DEFAULT_PRICE_UNIT, PRICING_SECTION_HEADING, PRICING_URL, UNKNOWN};
use crate::error::PricingError;

use super::parser::{parse_price, parse_unit};
use super::types::PricingRecord;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector must be valid")
});

/// Where the pricing rows live on the page. Markup drifts, so every part of
/// the section/table rule can be overridden from config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Heading text anchoring the section (case-insensitive)
    pub heading: String,
    /// Elements naming the provider of the tables that follow them
    pub provider_selector: String,
    pub table_selector: String,
    pub row_selector: String,
    pub cell_selector: String,
    pub model_column: usize,
    pub price_column: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            heading: PRICING_SECTION_HEADING.to_string(),
            provider_selector: "label".to_string(),
            table_selector: "table".to_string(),
            row_selector: "tr".to_string(),
            cell_selector: "td".to_string(),
            model_column: 0,
            price_column: 1,
        }
    }
}

struct CompiledLayout {
    provider: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
}

fn compile(selector: &str) -> Result<Selector, PricingError> {
    Selector::parse(selector).map_err(|e| PricingError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl PageLayout {
    fn compile(&self) -> Result<CompiledLayout, PricingError> {
        Ok(CompiledLayout {
            provider: compile(&self.provider_selector)?,
            table: compile(&self.table_selector)?,
            row: compile(&self.row_selector)?,
            cell: compile(&self.cell_selector)?,
        })
    }
}

fn heading_level(el: &ElementRef<'_>) -> Option<u8> {
    let name = el.value().name();
    let level = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Text nodes of an element, trimmed and joined with `sep`
fn element_text(el: &ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn find_heading<'a>(document: &'a Html, heading: &str) -> Option<ElementRef<'a>> {
    let wanted = heading.trim();
    document
        .select(&HEADINGS)
        .find(|el| element_text(el, " ").eq_ignore_ascii_case(wanted))
}

/// Provider labels and tables following the heading in document order, up to
/// the next heading of the same or higher level wherever it sits in the tree.
fn section_elements<'a>(
    document: &'a Html,
    heading: ElementRef<'a>,
    compiled: &CompiledLayout,
) -> Vec<ElementRef<'a>> {
    let level = heading_level(&heading).unwrap_or(6);
    let heading_id = heading.id();
    let mut started = false;
    let mut elements = Vec::new();

    for node in document.root_element().descendants() {
        if node.id() == heading_id {
            started = true;
            continue;
        }
        if !started || node.ancestors().any(|a| a.id() == heading_id) {
            continue;
        }
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if heading_level(&el).is_some_and(|l| l <= level) {
            break;
        }
        if compiled.provider.matches(&el) || compiled.table.matches(&el) {
            elements.push(el);
        }
    }
    elements
}

/// Nearest enclosing element matching the table selector
fn owning_table<'a>(row: &ElementRef<'a>, compiled: &CompiledLayout) -> Option<ElementRef<'a>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| compiled.table.matches(a))
}

fn table_rows(
    table: &ElementRef<'_>,
    provider: &str,
    layout: &PageLayout,
    compiled: &CompiledLayout,
    out: &mut Vec<PricingRecord>,
) {
    let needed = layout.model_column.max(layout.price_column) + 1;

    let owned_by_table =
        |el: &ElementRef<'_>| owning_table(el, compiled).is_none_or(|t| t.id() == table.id());

    for row in table.select(&compiled.row) {
        // Rows of nested tables are emitted when the nested table is visited
        if !owned_by_table(&row) {
            continue;
        }
        let cells: Vec<ElementRef> = row
            .select(&compiled.cell)
            .filter(|cell| owned_by_table(cell))
            .collect();
        if cells.len() < needed {
            continue;
        }
        let model = element_text(&cells[layout.model_column], " ");
        if model.is_empty() {
            continue;
        }
        let price_text = element_text(&cells[layout.price_column], "\n");
        let price = parse_price(&price_text);

        out.push(PricingRecord {
            provider: provider.to_string(),
            model,
            input_price: price.input,
            output_price: price.output,
            unit: parse_unit(&price_text).unwrap_or_else(|| DEFAULT_PRICE_UNIT.to_string()),
        });
    }
}

/// Extract pricing rows from the pricing page HTML, in document order.
pub fn parse_pricing_page(html: &str, layout: &PageLayout) -> Result<Vec<PricingRecord>, PricingError> {
    let compiled = layout.compile()?;
    let document = Html::parse_document(html);

    let heading = find_heading(&document, &layout.heading).ok_or_else(|| {
        PricingError::SectionNotFound {
            heading: layout.heading.clone(),
        }
    })?;

    let mut provider = UNKNOWN.to_string();
    let mut records = Vec::new();

    for item in section_elements(&document, heading, &compiled) {
        if compiled.provider.matches(&item) {
            let label = element_text(&item, " ");
            if !label.is_empty() {
                provider = label;
            }
        } else {
            table_rows(&item, &provider, layout, &compiled, &mut records);
        }
    }

    if records.is_empty() {
        return Err(PricingError::NoRows {
            heading: layout.heading.clone(),
        });
    }
    Ok(records)
}

#[derive(Debug, Clone)]
pub struct FetchedPricing {
    pub models: Vec<PricingRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// Scrapes the public pricing page.
pub struct PricingFetcher {
    agent: Agent,
    url: String,
    layout: PageLayout,
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

impl Default for PricingFetcher {
    fn default() -> Self {
        Self::new(PRICING_URL)
    }
}

impl PricingFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            agent: build_agent(FETCH_TIMEOUT),
            url: url.into(),
            layout: PageLayout::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pricing_url())
            .with_layout(config.pricing_layout.clone())
            .with_timeout(config.pricing_timeout())
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch(&self) -> Result<FetchedPricing, PricingError> {
        tracing::debug!(url = %self.url, "Fetching pricing page");
        let mut response = self
            .agent
            .get(&self.url)
            .header("Accept", "text/html")
            .call()
            .map_err(PricingError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PricingError::Status {
                status: status.as_u16(),
            });
        }

        let html = response
            .body_mut()
            .read_to_string()
            .map_err(PricingError::Transport)?;
        let models = parse_pricing_page(&html, &self.layout)?;
        tracing::debug!("Scraped {} pricing rows", models.len());

        Ok(FetchedPricing {
            models,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
<html><body>
<h2 id="foundation-model-usage">Foundation Model Usage</h2>
<div>
  <input type="radio" name="foundation-model-pricing" id="foundation-model-pricingopenai">
  <label for="foundation-model-pricingopenai">OpenAI</label>
  <div class="tab-content">
    <table>
      <thead><tr><th>Model</th><th>Serverless Inference and ADK</th><th>Agent Usage</th></tr></thead>
      <tbody>
        <tr>
          <td><a href="#">gpt-oss-120b</a></td>
          <td>$0.10 per 1M input tokens<br>$0.70 per 1M output tokens</td>
          <td>Same as serverless inference</td>
        </tr>
        <tr>
          <td><a href="#">GPT-5 mini</a></td>
          <td>$0.25 per 1M input tokens<br>$2.00 per 1M output tokens</td>
          <td>Same as serverless inference</td>
        </tr>
      </tbody>
    </table>
  </div>
  <input type="radio" name="foundation-model-pricing" id="foundation-model-pricingmeta">
  <label for="foundation-model-pricingmeta">Meta</label>
  <div class="tab-content">
    <table>
      <tbody>
        <tr>
          <td><a href="#">Llama 3.3 Instruct-70B</a></td>
          <td>$0.65 per 1M tokens</td>
          <td>Same as serverless inference</td>
        </tr>
      </tbody>
    </table>
  </div>
</div>
<h2>Knowledge Bases</h2>
<label>Storage</label>
<table><tr><td>Embeddings</td><td>$0.09 per 1M tokens</td></tr></table>
</body></html>
"##;

    #[test]
    fn extracts_rows_per_provider() {
        let records = parse_pricing_page(PAGE, &PageLayout::default()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(names, ["gpt-oss-120b", "GPT-5 mini", "Llama 3.3 Instruct-70B"]);

        assert_eq!(records[0].provider, "OpenAI");
        assert_eq!(records[0].input_price, Some(0.10));
        assert_eq!(records[0].output_price, Some(0.70));
        assert_eq!(records[0].unit, "per 1M tokens");

        assert_eq!(records[2].provider, "Meta");
        assert_eq!(records[2].input_price, Some(0.65));
        assert_eq!(records[2].output_price, Some(0.65));
    }

    #[test]
    fn stops_at_next_section_heading() {
        let records = parse_pricing_page(PAGE, &PageLayout::default()).unwrap();
        assert!(records.iter().all(|r| r.model != "Embeddings"));
    }

    #[test]
    fn missing_heading_is_reported() {
        let html = "<html><body><h2 id='other'>Other</h2></body></html>";
        let err = parse_pricing_page(html, &PageLayout::default()).unwrap_err();
        assert!(matches!(err, PricingError::SectionNotFound { .. }));
        assert!(err.to_string().contains("Foundation Model Usage"));
    }

    #[test]
    fn section_without_rows_is_an_error() {
        let html = "<h2>Foundation Model Usage</h2><p>Coming soon</p>";
        let err = parse_pricing_page(html, &PageLayout::default()).unwrap_err();
        assert!(matches!(err, PricingError::NoRows { .. }));
    }

    #[test]
    fn table_before_any_label_gets_unknown_provider() {
        let html = r#"<h3>Foundation Model Usage</h3>
<table><tr><td>mystery-model</td><td>Contact sales</td></tr></table>"#;
        let records = parse_pricing_page(html, &PageLayout::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].provider, UNKNOWN);
        assert_eq!(records[0].input_price, None);
        assert_eq!(records[0].output_price, None);
    }

    #[test]
    fn heading_wrapped_in_container() {
        let html = r#"<div class="title"><h2>Foundation Model Usage</h2></div>
<section><h4>Anthropic</h4>
<table><tr><td>claude-sonnet</td><td>$3.00 per 1M input tokens<br>$15.00 per 1M output tokens</td></tr></table>
</section>"#;
        let layout = PageLayout {
            provider_selector: "h4".to_string(),
            ..PageLayout::default()
        };
        let records = parse_pricing_page(html, &layout).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].provider, "Anthropic");
        assert_eq!(records[0].output_price, Some(15.0));
    }

    #[test]
    fn stops_at_wrapped_next_heading() {
        let html = r#"<div class="title"><h2>Foundation Model Usage</h2></div>
<section><label>OpenAI</label>
<table><tr><td>gpt-oss-120b</td><td>$0.10 per 1M input tokens<br>$0.70 per 1M output tokens</td></tr></table>
</section>
<div class="title"><h2>Knowledge Bases</h2></div>
<section><label>Storage</label>
<table><tr><td>Embeddings</td><td>$0.09 per 1M tokens</td></tr></table>
</section>"#;
        let records = parse_pricing_page(html, &PageLayout::default()).unwrap();
        let rows: Vec<_> = records
            .iter()
            .map(|r| (r.provider.as_str(), r.model.as_str()))
            .collect();
        assert_eq!(rows, [("OpenAI", "gpt-oss-120b")]);
    }

    #[test]
    fn lower_level_headings_stay_in_section() {
        let html = r#"<h2>Foundation Model Usage</h2>
<div><h3>Open models</h3><label>Meta</label>
<table><tr><td>Llama 3.3 Instruct-70B</td><td>$0.65 per 1M tokens</td></tr></table></div>
<div><h2>Knowledge Bases</h2><table><tr><td>Embeddings</td><td>$0.09</td></tr></table></div>"#;
        let records = parse_pricing_page(html, &PageLayout::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].provider, "Meta");
    }

    #[test]
    fn nested_table_rows_are_emitted_once() {
        let html = r#"<h2>Foundation Model Usage</h2>
<label>Mistral</label>
<table>
  <tr><td>mistral-nemo</td><td>$0.30 per 1M tokens</td></tr>
  <tr><td colspan="2"><table><tr><td>mistral-small</td><td>$0.20 per 1M tokens</td></tr></table></td></tr>
</table>"#;
        let records = parse_pricing_page(html, &PageLayout::default()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(names, ["mistral-nemo", "mistral-small"]);
    }

    #[test]
    fn custom_columns() {
        let html = r#"<h2>Pricing</h2>
<label>Mistral</label>
<table><tr><td>tier-1</td><td>mistral-nemo</td><td>$0.30 per 1M tokens</td></tr></table>"#;
        let layout = PageLayout {
            heading: "pricing".to_string(),
            model_column: 1,
            price_column: 2,
            ..PageLayout::default()
        };
        let records = parse_pricing_page(html, &layout).unwrap();
        assert_eq!(records[0].model, "mistral-nemo");
        assert_eq!(records[0].input_price, Some(0.30));
    }

    #[test]
    fn invalid_selector_is_reported() {
        let layout = PageLayout {
            table_selector: "table[".to_string(),
            ..PageLayout::default()
        };
        let err = parse_pricing_page(PAGE, &layout).unwrap_err();
        assert!(matches!(err, PricingError::Selector { .. }));
    }
}
