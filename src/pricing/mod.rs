mod cache;
mod fetcher;
mod parser;
mod store;
mod types;

pub use cache::{is_fresh, load_snapshot, save_snapshot};
pub use fetcher::{FetchedPricing, PageLayout, PricingFetcher, parse_pricing_page};
pub use parser::{ParsedPrice, parse_price, parse_unit};
pub use store::{FallbackSnapshot, PricingStore};
pub use types::{PricingRecord, PricingReport, PricingSnapshot, PricingSource};
