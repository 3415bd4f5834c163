use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::Config;
use crate::error::PricingError;

use super::cache::{is_fresh, load_snapshot, save_snapshot};
use super::fetcher::{FetchedPricing, PricingFetcher};
use super::types::{PricingReport, PricingSnapshot, PricingSource};

const PRICING_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const BUNDLED_SNAPSHOT: &str = include_str!("../../data/pricing_snapshot.json");

/// Last-resort pricing data. Read-only: nothing in this crate writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackSnapshot {
    File(PathBuf),
    /// Snapshot compiled into the binary from `data/pricing_snapshot.json`
    Bundled,
}

impl FallbackSnapshot {
    pub fn load(&self) -> Result<PricingSnapshot, PricingError> {
        match self {
            Self::File(path) => load_snapshot(path),
            Self::Bundled => {
                serde_json::from_str(BUNDLED_SNAPSHOT).map_err(|source| PricingError::Snapshot {
                    origin: self.describe(),
                    source,
                })
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Bundled => "bundled snapshot".to_string(),
        }
    }
}

/// Pricing lookup chain: fresh cache, then live scrape, then fallback snapshot.
pub struct PricingStore {
    fetcher: PricingFetcher,
    cache_path: Option<PathBuf>,
    fallback: FallbackSnapshot,
    ttl: Duration,
}

impl PricingStore {
    pub fn new(fetcher: PricingFetcher) -> Self {
        Self {
            fetcher,
            cache_path: None,
            fallback: FallbackSnapshot::Bundled,
            ttl: PRICING_CACHE_TTL,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let store = Self::new(PricingFetcher::from_config(config))
            .with_fallback(config.fallback())
            .with_ttl(config.cache_ttl());
        match config.cache_path() {
            Some(path) => store.with_cache_path(path),
            None => store,
        }
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackSnapshot) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn load_cache(&self) -> Option<PricingSnapshot> {
        let path = self.cache_path.as_ref()?;
        match load_snapshot(path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!("No usable pricing cache: {e}");
                None
            }
        }
    }

    fn load_fresh_cache(&self) -> Option<PricingSnapshot> {
        let snapshot = self.load_cache()?;
        if is_fresh(&snapshot, self.ttl, Utc::now()) {
            Some(snapshot)
        } else {
            tracing::debug!("Pricing cache is stale");
            None
        }
    }

    fn save_cache(&self, fetched: &FetchedPricing) {
        let Some(path) = &self.cache_path else {
            return;
        };
        let snapshot = PricingSnapshot {
            models: fetched.models.clone(),
            fetched_at: Some(fetched.fetched_at),
            cached_at: None,
        };
        if let Err(e) = save_snapshot(path, &snapshot, Utc::now()) {
            tracing::warn!("Could not write pricing cache: {e}");
        }
    }

    fn report(snapshot: PricingSnapshot, source: PricingSource, message: Option<String>) -> PricingReport {
        PricingReport {
            source,
            message,
            fetched_at: snapshot.fetched_at,
            models: snapshot.models,
        }
    }

    /// Resolve the pricing table.
    ///
    /// With `use_cache`, a cache entry younger than the TTL is returned without
    /// touching the network. Otherwise the page is scraped and the result
    /// cached. If scraping fails the fallback snapshot is used; when that is
    /// missing too, the scrape error is returned as-is.
    pub fn get_pricing(&self, use_cache: bool) -> Result<PricingReport, PricingError> {
        let start = Instant::now();

        if use_cache && let Some(snapshot) = self.load_fresh_cache() {
            tracing::info!(
                "Using cached pricing ({} models, {:.2}ms)",
                snapshot.models.len(),
                start.elapsed().as_secs_f64() * 1000.0
            );
            return Ok(Self::report(snapshot, PricingSource::Cache, None));
        }

        tracing::info!("Fetching pricing from {}", self.fetcher.url());
        let fetch_err = match self.fetcher.fetch() {
            Ok(fetched) => {
                self.save_cache(&fetched);
                tracing::info!(
                    "Fetched {} models ({:.2}ms)",
                    fetched.models.len(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
                return Ok(PricingReport {
                    source: PricingSource::Live,
                    message: None,
                    fetched_at: Some(fetched.fetched_at),
                    models: fetched.models,
                });
            }
            Err(e) => e,
        };

        tracing::warn!("Live pricing fetch failed: {fetch_err}");
        match self.fallback.load() {
            Ok(snapshot) => {
                let message = format!(
                    "Live pricing unavailable ({fetch_err}); using {}",
                    self.fallback.describe()
                );
                Ok(Self::report(snapshot, PricingSource::Fallback, Some(message)))
            }
            Err(e) => {
                tracing::debug!("Fallback snapshot unavailable: {e}");
                Err(fetch_err)
            }
        }
    }

    /// Resolve pricing without network access: the cache regardless of age,
    /// then the fallback snapshot.
    pub fn get_pricing_offline(&self) -> Result<PricingReport, PricingError> {
        if let Some(snapshot) = self.load_cache() {
            let stale = !is_fresh(&snapshot, self.ttl, Utc::now());
            let message = stale.then(|| "Cached pricing is older than the cache TTL".to_string());
            return Ok(Self::report(snapshot, PricingSource::Cache, message));
        }

        match self.fallback.load() {
            Ok(snapshot) => {
                let message = format!("Offline; using {}", self.fallback.describe());
                Ok(Self::report(snapshot, PricingSource::Fallback, Some(message)))
            }
            Err(e) => {
                tracing::debug!("Fallback snapshot unavailable: {e}");
                Err(PricingError::NoOfflineData)
            }
        }
    }
}
