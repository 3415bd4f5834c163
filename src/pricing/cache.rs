use std::fs::File;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::PricingError;

use super::types::PricingSnapshot;

fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

pub fn load_snapshot(path: &Path) -> Result<PricingSnapshot, PricingError> {
    let file = File::open(path).map_err(|source| PricingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(file).map_err(|source| PricingError::Snapshot {
        origin: path.display().to_string(),
        source,
    })
}

/// A snapshot is fresh while `now - cached_at < ttl`. Entries that were never
/// stamped are stale.
pub fn is_fresh(snapshot: &PricingSnapshot, ttl: Duration, now: DateTime<Utc>) -> bool {
    match snapshot.cached_at {
        Some(cached_at) => unix_seconds(now) - cached_at < ttl.as_secs_f64(),
        None => false,
    }
}

/// Write `snapshot` to `path`, stamping `cached_at` with `now`.
pub fn save_snapshot(
    path: &Path,
    snapshot: &PricingSnapshot,
    now: DateTime<Utc>,
) -> Result<(), PricingError> {
    let write_err = |source| PricingError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let stamped = PricingSnapshot {
        cached_at: Some(unix_seconds(now)),
        ..snapshot.clone()
    };
    let mut file = File::create(path).map_err(write_err)?;
    serde_json::to_writer_pretty(&mut file, &stamped).map_err(|e| PricingError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingRecord;
    use chrono::TimeDelta;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn snapshot(cached_at: Option<f64>) -> PricingSnapshot {
        PricingSnapshot {
            models: vec![PricingRecord {
                provider: "Test".to_string(),
                model: "test-model".to_string(),
                input_price: Some(1.0),
                output_price: Some(2.0),
                unit: "per 1M tokens".to_string(),
            }],
            fetched_at: None,
            cached_at,
        }
    }

    #[test]
    fn fresh_within_ttl() {
        let now = Utc::now();
        let cached = unix_seconds(now - TimeDelta::hours(1));
        assert!(is_fresh(&snapshot(Some(cached)), DAY, now));
    }

    #[test]
    fn stale_after_ttl() {
        let now = Utc::now();
        let cached = unix_seconds(now - TimeDelta::hours(25));
        assert!(!is_fresh(&snapshot(Some(cached)), DAY, now));
    }

    #[test]
    fn unstamped_is_stale() {
        assert!(!is_fresh(&snapshot(None), DAY, Utc::now()));
    }

    #[test]
    fn save_stamps_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pricing.json");
        let now = Utc::now();

        save_snapshot(&path, &snapshot(None), now).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded.models.len(), 1);
        assert_eq!(loaded.cached_at, Some(unix_seconds(now)));
        assert!(is_fresh(&loaded, DAY, now));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PricingError::Io { .. }));
    }

    #[test]
    fn load_tolerates_extra_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"success": true, "models": [{"provider": "Test", "model": "m", "input_price": 1.0, "output_price": null}], "fetched_at": "2026-01-01T00:00:00Z", "cached_at": 1767225600.5}"#,
        )
        .unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.models[0].output_price, None);
        assert_eq!(loaded.models[0].unit, "per 1M tokens");
        assert_eq!(loaded.cached_at, Some(1767225600.5));
        assert!(loaded.fetched_at.is_some());
    }
}
