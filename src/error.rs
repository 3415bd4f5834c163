use std::path::PathBuf;

use thiserror::Error;

/// Failures from the inference API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No API key found. Set GRADIENT_API_KEY or pass --api-key.")]
    MissingApiKey,

    #[error("{operation} failed (HTTP {status}): {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: ureq::Error,
    },

    #[error("{operation} returned an unexpected response: {detail}")]
    InvalidResponse {
        operation: &'static str,
        detail: String,
    },
}

/// Failures from the pricing pipeline
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Pricing page request failed (HTTP {status})")]
    Status { status: u16 },

    #[error("Pricing page request failed: {0}")]
    Transport(#[source] ureq::Error),

    #[error("Could not find the \"{heading}\" section on the pricing page")]
    SectionNotFound { heading: String },

    #[error("No pricing rows found under \"{heading}\"")]
    NoRows { heading: String },

    #[error("Invalid selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pricing snapshot ({origin}): {source}")]
    Snapshot {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No cached pricing or fallback snapshot available")]
    NoOfflineData,
}

/// Top-level failures surfaced by the `gradient` binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Pricing(#[from] PricingError),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid temperature {value} (expected 0.0 to 2.0)")]
    InvalidTemperature { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_env_var() {
        let msg = ApiError::MissingApiKey.to_string();
        assert!(msg.contains(crate::consts::API_KEY_ENV));
    }

    #[test]
    fn api_status_display() {
        let e = ApiError::Status {
            operation: "Listing models",
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Listing models failed (HTTP 500): Internal Server Error"
        );
    }

    #[test]
    fn section_not_found_names_heading() {
        let e = PricingError::SectionNotFound {
            heading: "Foundation Model Usage".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Could not find the "Foundation Model Usage" section on the pricing page"#
        );
    }

    #[test]
    fn pricing_io_display_includes_path() {
        let e = PricingError::Io {
            path: PathBuf::from("/tmp/snapshot.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(e.to_string(), "Failed to read /tmp/snapshot.json: missing");
    }

    #[test]
    fn app_error_from_api_error() {
        let app: AppError = ApiError::MissingApiKey.into();
        assert_eq!(app.to_string(), ApiError::MissingApiKey.to_string());
    }

    #[test]
    fn app_error_invalid_temperature() {
        let e = AppError::InvalidTemperature { value: 3.5 };
        assert_eq!(e.to_string(), "Invalid temperature 3.5 (expected 0.0 to 2.0)");
    }
}
