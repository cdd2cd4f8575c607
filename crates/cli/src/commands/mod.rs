//! CLI command implementations.

pub mod phones;
pub mod seed;

use phone_catalog_core::PhoneError;
use phone_catalog_manager::api::{ApiError, PhoneApiClient};
use phone_catalog_manager::config::{ConfigError, PhoneApiConfig, parse_base_url};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Backend URL missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The phone failed validation.
    #[error("Invalid phone: {0}")]
    Invalid(#[from] PhoneError),

    /// The seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The seed file is not a YAML list of phones.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// One or more seed entries failed validation.
    #[error("{0} validation errors found")]
    Validation(usize),

    /// The backend rejected one or more seed entries.
    #[error("{failed} of {total} phones failed to seed")]
    SeedFailed { failed: usize, total: usize },
}

/// Build the backend client from `--api-url` or `PHONE_API_BASE_URL`.
///
/// # Errors
///
/// Returns `CommandError::Config` if no URL is given or it is not http(s).
pub fn client(api_url: Option<&str>) -> Result<PhoneApiClient, CommandError> {
    dotenvy::dotenv().ok();

    let (key, raw) = match api_url {
        Some(url) => ("--api-url", url.to_owned()),
        None => (
            "PHONE_API_BASE_URL",
            std::env::var("PHONE_API_BASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("PHONE_API_BASE_URL".to_string()))?,
        ),
    };

    let base_url = parse_base_url(key, &raw)?;
    tracing::debug!(backend = %base_url, "Using phone backend");
    Ok(PhoneApiClient::new(&PhoneApiConfig::new(base_url))?)
}
