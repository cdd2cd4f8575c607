//! Seed the backend with phones from a YAML file.
//!
//! The file is a list of listings using the backend's field names:
//!
//! ```yaml
//! - title: Pixel 9
//!   price: "799"
//!   memories: [128, 256]
//!   hasDelivery: true
//!   colours: [Black]
//! ```
//!
//! Every entry is validated before the first request is made.

use std::path::Path;

use phone_catalog_core::NewPhone;
use phone_catalog_manager::api::PhoneApiClient;
use tracing::{error, info};

use super::CommandError;

/// Read and validate a seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a YAML list of
/// phones, or any entry fails validation.
pub async fn load(file_path: &str) -> Result<Vec<NewPhone>, CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading phones from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: file_path.to_owned(),
            source,
        })?;
    let phones: Vec<NewPhone> = serde_yaml::from_str(&content)?;

    info!(phones = phones.len(), "Parsed seed file");

    let errors = validate(&phones);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Validation(errors.len()));
    }

    info!("Seed file validated successfully");
    Ok(phones)
}

/// Validate every entry, returning one message per problem.
#[must_use]
pub fn validate(phones: &[NewPhone]) -> Vec<String> {
    phones
        .iter()
        .enumerate()
        .filter_map(|(index, phone)| {
            phone
                .validate()
                .err()
                .map(|e| format!("entry {} ({:?}): {e}", index + 1, phone.title))
        })
        .collect()
}

/// Create every phone in order, continuing past failures.
///
/// # Errors
///
/// Returns `CommandError::SeedFailed` after the run when any phone was not
/// created; each failure is logged in the summary first.
pub async fn phones(client: &PhoneApiClient, phones: &[NewPhone]) -> Result<(), CommandError> {
    let mut created = 0usize;
    let mut failures = Vec::new();

    for phone in phones {
        match client.create_phone(phone).await {
            Ok(saved) => {
                info!(id = %saved.id, title = %saved.listing.title, "Created phone");
                created += 1;
            }
            Err(e) => failures.push((phone.title.clone(), e)),
        }
    }

    info!("Seeding complete!");
    info!("  Phones created: {created}");

    if failures.is_empty() {
        return Ok(());
    }

    error!("  Errors: {}", failures.len());
    for (title, err) in &failures {
        error!("    - {title}: {err}");
    }
    Err(CommandError::SeedFailed {
        failed: failures.len(),
        total: phones.len(),
    })
}
