//! Phone commands: list, show, create, update and delete.
//!
//! # Usage
//!
//! ```bash
//! phone-cli list
//! phone-cli show 42
//! phone-cli create --title "Pixel 9" --price 799 --memory 128 --colour Black --delivery
//! phone-cli update 42 --price 749 --delivery false
//! phone-cli delete 42
//! ```

use clap::Args;
use phone_catalog_core::{NewPhone, Phone, PhoneError, PhoneId, Price};
use phone_catalog_manager::api::PhoneApiClient;
use tracing::info;

use super::CommandError;

/// Fields for a new phone.
#[derive(Debug, Args)]
pub struct PhoneFields {
    /// Display name
    #[arg(long)]
    pub title: String,

    /// Price, a non-negative decimal
    #[arg(long)]
    pub price: String,

    /// Storage capacity in GB (repeatable)
    #[arg(long)]
    pub memory: Vec<u32>,

    /// Colour label (repeatable)
    #[arg(long)]
    pub colour: Vec<String>,

    /// Image URL (repeatable, first is the thumbnail)
    #[arg(long)]
    pub image: Vec<String>,

    /// Offer delivery
    #[arg(long)]
    pub delivery: bool,
}

impl PhoneFields {
    /// Build and validate the creation payload.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` for a blank title or a malformed price.
    pub fn into_new_phone(self) -> Result<NewPhone, PhoneError> {
        let listing = NewPhone {
            title: self.title.trim().to_owned(),
            price: Price::parse(&self.price)?,
            image: dedupe(self.image),
            memories: dedupe(self.memory),
            has_delivery: self.delivery,
            colours: dedupe(self.colour),
        };
        listing.validate()?;
        Ok(listing)
    }
}

/// Field changes for an existing phone. Repeatable fields replace the whole
/// list when given at least once.
#[derive(Debug, Default, Args)]
pub struct PhoneChanges {
    /// New display name
    #[arg(long)]
    pub title: Option<String>,

    /// New price
    #[arg(long)]
    pub price: Option<String>,

    /// Storage capacity in GB (repeatable, replaces the list)
    #[arg(long)]
    pub memory: Vec<u32>,

    /// Colour label (repeatable, replaces the list)
    #[arg(long)]
    pub colour: Vec<String>,

    /// Image URL (repeatable, replaces the list)
    #[arg(long)]
    pub image: Vec<String>,

    /// Remove every image
    #[arg(long, conflicts_with = "image")]
    pub clear_images: bool,

    /// Offer delivery (`true` or `false`)
    #[arg(long)]
    pub delivery: Option<bool>,
}

impl PhoneChanges {
    /// Merge the changes into the current listing.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` when the merged listing fails validation.
    pub fn apply(self, mut listing: NewPhone) -> Result<NewPhone, PhoneError> {
        if let Some(title) = self.title {
            listing.title = title.trim().to_owned();
        }
        if let Some(price) = self.price {
            listing.price = Price::parse(&price)?;
        }
        if !self.memory.is_empty() {
            listing.memories = dedupe(self.memory);
        }
        if !self.colour.is_empty() {
            listing.colours = dedupe(self.colour);
        }
        if self.clear_images {
            listing.image.clear();
        } else if !self.image.is_empty() {
            listing.image = dedupe(self.image);
        }
        if let Some(delivery) = self.delivery {
            listing.has_delivery = delivery;
        }
        listing.validate()?;
        Ok(listing)
    }
}

fn dedupe<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// One-line summary of a phone.
#[must_use]
pub fn summary(phone: &Phone) -> String {
    let listing = &phone.listing;
    let memories = if listing.memories.is_empty() {
        "N/A".to_string()
    } else {
        listing
            .memories
            .iter()
            .map(|m| format!("{m} GB"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let colours = if listing.colours.is_empty() {
        "N/A".to_string()
    } else {
        listing.colours.join(", ")
    };
    let delivery = if listing.has_delivery {
        "Available"
    } else {
        "Not Available"
    };

    format!(
        "[{}] {} - ${} | memory: {memories} | colours: {colours} | delivery: {delivery} | images: {}",
        phone.id,
        listing.title,
        listing.price,
        listing.image.len()
    )
}

/// List all phones.
///
/// # Errors
///
/// Returns an error if the backend request fails.
pub async fn list(client: &PhoneApiClient) -> Result<(), CommandError> {
    let phones = client.list_phones().await?;

    info!("Phones ({})", phones.len());
    for phone in &phones {
        info!("  {}", summary(phone));
    }

    Ok(())
}

/// Show one phone, including its image URLs.
///
/// # Errors
///
/// Returns an error if the phone does not exist or the request fails.
pub async fn show(client: &PhoneApiClient, id: &str) -> Result<(), CommandError> {
    let phone = client.get_phone(&PhoneId::new(id)).await?;

    info!("{}", summary(&phone));
    for url in &phone.listing.image {
        info!("  image: {url}");
    }

    Ok(())
}

/// Create a phone.
///
/// # Errors
///
/// Returns an error if the fields are invalid or the request fails.
pub async fn create(client: &PhoneApiClient, fields: PhoneFields) -> Result<(), CommandError> {
    let listing = fields.into_new_phone()?;
    let phone = client.create_phone(&listing).await?;

    info!("Created phone {}", phone.id);
    info!("  {}", summary(&phone));

    Ok(())
}

/// Update a phone: fetch it, merge the changes and send the full record.
///
/// # Errors
///
/// Returns an error if the phone does not exist, the merged fields are
/// invalid, or a request fails.
pub async fn update(
    client: &PhoneApiClient,
    id: &str,
    changes: PhoneChanges,
) -> Result<(), CommandError> {
    let id = PhoneId::new(id);
    let current = client.get_phone(&id).await?;
    let listing = changes.apply(current.listing)?;

    let phone = client.update_phone(&id, &listing).await?;

    info!("Updated phone {}", phone.id);
    info!("  {}", summary(&phone));

    Ok(())
}

/// Delete a phone.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn delete(client: &PhoneApiClient, id: &str) -> Result<(), CommandError> {
    client.delete_phone(&PhoneId::new(id)).await?;
    info!("Deleted phone {id}");
    Ok(())
}
