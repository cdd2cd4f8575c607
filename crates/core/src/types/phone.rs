//! Phone listings.
//!
//! A [`Phone`] is a persisted listing: a server-assigned [`PhoneId`] plus the
//! editable fields in [`NewPhone`]. Creation payloads are plain `NewPhone`
//! values, so an id can never be sent on create.

use serde::{Deserialize, Serialize};

use super::id::PhoneId;
use super::price::{Price, PriceError};

/// Storage capacities offered by the listing form, in gigabytes.
pub const MEMORY_OPTIONS: [u32; 8] = [8, 16, 32, 64, 128, 256, 512, 1024];

/// Colour presets offered by the listing form. Free-text colours are
/// allowed in addition to these.
pub const COLOUR_OPTIONS: [&str; 7] = ["Black", "White", "Silver", "Gold", "Blue", "Red", "Green"];

/// Errors raised when a listing fails validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The title is empty or whitespace.
    #[error("title is required")]
    MissingTitle,
    /// The price is missing or malformed.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// The editable fields of a phone listing.
///
/// This is also the creation payload (`POST /phone`) and the body of a full
/// replace (`PUT /phone/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhone {
    /// Display name.
    pub title: String,
    /// Price as text.
    pub price: Price,
    /// Image URLs; the first one is the thumbnail.
    #[serde(default)]
    pub image: Vec<String>,
    /// Storage capacities in GB.
    #[serde(default)]
    pub memories: Vec<u32>,
    /// Whether delivery is offered.
    #[serde(default)]
    pub has_delivery: bool,
    /// Colour labels.
    #[serde(default)]
    pub colours: Vec<String>,
}

impl NewPhone {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError::MissingTitle` for a blank title and
    /// `PhoneError::Price` when the price text is not a non-negative number.
    pub fn validate(&self) -> Result<(), PhoneError> {
        if self.title.trim().is_empty() {
            return Err(PhoneError::MissingTitle);
        }
        Price::parse(self.price.as_str())?;
        Ok(())
    }

    /// The thumbnail URL, if any image is set.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image.first().map(String::as_str)
    }
}

/// A persisted phone listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    /// Server-assigned identifier.
    pub id: PhoneId,
    /// Everything except the id.
    #[serde(flatten)]
    pub listing: NewPhone,
}

impl Phone {
    /// Combine an id with listing fields.
    #[must_use]
    pub const fn new(id: PhoneId, listing: NewPhone) -> Self {
        Self { id, listing }
    }

    /// Split into the id and the id-less update body.
    #[must_use]
    pub fn into_parts(self) -> (PhoneId, NewPhone) {
        (self.id, self.listing)
    }

    /// The thumbnail URL, if any image is set.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.listing.primary_image()
    }
}
