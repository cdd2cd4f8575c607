//! Edit-modal state machine.
//!
//! ```text
//! Closed ──open_create──▶ Open(Create) ──close / saved──▶ Closed
//! Closed ──open_edit────▶ Open(Edit)   ──close / saved──▶ Closed
//! ```
//!
//! The state is kept per browser session. Closing always discards the draft
//! and the image staging list; image URLs only reach the backend as part of
//! a submitted payload.

use serde::{Deserialize, Serialize};

use phone_catalog_core::{NewPhone, Phone, PhoneError, PhoneId, Price};

/// Ordered, deduplicated list of image URLs waiting to be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageStaging(Vec<String>);

impl ImageStaging {
    /// Start from a persisted image list, exactly as stored.
    ///
    /// Only URLs staged through [`add`](Self::add) are trimmed and
    /// deduplicated; an untouched record saves back unchanged.
    #[must_use]
    pub const fn from_stored(urls: Vec<String>) -> Self {
        Self(urls)
    }

    /// Stage a URL. Returns `false` (and changes nothing) when the trimmed
    /// URL is empty or already staged.
    pub fn add(&mut self, raw: &str) -> bool {
        let url = raw.trim();
        if url.is_empty() || self.contains(url) {
            return false;
        }
        self.0.push(url.to_owned());
        true
    }

    /// Unstage a URL. Returns whether it was present.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|staged| staged != url);
        self.0.len() != before
    }

    /// Whether `url` is staged.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|staged| staged == url)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Field values as submitted by the modal form.
///
/// Images are not part of this: they change only through staging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub title: String,
    pub price: String,
    pub memories: Vec<u32>,
    pub colours: Vec<String>,
    pub has_delivery: bool,
    pub image_input: String,
}

/// In-progress values of the open modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDraft {
    pub title: String,
    /// Raw price input; validated only on save.
    pub price: String,
    pub memories: Vec<u32>,
    pub colours: Vec<String>,
    pub has_delivery: bool,
    /// Text of the "add image URL" input.
    pub image_input: String,
    pub images: ImageStaging,
}

impl PhoneDraft {
    /// Prefill from a persisted phone.
    #[must_use]
    pub fn from_phone(phone: &Phone) -> Self {
        let listing = &phone.listing;
        Self {
            title: listing.title.clone(),
            price: listing.price.as_str().to_owned(),
            memories: listing.memories.clone(),
            colours: listing.colours.clone(),
            has_delivery: listing.has_delivery,
            image_input: String::new(),
            images: ImageStaging::from_stored(listing.image.clone()),
        }
    }

    /// Overwrite the field values, keeping the staged images.
    pub fn apply(&mut self, fields: DraftFields) {
        self.title = fields.title;
        self.price = fields.price;
        self.memories = fields.memories;
        self.colours = fields.colours;
        self.has_delivery = fields.has_delivery;
        self.image_input = fields.image_input;
    }

    /// Build the payload, with staged images attached.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` when the title is blank or the price is not a
    /// non-negative number.
    pub fn to_new_phone(&self) -> Result<NewPhone, PhoneError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PhoneError::MissingTitle);
        }

        Ok(NewPhone {
            title: title.to_owned(),
            price: Price::parse(&self.price)?,
            image: self.images.as_slice().to_vec(),
            memories: self.memories.clone(),
            has_delivery: self.has_delivery,
            colours: self.colours.clone(),
        })
    }
}

/// Whether the modal creates a new phone or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum EditorMode {
    Create,
    Edit(PhoneId),
}

/// What a successful save sends to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewPhone),
    Update(Phone),
}

/// An open modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    pub mode: EditorMode,
    pub draft: PhoneDraft,
    /// Last validation or mutation error, shown inside the modal.
    pub error: Option<String>,
}

impl Editor {
    /// Whether an existing phone is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    /// Stage the URL currently typed in the image input.
    ///
    /// The input is cleared only when the URL was actually added.
    pub fn stage_image(&mut self) -> bool {
        let added = self.draft.images.add(&self.draft.image_input);
        if added {
            self.draft.image_input.clear();
        }
        added
    }

    /// Remove a staged URL.
    pub fn unstage_image(&mut self, url: &str) -> bool {
        self.draft.images.remove(url)
    }

    /// Turn the draft into a create or update, depending on the mode.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` when the draft fails validation.
    pub fn submission(&self) -> Result<Submission, PhoneError> {
        let listing = self.draft.to_new_phone()?;
        Ok(match &self.mode {
            EditorMode::Create => Submission::Create(listing),
            EditorMode::Edit(id) => Submission::Update(Phone::new(id.clone(), listing)),
        })
    }
}

/// Modal state for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "editor", rename_all = "snake_case")]
pub enum EditorState {
    #[default]
    Closed,
    Open(Editor),
}

impl EditorState {
    /// An empty modal for a new phone.
    #[must_use]
    pub fn open_create() -> Self {
        Self::Open(Editor {
            mode: EditorMode::Create,
            draft: PhoneDraft::default(),
            error: None,
        })
    }

    /// A modal prefilled with `phone`.
    #[must_use]
    pub fn open_edit(phone: &Phone) -> Self {
        Self::Open(Editor {
            mode: EditorMode::Edit(phone.id.clone()),
            draft: PhoneDraft::from_phone(phone),
            error: None,
        })
    }

    /// Close and discard everything.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    #[must_use]
    pub const fn editor(&self) -> Option<&Editor> {
        match self {
            Self::Open(editor) => Some(editor),
            Self::Closed => None,
        }
    }

    pub const fn editor_mut(&mut self) -> Option<&mut Editor> {
        match self {
            Self::Open(editor) => Some(editor),
            Self::Closed => None,
        }
    }
}
