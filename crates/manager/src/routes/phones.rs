//! Phone list page and per-phone actions.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use phone_catalog_core::{COLOUR_OPTIONS, MEMORY_OPTIONS, Phone, PhoneId};

use crate::{
    error::AppError,
    filters,
    models::{Editor, EditorMode, EditorState, session},
    state::AppState,
};

/// Shown when a phone has no image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

/// Shown when a phone's image fails to load.
pub const FALLBACK_IMAGE: &str = "https://via.placeholder.com/300x200?text=Image+Failed";

/// Phone card view for templates.
#[derive(Debug, Clone)]
pub struct PhoneCardView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image_url: String,
    pub has_delivery: bool,
    pub memories: Vec<u32>,
    pub colours: Vec<String>,
}

impl From<&Phone> for PhoneCardView {
    fn from(phone: &Phone) -> Self {
        Self {
            id: urlencode_id(&phone.id),
            title: phone.listing.title.clone(),
            price: phone.listing.price.to_string(),
            image_url: phone
                .primary_image()
                .unwrap_or(PLACEHOLDER_IMAGE)
                .to_string(),
            has_delivery: phone.listing.has_delivery,
            memories: phone.listing.memories.clone(),
            colours: phone.listing.colours.clone(),
        }
    }
}

/// Checkbox option view for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Edit-modal view for templates.
#[derive(Debug, Clone)]
pub struct EditorView {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub pending_label: &'static str,
    pub title: String,
    pub price: String,
    pub memory_options: Vec<OptionView>,
    pub colour_options: Vec<OptionView>,
    pub has_delivery: bool,
    pub image_input: String,
    pub images: Vec<String>,
    pub error: Option<String>,
}

impl From<&Editor> for EditorView {
    fn from(editor: &Editor) -> Self {
        let draft = &editor.draft;
        let (heading, submit_label, pending_label) = match editor.mode {
            EditorMode::Create => ("Add New Phone", "Add Phone", "Adding..."),
            EditorMode::Edit(_) => ("Edit Phone", "Update Phone", "Updating..."),
        };

        // Presets plus any capacity already on the record.
        let mut capacities: Vec<u32> = MEMORY_OPTIONS.to_vec();
        for memory in &draft.memories {
            if !capacities.contains(memory) {
                capacities.push(*memory);
            }
        }
        capacities.sort_unstable();

        let memory_options = capacities
            .into_iter()
            .map(|memory| OptionView {
                value: memory.to_string(),
                label: format!("{memory} GB"),
                checked: draft.memories.contains(&memory),
            })
            .collect();

        // Presets, then every other colour on the record as its own
        // checked box so it posts back verbatim.
        let mut colour_options: Vec<OptionView> = COLOUR_OPTIONS
            .iter()
            .map(|colour| OptionView {
                value: (*colour).to_string(),
                label: (*colour).to_string(),
                checked: draft.colours.iter().any(|c| c == colour),
            })
            .collect();
        colour_options.extend(
            draft
                .colours
                .iter()
                .filter(|c| !COLOUR_OPTIONS.contains(&c.as_str()))
                .map(|colour| OptionView {
                    value: colour.clone(),
                    label: colour.clone(),
                    checked: true,
                }),
        );

        Self {
            heading,
            submit_label,
            pending_label,
            title: draft.title.clone(),
            price: draft.price.clone(),
            memory_options,
            colour_options,
            has_delivery: draft.has_delivery,
            image_input: draft.image_input.clone(),
            images: draft.images.as_slice().to_vec(),
            error: editor.error.clone(),
        }
    }
}

/// Phone list page template.
#[derive(Template)]
#[template(path = "phones/index.html")]
pub struct PhonesIndexTemplate {
    pub phones: Vec<PhoneCardView>,
    pub load_error: Option<String>,
    pub notice: Option<String>,
    pub editor: Option<EditorView>,
    pub fallback_image: &'static str,
}

/// Phone list page handler.
///
/// Renders the cached list, the modal when open, and any pending notice.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let editor_state = session::load_editor(&session).await?;
    let notice = session::take_notice(&session).await?;

    let (phones, load_error) = match state.phones().list_phones().await {
        Ok(phones) => (phones.iter().map(PhoneCardView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch phones: {e}");
            (vec![], Some(e.to_string()))
        }
    };

    let template = PhonesIndexTemplate {
        phones,
        load_error,
        notice,
        editor: editor_state.editor().map(EditorView::from),
        fallback_image: FALLBACK_IMAGE,
    };

    Ok(super::render(&template))
}

/// Open an empty modal for a new phone.
#[instrument(skip(session))]
pub async fn new_phone(session: Session) -> Result<Redirect, AppError> {
    session::store_editor(&session, &EditorState::open_create()).await?;
    Ok(Redirect::to("/"))
}

/// Open the modal prefilled with an existing phone.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = PhoneId::new(id);

    match state.phones().get_phone_by_id(Some(&id)).await {
        Ok(Some(phone)) => {
            session::store_editor(&session, &EditorState::open_edit(&phone)).await?;
        }
        Ok(None) => {
            session::set_notice(&session, format!("Phone {id} was not found")).await?;
        }
        Err(e) => {
            tracing::error!(phone_id = %id, error = %e, "Failed to load phone for editing");
            session::set_notice(&session, format!("Could not load phone: {e}")).await?;
        }
    }

    Ok(Redirect::to("/"))
}

/// Delete a phone.
///
/// An open modal editing the deleted phone is closed along with it.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = PhoneId::new(id);

    match state.phones().delete_phone(&id).await {
        Ok(()) => {
            let mut editor_state = session::load_editor(&session).await?;
            if editor_state
                .editor()
                .is_some_and(|editor| editor.mode == EditorMode::Edit(id.clone()))
            {
                editor_state.close();
                session::store_editor(&session, &editor_state).await?;
            }
        }
        Err(e) => {
            tracing::error!(phone_id = %id, error = %e, "Failed to delete phone");
            session::set_notice(&session, format!("Could not delete phone: {e}")).await?;
        }
    }

    Ok(Redirect::to("/"))
}

/// Percent-encode an id for use in a path segment.
fn urlencode_id(id: &PhoneId) -> String {
    urlencoding::encode(id.as_str()).into_owned()
}
