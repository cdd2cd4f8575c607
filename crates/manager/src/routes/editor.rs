//! Edit-modal form handler.
//!
//! The modal is a single form. Every button posts the whole form back with
//! an intent, so field edits survive image staging round-trips:
//!
//! ```text
//! intent=add_image        - stage the URL typed in `image_url`
//! remove_image=<url>      - unstage one URL
//! intent=save             - validate, then create or update
//! intent=cancel           - close and discard the draft
//! ```

use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::AppError,
    models::{DraftFields, Submission, session},
    state::AppState,
};

/// What the pressed button asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorIntent {
    AddImage,
    RemoveImage(String),
    Save,
    Cancel,
}

/// Parse the urlencoded modal form.
///
/// Repeated keys (`memories`, `colours`) collect in order without
/// duplicates. `colours` values are the rendered checkboxes and are kept
/// verbatim, commas included. `custom_colours` is the free-text input for
/// new colours: a comma-separated list appended after the checked ones.
/// A missing intent (implicit submission) means save.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an unknown intent.
pub fn parse_editor_form(pairs: Vec<(String, String)>) -> Result<(DraftFields, EditorIntent), AppError> {
    let mut fields = DraftFields::default();
    let mut custom_colours = Vec::new();
    let mut intent = None;
    let mut remove = None;

    for (key, value) in pairs {
        match key.as_str() {
            "title" => fields.title = value,
            "price" => fields.price = value,
            "has_delivery" => fields.has_delivery = matches!(value.as_str(), "on" | "true" | "1"),
            "image_url" => fields.image_input = value,
            "memories" => match value.trim().parse::<u32>() {
                Ok(memory) => push_unique(&mut fields.memories, memory),
                Err(_) => tracing::debug!(value = %value, "Ignoring malformed memory option"),
            },
            "colours" => {
                if !value.trim().is_empty() {
                    push_unique(&mut fields.colours, value);
                }
            }
            "custom_colours" => custom_colours.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned),
            ),
            "remove_image" => remove = Some(value),
            "intent" => intent = Some(value),
            _ => {}
        }
    }

    for colour in custom_colours {
        push_unique(&mut fields.colours, colour);
    }

    let intent = match (remove, intent.as_deref()) {
        (Some(url), _) => EditorIntent::RemoveImage(url),
        (None, Some("add_image")) => EditorIntent::AddImage,
        (None, Some("save") | None) => EditorIntent::Save,
        (None, Some("cancel")) => EditorIntent::Cancel,
        (None, Some(other)) => {
            return Err(AppError::BadRequest(format!("unknown editor intent '{other}'")));
        }
    };

    Ok((fields, intent))
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Apply one modal interaction.
///
/// A save that fails validation or is rejected by the backend keeps the
/// modal open with the draft and the error; a successful save closes it.
#[instrument(skip(state, session, pairs))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let (fields, intent) = parse_editor_form(pairs)?;
    let mut editor_state = session::load_editor(&session).await?;

    let Some(editor) = editor_state.editor_mut() else {
        // Stale form from a modal that is already closed.
        tracing::debug!(?intent, "Ignoring editor form without an open modal");
        return Ok(Redirect::to("/"));
    };

    let close = match intent {
        EditorIntent::Cancel => true,
        EditorIntent::AddImage => {
            editor.draft.apply(fields);
            editor.error = None;
            editor.stage_image();
            false
        }
        EditorIntent::RemoveImage(url) => {
            editor.draft.apply(fields);
            editor.error = None;
            editor.unstage_image(&url);
            false
        }
        EditorIntent::Save => {
            editor.draft.apply(fields);
            match editor.submission() {
                Err(e) => {
                    editor.error = Some(e.to_string());
                    false
                }
                Ok(submission) => match submit(&state, submission).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to save phone");
                        editor.error = Some(format!("Could not save phone: {e}"));
                        false
                    }
                },
            }
        }
    };

    if close {
        editor_state.close();
    }
    session::store_editor(&session, &editor_state).await?;

    Ok(Redirect::to("/"))
}

async fn submit(state: &AppState, submission: Submission) -> Result<(), AppError> {
    match submission {
        Submission::Create(listing) => {
            state.phones().create_phone(&listing).await?;
        }
        Submission::Update(phone) => {
            state.phones().update_phone(&phone).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use phone_catalog_core::{NewPhone, Phone, PhoneId, Price};

    use super::*;
    use crate::{models::EditorState, routes::phones::EditorView};

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_full_form() {
        let (fields, intent) = parse_editor_form(pairs(&[
            ("title", "Pixel 9"),
            ("price", "799"),
            ("memories", "128"),
            ("memories", "256"),
            ("memories", "128"),
            ("colours", "Black"),
            ("custom_colours", "Mint,  Black , ,Coral"),
            ("has_delivery", "on"),
            ("image_url", "https://img/1.png"),
            ("intent", "save"),
        ]))
        .unwrap();

        assert_eq!(intent, EditorIntent::Save);
        assert_eq!(fields.title, "Pixel 9");
        assert_eq!(fields.price, "799");
        assert_eq!(fields.memories, vec![128, 256]);
        assert_eq!(fields.colours, vec!["Black", "Mint", "Coral"]);
        assert!(fields.has_delivery);
        assert_eq!(fields.image_input, "https://img/1.png");
    }

    #[test]
    fn test_checked_colour_is_kept_verbatim() {
        let (fields, _) = parse_editor_form(pairs(&[
            ("colours", "Midnight, Blue"),
            ("colours", "  "),
            ("custom_colours", "Sand"),
        ]))
        .unwrap();
        assert_eq!(fields.colours, vec!["Midnight, Blue", "Sand"]);
    }

    #[test]
    fn test_stored_colour_with_comma_survives_price_edit() {
        let phone = Phone::new(
            PhoneId::new("p1"),
            NewPhone {
                title: "Pixel 9".to_string(),
                price: Price::from_raw("799"),
                image: vec![],
                memories: vec![128],
                has_delivery: false,
                colours: vec!["Black".to_string(), "Midnight, Blue".to_string()],
            },
        );
        let mut state = EditorState::open_edit(&phone);
        let view = EditorView::from(state.editor().unwrap());

        // The form as rendered, with only the price changed.
        let mut form = pairs(&[("title", &view.title), ("price", "749")]);
        for option in view.memory_options.iter().filter(|o| o.checked) {
            form.push(("memories".to_string(), option.value.clone()));
        }
        for option in view.colour_options.iter().filter(|o| o.checked) {
            form.push(("colours".to_string(), option.value.clone()));
        }
        form.extend(pairs(&[("custom_colours", ""), ("intent", "save")]));

        let (fields, intent) = parse_editor_form(form).unwrap();
        assert_eq!(intent, EditorIntent::Save);

        let editor = state.editor_mut().unwrap();
        editor.draft.apply(fields);
        let Submission::Update(updated) = editor.submission().unwrap() else {
            panic!("expected update");
        };
        assert_eq!(updated.listing.price.as_str(), "749");
        assert_eq!(updated.listing.colours, phone.listing.colours);
        assert_eq!(updated.listing.memories, phone.listing.memories);
    }

    #[test]
    fn test_unchecked_delivery_is_false() {
        let (fields, _) = parse_editor_form(pairs(&[("title", "A")])).unwrap();
        assert!(!fields.has_delivery);
        assert!(fields.memories.is_empty());
    }

    #[test]
    fn test_remove_image_wins_over_intent() {
        let (_, intent) = parse_editor_form(pairs(&[
            ("intent", "save"),
            ("remove_image", "https://img/1.png"),
        ]))
        .unwrap();
        assert_eq!(
            intent,
            EditorIntent::RemoveImage("https://img/1.png".to_string())
        );
    }

    #[test]
    fn test_intents() {
        let intent_of = |value: &str| parse_editor_form(pairs(&[("intent", value)])).map(|(_, i)| i);
        assert_eq!(intent_of("add_image").unwrap(), EditorIntent::AddImage);
        assert_eq!(intent_of("cancel").unwrap(), EditorIntent::Cancel);
        assert!(matches!(intent_of("explode"), Err(AppError::BadRequest(_))));

        let (_, implicit) = parse_editor_form(pairs(&[("title", "A")])).unwrap();
        assert_eq!(implicit, EditorIntent::Save);
    }

    #[test]
    fn test_malformed_memory_ignored() {
        let (fields, _) =
            parse_editor_form(pairs(&[("memories", "lots"), ("memories", "64")])).unwrap();
        assert_eq!(fields.memories, vec![64]);
    }
}
