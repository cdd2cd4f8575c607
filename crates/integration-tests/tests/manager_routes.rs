//! Integration tests for the manager web app.
//!
//! A cookie-keeping `reqwest` client plays the browser: it posts the same
//! forms the page renders and follows the redirects back to the list.

#![allow(clippy::unwrap_used)]

use phone_catalog_core::NewPhone;
use phone_catalog_integration_tests::{TestBackend, pixel_9, spawn_manager};
use reqwest::{Client, StatusCode};

struct Browser {
    client: Client,
    base: String,
}

impl Browser {
    async fn open(backend: &TestBackend) -> Self {
        let base = spawn_manager(backend.base_url()).await;
        let client = Client::builder().cookie_store(true).build().unwrap();
        Self { client, base }
    }

    async fn get(&self, path: &str) -> String {
        let response = self
            .client
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.text().await.unwrap()
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self
            .client
            .post(format!("{}{path}", self.base))
            .form(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.text().await.unwrap()
    }
}

fn listing(title: &str) -> NewPhone {
    NewPhone {
        title: title.to_string(),
        ..pixel_9()
    }
}

// =============================================================================
// List page
// =============================================================================

#[tokio::test]
async fn test_index_renders_cards() {
    let backend = TestBackend::spawn().await;
    backend.seed(pixel_9());
    let browser = Browser::open(&backend).await;

    let html = browser.get("/").await;

    assert!(html.contains("Phone List"));
    assert!(html.contains("Pixel 9"));
    assert!(html.contains("$799"));
    assert!(html.contains("128 GB"));
    assert!(html.contains("Delivery: Available"));
    assert!(!html.contains("editor-modal"));
}

#[tokio::test]
async fn test_index_shows_load_error_inline() {
    let backend = TestBackend::spawn().await;
    backend.set_failing(true);
    let browser = Browser::open(&backend).await;

    let html = browser.get("/").await;

    assert!(html.contains("alert-error"));
    assert!(!html.contains("Phone List"));
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_through_modal() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    let html = browser.post("/phones/new", &[]).await;
    assert!(html.contains("editor-modal"));
    assert!(html.contains("Add New Phone"));
    assert!(html.contains("Adding..."));

    let html = browser
        .post(
            "/editor",
            &[
                ("title", "Pixel 9"),
                ("price", "799"),
                ("memories", "128"),
                ("memories", "256"),
                ("colours", "Black"),
                ("custom_colours", ""),
                ("image_url", ""),
                ("has_delivery", "on"),
                ("intent", "save"),
            ],
        )
        .await;

    assert!(!html.contains("editor-modal"));
    assert!(html.contains("Pixel 9"));

    let phones = backend.phones();
    assert_eq!(phones.len(), 1);
    let created = &phones[0].listing;
    assert_eq!(created.title, "Pixel 9");
    assert_eq!(created.price.as_str(), "799");
    assert!(created.image.is_empty());
    assert_eq!(created.memories, vec![128, 256]);
    assert!(created.has_delivery);
    assert_eq!(created.colours, vec!["Black"]);
}

#[tokio::test]
async fn test_duplicate_image_is_staged_once() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    browser.post("/phones/new", &[]).await;
    let fields = |url: &'static str, intent: &'static str| {
        vec![
            ("title", "Pixel 9"),
            ("price", "799"),
            ("image_url", url),
            ("intent", intent),
        ]
    };

    browser
        .post("/editor", &fields("https://img.example/a.png", "add_image"))
        .await;
    browser
        .post("/editor", &fields("  https://img.example/a.png ", "add_image"))
        .await;
    browser.post("/editor", &fields("", "add_image")).await;
    browser.post("/editor", &fields("", "save")).await;

    let phones = backend.phones();
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0].listing.image, vec!["https://img.example/a.png"]);
}

#[tokio::test]
async fn test_remove_staged_image() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    browser.post("/phones/new", &[]).await;
    for url in ["https://img.example/a.png", "https://img.example/b.png"] {
        browser
            .post(
                "/editor",
                &[("title", "Pixel 9"), ("price", "799"), ("image_url", url), ("intent", "add_image")],
            )
            .await;
    }
    browser
        .post(
            "/editor",
            &[
                ("title", "Pixel 9"),
                ("price", "799"),
                ("remove_image", "https://img.example/a.png"),
            ],
        )
        .await;
    browser
        .post("/editor", &[("title", "Pixel 9"), ("price", "799"), ("intent", "save")])
        .await;

    assert_eq!(
        backend.phones()[0].listing.image,
        vec!["https://img.example/b.png"]
    );
}

#[tokio::test]
async fn test_invalid_save_keeps_modal_open() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    browser.post("/phones/new", &[]).await;
    let html = browser
        .post("/editor", &[("title", "  "), ("price", "799"), ("intent", "save")])
        .await;

    assert!(html.contains("editor-modal"));
    assert!(html.contains("title is required"));
    assert_eq!(backend.requests("POST", "/phone"), 0);
}

#[tokio::test]
async fn test_backend_failure_on_save_keeps_draft() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    browser.get("/").await;
    browser.post("/phones/new", &[]).await;
    backend.set_failing(true);
    browser
        .post("/editor", &[("title", "Pixel 9"), ("price", "799"), ("intent", "save")])
        .await;
    backend.set_failing(false);

    let html = browser.get("/").await;
    assert!(html.contains("editor-modal"));
    assert!(html.contains("Could not save phone"));
    assert!(html.contains("value=\"Pixel 9\""));
    assert!(backend.phones().is_empty());
}

// =============================================================================
// Cancel
// =============================================================================

#[tokio::test]
async fn test_cancel_discards_draft() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    browser.post("/phones/new", &[]).await;
    browser
        .post(
            "/editor",
            &[
                ("title", "Draft phone"),
                ("price", "1"),
                ("image_url", "https://img.example/draft.png"),
                ("intent", "add_image"),
            ],
        )
        .await;

    let html = browser.post("/editor", &[("intent", "cancel")]).await;
    assert!(!html.contains("editor-modal"));

    let html = browser.post("/phones/new", &[]).await;
    assert!(!html.contains("Draft phone"));
    assert!(!html.contains("draft.png"));

    assert_eq!(backend.requests("POST", "/phone"), 0);
    assert!(backend.phones().is_empty());
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn test_edit_price_only() {
    let backend = TestBackend::spawn().await;
    let mut original = pixel_9();
    original.image = vec!["https://img.example/pixel.png".to_string()];
    let phone = backend.seed(original);
    let browser = Browser::open(&backend).await;

    let html = browser.post(&format!("/phones/{}/edit", phone.id), &[]).await;
    assert!(html.contains("Edit Phone"));
    assert!(html.contains("Updating..."));
    assert!(html.contains("value=\"799\""));

    // The form as rendered, with only the price changed.
    browser
        .post(
            "/editor",
            &[
                ("title", "Pixel 9"),
                ("price", "749"),
                ("memories", "128"),
                ("memories", "256"),
                ("colours", "Black"),
                ("custom_colours", ""),
                ("image_url", ""),
                ("has_delivery", "on"),
                ("intent", "save"),
            ],
        )
        .await;

    let phones = backend.phones();
    assert_eq!(phones.len(), 1);
    let updated = &phones[0];
    assert_eq!(updated.id, phone.id);
    assert_eq!(updated.listing.price.as_str(), "749");
    assert_eq!(updated.listing.title, phone.listing.title);
    assert_eq!(updated.listing.image, phone.listing.image);
    assert_eq!(updated.listing.memories, phone.listing.memories);
    assert_eq!(updated.listing.has_delivery, phone.listing.has_delivery);
    assert_eq!(updated.listing.colours, phone.listing.colours);

    let path = format!("/phone/{}", phone.id);
    assert_eq!(backend.requests("PUT", &path), 1);
}

#[tokio::test]
async fn test_edit_keeps_colour_containing_comma() {
    let backend = TestBackend::spawn().await;
    let mut original = pixel_9();
    original.colours = vec!["Black".to_string(), "Midnight, Blue".to_string()];
    let phone = backend.seed(original);
    let browser = Browser::open(&backend).await;

    let html = browser.post(&format!("/phones/{}/edit", phone.id), &[]).await;
    assert!(html.contains(r#"name="colours" value="Midnight, Blue" checked"#));

    browser
        .post(
            "/editor",
            &[
                ("title", "Pixel 9"),
                ("price", "749"),
                ("memories", "128"),
                ("memories", "256"),
                ("colours", "Black"),
                ("colours", "Midnight, Blue"),
                ("custom_colours", ""),
                ("image_url", ""),
                ("has_delivery", "on"),
                ("intent", "save"),
            ],
        )
        .await;

    let updated = &backend.phones()[0].listing;
    assert_eq!(updated.price.as_str(), "749");
    assert_eq!(updated.colours, vec!["Black", "Midnight, Blue"]);
}

#[tokio::test]
async fn test_edit_missing_phone_shows_notice() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    let html = browser.post("/phones/999/edit", &[]).await;

    assert!(!html.contains("editor-modal"));
    assert!(html.contains("Could not load phone"));

    // One-shot.
    let html = browser.get("/").await;
    assert!(!html.contains("Could not load phone"));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_removes_card() {
    let backend = TestBackend::spawn().await;
    backend.seed(listing("Keeper"));
    let doomed = backend.seed(listing("Doomed"));
    let browser = Browser::open(&backend).await;

    let html = browser.get("/").await;
    assert!(html.contains("Doomed"));

    let html = browser
        .post(&format!("/phones/{}/delete", doomed.id), &[])
        .await;

    assert!(html.contains("Keeper"));
    assert!(!html.contains("Doomed"));
    assert_eq!(backend.phones().len(), 1);
}

#[tokio::test]
async fn test_delete_closes_modal_editing_that_phone() {
    let backend = TestBackend::spawn().await;
    let phone = backend.seed(pixel_9());
    let browser = Browser::open(&backend).await;

    browser.post(&format!("/phones/{}/edit", phone.id), &[]).await;
    let html = browser
        .post(&format!("/phones/{}/delete", phone.id), &[])
        .await;

    assert!(!html.contains("editor-modal"));
    assert!(backend.phones().is_empty());
}

#[tokio::test]
async fn test_delete_failure_shows_notice() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    let html = browser.post("/phones/999/delete", &[]).await;

    assert!(html.contains("Could not delete phone"));
}

#[tokio::test]
async fn test_delete_notice_survives_failing_list() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    // Both the delete and the list reload hit the failing backend.
    backend.set_failing(true);
    let html = browser.post("/phones/1/delete", &[]).await;

    assert!(html.contains("alert-error"));
    assert!(html.contains("Could not delete phone"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_and_readiness() {
    let backend = TestBackend::spawn().await;
    let browser = Browser::open(&backend).await;

    assert_eq!(browser.get("/health").await, "ok");

    let ready = |client: Client, url: String| async move {
        client.get(url).send().await.unwrap().status()
    };
    let url = format!("{}/health/ready", browser.base);
    assert_eq!(ready(browser.client.clone(), url.clone()).await, StatusCode::OK);

    backend.set_failing(true);
    assert_eq!(
        ready(browser.client.clone(), url).await,
        StatusCode::SERVICE_UNAVAILABLE
    );
}
