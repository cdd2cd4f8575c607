//! Integration tests for the phone catalog.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p phone-catalog-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `phone_queries` - API client and query cache against a live backend
//! - `manager_routes` - Manager pages and the edit modal, driven like a browser
//!
//! Both run against [`TestBackend`], an in-memory `/phone` REST resource
//! bound to an ephemeral port, so no external services are needed.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use phone_catalog_core::{NewPhone, Phone, PhoneId};
use phone_catalog_manager::{app, config::ManagerConfig, state::AppState};
use serde_json::Value;
use url::Url;

/// An in-memory phone backend serving `/phone` and `/phone/{id}`.
///
/// Ids are assigned sequentially as strings. Every request is logged so
/// tests can assert which calls the cache let through.
pub struct TestBackend {
    addr: SocketAddr,
    state: BackendState,
}

#[derive(Clone, Default)]
struct BackendState {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    phones: Vec<Phone>,
    next_id: u64,
    requests: Vec<(String, String)>,
    bodies: Vec<Value>,
    failing: bool,
    list_delay: Duration,
}

impl BackendState {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store {
    fn insert(&mut self, listing: NewPhone) -> Phone {
        self.next_id += 1;
        let phone = Phone::new(PhoneId::new(self.next_id.to_string()), listing);
        self.phones.push(phone.clone());
        phone
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.phones.iter().position(|p| p.id.as_str() == id)
    }
}

impl TestBackend {
    /// Start a backend on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = BackendState::default();

        let router = Router::new()
            .route("/phone", get(list_phones).post(create_phone))
            .route(
                "/phone/{id}",
                get(get_phone).put(update_phone).delete(delete_phone),
            )
            .layer(middleware::from_fn_with_state(state.clone(), record_request))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test backend");
        let addr = listener.local_addr().expect("Failed to read backend address");

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test backend failed");
        });

        Self { addr, state }
    }

    /// Base URL to configure clients with (`/phone` is appended by them).
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid backend URL")
    }

    /// Insert a phone directly, bypassing HTTP.
    #[must_use]
    pub fn seed(&self, listing: NewPhone) -> Phone {
        self.state.store().insert(listing)
    }

    /// Current contents, in insertion order.
    #[must_use]
    pub fn phones(&self) -> Vec<Phone> {
        self.state.store().phones.clone()
    }

    /// Number of requests seen for `method` and `path`, e.g. `("GET", "/phone/1")`.
    #[must_use]
    pub fn requests(&self, method: &str, path: &str) -> usize {
        self.state
            .store()
            .requests
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    /// Total number of requests seen.
    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.state.store().requests.len()
    }

    /// The most recent JSON body received by `POST` or `PUT`.
    #[must_use]
    pub fn last_body(&self) -> Option<Value> {
        self.state.store().bodies.last().cloned()
    }

    /// Delay `GET /phone` responses. The snapshot is taken before the
    /// delay, so a slow list can return data older than a write that
    /// completes meanwhile.
    pub fn set_list_delay(&self, delay: Duration) {
        self.state.store().list_delay = delay;
    }

    /// Make every request fail with `500` until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.store().failing = failing;
    }
}

async fn record_request(State(state): State<BackendState>, request: Request, next: Next) -> Response {
    let failing = {
        let mut store = state.store();
        store
            .requests
            .push((request.method().to_string(), request.uri().path().to_string()));
        store.failing
    };

    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend unavailable").into_response();
    }
    next.run(request).await
}

async fn list_phones(State(state): State<BackendState>) -> Json<Vec<Phone>> {
    let (phones, delay) = {
        let store = state.store();
        (store.phones.clone(), store.list_delay)
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    Json(phones)
}

async fn get_phone(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> Result<Json<Phone>, StatusCode> {
    let store = state.store();
    store
        .position(&id)
        .and_then(|index| store.phones.get(index).cloned())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_phone(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Phone>), StatusCode> {
    let listing: NewPhone =
        serde_json::from_value(body.clone()).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let mut store = state.store();
    store.bodies.push(body);
    Ok((StatusCode::CREATED, Json(store.insert(listing))))
}

async fn update_phone(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Phone>, StatusCode> {
    let listing: NewPhone =
        serde_json::from_value(body.clone()).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let mut store = state.store();
    store.bodies.push(body);
    let index = store.position(&id).ok_or(StatusCode::NOT_FOUND)?;
    let phone = store.phones.get_mut(index).ok_or(StatusCode::NOT_FOUND)?;
    phone.listing = listing;
    Ok(Json(phone.clone()))
}

async fn delete_phone(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> Result<Json<Phone>, StatusCode> {
    let mut store = state.store();
    let index = store.position(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(store.phones.remove(index)))
}

/// Start the manager web app against `api_base_url` on an ephemeral port and
/// return its base URL (no trailing slash).
///
/// # Panics
///
/// Panics if the app cannot be built or the listener cannot be bound.
pub async fn spawn_manager(api_base_url: Url) -> String {
    let mut config = ManagerConfig::local(api_base_url);
    config.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../manager/static").to_string();

    let state = AppState::new(config).expect("Failed to build manager state");
    let router = app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind manager");
    let addr = listener.local_addr().expect("Failed to read manager address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Manager failed");
    });

    format!("http://{addr}")
}

/// The listing used throughout the tests.
#[must_use]
pub fn pixel_9() -> NewPhone {
    serde_json::from_value(serde_json::json!({
        "title": "Pixel 9",
        "price": "799",
        "image": [],
        "memories": [128, 256],
        "hasDelivery": true,
        "colours": ["Black"],
    }))
    .expect("Invalid listing fixture")
}
