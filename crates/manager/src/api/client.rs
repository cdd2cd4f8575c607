//! HTTP client for the `/phone` resource collection.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;

use phone_catalog_core::{NewPhone, Phone, PhoneId};

use super::ApiError;
use crate::config::PhoneApiConfig;

/// How much of an error body is kept for logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the phone REST backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct PhoneApiClient {
    inner: Arc<PhoneApiClientInner>,
}

struct PhoneApiClientInner {
    client: reqwest::Client,
    /// Collection endpoint, e.g. `http://localhost:3000/phone`.
    collection_url: String,
}

impl PhoneApiClient {
    /// Create a new client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &PhoneApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let collection_url = format!("{}/phone", config.base_url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(PhoneApiClientInner {
                client,
                collection_url,
            }),
        })
    }

    /// The collection endpoint this client talks to.
    #[must_use]
    pub fn collection_url(&self) -> &str {
        &self.inner.collection_url
    }

    fn item_url(&self, id: &PhoneId) -> String {
        format!(
            "{}/{}",
            self.inner.collection_url,
            urlencoding::encode(id.as_str())
        )
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// `GET /phone`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a phone array.
    #[instrument(skip(self))]
    pub async fn list_phones(&self) -> Result<Vec<Phone>, ApiError> {
        let body = self
            .send(Method::GET, &self.inner.collection_url, None::<&()>)
            .await?;
        parse(&body)
    }

    /// `GET /phone/{id}`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(phone_id = %id))]
    pub async fn get_phone(&self, id: &PhoneId) -> Result<Phone, ApiError> {
        let body = self
            .send(Method::GET, &self.item_url(id), None::<&()>)
            .await?;
        parse(&body)
    }

    /// `POST /phone`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a phone.
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_phone(&self, payload: &NewPhone) -> Result<Phone, ApiError> {
        let body = self
            .send(Method::POST, &self.inner.collection_url, Some(payload))
            .await?;
        parse(&body)
    }

    /// `PUT /phone/{id}` with the id-less body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or another error if
    /// the request fails.
    #[instrument(skip(self, payload), fields(phone_id = %id))]
    pub async fn update_phone(&self, id: &PhoneId, payload: &NewPhone) -> Result<Phone, ApiError> {
        let body = self
            .send(Method::PUT, &self.item_url(id), Some(payload))
            .await?;
        parse(&body)
    }

    /// `DELETE /phone/{id}`. Any response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, or another error if
    /// the request fails.
    #[instrument(skip(self), fields(phone_id = %id))]
    pub async fn delete_phone(&self, id: &PhoneId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &self.item_url(id), None::<&()>)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Send one request and return the body of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let mut request = self.inner.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%method, url, "Phone backend returned 404");
            return Err(ApiError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let message = preview(&response_text);
            tracing::error!(
                %method,
                url,
                status = %status,
                body = %message,
                "Phone backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(%method, url, status = %status, "Phone backend request completed");
        Ok(response_text)
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %preview(body),
            "Failed to parse phone backend response"
        );
        ApiError::Parse(e)
    })
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}
