//! Query/cache layer over the phone backend.
//!
//! Reads go through an in-memory `moka` cache; writes go straight to the
//! backend and, once they succeed, invalidate (or seed) the affected
//! entries. A failed request never touches the cache.
//!
//! | Operation           | Cache effect on success                              |
//! |---------------------|------------------------------------------------------|
//! | `list_phones`       | fills `Phones`                                       |
//! | `get_phone_by_id`   | fills `Phone(id)`                                    |
//! | `create_phone`      | invalidates `Phones`                                 |
//! | `update_phone`      | invalidates `Phones`, writes the result to `Phone(id)` |
//! | `delete_phone`      | invalidates `Phones` and `Phone(id)`                 |
//!
//! Every invalidation bumps a generation counter. A read only stores its
//! result if no invalidation happened while it was in flight, so a slow
//! fetch that started before a write can never put stale data back.

mod cache;

pub use cache::{CacheValue, QueryKey};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use phone_catalog_core::{NewPhone, Phone, PhoneId};

use crate::api::{ApiError, PhoneApiClient};
use crate::config::CacheConfig;

/// Cached, invalidate-on-write access to the phone collection.
#[derive(Clone)]
pub struct PhoneQueries {
    inner: Arc<PhoneQueriesInner>,
}

struct PhoneQueriesInner {
    api: PhoneApiClient,
    cache: Cache<QueryKey, CacheValue>,
    generation: AtomicU64,
    /// Serializes invalidations against read-through inserts.
    writes: Mutex<()>,
}

impl PhoneQueries {
    /// Wrap an API client with a fresh cache.
    #[must_use]
    pub fn new(api: PhoneApiClient, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live)
            .build();

        Self {
            inner: Arc::new(PhoneQueriesInner {
                api,
                cache,
                generation: AtomicU64::new(0),
                writes: Mutex::new(()),
            }),
        }
    }

    /// The uncached API client.
    #[must_use]
    pub fn api(&self) -> &PhoneApiClient {
        &self.inner.api
    }

    /// All phones, from cache when available.
    ///
    /// # Errors
    ///
    /// Returns the backend error when a fetch is needed and fails.
    #[instrument(skip(self))]
    pub async fn list_phones(&self) -> Result<Vec<Phone>, ApiError> {
        if let Some(CacheValue::Phones(phones)) = self.inner.cache.get(&QueryKey::Phones).await {
            debug!(count = phones.len(), "Cache hit for phones");
            return Ok(phones);
        }

        let generation = self.generation();
        let phones = self.inner.api.list_phones().await?;
        self.store_if_current(generation, QueryKey::Phones, CacheValue::Phones(phones.clone()))
            .await;

        Ok(phones)
    }

    /// One phone, from cache when available.
    ///
    /// The query is disabled without an id: `None` resolves to `Ok(None)`
    /// without a request.
    ///
    /// # Errors
    ///
    /// Returns the backend error (including `ApiError::NotFound`) when a
    /// fetch is needed and fails.
    #[instrument(skip(self))]
    pub async fn get_phone_by_id(&self, id: Option<&PhoneId>) -> Result<Option<Phone>, ApiError> {
        let Some(id) = id else {
            return Ok(None);
        };

        let key = QueryKey::Phone(id.clone());
        if let Some(CacheValue::Phone(phone)) = self.inner.cache.get(&key).await {
            debug!(phone_id = %id, "Cache hit for phone");
            return Ok(Some(*phone));
        }

        let generation = self.generation();
        let phone = self.inner.api.get_phone(id).await?;
        self.store_if_current(generation, key, CacheValue::Phone(Box::new(phone.clone())))
            .await;

        Ok(Some(phone))
    }

    /// Create a phone; the next list read re-fetches.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cache is left untouched.
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_phone(&self, payload: &NewPhone) -> Result<Phone, ApiError> {
        let created = self.inner.api.create_phone(payload).await?;
        self.invalidate(&QueryKey::Phones).await;

        tracing::info!(phone_id = %created.id, "Phone created");
        Ok(created)
    }

    /// Replace a phone's fields (the id is sent in the path only).
    ///
    /// On success the list is invalidated and the returned record is stored
    /// under its by-id key, so reading it back costs no request.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cache is left untouched.
    #[instrument(skip(self, phone), fields(phone_id = %phone.id))]
    pub async fn update_phone(&self, phone: &Phone) -> Result<Phone, ApiError> {
        let updated = self
            .inner
            .api
            .update_phone(&phone.id, &phone.listing)
            .await?;

        self.invalidate(&QueryKey::Phones).await;
        self.inner
            .cache
            .insert(
                QueryKey::Phone(updated.id.clone()),
                CacheValue::Phone(Box::new(updated.clone())),
            )
            .await;

        tracing::info!(phone_id = %updated.id, "Phone updated");
        Ok(updated)
    }

    /// Delete a phone; the next list read re-fetches.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cache is left untouched.
    #[instrument(skip(self))]
    pub async fn delete_phone(&self, id: &PhoneId) -> Result<(), ApiError> {
        self.inner.api.delete_phone(id).await?;

        self.invalidate(&QueryKey::Phones).await;
        self.invalidate(&QueryKey::Phone(id.clone())).await;

        tracing::info!(phone_id = %id, "Phone deleted");
        Ok(())
    }

    /// Mark a cached result stale so the next read re-fetches it.
    ///
    /// Reads already in flight will not cache their result.
    pub async fn invalidate(&self, key: &QueryKey) {
        debug!(?key, "Invalidating cached query");
        let _guard = self.inner.writes.lock().await;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.cache.invalidate(key).await;
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Cache a fetched result unless an invalidation ran since `generation`
    /// was read.
    async fn store_if_current(&self, generation: u64, key: QueryKey, value: CacheValue) {
        let _guard = self.inner.writes.lock().await;
        if self.generation() == generation {
            self.inner.cache.insert(key, value).await;
        } else {
            debug!(?key, "Discarding result fetched before an invalidation");
        }
    }

    /// Peek at a cached result without fetching.
    pub async fn cached(&self, key: &QueryKey) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use phone_catalog_core::Price;
    use url::Url;

    use super::*;
    use crate::config::PhoneApiConfig;

    /// Queries pointed at a port nothing listens on; any fetch fails fast.
    fn offline_queries() -> PhoneQueries {
        let mut config = PhoneApiConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.timeout = std::time::Duration::from_millis(500);
        PhoneQueries::new(PhoneApiClient::new(&config).unwrap(), &CacheConfig::default())
    }

    fn phone(id: &str) -> Phone {
        Phone::new(
            PhoneId::new(id),
            NewPhone {
                title: format!("Phone {id}"),
                price: Price::from_raw("100"),
                image: vec![],
                memories: vec![64],
                has_delivery: false,
                colours: vec![],
            },
        )
    }

    #[tokio::test]
    async fn test_disabled_query_without_id() {
        let queries = offline_queries();
        assert_eq!(queries.get_phone_by_id(None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cached_list_is_served_without_backend() {
        let queries = offline_queries();
        queries
            .inner
            .cache
            .insert(QueryKey::Phones, CacheValue::Phones(vec![phone("1")]))
            .await;

        let phones = queries.list_phones().await.unwrap();
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_cached_phone_is_served_without_backend() {
        let queries = offline_queries();
        let id = PhoneId::new("7");
        queries
            .inner
            .cache
            .insert(QueryKey::Phone(id.clone()), CacheValue::Phone(Box::new(phone("7"))))
            .await;

        let found = queries.get_phone_by_id(Some(&id)).await.unwrap();
        assert_eq!(found.unwrap().listing.title, "Phone 7");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let queries = offline_queries();
        queries
            .inner
            .cache
            .insert(QueryKey::Phones, CacheValue::Phones(vec![phone("1")]))
            .await;

        queries.invalidate(&QueryKey::Phones).await;

        assert!(queries.cached(&QueryKey::Phones).await.is_none());
        assert!(queries.list_phones().await.is_err());
    }

    #[tokio::test]
    async fn test_result_fetched_across_invalidation_is_discarded() {
        let queries = offline_queries();

        let before = queries.generation();
        queries.invalidate(&QueryKey::Phones).await;
        queries
            .store_if_current(before, QueryKey::Phones, CacheValue::Phones(vec![phone("1")]))
            .await;
        assert!(queries.cached(&QueryKey::Phones).await.is_none());

        let current = queries.generation();
        queries
            .store_if_current(current, QueryKey::Phones, CacheValue::Phones(vec![phone("1")]))
            .await;
        assert!(queries.cached(&QueryKey::Phones).await.is_some());
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let queries = offline_queries();
        queries
            .inner
            .cache
            .insert(QueryKey::Phones, CacheValue::Phones(vec![phone("1")]))
            .await;

        assert!(queries.delete_phone(&PhoneId::new("1")).await.is_err());
        assert!(queries.update_phone(&phone("1")).await.is_err());
        assert!(matches!(
            queries.cached(&QueryKey::Phones).await,
            Some(CacheValue::Phones(list)) if list.len() == 1
        ));
    }
}
