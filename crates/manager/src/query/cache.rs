//! Cache types for phone query results.

use phone_catalog_core::{Phone, PhoneId};

/// Cache key for phone queries.
///
/// `Phones` is the collection query; `Phone(id)` is the compound
/// `(phones, id)` key of a single record.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum QueryKey {
    Phones,
    Phone(PhoneId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Phones(Vec<Phone>),
    Phone(Box<Phone>),
}
