//! Domain operations against the library API.
//!
//! Every operation follows the same shape: resolve credentials, fail fast
//! with a typed error if they are missing, send exactly one HTTP request
//! per the endpoint contract, and classify the response by status family.
//! Nothing here retries; a retry is always a fresh caller action.

mod analytics;
mod books;
mod catalog;
mod circulation;
mod policies;
mod reviews;
mod theme;
mod users;
mod wishlist;

use std::time::Duration;

use stacks_shared::LibraryAnalytics;

use crate::cache::DiskCache;
use crate::config::ApiConfig;
use crate::credentials::CredentialStore;
use crate::http::HttpClient;

/// Analytics go stale quickly, so their slot gets a short TTL.
const ANALYTICS_TTL: Duration = Duration::from_secs(600);

/// The API surface: one instance per configured backend.
pub struct Api {
    http: HttpClient,
    creds: CredentialStore,
    analytics_cache: DiskCache<LibraryAnalytics>,
}

impl Api {
    pub fn new(config: ApiConfig, creds: CredentialStore) -> Self {
        Self {
            http: HttpClient::new(config),
            creds,
            analytics_cache: DiskCache::new("analytics", ANALYTICS_TTL),
        }
    }

    /// Swap the analytics cache slot. Tests point this at a tempdir.
    pub fn with_analytics_cache(mut self, cache: DiskCache<LibraryAnalytics>) -> Self {
        self.analytics_cache = cache;
        self
    }

    pub fn creds(&self) -> &CredentialStore {
        &self.creds
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::*;
    use crate::credentials::MemoryBackend;

    /// An `Api` whose requests all fail fast: the base URL points at a
    /// closed local port.
    pub fn unreachable_api() -> Api {
        let creds = CredentialStore::new(Arc::new(MemoryBackend::new()));
        creds.save_token("test-token").unwrap();
        creds.save_library_id("l1").unwrap();
        Api::new(ApiConfig::new("http://127.0.0.1:1"), creds)
    }

    /// An `Api` with no stored credentials at all.
    pub fn signed_out_api() -> Api {
        let creds = CredentialStore::new(Arc::new(MemoryBackend::new()));
        Api::new(ApiConfig::new("http://127.0.0.1:1"), creds)
    }
}
