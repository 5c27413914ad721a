//! Library analytics.

use serde::Deserialize;
use stacks_shared::{ApiError, LibraryAnalytics};

use super::Api;

#[derive(Deserialize)]
struct AnalyticsEnvelope {
    data: LibraryAnalytics,
}

impl Api {
    /// `GET /analytics?library_id=`. A fresh result lands in the short-TTL
    /// analytics cache slot.
    pub async fn library_analytics(&self) -> Result<LibraryAnalytics, ApiError> {
        let token = self.creds().require_token()?;
        let library_id = self.creds().require_library_id()?;
        let envelope: AnalyticsEnvelope = self
            .http()
            .get_json("/analytics", Some(&token), &[("library_id", library_id)])
            .await?;
        self.analytics_cache.put(&envelope.data);
        Ok(envelope.data)
    }

    /// Last fetched analytics, if still fresh. Serves screens while a live
    /// fetch is in flight.
    pub fn cached_analytics(&self) -> Option<LibraryAnalytics> {
        self.analytics_cache.get()
    }
}
