//! Lending-policy operations. Policies are enforced server-side; the client
//! reads them for display and the local due-date estimate.

use stacks_shared::{ApiError, Policy};

use super::Api;

impl Api {
    pub async fn create_policy(&self, policy: &Policy) -> Result<Policy, ApiError> {
        let token = self.creds().require_token()?;
        self.http().post_json("/policies", Some(&token), policy).await
    }

    pub async fn update_policy(&self, id: &str, policy: &Policy) -> Result<Policy, ApiError> {
        let token = self.creds().require_token()?;
        self.http().put_json(&format!("/policies/{id}"), Some(&token), policy).await
    }

    /// `GET /policies/library/{libraryId}`.
    pub async fn library_policy(&self, library_id: &str) -> Result<Policy, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json(&format!("/policies/library/{library_id}"), Some(&token), &[])
            .await
    }
}
