//! Per-library theme.

use stacks_shared::{ApiError, LibraryTheme};

use super::Api;

impl Api {
    /// `GET /theme/{libraryId}`. The theme is readable before sign-in, so
    /// this is the one unauthenticated call in the API surface.
    pub async fn theme(&self, library_id: &str) -> Result<LibraryTheme, ApiError> {
        self.http().get_json(&format!("/theme/{library_id}"), None, &[]).await
    }

    /// `PUT /theme/{libraryId}` (admin only, bearer-authenticated).
    pub async fn update_theme(
        &self,
        library_id: &str,
        theme: &LibraryTheme,
    ) -> Result<LibraryTheme, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .put_json(&format!("/theme/{library_id}"), Some(&token), theme)
            .await
    }
}
