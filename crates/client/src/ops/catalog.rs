//! Libraries, genres, and authors.

use stacks_shared::{ApiError, Author, CreateAuthorRequest, Genre, Library, Paginated};

use super::Api;

impl Api {
    pub async fn list_libraries(&self, limit: u32) -> Result<Paginated<Library>, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json("/libraries", Some(&token), &[("limit", limit.to_string())])
            .await
    }

    pub async fn list_genres(&self) -> Result<Paginated<Genre>, ApiError> {
        let token = self.creds().require_token()?;
        self.http().get_json("/genres", Some(&token), &[]).await
    }

    /// `GET /authors?search=`. Every path through this call returns or
    /// fails; there is no silent drop on the decode path.
    pub async fn search_authors(&self, search: &str) -> Result<Paginated<Author>, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json("/authors", Some(&token), &[("search", search.to_string())])
            .await
    }

    pub async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, ApiError> {
        let token = self.creds().require_token()?;
        self.http().post_json("/authors", Some(&token), req).await
    }
}
