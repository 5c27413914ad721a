//! Book catalog operations.

use async_trait::async_trait;
use stacks_shared::{ApiError, Book, CreateBookRequest, Paginated, SortOrder, UpdateBookRequest};

use super::Api;
use crate::pager::{BookPageSource, PageRequest};

impl Api {
    /// `GET /books` for the active library.
    pub async fn list_books(
        &self,
        page: u32,
        limit: u32,
        sort_by: &str,
        sort_order: SortOrder,
    ) -> Result<Paginated<Book>, ApiError> {
        let token = self.creds().require_token()?;
        let library_id = self.creds().require_library_id()?;
        self.http()
            .get_json(
                "/books",
                Some(&token),
                &[
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                    ("sortBy", sort_by.to_string()),
                    ("sortOrder", sort_order.as_str().to_string()),
                    ("libraryId", library_id),
                ],
            )
            .await
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, ApiError> {
        let token = self.creds().require_token()?;
        self.http().get_json(&format!("/books/{id}"), Some(&token), &[]).await
    }

    pub async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, ApiError> {
        let token = self.creds().require_token()?;
        self.http().post_json("/books", Some(&token), req).await
    }

    pub async fn update_book(&self, id: &str, req: &UpdateBookRequest) -> Result<Book, ApiError> {
        let token = self.creds().require_token()?;
        self.http().put_json(&format!("/books/{id}"), Some(&token), req).await
    }

    pub async fn delete_book(&self, id: &str) -> Result<(), ApiError> {
        let token = self.creds().require_token()?;
        self.http().delete(&format!("/books/{id}"), Some(&token)).await
    }
}

#[async_trait]
impl BookPageSource for Api {
    async fn fetch_books(&self, req: &PageRequest) -> Result<Paginated<Book>, ApiError> {
        self.list_books(req.page, req.limit, &req.sort_by, req.sort_order).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{signed_out_api, unreachable_api};
    use stacks_shared::ApiError;

    #[tokio::test]
    async fn list_fails_fast_without_credentials() {
        let api = signed_out_api();
        let err = api.list_books(1, 200, "title", stacks_shared::SortOrder::Asc).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthenticated);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_network_error() {
        let api = unreachable_api();
        let err = api.get_book("b1").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
