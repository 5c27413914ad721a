//! Book review operations.

use stacks_shared::{ApiError, CreateReviewRequest, Paginated, Review, SortOrder};

use super::Api;

impl Api {
    pub async fn create_review(&self, req: &CreateReviewRequest) -> Result<Review, ApiError> {
        let token = self.creds().require_token()?;
        self.http().post_json("/reviews", Some(&token), req).await
    }

    /// `GET /reviews/book/{bookId}`.
    pub async fn book_reviews(
        &self,
        book_id: &str,
        page: u32,
        limit: u32,
        sort_by: &str,
        sort_order: SortOrder,
    ) -> Result<Paginated<Review>, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json(
                &format!("/reviews/book/{book_id}"),
                Some(&token),
                &[
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                    ("sortBy", sort_by.to_string()),
                    ("sortOrder", sort_order.as_str().to_string()),
                ],
            )
            .await
    }
}
