//! Borrow and reservation operations.

use stacks_shared::{ApiError, BookRef, Borrow, BorrowRequest, Paginated, Reservation, SortOrder};

use super::Api;

impl Api {
    /// `POST /borrow-transactions`.
    pub async fn borrow_book(&self, book_id: &str, user_id: &str) -> Result<Borrow, ApiError> {
        let token = self.creds().require_token()?;
        let body = BorrowRequest { book_id: book_id.to_string(), user_id: user_id.to_string() };
        self.http().post_json("/borrow-transactions", Some(&token), &body).await
    }

    pub async fn list_borrows(
        &self,
        limit: u32,
        sort_by: &str,
        sort_order: SortOrder,
    ) -> Result<Paginated<Borrow>, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json(
                "/borrow-transactions",
                Some(&token),
                &[
                    ("limit", limit.to_string()),
                    ("sortBy", sort_by.to_string()),
                    ("sortOrder", sort_order.as_str().to_string()),
                ],
            )
            .await
    }

    /// `DELETE /borrow-transactions/{id}/cancel`.
    pub async fn cancel_borrow(&self, id: &str) -> Result<(), ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .delete(&format!("/borrow-transactions/{id}/cancel"), Some(&token))
            .await
    }

    /// `PUT /borrow-transactions/{id}/return`.
    pub async fn return_book(&self, id: &str) -> Result<Borrow, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .put_json(
                &format!("/borrow-transactions/{id}/return"),
                Some(&token),
                &serde_json::json!({}),
            )
            .await
    }

    /// `POST /reservations {bookId}`.
    pub async fn reserve_book(&self, book_id: &str) -> Result<Reservation, ApiError> {
        let token = self.creds().require_token()?;
        let body = BookRef { book_id: book_id.to_string() };
        self.http().post_json("/reservations", Some(&token), &body).await
    }

    pub async fn list_reservations(
        &self,
        limit: u32,
        sort_by: &str,
        sort_order: SortOrder,
    ) -> Result<Paginated<Reservation>, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json(
                "/reservations",
                Some(&token),
                &[
                    ("limit", limit.to_string()),
                    ("sortBy", sort_by.to_string()),
                    ("sortOrder", sort_order.as_str().to_string()),
                ],
            )
            .await
    }

    pub async fn cancel_reservation(&self, id: &str) -> Result<(), ApiError> {
        let token = self.creds().require_token()?;
        self.http().delete(&format!("/reservations/{id}"), Some(&token)).await
    }
}
