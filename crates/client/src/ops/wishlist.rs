//! Wishlist operations.
//!
//! Add and remove mutate the local user's wishlist optimistically, then
//! revert on failure: local flip, network call, automatic rollback, in that
//! order.

use stacks_shared::{ApiError, BookRef, Paginated, User, WishlistEntry};

use super::Api;

impl Api {
    /// `POST /wishlists {bookId}` with optimistic local add.
    pub async fn add_to_wishlist(&self, user: &mut User, book_id: &str) -> Result<(), ApiError> {
        if user.wishlist_book_ids.iter().any(|id| id == book_id) {
            return Ok(());
        }
        user.wishlist_book_ids.push(book_id.to_string());

        let body = BookRef { book_id: book_id.to_string() };
        let token = match self.creds().require_token() {
            Ok(token) => token,
            Err(e) => {
                user.wishlist_book_ids.retain(|id| id != book_id);
                return Err(e);
            }
        };
        let result = self.http().post_unit("/wishlists", Some(&token), &body).await;
        if result.is_err() {
            user.wishlist_book_ids.retain(|id| id != book_id);
        }
        result
    }

    /// `DELETE /wishlists/books/{bookId}` with optimistic local remove.
    pub async fn remove_from_wishlist(
        &self,
        user: &mut User,
        book_id: &str,
    ) -> Result<(), ApiError> {
        if !user.wishlist_book_ids.iter().any(|id| id == book_id) {
            return Ok(());
        }
        user.wishlist_book_ids.retain(|id| id != book_id);

        let token = match self.creds().require_token() {
            Ok(token) => token,
            Err(e) => {
                user.wishlist_book_ids.push(book_id.to_string());
                return Err(e);
            }
        };
        let result = self
            .http()
            .delete(&format!("/wishlists/books/{book_id}"), Some(&token))
            .await;
        if result.is_err() {
            user.wishlist_book_ids.push(book_id.to_string());
        }
        result
    }

    /// `GET /wishlists/my`.
    pub async fn my_wishlist(&self, limit: u32) -> Result<Paginated<WishlistEntry>, ApiError> {
        let token = self.creds().require_token()?;
        self.http()
            .get_json("/wishlists/my", Some(&token), &[("limit", limit.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{signed_out_api, unreachable_api};
    use stacks_shared::{User, UserRole};

    fn member() -> User {
        User {
            id: "u1".into(),
            email: "ada@example.com".into(),
            role: UserRole::Member,
            name: "Ada".into(),
            is_active: true,
            library_id: "l1".into(),
            wishlist_book_ids: vec!["b1".into()],
        }
    }

    #[tokio::test]
    async fn failed_add_rolls_back_the_optimistic_entry() {
        let api = unreachable_api();
        let mut user = member();
        let before = user.wishlist_book_ids.clone();

        let result = api.add_to_wishlist(&mut user, "b2").await;
        assert!(result.is_err());
        assert_eq!(user.wishlist_book_ids, before);
    }

    #[tokio::test]
    async fn failed_remove_restores_the_entry() {
        let api = unreachable_api();
        let mut user = member();

        let result = api.remove_from_wishlist(&mut user, "b1").await;
        assert!(result.is_err());
        assert!(user.wishlist_book_ids.contains(&"b1".to_string()));
    }

    #[tokio::test]
    async fn add_without_token_rolls_back_too() {
        let api = signed_out_api();
        let mut user = member();
        assert!(api.add_to_wishlist(&mut user, "b2").await.is_err());
        assert_eq!(user.wishlist_book_ids, vec!["b1".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_add_is_a_local_noop() {
        // Already wishlisted: no optimistic change and no network call, so
        // even the unreachable API succeeds.
        let api = unreachable_api();
        let mut user = member();
        api.add_to_wishlist(&mut user, "b1").await.unwrap();
        assert_eq!(user.wishlist_book_ids, vec!["b1".to_string()]);
    }
}
