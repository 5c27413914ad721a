//! User management operations.

use stacks_shared::{ApiError, CreateUserRequest, Paginated, User};

use super::Api;

impl Api {
    /// `GET /users` for the active library.
    pub async fn list_users(&self, limit: u32) -> Result<Paginated<User>, ApiError> {
        let token = self.creds().require_token()?;
        let library_id = self.creds().require_library_id()?;
        self.http()
            .get_json(
                "/users",
                Some(&token),
                &[("limit", limit.to_string()), ("libraryId", library_id)],
            )
            .await
    }

    /// `POST /users`. The request carries a client-generated provisional
    /// `user_id` (see [`CreateUserRequest::new`]).
    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<(), ApiError> {
        let token = self.creds().require_token()?;
        self.http().post_unit("/users", Some(&token), req).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::signed_out_api;
    use stacks_shared::{ApiError, CreateUserRequest, UserRole};

    #[tokio::test]
    async fn create_fails_fast_when_signed_out() {
        let api = signed_out_api();
        let req = CreateUserRequest::new("l1", "Ada", "ada@example.com", UserRole::Member, "pw");
        assert_eq!(api.create_user(&req).await.unwrap_err(), ApiError::Unauthenticated);
    }
}
