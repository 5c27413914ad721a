//! Wire models for the library-management API.
//!
//! Entities the server owns are mirrored here with camelCase field names;
//! request payloads use the field casing each endpoint actually accepts
//! (the book and user endpoints take snake_case bodies, the smaller
//! circulation endpoints take camelCase ones).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{flexi_date, flexi_date_opt};

// --- Common Definitions ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Librarian,
    Member,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Pagination metadata the server attaches to list responses. These counters
/// are authoritative; client-side page numbers are provisional until a
/// response overwrites them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: u64,
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_pages: u32,
}

/// A paginated list response: `{data: [...], pagination: {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

// --- Catalog ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub library_id: String,
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub total_copies: u32,
    pub available_copies: u32,
    pub reserved_copies: u32,
    #[serde(default)]
    pub author_ids: Vec<String>,
    #[serde(default)]
    pub author_names: Vec<String>,
    #[serde(default)]
    pub genre_ids: Vec<String>,
    #[serde(default)]
    pub genre_names: Vec<String>,
    #[serde(default, with = "flexi_date_opt")]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default, with = "flexi_date_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "flexi_date_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub book_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

// --- Accounts ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub name: String,
    pub is_active: bool,
    pub library_id: String,
    /// Ids of wishlisted books; mutated optimistically by wishlist calls.
    #[serde(default)]
    pub wishlist_book_ids: Vec<String>,
}

/// Per-library lending policy. Borrow limits and fine amounts are enforced
/// server-side; the client only reads them for display and for the local
/// due-date estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default)]
    pub policy_id: Option<String>,
    pub library_id: String,
    pub max_borrow_days: u32,
    #[serde(default)]
    pub fine_per_day: f64,
    #[serde(default)]
    pub max_fine: Option<f64>,
    #[serde(default)]
    pub max_borrow_books: Option<u32>,
    #[serde(default)]
    pub max_reservations: Option<u32>,
    #[serde(default)]
    pub reservation_expiry_days: Option<u32>,
}

impl Policy {
    /// Best-effort local estimate of a due date, used only to schedule
    /// reminder notifications. The server remains the authority.
    pub fn estimated_due_date(&self, borrow_date: DateTime<Utc>) -> DateTime<Utc> {
        borrow_date + Duration::days(i64::from(self.max_borrow_days))
    }
}

// --- Circulation ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    #[serde(with = "flexi_date")]
    pub borrow_date: DateTime<Utc>,
    #[serde(default, with = "flexi_date_opt")]
    pub return_date: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    pub status: String,
}

// --- Engagement ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, with = "flexi_date_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub book: Book,
}

// --- Analytics & Theme ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryAnalytics {
    #[serde(default)]
    pub library_id: Option<String>,
    pub total_books: u64,
    pub total_members: u64,
    pub active_borrows: u64,
    #[serde(default)]
    pub overdue_borrows: u64,
    #[serde(default)]
    pub total_reservations: u64,
    #[serde(default)]
    pub popular_books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryTheme {
    pub library_id: String,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

// --- Request payloads ---

/// `POST /books` body (snake_case on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBookRequest {
    pub library_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_copies: u32,
    pub available_copies: u32,
    pub reserved_copies: u32,
    #[serde(skip_serializing_if = "Option::is_none", with = "flexi_date_opt", default)]
    pub published_date: Option<DateTime<Utc>>,
    pub author_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

/// `PUT /books/{id}` body; same shape minus `author_ids`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateBookRequest {
    pub library_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_copies: u32,
    pub available_copies: u32,
    pub reserved_copies: u32,
    #[serde(skip_serializing_if = "Option::is_none", with = "flexi_date_opt", default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

/// `POST /users` body. The server requires the client to supply a
/// provisional `user_id`; [`CreateUserRequest::new`] generates one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateUserRequest {
    pub user_id: String,
    pub library_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub password: String,
}

impl CreateUserRequest {
    pub fn new(
        library_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            library_id: library_id.into(),
            name: name.into(),
            email: email.into(),
            role,
            is_active: true,
            password: password.into(),
        }
    }
}

/// `POST /authors` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateAuthorRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub book_ids: Vec<String>,
}

/// `POST /reviews` body (camelCase on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub book_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// `POST /borrow-transactions` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub book_id: String,
    pub user_id: String,
}

/// Single-field `{bookId}` body shared by wishlist and reservation creates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub book_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn book_decodes_with_bare_published_date() {
        let json = r#"{
            "id": "b1", "libraryId": "l1", "title": "Dune",
            "totalCopies": 3, "availableCopies": 2, "reservedCopies": 1,
            "publishedDate": "1965-08-01"
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(
            book.published_date,
            Some(Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap())
        );
        assert!(book.author_ids.is_empty());
    }

    #[test]
    fn create_user_request_generates_provisional_id() {
        let a = CreateUserRequest::new("l1", "Ada", "ada@example.com", UserRole::Member, "pw");
        let b = CreateUserRequest::new("l1", "Ada", "ada@example.com", UserRole::Member, "pw");
        assert_ne!(a.user_id, b.user_id);
        let wire = serde_json::to_value(&a).unwrap();
        assert_eq!(wire["role"], "member");
        assert!(wire.get("user_id").is_some());
    }

    #[test]
    fn due_date_estimate_adds_policy_days() {
        let policy = Policy {
            policy_id: None,
            library_id: "l1".into(),
            max_borrow_days: 14,
            fine_per_day: 0.5,
            max_fine: None,
            max_borrow_books: None,
            max_reservations: None,
            reservation_expiry_days: None,
        };
        let borrowed = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert_eq!(
            policy.estimated_due_date(borrowed),
            Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn borrow_round_trips_status() {
        let json = r#"{
            "id": "t1", "bookId": "b1", "userId": "u1",
            "borrowDate": "2024-01-01T00:00:00Z", "status": "borrowed"
        }"#;
        let borrow: Borrow = serde_json::from_str(json).unwrap();
        assert_eq!(borrow.status, BorrowStatus::Borrowed);
        assert!(borrow.return_date.is_none());
    }
}
