//! Realtime update protocol.
//!
//! The server pushes `{type, data}` frames over a persistent socket whenever
//! an entity changes. Envelopes are ephemeral: they exist only in flight
//! between the channel and its in-process subscribers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Event kinds the backend currently emits.
pub const EVENT_BOOK_CREATED: &str = "bookCreated";
pub const EVENT_BOOK_UPDATED: &str = "bookUpdated";
pub const EVENT_BOOK_DELETED: &str = "bookDeleted";
pub const EVENT_BORROW_UPDATED: &str = "borrowUpdated";
pub const EVENT_RESERVATION_UPDATED: &str = "reservationUpdated";
pub const EVENT_USER_UPDATED: &str = "userUpdated";

/// The `{type, data}` wrapper used on the realtime channel to discriminate
/// payload kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
}

impl UpdateEnvelope {
    /// Parse a raw frame. Returns `None` for anything that is not an
    /// envelope; unrecognized frames are skipped, not errors.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Attempt to decode the payload as `T`. Each subscriber owns its own
    /// decode attempt; a mismatched payload type is an expected `None`.
    pub fn payload<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.data.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, Borrow};

    fn book_frame() -> String {
        format!(
            r#"{{"type":"{EVENT_BOOK_UPDATED}","data":{{
                "id":"b1","libraryId":"l1","title":"Dune",
                "totalCopies":3,"availableCopies":2,"reservedCopies":1
            }}}}"#
        )
    }

    #[test]
    fn parses_envelope_and_typed_payload() {
        let env = UpdateEnvelope::parse(&book_frame()).unwrap();
        assert_eq!(env.kind, EVENT_BOOK_UPDATED);
        let book: Book = env.payload().unwrap();
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn mismatched_payload_type_is_a_silent_none() {
        let env = UpdateEnvelope::parse(&book_frame()).unwrap();
        assert!(env.payload::<Borrow>().is_none());
        // The same envelope still decodes for the matching type.
        assert!(env.payload::<Book>().is_some());
    }

    #[test]
    fn non_envelope_frames_are_skipped() {
        assert!(UpdateEnvelope::parse("not json").is_none());
        assert!(UpdateEnvelope::parse(r#"{"hello":"world"}"#).is_none());
    }
}
