//! Shared types and utilities for the stacks client.

pub mod codec;
pub mod error;
pub mod models;
pub mod protocol;

pub use codec::*;
pub use error::*;
pub use models::*;
pub use protocol::*;
