//! Realtime update channel.
//!
//! A single persistent socket carries `{type, data}` frames from the server
//! whenever an entity changes. The channel republishes each frame to every
//! in-process subscriber; subscribers are keyed by the payload type they
//! asked for, and each one owns its own decode attempt, so a book-detail
//! screen and a borrow list can watch the same stream independently.
//!
//! The channel never reconnects on its own. When the transport fails it
//! tears its own state down and goes back to `Disconnected`; callers decide
//! when to reconnect, driven by an explicit [`ReconnectPolicy`].

mod connection;
mod reconnect;

pub use connection::{ChannelState, LiveChannel};
pub use reconnect::ReconnectPolicy;
