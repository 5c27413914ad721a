//! Stacks client core.
//!
//! This crate is the state-bearing layer under the UI: the credential store
//! that gates every call, the disk cache that serves stale-but-fast data,
//! the paginated book fetcher, the per-entity API operations, the realtime
//! update channel, and the startup session warm-up.

pub mod cache;
pub mod config;
pub mod credentials;
pub mod http;
pub mod ops;
pub mod pager;
pub mod prefs;
pub mod session;
pub mod ws;

pub use cache::DiskCache;
pub use config::ApiConfig;
pub use credentials::{CredentialStore, MemoryBackend};
pub use http::HttpClient;
pub use ops::Api;
pub use pager::{BookPager, BookPageSource, FetchOptions};
pub use prefs::Preferences;
pub use session::{SessionOrchestrator, SessionProvider, StartupOutcome};
pub use ws::{ChannelState, LiveChannel, ReconnectPolicy};
