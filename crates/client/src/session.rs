//! Startup session warm-up.
//!
//! One pass at process start: if a token is stored, fetch the current user,
//! persist the snapshot, resolve their library, and mark the session logged
//! in. Any failure along the way degrades to a non-fatal prefetch error; the
//! app still leaves the splash screen. The splash gate holds for
//! `max(network time, minimum display duration)`, never their sum.

use std::time::Duration;

use async_trait::async_trait;
use stacks_shared::{ApiError, Library, User};

use crate::cache::DiskCache;
use crate::credentials::CredentialStore;
use crate::prefs::Preferences;

const DEFAULT_MIN_SPLASH: Duration = Duration::from_millis(1500);
const USER_CACHE_TTL: Duration = Duration::from_secs(3600);
const LIBRARY_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Profile lookups the warm-up needs. The app wires this to its identity
/// layer plus [`crate::Api::list_libraries`]; tests inject fakes.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The user behind the stored session token.
    async fn current_user(&self) -> Result<User, ApiError>;
    /// Resolve a library by id. `Ok(None)` means the id is unknown.
    async fn find_library(&self, library_id: &str) -> Result<Option<Library>, ApiError>;
}

/// What the startup pass concluded.
#[derive(Debug, Clone, Default)]
pub struct StartupOutcome {
    /// True only when user and library both resolved.
    pub logged_in: bool,
    pub user: Option<User>,
    pub library: Option<Library>,
    /// Non-fatal: navigation proceeds, a banner may show this.
    pub prefetch_error: Option<String>,
}

pub struct SessionOrchestrator<P> {
    provider: P,
    creds: CredentialStore,
    prefs: Preferences,
    user_cache: DiskCache<User>,
    library_cache: DiskCache<Library>,
    min_splash: Duration,
}

impl<P: SessionProvider> SessionOrchestrator<P> {
    pub fn new(provider: P, creds: CredentialStore, prefs: Preferences) -> Self {
        Self {
            provider,
            creds,
            prefs,
            user_cache: DiskCache::new("current_user", USER_CACHE_TTL),
            library_cache: DiskCache::new("current_library", LIBRARY_CACHE_TTL),
            min_splash: DEFAULT_MIN_SPLASH,
        }
    }

    pub fn with_min_splash(mut self, min_splash: Duration) -> Self {
        self.min_splash = min_splash;
        self
    }

    /// Swap the cache slots. Tests point these at a tempdir.
    pub fn with_caches(
        mut self,
        user_cache: DiskCache<User>,
        library_cache: DiskCache<Library>,
    ) -> Self {
        self.user_cache = user_cache;
        self.library_cache = library_cache;
        self
    }

    /// Run the startup pass, holding the splash gate for at least the
    /// minimum display duration. The warm-up and the timer run concurrently.
    pub async fn start(&self) -> StartupOutcome {
        let (outcome, ()) = tokio::join!(self.warm_up(), tokio::time::sleep(self.min_splash));
        outcome
    }

    async fn warm_up(&self) -> StartupOutcome {
        match self.creds.token() {
            Ok(Some(token)) if !token.is_empty() => {}
            _ => {
                tracing::info!("no stored session, starting signed out");
                return StartupOutcome::default();
            }
        }

        let user = match self.provider.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "session warm-up could not fetch current user");
                return StartupOutcome {
                    prefetch_error: Some(e.to_string()),
                    ..StartupOutcome::default()
                };
            }
        };
        self.prefs.save_current_user(&user);
        self.user_cache.put(&user);

        let library = match self.provider.find_library(&user.library_id).await {
            Ok(Some(library)) => library,
            Ok(None) => {
                tracing::warn!(library_id = %user.library_id, "user's library not found");
                return StartupOutcome {
                    user: Some(user),
                    prefetch_error: Some("library not found".to_string()),
                    ..StartupOutcome::default()
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "session warm-up could not fetch library");
                return StartupOutcome {
                    user: Some(user),
                    prefetch_error: Some(e.to_string()),
                    ..StartupOutcome::default()
                };
            }
        };
        self.library_cache.put(&library);

        tracing::info!(user_id = %user.id, library_id = %library.id, "session warmed up");
        StartupOutcome {
            logged_in: true,
            user: Some(user),
            library: Some(library),
            prefetch_error: None,
        }
    }
}
