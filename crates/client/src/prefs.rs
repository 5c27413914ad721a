//! App-preferences storage.
//!
//! Keyed JSON files in the platform config directory:
//! - Linux: `~/.config/stacks/`
//! - macOS: `~/Library/Application Support/stacks/`
//! - Windows: `%APPDATA%\stacks\`
//!
//! Holds the current-user snapshot and the one-shot OTP-verified flag.
//! Unlike the credential store this is not secure storage; nothing secret
//! goes here.

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use stacks_shared::User;

const KEY_CURRENT_USER: &str = "current_user";
const KEY_OTP_VERIFIED: &str = "otp_verified";

#[derive(Debug, Clone)]
pub struct Preferences {
    dir: PathBuf,
}

impl Preferences {
    /// Preferences under the platform config directory.
    pub fn open() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stacks");
        Self { dir }
    }

    /// Preferences rooted at an explicit directory. Used by tests.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        // Sanitize key to be a valid filename.
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(format!("{safe_key}.json"))
    }

    /// Save a value. Returns `true` if the operation succeeded.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let Ok(json) = serde_json::to_string(value) else {
            return false;
        };
        if std::fs::create_dir_all(&self.dir).is_err() {
            return false;
        }
        std::fs::write(self.path(key), json).is_ok()
    }

    /// Load a value. Returns `None` if the key doesn't exist or
    /// deserialization fails.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = std::fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Remove a value. Missing keys are fine.
    pub fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path(key));
    }

    // --- Typed conveniences ---

    pub fn save_current_user(&self, user: &User) -> bool {
        self.save(KEY_CURRENT_USER, user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.load(KEY_CURRENT_USER)
    }

    pub fn clear_current_user(&self) {
        self.remove(KEY_CURRENT_USER);
    }

    pub fn set_otp_verified(&self, verified: bool) -> bool {
        self.save(KEY_OTP_VERIFIED, &verified)
    }

    pub fn otp_verified(&self) -> bool {
        self.load(KEY_OTP_VERIFIED).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_shared::UserRole;
    use tempfile::TempDir;

    fn sample_user() -> User {
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

    #[test]
    fn user_snapshot_round_trips() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::at(dir.path().to_path_buf());
        assert!(prefs.current_user().is_none());
        assert!(prefs.save_current_user(&sample_user()));
        assert_eq!(prefs.current_user(), Some(sample_user()));
        prefs.clear_current_user();
        assert!(prefs.current_user().is_none());
    }

    #[test]
    fn otp_flag_defaults_to_false() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::at(dir.path().to_path_buf());
        assert!(!prefs.otp_verified());
        prefs.set_otp_verified(true);
        assert!(prefs.otp_verified());
    }

    #[test]
    fn keys_are_sanitized_into_filenames() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::at(dir.path().to_path_buf());
        assert!(prefs.save("weird/key:name", &42u32));
        assert_eq!(prefs.load::<u32>("weird/key:name"), Some(42));
    }
}
