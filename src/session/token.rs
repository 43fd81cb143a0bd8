//! Session token persistence. The token is written to local storage and the
//! cookie jar together, read from local storage first, and cleared from both
//! on logout. Token values are wrapped in `SecretString` and never logged.

use crate::{
    errors::AppError,
    session::storage::{CookieJar, LocalStorage},
};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::warn;

const TOKEN_KEY: &str = "token";

#[derive(Clone, Debug)]
pub struct TokenStore {
    local: LocalStorage,
    cookies: CookieJar,
}

impl TokenStore {
    #[must_use]
    pub fn open(state_dir: &Path) -> Self {
        Self {
            local: LocalStorage::open(state_dir),
            cookies: CookieJar::open(state_dir),
        }
    }

    /// Returns the stored token, preferring local storage over the cookie.
    /// Unreadable or empty locations are skipped.
    #[must_use]
    pub fn get_token(&self) -> Option<SecretString> {
        let from_local = self.local.get_item(TOKEN_KEY).unwrap_or_else(|err| {
            warn!("failed to read token from local storage: {err}");
            None
        });

        from_local
            .filter(|token| !token.is_empty())
            .or_else(|| {
                self.cookies.get(TOKEN_KEY).unwrap_or_else(|err| {
                    warn!("failed to read token cookie: {err}");
                    None
                })
            })
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// # Errors
    /// Returns `AppError::Storage` if either location cannot be written.
    pub fn set_token(&self, token: &SecretString) -> Result<(), AppError> {
        self.local.set_item(TOKEN_KEY, token.expose_secret())?;
        self.cookies.set(TOKEN_KEY, token.expose_secret())
    }

    /// Clears both locations. Both removals are attempted even if the first fails.
    ///
    /// # Errors
    /// Returns the first `AppError::Storage` encountered.
    pub fn remove_token(&self) -> Result<(), AppError> {
        let local = self.local.remove_item(TOKEN_KEY);
        let cookie = self.cookies.delete(TOKEN_KEY);
        local.and(cookie)
    }
}
