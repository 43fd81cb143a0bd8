//! Session and utility layer shared by the auth and test flows: token storage,
//! authenticated API access, the navigation guard, transient notifications and
//! busy-state toggles for submit controls. Nothing here knows about questions.

pub mod api;
pub mod loading;
pub mod nav;
pub mod notify;
pub mod storage;
pub mod token;

use self::{
    api::ApiClient,
    nav::{check_auth, AuthGate, Page, Redirect},
    notify::{NotificationKind, Notifications},
    token::TokenStore,
};
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct Session {
    api: ApiClient,
    location: Page,
    notifications: Notifications,
}

impl Session {
    #[must_use]
    pub fn new(api: ApiClient, location: Page) -> Self {
        Self {
            api,
            location,
            notifications: Notifications::new(),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        self.api.tokens()
    }

    #[must_use]
    pub const fn location(&self) -> Page {
        self.location
    }

    pub fn navigate(&mut self, page: Page) {
        info!("navigating {} -> {}", self.location, page);
        self.location = page;
    }

    /// Applies the navigation guard to the current page. Returns whether the
    /// page may proceed; when it may not, the session has already moved.
    pub fn check_auth(&mut self) -> bool {
        match check_auth(self.location, self.tokens().has_token()) {
            AuthGate::Proceed => true,
            AuthGate::Redirect(page) => {
                self.navigate(page);
                false
            }
        }
    }

    /// Invalidates the server session on a best-effort basis, then always
    /// clears the local token and returns to the login page.
    pub async fn logout(&mut self) -> Redirect {
        if let Err(err) = self.api.post_empty("/api/logout").await {
            error!("Logout error: {err}");
        }

        if let Err(err) = self.tokens().remove_token() {
            warn!("failed to clear stored token: {err}");
        }

        self.navigate(Page::Login);
        Redirect::now(Page::Login)
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let now = Instant::now();
        self.notifications.expire(now);
        self.notifications.show(message, kind, now)
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::{api::ApiClient, nav::Page, token::TokenStore, Session};
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn session_at(base_url: &str, dir: &std::path::Path, page: Page) -> Result<Session> {
        let api = ApiClient::new(base_url, Duration::from_secs(2), TokenStore::open(dir))?;
        Ok(Session::new(api, page))
    }

    #[test]
    fn check_auth_moves_signed_out_user_to_login() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = session_at("http://127.0.0.1:1", dir.path(), Page::Test)?;

        assert!(!session.check_auth());
        assert_eq!(session.location(), Page::Login);
        assert!(session.check_auth());
        Ok(())
    }

    #[test]
    fn check_auth_moves_signed_in_user_home() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = session_at("http://127.0.0.1:1", dir.path(), Page::Register)?;
        session.tokens().set_token(&SecretString::from("abc"))?;

        assert!(!session.check_auth());
        assert_eq!(session.location(), Page::Home);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_token_even_when_server_fails() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = session_at("http://127.0.0.1:1", dir.path(), Page::Home)?;
        session.tokens().set_token(&SecretString::from("abc"))?;

        let redirect = session.logout().await;
        assert_eq!(redirect.to, Page::Login);
        assert!(!session.tokens().has_token());
        assert_eq!(session.location(), Page::Login);
        Ok(())
    }

    #[tokio::test]
    async fn logout_posts_to_server() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let mut session = session_at(&server.uri(), dir.path(), Page::Home)?;
        session.tokens().set_token(&SecretString::from("abc"))?;
        session.logout().await;
        assert!(!session.tokens().has_token());
        Ok(())
    }
}
