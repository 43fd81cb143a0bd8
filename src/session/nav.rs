use std::{fmt, time::Duration};

/// Screens of the client, addressed by the same paths the web frontend uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Login,
    Register,
    Test,
    Results,
}

impl Page {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Test => "/test",
            Self::Results => "/results",
        }
    }

    /// Login and registration are only for signed-out users.
    #[must_use]
    pub const fn is_auth_page(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}

/// Navigation scheduled after a short pause so the user can read a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: Page,
    pub after: Duration,
}

impl Redirect {
    #[must_use]
    pub const fn now(to: Page) -> Self {
        Self {
            to,
            after: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn after(to: Page, after: Duration) -> Self {
        Self { to, after }
    }
}

/// Outcome of the navigation guard for a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthGate {
    Proceed,
    Redirect(Page),
}

/// Signed-out users are sent to login from protected pages, signed-in users
/// are sent home from login/registration. UX-only; the API enforces access.
#[must_use]
pub const fn check_auth(page: Page, has_token: bool) -> AuthGate {
    if !has_token && !page.is_auth_page() {
        return AuthGate::Redirect(Page::Login);
    }
    if has_token && page.is_auth_page() {
        return AuthGate::Redirect(Page::Home);
    }
    AuthGate::Proceed
}
