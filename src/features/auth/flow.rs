//! Login and registration handlers. Both validate locally, put the submit
//! control into its busy state for the duration of the request, store the
//! returned token and schedule the redirect home. Whatever happens, the control
//! is re-enabled and failures are surfaced as error notifications.

use crate::{
    errors::AppError,
    features::auth::{
        client,
        types::{AuthResponse, LoginForm, LoginRequest, RegisterForm, RegisterRequest},
        validation::{check_email_field, MIN_PASSWORD_LENGTH, SHORT_PASSWORD},
    },
    session::{
        loading::SubmitControl,
        nav::{Page, Redirect},
        notify::NotificationKind,
        Session,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::info;

pub const AUTH_REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// # Errors
/// `Validation` for missing fields, otherwise the API or storage error. The
/// error has already been shown as a notification.
pub async fn handle_login(
    session: &mut Session,
    control: &mut SubmitControl,
    form: &LoginForm,
) -> Result<Redirect, AppError> {
    let email = form.email.trim();
    let password = form.password.expose_secret();
    if email.is_empty() || password.is_empty() {
        return Err(reject(session, "Email and password are required."));
    }

    control.show_loading();
    let request = LoginRequest { email, password };
    let result = client::login(session.api(), &request).await;
    control.hide_loading();

    finish(session, result, "Login successful!", "Login failed")
}

/// # Errors
/// `Validation` for missing fields or a short password (checked before any
/// network call), otherwise the API or storage error. The error has already
/// been shown as a notification.
pub async fn handle_register(
    session: &mut Session,
    control: &mut SubmitControl,
    form: &RegisterForm,
) -> Result<Redirect, AppError> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = form.email.trim();
    let password = form.password.expose_secret();

    if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
        return Err(reject(session, "All fields are required."));
    }
    if let Err(err) = check_email_field(email) {
        return Err(reject(session, &err.to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(reject(session, SHORT_PASSWORD));
    }

    control.show_loading();
    let request = RegisterRequest {
        first_name,
        last_name,
        email,
        password,
    };
    let result = client::register(session.api(), &request).await;
    control.hide_loading();

    finish(session, result, "Registration successful!", "Registration failed")
}

fn reject(session: &mut Session, message: &str) -> AppError {
    session.notify(message, NotificationKind::Error);
    AppError::Validation(message.to_string())
}

fn finish(
    session: &mut Session,
    result: Result<AuthResponse, AppError>,
    success_message: &str,
    failure_message: &str,
) -> Result<Redirect, AppError> {
    let outcome = result.and_then(|response| match response.data {
        Some(data) if response.success && !data.token.is_empty() => {
            if let Some(user) = &data.user {
                info!("signed in as user {}", user.id);
            }
            session.tokens().set_token(&SecretString::from(data.token))
        }
        _ => Err(AppError::Request {
            status: 200,
            message: response
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| failure_message.to_string()),
        }),
    });

    match outcome {
        Ok(()) => {
            session.notify(success_message, NotificationKind::Success);
            Ok(Redirect::after(Page::Home, AUTH_REDIRECT_DELAY))
        }
        Err(err) => {
            session.notify(err.user_message(failure_message), NotificationKind::Error);
            Err(err)
        }
    }
}
