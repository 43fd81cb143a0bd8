use crate::{
    cli::globals::GlobalArgs,
    errors::AppError,
    features::auth::{
        handle_login, handle_register,
        types::{LoginForm, RegisterForm},
        validation::{check_email_field, check_password_field},
    },
    session::{
        loading::SubmitControl,
        nav::{Page, Redirect},
        Session,
    },
    terminal::Terminal,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::io::Write;
use tokio::io::AsyncBufRead;

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug)]
pub struct RegisterArgs {
    pub globals: GlobalArgs,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

/// # Errors
/// Returns an error if input closes early or the server rejects the login.
pub async fn login<R, W>(args: LoginArgs, terminal: &mut Terminal<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = args.globals.session(Page::Login)?;
    if !session.check_auth() {
        terminal.screen.line("Already signed in. Use `quizterm logout` first.")?;
        return Ok(());
    }

    let email = match args.email {
        Some(email) => email,
        None => prompt_checked(terminal, "Email: ", check_email_field).await?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_password(terminal, "Password: ", |_| Ok(())).await?,
    };

    let mut control = SubmitControl::new("Sign in");
    let result = handle_login(&mut session, &mut control, &LoginForm { email, password }).await;
    finish(&mut session, terminal, result).await.context("login failed")
}

/// # Errors
/// Returns an error if input closes early or the server rejects the
/// registration.
pub async fn register<R, W>(args: RegisterArgs, terminal: &mut Terminal<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = args.globals.session(Page::Register)?;
    if !session.check_auth() {
        terminal.screen.line("Already signed in. Use `quizterm logout` first.")?;
        return Ok(());
    }

    let first_name = match args.first_name {
        Some(value) => value,
        None => prompt_checked(terminal, "First name: ", |_| Ok(())).await?,
    };
    let last_name = match args.last_name {
        Some(value) => value,
        None => prompt_checked(terminal, "Last name: ", |_| Ok(())).await?,
    };
    let email = match args.email {
        Some(value) => value,
        None => prompt_checked(terminal, "Email: ", check_email_field).await?,
    };
    let password = match args.password {
        Some(value) => value,
        None => {
            prompt_password(terminal, "Password (min 6 characters): ", check_password_field).await?
        }
    };

    let form = RegisterForm {
        first_name,
        last_name,
        email,
        password,
    };
    let mut control = SubmitControl::new("Create account");
    let result = handle_register(&mut session, &mut control, &form).await;
    finish(&mut session, terminal, result).await.context("registration failed")
}

/// # Errors
/// Returns an error only if the output cannot be written.
pub async fn logout<R, W>(globals: &GlobalArgs, terminal: &mut Terminal<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = globals.session(Page::Home)?;
    session.logout().await;
    terminal.screen.line("Signed out.")?;
    Ok(())
}

/// Prompts until `check` accepts the trimmed value. A rejected value prints
/// the check's message and asks again.
async fn prompt_checked<R, W, F>(
    terminal: &mut Terminal<R, W>,
    label: &str,
    check: F,
) -> Result<String, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let value = terminal.prompt(label).await?;
        let value = value.trim();
        match check(value) {
            Ok(()) => return Ok(value.to_string()),
            Err(err) => terminal.screen.line(&format!("  {err}"))?,
        }
    }
}

/// Like `prompt_checked`, but the value is kept as typed: spaces are part of
/// a password.
async fn prompt_password<R, W, F>(
    terminal: &mut Terminal<R, W>,
    label: &str,
    check: F,
) -> Result<SecretString, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let value = terminal.prompt(label).await?;
        match check(&value) {
            Ok(()) => return Ok(SecretString::from(value)),
            Err(err) => terminal.screen.line(&format!("  {err}"))?,
        }
    }
}

async fn finish<R, W>(
    session: &mut Session,
    terminal: &mut Terminal<R, W>,
    result: Result<Redirect, AppError>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    terminal.screen.show_new_notifications(session)?;
    let redirect = result?;
    tokio::time::sleep(redirect.after).await;
    session.navigate(redirect.to);
    Ok(())
}
