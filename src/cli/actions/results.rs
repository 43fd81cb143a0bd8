use crate::{
    cli::globals::GlobalArgs,
    features::results::fetch_results,
    session::{nav::Page, notify::NotificationKind, Session},
    terminal::{render::render_results, Terminal},
};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::AsyncBufRead;
use tracing::error;

const LOAD_FAILED: &str = "Failed to load results";

/// # Errors
/// Returns an error if results cannot be fetched.
pub async fn execute<R, W>(globals: &GlobalArgs, terminal: &mut Terminal<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = globals.session(Page::Results)?;
    if !session.check_auth() {
        terminal.screen.line("Please sign in first: `quizterm login`.")?;
        return Ok(());
    }
    show(&mut session, terminal).await
}

/// Fetches and prints the results listing for an authenticated session.
///
/// # Errors
/// Returns an error if results cannot be fetched.
pub async fn show<R, W>(session: &mut Session, terminal: &mut Terminal<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match fetch_results(session.api()).await {
        Ok(results) => {
            terminal.screen.line(render_results(&results).trim_end())?;
            Ok(())
        }
        Err(err) => {
            error!("Error loading results: {err}");
            session.notify(err.user_message(LOAD_FAILED), NotificationKind::Error);
            terminal.screen.show_new_notifications(session)?;
            Err(err).context(LOAD_FAILED)
        }
    }
}
