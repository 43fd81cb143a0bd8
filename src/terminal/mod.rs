//! Terminal front end: line input, text rendering, the tokio timer scheduler
//! and the interactive test loop.

pub mod app;
pub mod input;
pub mod render;
pub mod scheduler;

use crate::{
    errors::AppError,
    features::test::{controller::TestSession, timers::Scheduler},
    session::Session,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

pub use app::run_test;

/// Output side of the terminal. Keeps track of which notifications were
/// already printed so each one shows up once as it arrives.
#[derive(Debug)]
pub struct Screen<W> {
    out: W,
    last_notification: u64,
    status_open: bool,
}

impl<W: Write> Screen<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            last_notification: 0,
            status_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// # Errors
    /// `Storage` when the output cannot be written.
    pub fn line(&mut self, text: &str) -> Result<(), AppError> {
        self.close_status()?;
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Rewrites the status line in place.
    ///
    /// # Errors
    /// `Storage` when the output cannot be written.
    pub fn status(&mut self, text: &str) -> Result<(), AppError> {
        write!(self.out, "\r\x1b[2K{text}")?;
        self.out.flush()?;
        self.status_open = true;
        Ok(())
    }

    /// Prints notifications created since the last call.
    ///
    /// # Errors
    /// `Storage` when the output cannot be written.
    pub fn show_new_notifications(&mut self, session: &mut Session) -> Result<(), AppError> {
        let seen = self.last_notification;
        let fresh: Vec<_> = session
            .notifications_mut()
            .active()
            .iter()
            .filter(|notification| notification.id > seen)
            .cloned()
            .collect();
        for notification in fresh {
            self.last_notification = self.last_notification.max(notification.id);
            self.line(&render::render_notification(&notification))?;
        }
        Ok(())
    }

    /// Full redraw: active notifications, the current question and the
    /// status line.
    ///
    /// # Errors
    /// `Storage` when the output cannot be written.
    pub fn redraw<S: Scheduler>(
        &mut self,
        session: &mut Session,
        controller: &TestSession<S>,
    ) -> Result<(), AppError> {
        let Some(view) = controller.view() else {
            return self.show_new_notifications(session);
        };

        self.line("")?;
        let active = session.notifications_mut().active().to_vec();
        for notification in active {
            self.last_notification = self.last_notification.max(notification.id);
            self.line(&render::render_notification(&notification))?;
        }
        write!(self.out, "{}", render::render_test(&view))?;
        self.status(&render::render_status(&view))
    }

    fn close_status(&mut self) -> Result<(), AppError> {
        if self.status_open {
            writeln!(self.out)?;
            self.status_open = false;
        }
        Ok(())
    }
}

/// Line input plus screen output.
#[derive(Debug)]
pub struct Terminal<R, W> {
    pub input: Lines<R>,
    pub screen: Screen<W>,
}

impl Terminal<BufReader<Stdin>, std::io::Stdout> {
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R: AsyncBufRead + Unpin, W: Write> Terminal<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input: input.lines(),
            screen: Screen::new(out),
        }
    }

    /// Prints `label` and reads one line.
    ///
    /// # Errors
    /// `Validation` when input is closed, `Storage` on I/O failure.
    pub async fn prompt(&mut self, label: &str) -> Result<String, AppError> {
        self.screen.close_status()?;
        write!(self.screen.out, "{label}")?;
        self.screen.out.flush()?;
        match self.input.next_line().await? {
            Some(line) => Ok(line.trim_end_matches('\r').to_string()),
            None => Err(AppError::Validation("Input closed".to_string())),
        }
    }
}
