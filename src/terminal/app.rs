//! Interactive test loop. One `select!` drives stdin lines, fired timers and
//! Ctrl-C; all state lives in the controller.

use crate::{
    errors::AppError,
    features::test::{
        controller::{LeaveCheck, TestSession, TimerEffect},
        load_test, submit_test,
        timers::Scheduler,
        types::QuestionType,
    },
    session::{
        nav::{Page, Redirect},
        notify::NotificationKind,
        Session,
    },
    terminal::{
        input::{interpret_answer, parse_line, AnswerInput, Command, HELP},
        scheduler::TokioScheduler,
        Screen, Terminal,
    },
};
use std::{io::Write, time::Instant};
use tokio::io::AsyncBufRead;
use tracing::{debug, error};

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

enum Flow {
    Continue,
    Leave,
    Finished(Redirect),
}

/// Runs one test from load to submission. Returns the page the session ended
/// on: `Results` after a successful submission, `Login` when signed out,
/// `Home` when the user left.
///
/// # Errors
/// Only output failures end the loop early; everything else is shown as a
/// notification.
pub async fn run_test<R, W>(
    session: &mut Session,
    terminal: &mut Terminal<R, W>,
    test_id: u64,
) -> Result<Page, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.navigate(Page::Test);
    if !session.check_auth() {
        terminal.screen.line("Please sign in first.")?;
        return Ok(session.location());
    }

    let (scheduler, mut fired) = TokioScheduler::new();
    let mut controller = TestSession::new(scheduler, test_id);
    if load_test(session, &mut controller, test_id).await.is_err() {
        terminal.screen.show_new_notifications(session)?;
        return Ok(session.location());
    }
    terminal.screen.redraw(session, &controller)?;

    let Terminal { input, screen } = terminal;
    let mut leaving = false;

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    debug!("input closed, leaving test");
                    break;
                };
                match handle_line(session, &mut controller, screen, &mut leaving, &line).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Leave) => break,
                    Ok(Flow::Finished(redirect)) => {
                        screen.show_new_notifications(session)?;
                        tokio::time::sleep(redirect.after).await;
                        session.navigate(redirect.to);
                        return Ok(redirect.to);
                    }
                    Err(err) => {
                        error!("unexpected error: {err}");
                        session.notify(UNEXPECTED_ERROR, NotificationKind::Error);
                        screen.show_new_notifications(session)?;
                    }
                }
            }
            Some(id) = fired.recv() => {
                let effect = controller.on_timer(id, Instant::now());
                let expired = expire_notifications(session);
                match effect {
                    TimerEffect::Ignored if !expired => {}
                    TimerEffect::Readout if !expired => {
                        if let Some(view) = controller.view() {
                            screen.status(&crate::terminal::render::render_status(&view))?;
                        }
                    }
                    _ => screen.redraw(session, &controller)?,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if leaving {
                    break;
                }
                match controller.request_leave() {
                    LeaveCheck::Allowed => break,
                    LeaveCheck::Confirm(warning) => {
                        screen.line(&format!("{warning} (/yes or /no)"))?;
                        leaving = true;
                    }
                }
            }
        }
    }

    controller.teardown();
    session.navigate(Page::Home);
    Ok(Page::Home)
}

fn expire_notifications(session: &mut Session) -> bool {
    let notifications = session.notifications_mut();
    let before = notifications.active().len();
    notifications.expire(Instant::now());
    notifications.active().len() != before
}

async fn handle_line<S: Scheduler, W: Write>(
    session: &mut Session,
    controller: &mut TestSession<S>,
    screen: &mut Screen<W>,
    leaving: &mut bool,
    line: &str,
) -> Result<Flow, AppError> {
    let command = parse_line(line);

    if *leaving {
        *leaving = false;
        return match command {
            Command::Confirm => Ok(Flow::Leave),
            Command::Answer(answer) if matches!(answer.trim(), "y" | "yes") => Ok(Flow::Leave),
            _ => {
                screen.line("Staying on the test.")?;
                Ok(Flow::Continue)
            }
        };
    }

    let now = Instant::now();
    match command {
        Command::Empty => {}
        Command::Help => screen.line(HELP)?,
        Command::Next => {
            if controller.next(now) {
                screen.redraw(session, controller)?;
            } else {
                screen.line("Already on the last question.")?;
            }
        }
        Command::Previous => {
            if controller.previous(now) {
                screen.redraw(session, controller)?;
            } else {
                screen.line("Already on the first question.")?;
            }
        }
        Command::GoTo(index) => {
            if controller.go_to(index, now) {
                screen.redraw(session, controller)?;
            } else {
                screen.line(&format!("There is no question {}.", index + 1))?;
            }
        }
        Command::Submit => {
            if let Err(err) = controller.request_submit() {
                notify_rejection(session, &err)?;
            }
            screen.redraw(session, controller)?;
        }
        Command::Confirm => {
            if !controller.view().is_some_and(|view| view.confirm_open) {
                screen.line("Nothing to confirm.")?;
                return Ok(Flow::Continue);
            }
            screen.line("Submitting...")?;
            match submit_test(session, controller).await {
                Ok(redirect) => return Ok(Flow::Finished(redirect)),
                Err(_) => screen.redraw(session, controller)?,
            }
        }
        Command::Clear => {
            if let Err(err) = clear(controller) {
                notify_rejection(session, &err)?;
            }
            screen.redraw(session, controller)?;
        }
        Command::Cancel => {
            controller.cancel_submit();
            screen.redraw(session, controller)?;
        }
        Command::Dismiss(id) => {
            if session.notifications_mut().dismiss(id) {
                screen.redraw(session, controller)?;
            }
        }
        Command::Quit => match controller.request_leave() {
            LeaveCheck::Allowed => return Ok(Flow::Leave),
            LeaveCheck::Confirm(warning) => {
                screen.line(&format!("{warning} (/yes or /no)"))?;
                *leaving = true;
            }
        },
        Command::Unknown(raw) => screen.line(&format!("Unknown command {raw}, type /help"))?,
        Command::Answer(raw) => {
            if let Err(err) = answer(controller, &raw) {
                notify_rejection(session, &err)?;
            }
            screen.redraw(session, controller)?;
        }
    }
    Ok(Flow::Continue)
}

fn answer<S: Scheduler>(controller: &mut TestSession<S>, raw: &str) -> Result<(), AppError> {
    let Some(question_type) = controller.current_question().map(|question| question.question_type)
    else {
        return Ok(());
    };

    match interpret_answer(question_type, raw) {
        AnswerInput::Choice(index) => controller.select_option(index).map(|_| ()),
        AnswerInput::Text(text) => controller.input_text(&text).map(|_| ()),
        AnswerInput::Keys(keys) => {
            for key in keys {
                controller.key_down(&key)?;
            }
            Ok(())
        }
        AnswerInput::Invalid(message) => Err(AppError::Validation(message.to_string())),
    }
}

fn clear<S: Scheduler>(controller: &mut TestSession<S>) -> Result<(), AppError> {
    match controller.current_question().map(|question| question.question_type) {
        Some(QuestionType::TextInput | QuestionType::NumberInput) => {
            controller.input_text("").map(|_| ())
        }
        Some(_) => Err(AppError::Validation(
            "Only typed answers can be cleared".to_string(),
        )),
        None => Ok(()),
    }
}

/// Input mistakes become error notifications; anything else bubbles up.
fn notify_rejection(session: &mut Session, err: &AppError) -> Result<(), AppError> {
    match err {
        AppError::Validation(message) => {
            session.notify(message.clone(), NotificationKind::Error);
            Ok(())
        }
        other => Err(other.clone()),
    }
}
