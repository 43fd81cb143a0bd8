//! Plain-text rendering of views. Functions here only build strings; the
//! interactive loop decides where they go.

use crate::{
    features::{
        results::types::ResultSummary,
        test::{
            controller::{NavMarker, TestView},
            format::format_time,
            widgets::{InputKind, WidgetView},
        },
    },
    session::notify::Notification,
};
use std::fmt::Write as _;

const BAR_WIDTH: usize = 30;

#[must_use]
pub fn render_test(view: &TestView) -> String {
    let mut out = String::new();
    let filled = usize::from(view.progress_percent) * BAR_WIDTH / 100;
    let _ = writeln!(
        out,
        "[{}{}] {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        view.progress_text
    );
    let _ = writeln!(out, "{}", render_nav(&view.nav));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", view.category);
    let _ = writeln!(out, "{}", view.question_text);

    if let Some(display) = &view.display {
        let _ = writeln!(out);
        let _ = writeln!(out, "    {display}");
    }
    let _ = writeln!(out);

    match &view.widget {
        WidgetView::Choice(options) => {
            for option in options {
                let marker = if option.selected { '*' } else { ' ' };
                let _ = writeln!(out, " {marker} {}", option.label);
            }
        }
        WidgetView::Input {
            kind,
            value,
            placeholder,
            ..
        } => {
            let label = match kind {
                InputKind::Text => "Answer",
                InputKind::Number => "Number",
            };
            if value.is_empty() {
                let _ = writeln!(out, "{label}: ({placeholder})");
            } else {
                let _ = writeln!(out, "{label}: {value}");
            }
        }
        WidgetView::KeySequence { value } => {
            let _ = writeln!(out, "Press the keys in order (type key names).");
            let _ = writeln!(out, "Keys: {value}");
        }
        WidgetView::Unsupported => {
            let _ = writeln!(out, "This question type is not supported.");
        }
    }

    let _ = writeln!(out);
    let mut controls = Vec::new();
    if view.previous_enabled {
        controls.push("/prev".to_string());
    }
    if view.next_visible {
        controls.push("/next".to_string());
    }
    if view.submit_visible {
        if view.submit_enabled {
            controls.push(format!("/submit ({})", view.submit_caption));
        } else {
            controls.push(view.submit_caption.clone());
        }
    }
    controls.push("/help".to_string());
    let _ = writeln!(out, "{}", controls.join("  "));

    if view.confirm_open {
        let _ = writeln!(
            out,
            "Submit your answers? You will not be able to change them. (/yes or /no)"
        );
    }
    out
}

/// `[1] (2)  3 ` style picker: current in brackets, answered in parentheses.
#[must_use]
pub fn render_nav(markers: &[NavMarker]) -> String {
    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let number = index + 1;
            match marker {
                NavMarker::Current => format!("[{number}]"),
                NavMarker::Answered => format!("({number})"),
                NavMarker::Unanswered => format!(" {number} "),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn render_status(view: &TestView) -> String {
    if view.countdown.is_empty() {
        format!("Elapsed {}", view.elapsed)
    } else {
        format!("Elapsed {} | {}", view.elapsed, view.countdown)
    }
}

#[must_use]
pub fn render_notification(notification: &Notification) -> String {
    format!(
        "[{}] #{} {}",
        notification.kind.label(),
        notification.id,
        notification.message
    )
}

#[must_use]
pub fn render_results(results: &[ResultSummary]) -> String {
    if results.is_empty() {
        return "No results yet.\n".to_string();
    }

    let mut out = String::new();
    for result in results {
        let _ = writeln!(
            out,
            "{:<32} {:>3}/{:<3} {:>3}%  {}  {}",
            result.test_name(),
            result.score,
            result.total_questions,
            result.percent(),
            format_time(result.time_taken),
            result.completed_at.as_deref().unwrap_or("-")
        );
    }
    out
}
