//! Line-oriented input. Lines starting with `/` are commands; anything else is
//! an answer for the current question.

use crate::features::test::{types::QuestionType, widgets::option_index};

pub const HELP: &str = "\
Commands:
  /next, /n          next question
  /prev, /p          previous question
  /go N              jump to question N
  /submit            submit the test (last question only)
  /clear             empty a text or number answer
  /yes, /no          confirm or cancel a pending prompt
  /dismiss N         close notification N
  /quit, /q          leave the test
Answers:
  multiple choice    type the option letter, e.g. b
  text or number     type the answer and press enter
  key sequence       type key names separated by spaces, e.g. ArrowUp x ArrowLeft";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Zero-based target index.
    GoTo(usize),
    Submit,
    /// Empties the current typed answer.
    Clear,
    Confirm,
    Cancel,
    Dismiss(u64),
    Quit,
    Help,
    Answer(String),
    Empty,
    Unknown(String),
}

#[must_use]
pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim().strip_prefix('/') else {
        return if line.trim().is_empty() {
            Command::Empty
        } else {
            Command::Answer(line.to_string())
        };
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let argument = parts.next();

    match (name.as_str(), argument) {
        ("next" | "n", None) => Command::Next,
        ("prev" | "previous" | "p", None) => Command::Previous,
        ("go" | "goto" | "g", Some(number)) => number
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .map_or_else(|| Command::Unknown(line.to_string()), Command::GoTo),
        ("submit", None) => Command::Submit,
        ("clear", None) => Command::Clear,
        ("yes" | "y" | "confirm", None) => Command::Confirm,
        ("no" | "cancel", None) => Command::Cancel,
        ("dismiss" | "d", Some(id)) => id
            .parse()
            .map_or_else(|_| Command::Unknown(line.to_string()), Command::Dismiss),
        ("quit" | "q" | "exit", None) => Command::Quit,
        ("help" | "h" | "?", None) => Command::Help,
        _ => Command::Unknown(line.to_string()),
    }
}

/// What an answer line means for the current question type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInput {
    Choice(usize),
    Text(String),
    Keys(Vec<String>),
    Invalid(&'static str),
}

#[must_use]
pub fn interpret_answer(question_type: QuestionType, raw: &str) -> AnswerInput {
    match question_type {
        QuestionType::MultipleChoice => {
            let trimmed = raw.trim();
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => option_index(letter)
                    .map_or(AnswerInput::Invalid("Type the letter of an option"), AnswerInput::Choice),
                _ => AnswerInput::Invalid("Type the letter of an option"),
            }
        }
        QuestionType::TextInput | QuestionType::NumberInput => AnswerInput::Text(raw.to_string()),
        QuestionType::KeySequence => AnswerInput::Keys(split_keys(raw)),
        QuestionType::Unsupported => AnswerInput::Invalid("This question type cannot be answered here"),
    }
}

/// Splits a typed key line into key names. Raw arrow escape sequences, as a
/// terminal in line mode echoes them, become arrow key names.
#[must_use]
pub fn split_keys(raw: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for token in raw.split_whitespace() {
        let mut rest = token;
        while !rest.is_empty() {
            if let Some((key, tail)) = arrow_escape(rest) {
                keys.push(key.to_string());
                rest = tail;
                continue;
            }
            match rest.find('\u{1b}') {
                Some(0) => rest = &rest[1..],
                Some(next) => {
                    keys.push(rest[..next].to_string());
                    rest = &rest[next..];
                }
                None => {
                    keys.push(rest.to_string());
                    rest = "";
                }
            }
        }
    }
    keys
}

fn arrow_escape(input: &str) -> Option<(&'static str, &str)> {
    let tail = input.strip_prefix("\u{1b}[").or_else(|| input.strip_prefix("\u{1b}O"))?;
    let key = match tail.chars().next()? {
        'A' => "ArrowUp",
        'B' => "ArrowDown",
        'C' => "ArrowRight",
        'D' => "ArrowLeft",
        _ => return None,
    };
    Some((key, &tail[1..]))
}
