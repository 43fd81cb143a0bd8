//! # quizterm
//!
//! Terminal client for timed cognitive assessments served over a JSON API.
//!
//! The crate is split in three layers:
//!
//! - [`session`]: token storage, authenticated requests, the navigation
//!   guard, notifications and submit-control busy states.
//! - [`features`]: the login/registration flow, the test-taking state machine
//!   and the results listing, built only on the session layer.
//! - [`terminal`] and [`cli`]: the interactive front end and the command line
//!   that wires everything to stdin/stdout.
//!
//! The session token lives in two places under the state directory, a
//! `local_storage.json` entry and a `cookies.txt` cookie, and is read back in
//! that order. It is sent as `Authorization: Bearer <token>` and never logged.

pub mod cli;
pub mod errors;
pub mod features;
pub mod session;
pub mod terminal;

pub const GIT_COMMIT_HASH: &str = env!("QUIZTERM_GIT_SHA");
