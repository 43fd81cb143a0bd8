//! Auth feature: login and registration forms on top of the session layer.
//! This module handles passwords and tokens and must never log either.

pub mod client;
pub mod flow;
pub mod types;
pub mod validation;

pub use flow::{handle_login, handle_register};
