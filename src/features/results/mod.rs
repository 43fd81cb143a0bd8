//! Past attempts for the signed-in user.

pub mod client;
pub mod types;

pub use client::fetch_results;
