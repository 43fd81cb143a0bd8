use crate::{
    cli::commands::{ARG_API_URL, ARG_STATE_DIR, ARG_TIMEOUT},
    errors::AppError,
    session::{api::ApiClient, nav::Page, token::TokenStore, Session},
};
use std::{path::PathBuf, time::Duration};
use url::Url;

const STATE_DIR_NAME: &str = ".quizterm";

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    /// # Errors
    /// `Config` when the API URL is not http(s) or no state directory can be
    /// determined.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self, AppError> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .map_or("http://localhost:8080", String::as_str);
        let parsed = Url::parse(api_url)
            .map_err(|err| AppError::Config(format!("invalid API URL {api_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "API URL must use http or https, got {}",
                parsed.scheme()
            )));
        }

        let state_dir = match matches.get_one::<String>(ARG_STATE_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir()?,
        };

        let timeout = Duration::from_secs(matches.get_one::<u64>(ARG_TIMEOUT).copied().unwrap_or(10));

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            state_dir,
            timeout,
        })
    }

    /// Builds a session sitting on `page`, backed by the stored token.
    ///
    /// # Errors
    /// `Config` when the HTTP client cannot be built.
    pub fn session(&self, page: Page) -> Result<Session, AppError> {
        let tokens = TokenStore::open(&self.state_dir);
        let api = ApiClient::new(&self.api_url, self.timeout, tokens)?;
        Ok(Session::new(api, page))
    }
}

fn default_state_dir() -> Result<PathBuf, AppError> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(STATE_DIR_NAME))
        .ok_or_else(|| AppError::Config("HOME is not set, pass --state-dir".to_string()))
}
