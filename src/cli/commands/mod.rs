pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_TEST_ID: &str = "test-id";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email, prompted when missing")
        .env("QUIZTERM_EMAIL")
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long("password")
        .help("Account password, prompted when missing")
        .env("QUIZTERM_PASSWORD")
        .hide_env_values(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("quizterm")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .short('u')
                .long("api-url")
                .help("Base URL of the assessment API")
                .default_value("http://localhost:8080")
                .env("QUIZTERM_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long("state-dir")
                .help("Directory holding the stored session token [default: $HOME/.quizterm]")
                .env("QUIZTERM_STATE_DIR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("HTTP request timeout in seconds")
                .default_value("10")
                .env("QUIZTERM_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session token")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and sign in")
                .arg(
                    Arg::new(ARG_FIRST_NAME)
                        .long("first-name")
                        .help("First name, prompted when missing"),
                )
                .arg(
                    Arg::new(ARG_LAST_NAME)
                        .long("last-name")
                        .help("Last name, prompted when missing"),
                )
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(Command::new("logout").about("Sign out and forget the stored token"))
        .subcommand(
            Command::new("test").about("Take a timed test").arg(
                Arg::new(ARG_TEST_ID)
                    .long("test-id")
                    .help("Test to take")
                    .default_value("1")
                    .env("QUIZTERM_TEST_ID")
                    .value_parser(clap::value_parser!(u64)),
            ),
        )
        .subcommand(Command::new("results").about("List past results"));

    logging::with_args(command)
}
