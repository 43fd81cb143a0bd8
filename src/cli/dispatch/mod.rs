//! Maps validated CLI matches to an action.

use crate::cli::{
    actions::{auth, test, Action},
    commands::{ARG_EMAIL, ARG_FIRST_NAME, ARG_LAST_NAME, ARG_PASSWORD, ARG_TEST_ID},
    globals::GlobalArgs,
};
use anyhow::{bail, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if the global settings are invalid or no subcommand was given.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let Some((name, sub)) = matches.subcommand() else {
        bail!("missing subcommand, see --help");
    };
    let globals = GlobalArgs::parse(sub)?;

    let string = |id: &str| sub.get_one::<String>(id).cloned();
    let secret = |id: &str| sub.get_one::<String>(id).cloned().map(SecretString::from);

    let action = match name {
        "login" => Action::Login(auth::LoginArgs {
            globals,
            email: string(ARG_EMAIL),
            password: secret(ARG_PASSWORD),
        }),
        "register" => Action::Register(auth::RegisterArgs {
            globals,
            first_name: string(ARG_FIRST_NAME),
            last_name: string(ARG_LAST_NAME),
            email: string(ARG_EMAIL),
            password: secret(ARG_PASSWORD),
        }),
        "logout" => Action::Logout(globals),
        "test" => Action::Test(test::Args {
            globals,
            test_id: sub.get_one::<u64>(ARG_TEST_ID).copied().unwrap_or(1),
        }),
        "results" => Action::Results(globals),
        other => bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}
