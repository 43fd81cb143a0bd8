use crate::{
    cli::actions::{auth, results, test, Action},
    terminal::Terminal,
};
use anyhow::Result;

/// Execute the provided action against the process stdin/stdout.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let mut terminal = Terminal::stdio();
    match action {
        Action::Login(args) => auth::login(args, &mut terminal).await,
        Action::Register(args) => auth::register(args, &mut terminal).await,
        Action::Logout(globals) => auth::logout(&globals, &mut terminal).await,
        Action::Test(args) => test::execute(args, &mut terminal).await,
        Action::Results(globals) => results::execute(&globals, &mut terminal).await,
    }
}
