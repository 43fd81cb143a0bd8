pub mod auth;
pub mod results;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(auth::LoginArgs),
    Register(auth::RegisterArgs),
    Logout(GlobalArgs),
    Test(test::Args),
    Results(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
