//! Login and logout.

use dialoguer::Input;
use secrecy::SecretString;

use domus_core::Home;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

pub async fn login(home: &Home, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    let password = SecretString::from(password);

    tracing::debug!(endpoint = %home.endpoint(), %username, "logging in");
    let user = home.login(&username, &password).await?;

    let who = user.map_or(username, |u| u.name);
    output::print_done(&format!("Logged in as {who}"), global.quiet);
    Ok(())
}

pub async fn logout(home: &Home, global: &GlobalOpts) -> Result<(), CliError> {
    if !home.is_logged_in() {
        output::print_done("Not logged in", global.quiet);
        return Ok(());
    }
    home.logout().await;
    output::print_done("Logged out", global.quiet);
    Ok(())
}
