//! Token commands.

use clap::Args;

use socialhub_core::error::AppError;

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address
    #[arg(short, long)]
    pub email: String,
    /// Password
    #[arg(short, long, env = "SOCIALHUB_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for `whoami`
#[derive(Debug, Args)]
pub struct WhoamiArgs {
    /// Bearer token
    #[arg(short, long, env = "SOCIALHUB_TOKEN", hide_env_values = true)]
    pub token: String,
}

/// Arguments for `check-role`
#[derive(Debug, Args)]
pub struct CheckRoleArgs {
    /// Bearer token
    #[arg(short, long, env = "SOCIALHUB_TOKEN", hide_env_values = true)]
    pub token: String,
    /// Required role name
    pub role: String,
}

pub async fn login(app: &App, args: &LoginArgs, format: OutputFormat) -> Result<(), AppError> {
    let token = app.users.issue_token(&args.email, &args.password).await?;
    output::print_item(&token, format);
    Ok(())
}

pub async fn whoami(app: &App, args: &WhoamiArgs, format: OutputFormat) -> Result<(), AppError> {
    let user = app.resolver.resolve(&args.token).await?;
    output::print_item(&user, format);
    Ok(())
}

pub async fn check_role(app: &App, args: &CheckRoleArgs) -> Result<(), AppError> {
    let user = app.resolver.resolve(&args.token).await?;
    if app.authorizer.check_precedence(&user.role, &args.role).await? {
        output::print_success(&format!(
            "'{}' ({}) satisfies '{}'.",
            user.username, user.role.name, args.role
        ));
        Ok(())
    } else {
        output::print_failure(&format!(
            "'{}' ({}) does not satisfy '{}'.",
            user.username, user.role.name, args.role
        ));
        Err(AppError::forbidden(format!("Role '{}' required", args.role)))
    }
}
