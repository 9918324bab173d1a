//! Account lifecycle commands.

use clap::Args;

use socialhub_core::error::AppError;
use socialhub_service::RegisterUser;

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,
    /// Email address
    #[arg(short, long)]
    pub email: String,
    /// Password
    #[arg(short, long, env = "SOCIALHUB_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for `activate`
#[derive(Debug, Args)]
pub struct ActivateArgs {
    /// Invitation token from the activation link
    pub token: String,
}

/// Arguments for `delete-user`
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Bearer token of the acting user
    #[arg(short, long, env = "SOCIALHUB_TOKEN", hide_env_values = true)]
    pub token: String,
    /// ID of the user to delete
    pub user_id: i64,
}

pub async fn register(app: &App, args: &RegisterArgs, format: OutputFormat) -> Result<(), AppError> {
    let request = RegisterUser {
        username: args.username.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
    };
    let user = app.registration.register(request).await?;
    output::print_success(&format!(
        "Registered '{}' (id {}); activation invitation sent.",
        user.username, user.id
    ));
    output::print_item(&user, format);
    Ok(())
}

pub async fn activate(app: &App, args: &ActivateArgs, format: OutputFormat) -> Result<(), AppError> {
    let user = app.users.activate(&args.token).await?;
    output::print_success(&format!("Activated '{}'.", user.username));
    output::print_item(&user, format);
    Ok(())
}

pub async fn delete(app: &App, args: &DeleteArgs) -> Result<(), AppError> {
    let ctx = app.resolver.resolve_context(&args.token).await?;
    app.users.delete_user(&ctx, args.user_id).await?;
    output::print_success(&format!("User {} deleted.", args.user_id));
    Ok(())
}
