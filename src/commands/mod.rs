//! CLI command definitions and dispatch.

pub mod migrate;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::output::OutputFormat;
use socialhub_core::config::AppConfig;
use socialhub_core::error::AppError;

/// SocialHub identity and registration tooling
#[derive(Debug, Parser)]
#[command(name = "socialhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects config/{env}.toml)
    #[arg(short, long, env = "SOCIALHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Register a user and send the activation invitation
    Register(user::RegisterArgs),
    /// Activate an account with its invitation token
    Activate(user::ActivateArgs),
    /// Remove a user account
    DeleteUser(user::DeleteArgs),
    /// Exchange email and password for a bearer token
    Login(session::LoginArgs),
    /// Show the user a bearer token belongs to
    Whoami(session::WhoamiArgs),
    /// Check whether a token's user holds at least a role
    CheckRole(session::CheckRoleArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        if let Commands::Migrate = self.command {
            return migrate::execute(&config).await;
        }

        let app = App::build(&config).await?;
        let result = match &self.command {
            Commands::Migrate => Ok(()),
            Commands::Register(args) => user::register(&app, args, self.format).await,
            Commands::Activate(args) => user::activate(&app, args, self.format).await,
            Commands::DeleteUser(args) => user::delete(&app, args).await,
            Commands::Login(args) => session::login(&app, args, self.format).await,
            Commands::Whoami(args) => session::whoami(&app, args, self.format).await,
            Commands::CheckRole(args) => session::check_role(&app, args).await,
        };
        app.db.close().await;
        result
    }
}
