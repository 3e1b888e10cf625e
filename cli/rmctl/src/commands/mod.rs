//! CLI commands.

mod assignments;
mod auth;
mod context;
mod dashboard;
mod engineers;
mod profile;
mod projects;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rm_model::Role;

use crate::client::ApiClient;
use crate::config::{Config, Session};
use crate::error::CliError;
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// rmctl - Assign engineers to projects by percentage capacity.
#[derive(Debug, Parser)]
#[command(name = "rmctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Backend API URL (overrides the saved config).
    #[arg(long, global = true, env = "RM_API_URL")]
    api_url: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, env = "RM_LOG", default_value = "warn")]
    log_level: String,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in, log out, show session status.
    Auth(auth::AuthCommand),

    /// Show or change saved CLI settings.
    Context(context::ContextCommand),

    /// Manage engineers.
    Engineers(engineers::EngineersCommand),

    /// Manage projects.
    Projects(projects::ProjectsCommand),

    /// Manage capacity assignments.
    Assignments(assignments::AssignmentsCommand),

    /// Show the manager or engineer dashboard.
    Dashboard(dashboard::DashboardCommand),

    /// View and edit your own engineer profile.
    Profile(profile::ProfileCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        let session = Session::load()?;

        let ctx = CommandContext {
            config,
            session,
            format: self.format,
        };

        match self.command {
            Commands::Auth(cmd) => cmd.run(ctx).await,
            Commands::Context(cmd) => cmd.run(ctx).await,
            Commands::Engineers(cmd) => cmd.run(ctx).await,
            Commands::Projects(cmd) => cmd.run(ctx).await,
            Commands::Assignments(cmd) => cmd.run(ctx).await,
            Commands::Dashboard(cmd) => cmd.run(ctx).await,
            Commands::Profile(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("rmctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub session: Option<Session>,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Get an API client, authenticated when a session exists.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(self.config.api_url(), self.session.as_ref())
    }

    /// Require a session.
    pub fn require_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| CliError::NotAuthenticated.into())
    }

    /// Require a session opened with `role`.
    pub fn require_role(&self, role: Role) -> Result<&Session> {
        let session = self.require_session()?;
        session.require_role(role)?;
        Ok(session)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rm_model::{Role, User, UserId};

    use super::CommandContext;
    use crate::config::{Config, Session};
    use crate::output::OutputFormat;

    /// A context logged in as `role` against `api_url`.
    pub(crate) fn context(api_url: &str, role: Role) -> CommandContext {
        let user = User {
            id: UserId::parse("u1").unwrap(),
            username: "ada".to_string(),
            role: Some(role),
            name: None,
        };
        CommandContext {
            config: Config {
                api_url: api_url.to_string(),
                selected_role: role,
            },
            session: Some(Session::start(user, "secret".to_string(), role)),
            format: OutputFormat::Json,
        }
    }
}
