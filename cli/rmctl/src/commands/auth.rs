//! Authentication commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use rm_model::{Role, User};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::config::{Config, Session};
use crate::error::CliError;
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Authentication commands.
#[derive(Debug, Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Log in as a Manager or Engineer.
    Login(LoginArgs),

    /// End the current session.
    Logout,

    /// Show current session status.
    Status,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Username.
    #[arg(long, env = "RM_USERNAME")]
    username: String,

    /// Password.
    #[arg(long, env = "RM_PASSWORD", hide_env_values = true)]
    password: String,

    /// Role to log in as. Defaults to the last role chosen.
    #[arg(long)]
    role: Option<Role>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
    token: String,
}

#[derive(Debug, Serialize)]
struct StatusView<'a> {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<String>,
}

impl AuthCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AuthSubcommand::Login(args) => login(ctx, args).await,
            AuthSubcommand::Logout => logout(ctx).await,
            AuthSubcommand::Status => status(ctx).await,
        }
    }
}

/// Log in and persist the session.
async fn login(ctx: CommandContext, args: LoginArgs) -> Result<()> {
    let requested = match args.role {
        Some(role) => {
            // Remember the choice even if the login itself fails.
            if ctx.config.selected_role != role {
                let mut config = Config::load()?;
                config.selected_role = role;
                config.save()?;
            }
            role
        }
        None => ctx.config.selected_role,
    };

    let client = ApiClient::new(ctx.config.api_url(), None)?;
    let response = authenticate(&client, &args.username, &args.password, requested).await?;
    let role = session_role(requested, response.user.role);

    let session = Session::start(response.user, response.token, role);
    session.save()?;
    info!(username = %session.user.username, %role, "session started");

    print_success(&format!(
        "Logged in as {} ({})",
        session.user.username, session.role
    ));
    Ok(())
}

/// Posts the credentials. A rejection by the backend is reported without
/// saying whether the credentials or the role were wrong; transport and
/// response-format errors pass through unchanged.
async fn authenticate(
    client: &ApiClient,
    username: &str,
    password: &str,
    role: Role,
) -> Result<LoginResponse, CliError> {
    let request = LoginRequest {
        username,
        password,
        role,
    };

    match client.post("/api/login", &request).await {
        Ok(response) => Ok(response),
        Err(e @ (CliError::Api { .. } | CliError::NotAuthenticated)) => {
            warn!(error = %e, username, "login rejected");
            Err(CliError::LoginFailed)
        }
        Err(e) => Err(e),
    }
}

/// The backend's reported role wins over the requested one.
fn session_role(requested: Role, reported: Option<Role>) -> Role {
    match reported {
        Some(reported) if reported != requested => {
            warn!(%requested, %reported, "backend reported a different role");
            reported
        }
        Some(reported) => reported,
        None => requested,
    }
}

/// End the session.
async fn logout(_ctx: CommandContext) -> Result<()> {
    Session::end()?;
    print_success("Logged out successfully.");
    Ok(())
}

/// Show session status.
async fn status(ctx: CommandContext) -> Result<()> {
    let view = StatusView {
        authenticated: ctx.session.is_some(),
        username: ctx.session.as_ref().map(|s| s.user.username.as_str()),
        role: ctx.session.as_ref().map(|s| s.role),
        since: ctx.session.as_ref().map(|s| s.created_at.to_rfc3339()),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => match &ctx.session {
            Some(session) => {
                println!("{} Authenticated", "Status:".green().bold());
                println!("  User: {}", session.user.username);
                println!("  Role: {}", session.role);
                println!("  Since: {}", session.created_at);
            }
            None => {
                println!("{} Not authenticated", "Status:".red().bold());
                println!("\nRun {} to log in.", "rmctl auth login".cyan());
            }
        },
    }

    Ok(())
}
