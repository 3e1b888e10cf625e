//! Context commands (saved API endpoint and login role).

use anyhow::Result;
use clap::{Args, Subcommand};
use rm_model::Role;
use serde::Serialize;

use crate::config::Config;
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Manage saved CLI settings.
#[derive(Debug, Args)]
pub struct ContextCommand {
    #[command(subcommand)]
    command: ContextSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContextSubcommand {
    /// Show the saved settings.
    Show,

    /// Choose the role used by the next login.
    SetRole {
        /// Manager or Engineer.
        role: Role,
    },

    /// Save the API URL used by later commands.
    SetApiUrl {
        url: String,
    },
}

#[derive(Debug, Serialize)]
struct ContextView<'a> {
    api_url: &'a str,
    selected_role: Role,
    session_user: Option<&'a str>,
}

impl ContextCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ContextSubcommand::Show => show(ctx).await,
            ContextSubcommand::SetRole { role } => set_role(ctx, role).await,
            ContextSubcommand::SetApiUrl { url } => set_api_url(ctx, url).await,
        }
    }
}

async fn show(ctx: CommandContext) -> Result<()> {
    let view = ContextView {
        api_url: ctx.config.api_url(),
        selected_role: ctx.config.selected_role,
        session_user: ctx.session.as_ref().map(|s| s.user.username.as_str()),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("selected_role: {}", view.selected_role);
            println!("session: {}", view.session_user.unwrap_or("-"));
        }
    }

    Ok(())
}

async fn set_role(ctx: CommandContext, role: Role) -> Result<()> {
    // Reload so a one-off --api-url is not persisted.
    let mut config = Config::load()?;
    config.selected_role = role;
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "selectedRole": role })),
        OutputFormat::Table => print_success(&format!("Next login will use role {role}")),
    }

    Ok(())
}

async fn set_api_url(ctx: CommandContext, url: String) -> Result<()> {
    let url = url.trim().trim_end_matches('/').to_string();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        anyhow::bail!("API URL must start with http:// or https://");
    }

    let mut config = Config::load()?;
    config.api_url = url;
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "apiUrl": config.api_url })),
        OutputFormat::Table => print_success(&format!("API URL set to {}", config.api_url)),
    }

    Ok(())
}
