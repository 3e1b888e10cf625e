//! Engineer self-service profile commands.
//!
//! Every edit fetches the current profile, changes it locally, PUTs the whole
//! record back and then re-reads it, so the printed profile is what the
//! backend stored.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use rm_model::{Engineer, Role};
use tracing::info;

use crate::client::ApiClient;
use crate::config::Session;
use crate::output::{print_heading, print_info, print_single, print_success, OutputFormat};
use crate::snapshot::ENGINEERS_PATH;

use super::CommandContext;

/// View and edit your own engineer profile (Engineer only).
#[derive(Debug, Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProfileSubcommand {
    /// Show your profile.
    Show,

    /// Change profile fields. An empty value clears an optional field.
    Set(SetProfileArgs),

    /// Add a tool to your tech stack.
    AddTool { tool: String },

    /// Remove a tool from your tech stack.
    RemoveTool { tool: String },

    /// Add a past project.
    AddPastProject(AddPastProjectArgs),

    /// Remove a past project by its number in `profile show`.
    RemovePastProject { number: usize },
}

#[derive(Debug, Default, Args)]
struct SetProfileArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    department: Option<String>,

    /// Profile image URL.
    #[arg(long)]
    image: Option<String>,

    /// About me.
    #[arg(long)]
    bio: Option<String>,

    #[arg(long)]
    experience: Option<String>,
}

#[derive(Debug, Args)]
struct AddPastProjectArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: String,
}

impl ProfileCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ProfileSubcommand::Show => show(ctx).await,
            ProfileSubcommand::Set(args) => edit(ctx, |p| apply_edits(p, &args)).await,
            ProfileSubcommand::AddTool { tool } => edit(ctx, |p| p.add_tool(&tool)).await,
            ProfileSubcommand::RemoveTool { tool } => edit(ctx, |p| p.remove_tool(&tool)).await,
            ProfileSubcommand::AddPastProject(args) => {
                edit(ctx, |p| p.add_past_project(&args.name, &args.description)).await
            }
            ProfileSubcommand::RemovePastProject { number } => {
                edit(ctx, |p| {
                    number
                        .checked_sub(1)
                        .and_then(|index| p.remove_past_project(index))
                        .is_some()
                })
                .await
            }
        }
    }
}

/// Fetches the engineer profile linked to the session's username.
pub(super) async fn fetch_own_profile(client: &ApiClient, session: &Session) -> Result<Engineer> {
    let username = &session.user.username;
    let profile = client
        .get(&format!("{ENGINEERS_PATH}/username/{username}"))
        .await
        .map_err(|e| e.not_found_as(|| format!("No engineer profile for username '{username}'")))?;
    Ok(profile)
}

/// Prints a profile the way the engineer dashboard shows it.
pub(super) fn print_profile(profile: &Engineer) {
    let name = Some(profile.name.as_str()).filter(|n| !n.is_empty());
    let department = Some(profile.department.as_str()).filter(|d| !d.is_empty());

    println!("{}", format!("Hey, {}", name.unwrap_or("Engineer")).bold());
    println!("{}", department.unwrap_or("Your role here").dimmed());
    if let Some(image) = &profile.profile {
        println!("Image: {image}");
    }

    print_heading("About Me");
    println!(
        "{}",
        profile
            .description
            .as_deref()
            .unwrap_or("You haven't added a description yet.")
    );

    print_heading("Experience");
    println!(
        "{}",
        profile
            .experience
            .as_deref()
            .unwrap_or("No experience listed.")
    );

    print_heading("Tech Stack");
    if profile.tools.is_empty() {
        println!("No tools listed.");
    } else {
        println!("{}", profile.tools.join(", "));
    }

    print_heading("Past Projects");
    if profile.past_projects.is_empty() {
        println!("No past projects listed.");
    }
    for (number, project) in (1..).zip(&profile.past_projects) {
        println!("{number}. {}", project.name.bold());
        println!("   {}", project.description);
    }
}

/// Applies `set` flags. Returns true if anything changed.
fn apply_edits(profile: &mut Engineer, args: &SetProfileArgs) -> bool {
    let before = profile.clone();

    if let Some(name) = &args.name {
        profile.name = name.trim().to_string();
    }
    if let Some(department) = &args.department {
        profile.department = department.trim().to_string();
    }
    for (value, field) in [
        (&args.image, &mut profile.profile),
        (&args.bio, &mut profile.description),
        (&args.experience, &mut profile.experience),
    ] {
        if let Some(value) = value {
            *field = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        }
    }

    *profile != before
}

async fn show(ctx: CommandContext) -> Result<()> {
    let session = ctx.require_role(Role::Engineer)?;
    let client = ctx.client()?;
    let profile = fetch_own_profile(&client, session).await?;

    match ctx.format {
        OutputFormat::Json => print_single(&profile),
        OutputFormat::Table => print_profile(&profile),
    }
    Ok(())
}

/// Fetch, change, save, re-read.
async fn edit(ctx: CommandContext, change: impl FnOnce(&mut Engineer) -> bool) -> Result<()> {
    let session = ctx.require_role(Role::Engineer)?;
    let client = ctx.client()?;
    let mut profile = fetch_own_profile(&client, session).await?;

    if !change(&mut profile) {
        print_info("Nothing to change.");
        return Ok(());
    }

    let path = format!("{ENGINEERS_PATH}/{}", profile.id);
    let _: serde_json::Value = client.put(&path, &profile).await?;
    let saved: Engineer = client.get(&path).await?;
    info!(engineer_id = %saved.id, "profile saved");

    match ctx.format {
        OutputFormat::Json => print_single(&saved),
        OutputFormat::Table => {
            print_success("Profile saved.");
            print_profile(&saved);
        }
    }
    Ok(())
}
