//! Project commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use rm_model::{Project, Role};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_receipt, print_single, OutputFormat, Receipt};
use crate::snapshot::PROJECTS_PATH;

use super::CommandContext;

/// Project commands.
#[derive(Debug, Args)]
pub struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProjectsSubcommand {
    /// List projects.
    List,

    /// Create a new project (Manager only).
    Create(CreateProjectArgs),
}

#[derive(Debug, Args)]
struct CreateProjectArgs {
    /// Project name.
    name: String,

    /// Project description.
    #[arg(long)]
    description: Option<String>,
}

impl ProjectsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ProjectsSubcommand::List => list_projects(ctx).await,
            ProjectsSubcommand::Create(args) => create_project(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct ProjectRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,

    #[tabled(rename = "Name")]
    name: &'a str,

    #[tabled(rename = "Description")]
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateProjectRequest {
    name: String,
    description: String,
}

async fn list_projects(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let projects: Vec<Project> = client.get(PROJECTS_PATH).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<ProjectRow<'_>> = projects
                .iter()
                .map(|p| ProjectRow {
                    id: p.id.as_str(),
                    name: &p.name,
                    description: p.description_or_default(),
                })
                .collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&projects),
    }

    Ok(())
}

async fn create_project(ctx: CommandContext, args: CreateProjectArgs) -> Result<()> {
    ctx.require_role(Role::Manager)?;

    let name = args.name.trim();
    if name.is_empty() {
        anyhow::bail!("Project name cannot be empty");
    }

    let client = ctx.client()?;
    let request = CreateProjectRequest {
        name: name.to_string(),
        description: args.description.unwrap_or_default().trim().to_string(),
    };
    let response: Project = client.post(PROJECTS_PATH, &request).await?;

    print_receipt(
        ctx.format,
        Receipt {
            message: format!("Created project '{}' ({})", response.name, response.id),
            kind: "projects.create",
            resource_key: "project",
            resource: &response,
            ids: serde_json::json!({ "project_id": response.id }),
            details: vec![format!(
                "Next: rmctl assignments create --project {}",
                response.id
            )],
        },
    );

    Ok(())
}
