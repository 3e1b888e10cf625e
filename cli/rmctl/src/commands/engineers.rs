//! Engineer commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use rm_model::{Engineer, Role};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, print_receipt, print_single, OutputFormat, Receipt};
use crate::snapshot::ENGINEERS_PATH;

use super::CommandContext;

/// Engineer commands.
#[derive(Debug, Args)]
pub struct EngineersCommand {
    #[command(subcommand)]
    command: EngineersSubcommand,
}

#[derive(Debug, Subcommand)]
enum EngineersSubcommand {
    /// List engineers.
    List,

    /// Get engineer details.
    Get(GetEngineerArgs),

    /// Look up an engineer profile by login username.
    ByUsername(ByUsernameArgs),

    /// Add an engineer (Manager only).
    Create(CreateEngineerArgs),
}

#[derive(Debug, Args)]
struct GetEngineerArgs {
    /// Engineer ID.
    engineer: String,
}

#[derive(Debug, Args)]
struct ByUsernameArgs {
    username: String,
}

#[derive(Debug, Args)]
struct CreateEngineerArgs {
    /// Display name.
    #[arg(long)]
    name: String,

    /// Department (e.g. Frontend).
    #[arg(long)]
    department: String,

    /// Profile image URL.
    #[arg(long)]
    profile: String,

    /// About the engineer.
    #[arg(long)]
    description: Option<String>,
}

impl EngineersCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            EngineersSubcommand::List => list_engineers(ctx).await,
            EngineersSubcommand::Get(args) => get_engineer(ctx, args).await,
            EngineersSubcommand::ByUsername(args) => by_username(ctx, args).await,
            EngineersSubcommand::Create(args) => create_engineer(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct EngineerRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,

    #[tabled(rename = "Name")]
    name: &'a str,

    #[tabled(rename = "Department")]
    department: &'a str,

    #[tabled(rename = "Username")]
    username: &'a str,

    #[tabled(rename = "Tools")]
    tools: String,
}

impl<'a> From<&'a Engineer> for EngineerRow<'a> {
    fn from(engineer: &'a Engineer) -> Self {
        Self {
            id: engineer.id.as_str(),
            name: &engineer.name,
            department: &engineer.department,
            username: engineer.username.as_deref().unwrap_or("-"),
            tools: engineer.tools.join(", "),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateEngineerRequest {
    name: String,
    department: String,
    profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl CreateEngineerRequest {
    /// Name, department and profile image are required.
    fn from_args(args: CreateEngineerArgs) -> Result<Self> {
        let required = [
            ("name", &args.name),
            ("department", &args.department),
            ("profile", &args.profile),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            anyhow::bail!("--{field} cannot be empty");
        }

        Ok(Self {
            name: args.name.trim().to_string(),
            department: args.department.trim().to_string(),
            profile: args.profile.trim().to_string(),
            description: args
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}

async fn list_engineers(ctx: CommandContext) -> Result<()> {
    let client = ctx.client()?;
    let engineers: Vec<Engineer> = client.get(ENGINEERS_PATH).await?;

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<EngineerRow<'_>> = engineers.iter().map(EngineerRow::from).collect();
            print_output(&rows, ctx.format);
        }
        OutputFormat::Json => print_single(&engineers),
    }

    Ok(())
}

async fn get_engineer(ctx: CommandContext, args: GetEngineerArgs) -> Result<()> {
    let client = ctx.client()?;
    let engineer: Engineer = client
        .get(&format!("{ENGINEERS_PATH}/{}", args.engineer))
        .await
        .map_err(|e| e.not_found_as(|| format!("Engineer '{}' not found", args.engineer)))?;

    print_single(&engineer);
    Ok(())
}

async fn by_username(ctx: CommandContext, args: ByUsernameArgs) -> Result<()> {
    let client = ctx.client()?;
    let engineer: Engineer = client
        .get(&format!("{ENGINEERS_PATH}/username/{}", args.username))
        .await
        .map_err(|e| {
            e.not_found_as(|| format!("No engineer profile for username '{}'", args.username))
        })?;

    print_single(&engineer);
    Ok(())
}

async fn create_engineer(ctx: CommandContext, args: CreateEngineerArgs) -> Result<()> {
    ctx.require_role(Role::Manager)?;
    let client = ctx.client()?;

    let request = CreateEngineerRequest::from_args(args)?;
    let response: Engineer = client.post(ENGINEERS_PATH, &request).await?;

    print_receipt(
        ctx.format,
        Receipt {
            message: format!(
                "Added engineer '{}' ({}) to {}",
                response.name, response.id, response.department
            ),
            kind: "engineers.create",
            resource_key: "engineer",
            resource: &response,
            ids: serde_json::json!({ "engineer_id": response.id }),
            details: vec![format!("Next: rmctl assignments create --engineer {}", response.id)],
        },
    );

    Ok(())
}
