//! Assignment commands.
//!
//! Writes are validated against a freshly fetched snapshot before they are
//! sent. The check is advisory: another client may write in between, and
//! the backend is expected to enforce the same bound.

use anyhow::Result;
use clap::{Args, Subcommand};
use rm_capacity::{
    classify, total_capacity, validate, validate_update, AllocationError, Field, Proposal,
    SameProjectPolicy,
};
use rm_model::{Assignment, AssignmentId, EngineerId, ProjectId, Role, Snapshot};
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use crate::error::CliError;
use crate::output::{capacity_bar, print_output, print_receipt, print_single, OutputFormat, Receipt};
use crate::resolve::{resolve_engineer_id, resolve_project_id};
use crate::snapshot::{self, ASSIGNMENTS_PATH};

use super::CommandContext;

/// Assignment commands.
#[derive(Debug, Args)]
pub struct AssignmentsCommand {
    #[command(subcommand)]
    command: AssignmentsSubcommand,
}

#[derive(Debug, Subcommand)]
enum AssignmentsSubcommand {
    /// List assignments.
    List(ListAssignmentsArgs),

    /// Assign an engineer to a project (Manager only).
    Create(CreateAssignmentArgs),

    /// Change an assignment's capacity (Manager only).
    Update(UpdateAssignmentArgs),

    /// Remove an assignment (Manager only).
    Delete(DeleteAssignmentArgs),
}

#[derive(Debug, Args)]
struct ListAssignmentsArgs {
    /// Only show assignments for this engineer (ID or name).
    #[arg(long)]
    engineer: Option<String>,
}

#[derive(Debug, Args)]
struct CreateAssignmentArgs {
    /// Engineer ID or name.
    #[arg(long)]
    engineer: String,

    /// Project ID or name.
    #[arg(long)]
    project: String,

    /// Capacity in percent (1-100).
    #[arg(long, allow_negative_numbers = true)]
    capacity: i32,

    /// Treat an assignment to a project the engineer is already on as a
    /// replacement of the existing capacity instead of an addition.
    #[arg(long)]
    replace_same_project: bool,
}

#[derive(Debug, Args)]
struct UpdateAssignmentArgs {
    /// Assignment ID.
    assignment: String,

    /// New capacity in percent (1-100).
    #[arg(long, allow_negative_numbers = true)]
    capacity: i32,
}

#[derive(Debug, Args)]
struct DeleteAssignmentArgs {
    /// Assignment ID.
    assignment: String,
}

impl AssignmentsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AssignmentsSubcommand::List(args) => list_assignments(ctx, args).await,
            AssignmentsSubcommand::Create(args) => create_assignment(ctx, args).await,
            AssignmentsSubcommand::Update(args) => update_assignment(ctx, args).await,
            AssignmentsSubcommand::Delete(args) => delete_assignment(ctx, args).await,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct AssignmentRow {
    #[tabled(rename = "ID")]
    id: String,

    #[tabled(rename = "Engineer")]
    engineer: String,

    #[tabled(rename = "Project")]
    project: String,

    #[tabled(rename = "Capacity")]
    capacity: String,
}

impl AssignmentRow {
    fn new(assignment: &Assignment, snapshot: &Snapshot) -> Self {
        Self {
            id: assignment.id.to_string(),
            engineer: assignment
                .engineer
                .resolve_name(&snapshot.engineers)
                .map(str::to_string)
                .or_else(|| assignment.engineer.id().map(ToString::to_string))
                .unwrap_or_else(|| "Unknown Engineer".to_string()),
            project: assignment
                .project
                .resolve_name(&snapshot.projects)
                .unwrap_or("Unknown Project")
                .to_string(),
            capacity: format!("{}%", assignment.effective_capacity()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateAssignmentRequest<'a> {
    #[serde(rename = "engineerId")]
    engineer_id: &'a EngineerId,
    #[serde(rename = "projectId")]
    project_id: &'a ProjectId,
    capacity: i32,
}

#[derive(Debug, Serialize)]
struct UpdateAssignmentRequest {
    capacity: i32,
}

/// Treats blank input as "not chosen" so the validator reports the missing field.
fn chosen(ident: &str) -> Option<&str> {
    Some(ident.trim()).filter(|s| !s.is_empty())
}

/// Engineer total after a write, rendered for receipts.
fn total_details(snapshot: &Snapshot, engineer_id: Option<&EngineerId>) -> (i32, Vec<String>) {
    match engineer_id {
        Some(id) => {
            let total = total_capacity(&snapshot.assignments, id);
            (total, vec![format!("Total capacity: {}", capacity_bar(total))])
        }
        None => (0, Vec::new()),
    }
}

async fn list_assignments(ctx: CommandContext, args: ListAssignmentsArgs) -> Result<()> {
    let client = ctx.client()?;
    let snapshot = snapshot::fetch_lenient(&client).await;

    let engineer_id = args
        .engineer
        .as_deref()
        .map(|ident| resolve_engineer_id(&snapshot, ident))
        .transpose()?;

    let selected: Vec<&Assignment> = match &engineer_id {
        Some(id) => snapshot.assignments_for(id).collect(),
        None => snapshot.assignments.iter().collect(),
    };

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<AssignmentRow> = selected
                .iter()
                .map(|a| AssignmentRow::new(a, &snapshot))
                .collect();
            print_output(&rows, ctx.format);
            if let Some(id) = &engineer_id {
                let (_, details) = total_details(&snapshot, Some(id));
                for line in details {
                    println!("{line}");
                }
            }
        }
        OutputFormat::Json => print_single(&selected),
    }

    Ok(())
}

async fn create_assignment(ctx: CommandContext, args: CreateAssignmentArgs) -> Result<()> {
    ctx.require_role(Role::Manager)?;
    let client = ctx.client()?;
    let mut snapshot = snapshot::fetch(&client).await?;

    let proposal = Proposal {
        engineer_id: chosen(&args.engineer)
            .map(|ident| resolve_engineer_id(&snapshot, ident))
            .transpose()?,
        project_id: chosen(&args.project)
            .map(|ident| resolve_project_id(&snapshot, ident))
            .transpose()?,
        capacity: args.capacity,
    };
    let policy = if args.replace_same_project {
        SameProjectPolicy::Replace
    } else {
        SameProjectPolicy::Add
    };

    let acceptance = validate(&snapshot.assignments, &proposal, policy).map_err(CliError::from)?;
    let engineer_id = proposal
        .engineer_id
        .as_ref()
        .ok_or(CliError::Rejected(AllocationError::MissingField(Field::Engineer)))?;
    let project_id = proposal
        .project_id
        .as_ref()
        .ok_or(CliError::Rejected(AllocationError::MissingField(Field::Project)))?;

    let request = CreateAssignmentRequest {
        engineer_id,
        project_id,
        capacity: proposal.capacity,
    };
    let response: Assignment = client.post(ASSIGNMENTS_PATH, &request).await?;
    info!(
        assignment_id = %response.id,
        engineer_id = %engineer_id,
        expected_total = acceptance.new_total,
        "assignment created"
    );

    snapshot.add_assignment(response.clone());
    let (total, details) = total_details(&snapshot, Some(engineer_id));

    print_receipt(
        ctx.format,
        Receipt {
            message: format!(
                "Assigned {} to {} at {}%",
                response
                    .engineer
                    .resolve_name(&snapshot.engineers)
                    .unwrap_or(engineer_id.as_str()),
                response
                    .project
                    .resolve_name(&snapshot.projects)
                    .unwrap_or("Unknown Project"),
                response.effective_capacity()
            ),
            kind: "assignments.create",
            resource_key: "assignment",
            resource: &response,
            ids: serde_json::json!({
                "assignment_id": response.id,
                "engineer_id": engineer_id,
                "project_id": project_id,
                "total_capacity": total,
                "tier": classify(total),
            }),
            details,
        },
    );

    Ok(())
}

async fn update_assignment(ctx: CommandContext, args: UpdateAssignmentArgs) -> Result<()> {
    ctx.require_role(Role::Manager)?;
    let assignment_id = AssignmentId::parse(&args.assignment)?;
    let client = ctx.client()?;
    let mut snapshot = snapshot::fetch(&client).await?;

    validate_update(&snapshot.assignments, &assignment_id, args.capacity)
        .map_err(CliError::from)?;

    let response: Assignment = client
        .put(
            &format!("{ASSIGNMENTS_PATH}/{assignment_id}"),
            &UpdateAssignmentRequest {
                capacity: args.capacity,
            },
        )
        .await
        .map_err(|e| e.not_found_as(|| format!("Assignment '{assignment_id}' not found")))?;

    snapshot.replace_assignment(response.clone());
    let engineer_id = response.engineer.id();
    let (total, details) = total_details(&snapshot, engineer_id);

    print_receipt(
        ctx.format,
        Receipt {
            message: format!(
                "Updated assignment {} to {}%",
                response.id,
                response.effective_capacity()
            ),
            kind: "assignments.update",
            resource_key: "assignment",
            resource: &response,
            ids: serde_json::json!({
                "assignment_id": response.id,
                "engineer_id": engineer_id,
                "total_capacity": total,
                "tier": classify(total),
            }),
            details,
        },
    );

    Ok(())
}

async fn delete_assignment(ctx: CommandContext, args: DeleteAssignmentArgs) -> Result<()> {
    ctx.require_role(Role::Manager)?;
    let assignment_id = AssignmentId::parse(&args.assignment)?;
    let client = ctx.client()?;
    let mut snapshot = snapshot::fetch_lenient(&client).await;

    client
        .delete(&format!("{ASSIGNMENTS_PATH}/{assignment_id}"))
        .await
        .map_err(|e| e.not_found_as(|| format!("Assignment '{assignment_id}' not found")))?;

    let removed = snapshot.remove_assignment(&assignment_id);
    let details = removed
        .as_ref()
        .map(|a| total_details(&snapshot, a.engineer.id()).1)
        .unwrap_or_default();

    print_receipt(
        ctx.format,
        Receipt {
            message: format!("Deleted assignment {assignment_id}"),
            kind: "assignments.delete",
            resource_key: "assignment",
            resource: &removed,
            ids: serde_json::json!({ "assignment_id": assignment_id }),
            details,
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        serde_json::from_value::<(Vec<_>, Vec<_>, Vec<_>)>(serde_json::json!([
            [{"_id": "e1", "name": "Ada"}],
            [{"_id": "p1", "name": "Atlas"}],
            [
                {"_id": "a1", "engineerId": "e1", "projectId": "p1", "capacity": 60},
                {"_id": "a2", "engineerId": {"_id": "e1", "name": "Ada"}, "projectId": "p9"}
            ]
        ]))
        .map(|(e, p, a)| Snapshot::new(e, p, a))
        .unwrap()
    }

    #[test]
    fn test_chosen_treats_blank_as_missing() {
        assert_eq!(chosen("  "), None);
        assert_eq!(chosen(" e1 "), Some("e1"));
    }

    #[test]
    fn test_rows_resolve_names() {
        let snapshot = snapshot();
        let first = AssignmentRow::new(&snapshot.assignments[0], &snapshot);
        assert_eq!(first.engineer, "Ada");
        assert_eq!(first.project, "Atlas");
        assert_eq!(first.capacity, "60%");

        let second = AssignmentRow::new(&snapshot.assignments[1], &snapshot);
        assert_eq!(second.project, "Unknown Project");
        assert_eq!(second.capacity, "0%");
    }

    #[test]
    fn test_create_request_wire_format() {
        let engineer_id = EngineerId::parse("e1").unwrap();
        let project_id = ProjectId::parse("p1").unwrap();
        let request = CreateAssignmentRequest {
            engineer_id: &engineer_id,
            project_id: &project_id,
            capacity: 40,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"engineerId": "e1", "projectId": "p1", "capacity": 40})
        );
    }

    mod flows {
        use super::*;
        use crate::commands::testing::context;
        use crate::snapshot::{ENGINEERS_PATH, PROJECTS_PATH};
        use rm_capacity::AllocationError;
        use wiremock::matchers::{body_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        async fn server() -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(ENGINEERS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    {"_id": "e1", "name": "Ada"}
                ])))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(PROJECTS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    {"_id": "p1", "name": "Atlas"},
                    {"_id": "p2", "name": "Borealis"}
                ])))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(ASSIGNMENTS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    {"_id": "a1", "engineerId": "e1", "projectId": "p1", "capacity": 60},
                    {"_id": "a0", "engineerId": null, "projectId": "p2", "capacity": 90}
                ])))
                .mount(&server)
                .await;
            server
        }

        fn create_args(capacity: i32) -> CreateAssignmentArgs {
            CreateAssignmentArgs {
                engineer: "Ada".to_string(),
                project: "Borealis".to_string(),
                capacity,
                replace_same_project: false,
            }
        }

        fn rejection(err: &anyhow::Error) -> Option<&AllocationError> {
            match err.downcast_ref::<CliError>() {
                Some(CliError::Rejected(reason)) => Some(reason),
                _ => None,
            }
        }

        #[tokio::test]
        async fn test_overbooking_create_never_posts() {
            let server = server().await;
            Mock::given(method("POST"))
                .and(path(ASSIGNMENTS_PATH))
                .respond_with(ResponseTemplate::new(201))
                .expect(0)
                .mount(&server)
                .await;

            let err = create_assignment(context(&server.uri(), Role::Manager), create_args(50))
                .await
                .unwrap_err();
            assert_eq!(rejection(&err), Some(&AllocationError::OverCapacity(110)));
            assert_eq!(err.to_string(), "Overbooking! This will exceed 100% (110%).");
        }

        #[tokio::test]
        async fn test_accepted_create_posts_resolved_ids() {
            let server = server().await;
            Mock::given(method("POST"))
                .and(path(ASSIGNMENTS_PATH))
                .and(body_json(serde_json::json!({
                    "engineerId": "e1",
                    "projectId": "p2",
                    "capacity": 40
                })))
                .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                    "_id": "a2", "engineerId": "e1", "projectId": "p2", "capacity": 40
                })))
                .expect(1)
                .mount(&server)
                .await;

            create_assignment(context(&server.uri(), Role::Manager), create_args(40))
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_create_requires_manager_session() {
            let server = MockServer::start().await;
            let err = create_assignment(context(&server.uri(), Role::Engineer), create_args(10))
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<CliError>(),
                Some(CliError::Forbidden { required: Role::Manager, .. })
            ));
        }

        #[tokio::test]
        async fn test_overbooking_update_never_puts() {
            let server = server().await;
            Mock::given(method("PUT"))
                .and(path(format!("{ASSIGNMENTS_PATH}/a1")))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;

            let args = UpdateAssignmentArgs {
                assignment: "a1".to_string(),
                capacity: 120,
            };
            let err = update_assignment(context(&server.uri(), Role::Manager), args)
                .await
                .unwrap_err();
            assert_eq!(rejection(&err), Some(&AllocationError::OverCapacity(120)));
        }

        #[tokio::test]
        async fn test_accepted_update_puts_capacity() {
            let server = server().await;
            Mock::given(method("PUT"))
                .and(path(format!("{ASSIGNMENTS_PATH}/a1")))
                .and(body_json(serde_json::json!({"capacity": 80})))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "_id": "a1", "engineerId": "e1", "projectId": "p1", "capacity": 80
                })))
                .expect(1)
                .mount(&server)
                .await;

            let args = UpdateAssignmentArgs {
                assignment: "a1".to_string(),
                capacity: 80,
            };
            update_assignment(context(&server.uri(), Role::Manager), args)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_delete_of_unknown_assignment_is_not_found() {
            let server = server().await;
            Mock::given(method("DELETE"))
                .and(path(format!("{ASSIGNMENTS_PATH}/a9")))
                .respond_with(ResponseTemplate::new(404))
                .expect(1)
                .mount(&server)
                .await;

            let args = DeleteAssignmentArgs {
                assignment: "a9".to_string(),
            };
            let err = delete_assignment(context(&server.uri(), Role::Manager), args)
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<CliError>(),
                Some(CliError::NotFound(_))
            ));
        }
    }

    #[test]
    fn test_rows_with_missing_relations() {
        let snapshot = snapshot();
        let orphan: Assignment = serde_json::from_value(serde_json::json!(
            {"_id": "a3", "engineerId": null, "projectId": null, "capacity": "15"}
        ))
        .unwrap();
        let row = AssignmentRow::new(&orphan, &snapshot);
        assert_eq!(row.engineer, "Unknown Engineer");
        assert_eq!(row.project, "Unknown Project");
        assert_eq!(row.capacity, "15%");
    }
}
