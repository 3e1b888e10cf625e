//! Dashboard commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use rm_capacity::{classify, effective_assignments, total_capacity, Tier};
use rm_model::{Assignment, Engineer, Project, Role, Snapshot};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{capacity_bar, print_heading, print_output, print_single, OutputFormat};
use crate::snapshot;

use super::profile::{fetch_own_profile, print_profile};
use super::CommandContext;

/// Dashboard commands.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    #[command(subcommand)]
    command: DashboardSubcommand,
}

#[derive(Debug, Subcommand)]
enum DashboardSubcommand {
    /// Team overview with per-engineer capacity (Manager only).
    Manager,

    /// Your profile and assignments (Engineer only).
    Engineer,
}

impl DashboardCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            DashboardSubcommand::Manager => manager(ctx).await,
            DashboardSubcommand::Engineer => engineer(ctx).await,
        }
    }
}

/// One assignment as shown on a dashboard.
#[derive(Debug, Serialize)]
struct AssignmentLine<'a> {
    id: &'a str,
    project: &'a str,
    capacity: i32,
}

impl<'a> AssignmentLine<'a> {
    fn new(assignment: &'a Assignment, projects: &'a [Project]) -> Self {
        Self {
            id: assignment.id.as_str(),
            project: assignment
                .project
                .resolve_name(projects)
                .unwrap_or("Unknown Project"),
            capacity: assignment.effective_capacity(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EngineerLoad<'a> {
    id: &'a str,
    name: &'a str,
    department: &'a str,
    total: i32,
    tier: Tier,
    assignments: Vec<AssignmentLine<'a>>,
}

impl<'a> EngineerLoad<'a> {
    fn new(engineer: &'a Engineer, snapshot: &'a Snapshot) -> Self {
        let total = total_capacity(&snapshot.assignments, &engineer.id);
        Self {
            id: engineer.id.as_str(),
            name: &engineer.name,
            department: &engineer.department,
            total,
            tier: classify(total),
            assignments: snapshot
                .assignments_for(&engineer.id)
                .map(|a| AssignmentLine::new(a, &snapshot.projects))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ManagerView<'a> {
    project_count: usize,
    engineer_count: usize,
    projects: &'a [Project],
    engineers: Vec<EngineerLoad<'a>>,
}

#[derive(Debug, Serialize, Tabled)]
struct TeamRow<'a> {
    #[tabled(rename = "Name")]
    name: &'a str,

    #[tabled(rename = "Department")]
    department: &'a str,

    #[tabled(rename = "Assignments")]
    assignments: usize,

    #[tabled(rename = "Capacity")]
    capacity: String,

    #[tabled(rename = "Status")]
    tier: Tier,
}

#[derive(Debug, Serialize, Tabled)]
struct ProjectRow<'a> {
    #[tabled(rename = "Name")]
    name: &'a str,

    #[tabled(rename = "Description")]
    description: &'a str,
}

async fn manager(ctx: CommandContext) -> Result<()> {
    ctx.require_role(Role::Manager)?;
    let client = ctx.client()?;
    let snapshot = snapshot::fetch_lenient(&client).await;

    let view = ManagerView {
        project_count: snapshot.projects.len(),
        engineer_count: snapshot.engineers.len(),
        projects: &snapshot.projects,
        engineers: snapshot
            .engineers
            .iter()
            .map(|e| EngineerLoad::new(e, &snapshot))
            .collect(),
    };

    if ctx.format == OutputFormat::Json {
        print_single(&view);
        return Ok(());
    }

    println!(
        "Projects: {}    Engineers: {}",
        view.project_count, view.engineer_count
    );

    print_heading("Team");
    let team: Vec<TeamRow<'_>> = view
        .engineers
        .iter()
        .map(|load| TeamRow {
            name: load.name,
            department: load.department,
            assignments: load.assignments.len(),
            capacity: format!("{}%", load.total),
            tier: load.tier,
        })
        .collect();
    print_output(&team, ctx.format);

    print_heading("Projects");
    let projects: Vec<ProjectRow<'_>> = snapshot
        .projects
        .iter()
        .map(|p| ProjectRow {
            name: &p.name,
            description: p.description_or_default(),
        })
        .collect();
    print_output(&projects, ctx.format);

    print_heading("Assignments");
    for load in &view.engineers {
        println!("\n{} ({})", load.name, load.department);
        if load.assignments.is_empty() {
            println!("  No assignments yet.");
        }
        for line in &load.assignments {
            println!("  {} – {}%  [{}]", line.project, line.capacity, line.id);
        }
        println!("  {}", capacity_bar(load.total));
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct EngineerView<'a> {
    profile: &'a Engineer,
    assignments: Vec<AssignmentLine<'a>>,
    total: i32,
    tier: Tier,
}

async fn engineer(ctx: CommandContext) -> Result<()> {
    let session = ctx.require_role(Role::Engineer)?;
    let client = ctx.client()?;

    let profile = fetch_own_profile(&client, session).await?;
    let snapshot = snapshot::fetch_lenient(&client).await;

    let total = total_capacity(&snapshot.assignments, &profile.id);
    let view = EngineerView {
        profile: &profile,
        assignments: effective_assignments(&snapshot.assignments, &profile.id)
            .into_iter()
            .map(|a| AssignmentLine::new(a, &snapshot.projects))
            .collect(),
        total,
        tier: classify(total),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            print_profile(view.profile);

            print_heading("Current Assignments");
            if view.assignments.is_empty() {
                println!("No assignments yet.");
            }
            for line in &view.assignments {
                println!("{} – Capacity: {}%", line.project, line.capacity);
            }

            print_heading("Total Capacity");
            println!("{}", capacity_bar(view.total));
            println!("You're using {}% of your time.", view.total);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        let engineers: Vec<Engineer> = serde_json::from_value(serde_json::json!([
            {"_id": "e1", "name": "Ada", "department": "Backend"},
            {"_id": "e2", "name": "Grace", "department": "Frontend"},
        ]))
        .unwrap();
        let projects: Vec<Project> = serde_json::from_value(serde_json::json!([
            {"_id": "p1", "name": "Atlas"},
            {"_id": "p2", "name": "Borealis"},
        ]))
        .unwrap();
        let assignments: Vec<Assignment> = serde_json::from_value(serde_json::json!([
            {"_id": "a1", "engineerId": "e1", "projectId": "p1", "capacity": 60},
            {"_id": "a2", "engineerId": "e1", "projectId": {"_id": "p2", "name": "Borealis"}, "capacity": 30},
            {"_id": "a3", "engineerId": {"_id": "e1", "name": "Ada"}, "projectId": "p1", "capacity": 10},
        ]))
        .unwrap();
        Snapshot::new(engineers, projects, assignments)
    }

    #[test]
    fn test_engineer_load_lists_every_record_but_totals_effective_ones() {
        let snapshot = snapshot();
        let load = EngineerLoad::new(&snapshot.engineers[0], &snapshot);

        assert_eq!(load.assignments.len(), 3);
        assert_eq!(load.assignments[1].project, "Borealis");
        assert_eq!(load.total, 40);
        assert_eq!(load.tier, Tier::Normal);
    }

    #[test]
    fn test_engineer_without_assignments_is_empty() {
        let snapshot = snapshot();
        let load = EngineerLoad::new(&snapshot.engineers[1], &snapshot);

        assert!(load.assignments.is_empty());
        assert_eq!(load.total, 0);
    }

    #[test]
    fn test_unknown_project_name() {
        let assignment: Assignment = serde_json::from_value(serde_json::json!(
            {"_id": "a9", "engineerId": "e1", "projectId": "p404"}
        ))
        .unwrap();
        let line = AssignmentLine::new(&assignment, &[]);
        assert_eq!(line.project, "Unknown Project");
        assert_eq!(line.capacity, 0);
    }
}
