//! Snapshot loading.
//!
//! The three collections are fetched concurrently. Views that only display
//! data tolerate a failed collection (logged, left empty); commands that
//! validate a write need all three.

use anyhow::{Context, Result};
use rm_model::{Assignment, Engineer, Project, Snapshot};
use tracing::error;

use crate::client::ApiClient;
use crate::error::CliError;

pub const ENGINEERS_PATH: &str = "/api/engineers";
pub const PROJECTS_PATH: &str = "/api/projects";
pub const ASSIGNMENTS_PATH: &str = "/api/assignments";

/// Fetches a snapshot, failing if any collection cannot be loaded.
pub async fn fetch(client: &ApiClient) -> Result<Snapshot> {
    let (engineers, projects, assignments) = tokio::join!(
        client.get::<Vec<Engineer>>(ENGINEERS_PATH),
        client.get::<Vec<Project>>(PROJECTS_PATH),
        client.get::<Vec<Assignment>>(ASSIGNMENTS_PATH),
    );

    Ok(Snapshot::new(
        engineers.context("Failed to load engineers")?,
        projects.context("Failed to load projects")?,
        assignments.context("Failed to load assignments")?,
    ))
}

/// Fetches a snapshot for display. Failed collections are logged and left empty.
pub async fn fetch_lenient(client: &ApiClient) -> Snapshot {
    let (engineers, projects, assignments) = tokio::join!(
        client.get::<Vec<Engineer>>(ENGINEERS_PATH),
        client.get::<Vec<Project>>(PROJECTS_PATH),
        client.get::<Vec<Assignment>>(ASSIGNMENTS_PATH),
    );

    Snapshot::new(
        or_empty(engineers, "engineers"),
        or_empty(projects, "projects"),
        or_empty(assignments, "assignments"),
    )
}

fn or_empty<T>(result: Result<Vec<T>, CliError>, collection: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, collection, "Failed to load collection");
            Vec::new()
        }
    }
}
