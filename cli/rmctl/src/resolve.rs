//! Name → ID resolution helpers.
//!
//! The API is ID-addressed. For UX, the CLI accepts either backend IDs or
//! exact names, resolved against the snapshot fetched for the command.

use anyhow::Result;
use rm_model::{Entity, Snapshot};

use crate::error::CliError;

/// Resolves `ident` to the ID of an engineer in `snapshot`.
pub fn resolve_engineer_id(snapshot: &Snapshot, ident: &str) -> Result<rm_model::EngineerId> {
    resolve_in(&snapshot.engineers, ident, "Engineer")
}

/// Resolves `ident` to the ID of a project in `snapshot`.
pub fn resolve_project_id(snapshot: &Snapshot, ident: &str) -> Result<rm_model::ProjectId> {
    resolve_in(&snapshot.projects, ident, "Project")
}

fn resolve_in<T: Entity>(items: &[T], ident: &str, kind: &str) -> Result<T::Id> {
    let ident = ident.trim();
    if ident.is_empty() {
        anyhow::bail!("{kind} cannot be empty");
    }

    if let Some(item) = items.iter().find(|item| item.id().to_string() == ident) {
        return Ok(item.id().clone());
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| item.display_name() == ident)
        .collect();

    match matches.as_slice() {
        [] => Err(CliError::NotFound(format!("{kind} '{ident}' not found")).into()),
        [only] => Ok(only.id().clone()),
        many => {
            let ids = many
                .iter()
                .map(|item| item.id().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            anyhow::bail!("{kind} name '{ident}' is ambiguous ({ids}). Use an explicit ID.");
        }
    }
}
