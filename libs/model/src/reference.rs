//! Polymorphic relation references.
//!
//! The backend populates relations inconsistently: an assignment's engineer
//! or project may be a bare identifier string, or the full related object.
//! [`Reference`] captures both shapes and is the only place where that
//! difference is inspected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A record that can be the target of a [`Reference`].
pub trait Entity {
    /// Identifier type of the record.
    type Id: Clone + Eq + fmt::Display;

    /// Returns the record's identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the name shown to users.
    fn display_name(&self) -> &str;
}

/// A relation that is either a bare identifier or an expanded record.
///
/// `null` (a populated relation whose target was deleted) and an absent key
/// both deserialize to [`Reference::Missing`], which refers to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[serde(bound(
    serialize = "T: Serialize, T::Id: Serialize",
    deserialize = "T: Deserialize<'de>, T::Id: Deserialize<'de>"
))]
pub enum Reference<T: Entity> {
    /// Only the identifier was sent.
    Id(T::Id),
    /// The backend populated the relation.
    Expanded(T),
    /// The relation is null or absent.
    Missing,
}

impl<T: Entity> Default for Reference<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T: Entity> Reference<T> {
    /// Resolves the reference to the identifier it points at.
    pub fn id(&self) -> Option<&T::Id> {
        match self {
            Self::Id(id) => Some(id),
            Self::Expanded(entity) => Some(entity.id()),
            Self::Missing => None,
        }
    }

    /// Returns true if the reference points at `id`. A missing reference
    /// points at nothing.
    pub fn refers_to(&self, id: &T::Id) -> bool {
        self.id() == Some(id)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns the populated record, if the backend expanded it.
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Self::Expanded(entity) => Some(entity),
            Self::Id(_) | Self::Missing => None,
        }
    }

    /// Returns the display name carried by an expanded reference.
    pub fn name(&self) -> Option<&str> {
        self.expanded()
            .map(Entity::display_name)
            .filter(|name| !name.is_empty())
    }

    /// Returns a display name, falling back to a lookup in `known`.
    pub fn resolve_name<'a>(&'a self, known: &'a [T]) -> Option<&'a str> {
        let id = self.id()?;
        self.name().or_else(|| {
            known
                .iter()
                .find(|entity| entity.id() == id)
                .map(Entity::display_name)
                .filter(|name| !name.is_empty())
        })
    }
}

impl<T: Entity> From<T> for Reference<T> {
    fn from(entity: T) -> Self {
        Self::Expanded(entity)
    }
}

impl<T: Entity> fmt::Display for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.id()) {
            (Some(name), _) => f.write_str(name),
            (None, Some(id)) => write!(f, "{id}"),
            (None, None) => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engineer, EngineerId, Project, ProjectId};

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: ProjectId::parse(id).unwrap(),
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_bare_id_deserializes() {
        let reference: Reference<Engineer> = serde_json::from_str("\"e1\"").unwrap();
        assert!(reference.expanded().is_none());
        assert!(reference.refers_to(&EngineerId::parse("e1").unwrap()));
    }

    #[test]
    fn test_expanded_object_deserializes() {
        let reference: Reference<Engineer> =
            serde_json::from_str(r#"{"_id":"e1","name":"Ada","username":"ada"}"#).unwrap();
        assert_eq!(reference.id().map(EngineerId::as_str), Some("e1"));
        assert_eq!(reference.name(), Some("Ada"));
    }

    #[test]
    fn test_both_shapes_resolve_to_same_id() {
        let bare: Reference<Project> = serde_json::from_str("\"p1\"").unwrap();
        let expanded: Reference<Project> =
            serde_json::from_str(r#"{"_id":"p1","name":"Atlas"}"#).unwrap();
        assert_eq!(bare.id(), expanded.id());
    }

    #[test]
    fn test_resolve_name_falls_back_to_lookup() {
        let known = vec![project("p1", "Atlas"), project("p2", "Borealis")];
        let bare: Reference<Project> = Reference::Id(ProjectId::parse("p2").unwrap());
        assert_eq!(bare.resolve_name(&known), Some("Borealis"));

        let missing: Reference<Project> = Reference::Id(ProjectId::parse("p9").unwrap());
        assert_eq!(missing.resolve_name(&known), None);
    }

    #[test]
    fn test_display_prefers_name() {
        let expanded = Reference::from(project("p1", "Atlas"));
        assert_eq!(expanded.to_string(), "Atlas");
        let bare: Reference<Project> = Reference::Id(ProjectId::parse("p1").unwrap());
        assert_eq!(bare.to_string(), "p1");
    }

    #[test]
    fn test_null_reference_is_missing() {
        let reference: Reference<Project> = serde_json::from_str("null").unwrap();
        assert!(reference.is_missing());
        assert_eq!(reference.id(), None);
        assert!(!reference.refers_to(&ProjectId::parse("p1").unwrap()));
        assert_eq!(reference.resolve_name(&[project("p1", "Atlas")]), None);
        assert_eq!(reference.to_string(), "unknown");
        assert_eq!(serde_json::to_string(&reference).unwrap(), "null");
    }
}
