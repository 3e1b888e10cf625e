//! Record types returned by the backend.

use std::fmt;
use std::str::FromStr;

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::error::ModelError;
use crate::ids::{AssignmentId, EngineerId, ProjectId, UserId};
use crate::reference::{Entity, Reference};

// =============================================================================
// Roles and users
// =============================================================================

/// The two user roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Creates engineers, projects and assignments.
    Manager,
    /// Views and edits their own profile and assignments.
    #[default]
    Engineer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Engineer => "Engineer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "engineer" => Ok(Self::Engineer),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

/// Authenticated principal returned by `POST /api/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,

    pub username: String,

    /// Role the backend reports for this user, when it sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// =============================================================================
// Engineers
// =============================================================================

/// An entry in an engineer's project history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastProject {
    pub name: String,

    #[serde(rename = "desc", default)]
    pub description: String,
}

/// An engineer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    #[serde(rename = "_id")]
    pub id: EngineerId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub department: String,

    /// Profile image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Free-text bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    /// Tool names. Ordered for display, unique by value.
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub past_projects: Vec<PastProject>,
}

impl Engineer {
    /// Adds a tool unless it is blank or already listed.
    ///
    /// Returns true if the list changed.
    pub fn add_tool(&mut self, tool: &str) -> bool {
        let tool = tool.trim();
        if tool.is_empty() || self.tools.iter().any(|t| t == tool) {
            return false;
        }
        self.tools.push(tool.to_string());
        true
    }

    /// Removes every entry equal to `tool`. Returns true if any were removed.
    pub fn remove_tool(&mut self, tool: &str) -> bool {
        let before = self.tools.len();
        self.tools.retain(|t| t != tool.trim());
        self.tools.len() != before
    }

    /// Appends a past project. Both name and description are required.
    pub fn add_past_project(&mut self, name: &str, description: &str) -> bool {
        let (name, description) = (name.trim(), description.trim());
        if name.is_empty() || description.is_empty() {
            return false;
        }
        self.past_projects.push(PastProject {
            name: name.to_string(),
            description: description.to_string(),
        });
        true
    }

    /// Removes the past project at `index`.
    pub fn remove_past_project(&mut self, index: usize) -> Option<PastProject> {
        (index < self.past_projects.len()).then(|| self.past_projects.remove(index))
    }
}

impl Entity for Engineer {
    type Id = EngineerId;

    fn id(&self) -> &EngineerId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Projects
// =============================================================================

/// A project engineers can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Project {
    /// Description for display, with a placeholder when absent.
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description provided.")
    }
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &ProjectId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Assignments
// =============================================================================

/// One engineer bound to one project at a capacity percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "_id")]
    pub id: AssignmentId,

    #[serde(rename = "engineerId", default)]
    pub engineer: Reference<Engineer>,

    #[serde(rename = "projectId", default)]
    pub project: Reference<Project>,

    /// Percentage of the engineer's time. Missing, null or unreadable counts as 0.
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub capacity: Option<i32>,
}

/// Reads a capacity sent as an integer, an integral float or a numeric
/// string. Any other value becomes `None` instead of failing the record.
fn lenient_capacity<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    fn integral(value: f64) -> Option<i32> {
        if value.is_finite() && value.fract() == 0.0 {
            // Out-of-range floats saturate in the cast and are rejected by try_from.
            i32::try_from(value as i64).ok()
        } else {
            None
        }
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(value) => i32::try_from(value).ok(),
        Raw::Float(value) => integral(value),
        Raw::Text(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .and_then(|value| i32::try_from(value).ok())
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        Raw::Other(_) => None,
    })
}

impl Assignment {
    /// Capacity with missing values treated as 0.
    pub fn effective_capacity(&self) -> i32 {
        self.capacity.unwrap_or(0)
    }
}
