//! Typed identifiers for backend resources.

use crate::define_id;

define_id!(EngineerId, "engineer id");
define_id!(ProjectId, "project id");
define_id!(AssignmentId, "assignment id");
define_id!(UserId, "user id");
