//! # rm-model
//!
//! Records exchanged with the resource manager backend.
//!
//! ## Design Principles
//!
//! - The backend owns identifiers and persistence; the client only holds a
//!   transient snapshot fetched per command
//! - Identifiers are opaque strings issued by the backend, typed per resource
//! - A relation may arrive as a bare identifier or as a populated object;
//!   both shapes go through [`Reference`] and its single resolver
//!
//! ## Records
//!
//! - [`Engineer`]: profile, tool list and past projects
//! - [`Project`]: name and description
//! - [`Assignment`]: one engineer bound to one project at a capacity percentage
//! - [`User`]: the authenticated principal returned by login

mod error;
mod ids;
mod macros;
mod records;
mod reference;
mod snapshot;

pub use error::ModelError;
pub use ids::*;
pub use records::*;
pub use reference::{Entity, Reference};
pub use snapshot::Snapshot;
