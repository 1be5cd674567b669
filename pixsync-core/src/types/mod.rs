//! Project resource data model
//!
//! Typed resource documents, the in-memory resource graph, and the
//! filesystem asset types consumed by the merger.

mod assets;
mod resources;

pub use assets::*;
pub use resources::*;
