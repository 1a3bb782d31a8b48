//! Identity-domain identifiers, projects, and token models.

pub mod id;
pub mod project;
pub mod token;

pub use id::*;
pub use project::*;
pub use token::*;
