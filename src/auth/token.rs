//! Scoped credentials and the metadata the identity service issues alongside them.

pub mod metadata;
pub mod secret;

pub use metadata::*;
pub use secret::*;
