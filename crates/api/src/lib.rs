//! GraphQL surface of the staff directory: the schema itself, the
//! error taxonomy it reports through, token handling, and the batch
//! loader single-record reads go through.

pub mod auth;
pub mod error;
pub mod loader;
pub mod schema;
