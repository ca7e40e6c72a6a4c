//! In-memory persistence for the staff directory: the record store
//! itself, the filter/sort/paginate pipeline that queries run through,
//! a TTL cache for single-record reads, and the demo seed set.

pub mod cache;
pub mod error;
pub mod query;
pub mod records;
pub mod seed;

pub use error::StoreError;
