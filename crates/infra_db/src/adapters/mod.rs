//! Domain Adapters
//!
//! Implementations of domain ports backed by PostgreSQL. Each adapter
//! translates between domain types and the row types of its repository.

pub mod claims;

pub use claims::PostgresClaimStore;
