//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims intake workspace.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built intake forms, damage items and uploads
//! - `builders`: Builders for stored claims in any status
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertion helpers for estimates and history
//! - `generators`: Proptest strategies for claim data

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;

pub use domain_claims::ports::mock::InMemoryClaimStore;
