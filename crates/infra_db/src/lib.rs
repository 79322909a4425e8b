//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the claim intake domain using SQLx.
//!
//! # Architecture
//!
//! ```text
//! ClaimStorePort (domain_claims)
//!        ▲
//! PostgresClaimStore  (adapters)   domain <-> row conversion, PortError mapping
//!        │
//! ClaimsRepository    (repositories)   SQL, transactions, row types
//!        │
//!     PgPool          (pool)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! let store = PostgresClaimStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresClaimStore;
pub use error::DatabaseError;
pub use pool::{create_pool, ping, DatabaseConfig, DatabasePool};
pub use repositories::ClaimsRepository;
