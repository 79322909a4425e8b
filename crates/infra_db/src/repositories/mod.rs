//! Repository implementations
//!
//! Repositories own the SQL and map rows; they know nothing about the
//! domain types, which the adapters convert to and from.

pub mod claims;

pub use claims::ClaimsRepository;
