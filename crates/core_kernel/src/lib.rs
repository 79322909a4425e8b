//! Core Kernel - Foundational types for the claim intake system
//!
//! This crate provides the building blocks shared by the domain, storage and
//! API layers:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers for claims and their records
//! - Port infrastructure for swappable storage adapters

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{ClaimId, NoteId, HistoryId, AiAssessmentId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
