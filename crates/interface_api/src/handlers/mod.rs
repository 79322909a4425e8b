//! Request handlers

pub mod claims;
pub mod health;
pub mod intake;
pub mod notes;
