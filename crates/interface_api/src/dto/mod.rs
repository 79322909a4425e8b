//! Request and response bodies

pub mod claims;
pub mod intake;
pub mod notes;
