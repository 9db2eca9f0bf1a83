//! carelens-core
//!
//! Pure domain types and capability contracts. No I/O and no SDK
//! dependencies: this is the shared vocabulary of the Carelens system.

pub mod capability;
pub mod error;
pub mod models;
