//! Domain model for persons, contracts and credentials.
//!
//! # Responsibility
//! - Define the records shared by repositories and services.
//! - Keep field-level validation next to the data it guards.
//!
//! # Invariants
//! - Surrogate ids are assigned by storage, never by callers.
//! - Contract ownership is expressed from the person side only.

pub mod contract;
pub mod credential;
pub mod person;
