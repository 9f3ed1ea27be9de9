//! Shared domain primitives for the Courtside platform: identifiers,
//! configuration, errors, and the scheduling core.

pub mod config;
pub mod error;
pub mod schedule;
pub mod types;

#[cfg(test)]
mod schedule_tests;
