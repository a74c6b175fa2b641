//! Shared types and utilities for tracelens
//!
//! This crate contains the record types read out of a GPU trace capture and
//! the unit conversions every analysis stage agrees on.

pub mod types;
pub mod utils;

// Re-export commonly used types
pub use types::{events::*, signature::*};
