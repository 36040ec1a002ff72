//! # Lexicon Common
//!
//! Shared types, logging setup, and test helpers for Lexicon.
//!
//! This crate provides the foundational error type and the tracing
//! subscriber setup used by every other crate in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use logging::*;
pub use types::*;
