//! # Lexicon CLI
//!
//! Command line front end for resolving message keys.
//!
//! This crate wires the configuration loader, logging setup, and package
//! loader into a [`Router`](lexicon_i18n::Router) and exposes the steps
//! separately so they can be tested without spawning the binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
