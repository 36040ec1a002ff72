//! # Lexicon Config
//!
//! Configuration management for Lexicon.
//!
//! This crate provides configuration loading (YAML, TOML or JSON),
//! environment overrides, validation, and atomic saving.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
