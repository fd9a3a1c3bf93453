//! # Karma Config
//!
//! Type-safe configuration for Karma Bot.
//!
//! Configuration comes from an optional TOML or YAML file named by
//! `KARMABOT_CONFIG`, overlaid with `KARMABOT_*` environment variables.
//! The bot token is required; a missing token is a fatal startup error.

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
