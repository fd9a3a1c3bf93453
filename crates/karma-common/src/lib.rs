//! # Karma Common
//!
//! Shared types, errors and utilities for Karma Bot.
//!
//! This crate provides the domain newtypes ([`Handle`], [`GroupId`]), the
//! workspace-wide [`KarmaError`], and the tracing setup used by the binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use logging::*;
pub use types::*;
pub use utils::*;
