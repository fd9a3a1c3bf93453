//! # Karma Store
//!
//! SQLite persistence for Karma Bot.
//!
//! The store owns a single connection and serializes every operation on it,
//! so an ensure-then-adjust sequence on one (user, group) key can never lose
//! an update. Ensure operations are single insert-if-absent statements.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod models;
mod schema;
pub mod store;

pub use error::*;
pub use models::*;
pub use store::*;
