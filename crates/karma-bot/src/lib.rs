//! # Karma Bot
//!
//! Per-chat karma voting for Discord.
//!
//! This is the main binary crate that wires configuration, storage and the
//! command handlers together and runs the Poise framework.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;

pub use bot::*;
pub use error::*;
