//! # Karma Commands
//!
//! Command parsing, karma rules and the Discord command handlers for Karma Bot.
//!
//! [`parser`] and [`service`] hold the platform independent logic; the
//! remaining modules adapt it to Poise prefix commands.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod delivery;
pub mod framework;
pub mod greeting;
pub mod parser;
pub mod rating;
pub mod service;
pub mod top;
pub mod vote;

pub use framework::*;
pub use parser::*;
pub use service::*;
