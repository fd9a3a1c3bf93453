//! # Karma I18n
//!
//! Reply texts for Karma Bot, kept in Fluent resources.
//!
//! Locale files live in `locales/<tag>/karma.ftl`, are embedded at compile
//! time, and are checked by the build script for syntax errors and key
//! consistency across locales.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod messages;

pub use loader::*;
pub use messages::*;
