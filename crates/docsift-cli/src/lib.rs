//! docsift CLI library.
//!
//! Argument parsing, template loading, and command execution for the
//! `docsift` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
