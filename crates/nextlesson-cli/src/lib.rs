//! CLI: name resolution, day views, element listing, watch mode.

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;

pub use cli::{Cli, Command};
pub use error::{CliError, CliResult};
