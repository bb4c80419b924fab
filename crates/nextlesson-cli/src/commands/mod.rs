//! Command implementations.

pub mod day;
pub mod list;
pub mod resolve;
pub mod watch;
