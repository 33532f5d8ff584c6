//! CLI subcommand implementations.

pub mod end;
pub mod log;
pub mod report;
pub mod start;
pub mod util;
