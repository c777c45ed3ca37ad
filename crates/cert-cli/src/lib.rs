//! Library side of the `certgen` command-line tool.
//!
//! The binary owns argument parsing and presentation; the stages it runs
//! live here so they can be driven from tests.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
