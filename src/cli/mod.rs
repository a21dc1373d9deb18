//! CLI library modules for the vgrel binary.
//!
//! Commands return `Result<(), String>`; the binary maps errors to an exit
//! code.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{CategoryKind, Cli, Commands, OutputFormat};
pub use utils::Context;
