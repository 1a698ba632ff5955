pub mod commands;
pub mod interactive;
pub mod report;
pub mod style;

pub use commands::{Cli, Commands};
