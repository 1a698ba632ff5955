//! Per-language instructions and user-facing text.

mod builder;
mod engine;
mod language;
mod phrases;

pub use builder::{PromptSelector, build_system_prompt};
pub use engine::TeraEngine;
pub use language::Language;
pub use phrases::{
    CliText, apology, cli_text, describe_result, format_number, nominal_line, parameter_label,
    parameter_question, reset_confirmation, unit_question, unit_warning,
};
