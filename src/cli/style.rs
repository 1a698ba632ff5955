use console::style;
use std::fmt::Display;

/// Green bold: success marks, verdicts that passed
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold: headers
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: secondary lines
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: warnings, verdicts that did not pass
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Red bold: errors
pub fn error<D: Display>(text: D) -> String {
    style(text).red().bold().to_string()
}
