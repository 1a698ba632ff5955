use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Languages the assistant speaks. Every locale file must cover all of them.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    /// Locale code as used by the locale files and the HTTP API.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Parse a client-supplied code, falling back for unknown or missing codes.
    pub fn parse_or(code: Option<&str>, fallback: Language) -> Language {
        code.and_then(|c| Language::from_str(c.trim()).ok())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Language::from_str("fr").unwrap(), Language::Fr);
        assert_eq!(Language::from_str("EN").unwrap(), Language::En);
        assert_eq!(Language::Fr.code(), "fr");
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(Language::parse_or(Some("de"), Language::Fr), Language::Fr);
        assert_eq!(Language::parse_or(None, Language::En), Language::En);
        assert_eq!(Language::parse_or(Some(" fr "), Language::En), Language::Fr);
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"fr\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::En);
    }
}
