//! Terminal rendering of a validation result.

use super::style;
use crate::engine::{ValidationResult, ValidationStatus};
use crate::prompt::{Language, describe_result, nominal_line, unit_warning};
use crate::protocol::{Parameter, UnitPolicy};

/// Unit-policy warnings for the dimensions of an already complete input set.
pub fn dimension_warnings(result: &ValidationResult, lang: Language) -> Vec<String> {
    let policy = UnitPolicy::default();
    [
        (Parameter::Length, result.inputs.length_cm),
        (Parameter::Breadth, result.inputs.breadth_cm),
    ]
    .into_iter()
    .filter_map(|(param, raw)| unit_warning(param, policy.check(raw), raw, lang))
    .collect()
}

pub fn render(result: &ValidationResult, lang: Language) -> String {
    let description = describe_result(result, lang);
    let verdict = match result.status {
        ValidationStatus::Passed => style::success(&description),
        ValidationStatus::Error => style::error(&description),
        ValidationStatus::Underweight | ValidationStatus::Overweight => {
            style::yellow(&description)
        }
    };

    match &result.calculations {
        Some(calc) => format!("{verdict}\n{}", style::dim(nominal_line(calc, lang))),
        None => verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GsmParameters, validate};

    #[test]
    fn warns_only_for_suspicious_dimensions() {
        let ok = validate(&GsmParameters::new(20.0, 14.0, 200, 80.0, 250.0, 238.0));
        assert!(dimension_warnings(&ok, Language::En).is_empty());

        let inches = validate(&GsmParameters::new(8.0, 140.0, 200, 80.0, 250.0, 238.0));
        let warnings = dimension_warnings(&inches, Language::En);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("20.32"));
        assert!(warnings[1].contains("14"));
    }

    #[test]
    fn render_includes_nominal_line_when_calculated() {
        console::set_colors_enabled(false);
        let result = validate(&GsmParameters::new(20.0, 14.0, 200, 80.0, 250.0, 238.0));
        let text = render(&result, Language::En);
        assert!(text.contains("238 g"));
        assert!(text.contains("0.028"));

        let error = validate(&GsmParameters::new(20.0, 14.0, 0, 80.0, 250.0, 238.0));
        assert_eq!(render(&error, Language::En).lines().count(), 1);
    }
}
