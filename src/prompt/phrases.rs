//! Localized user-facing text. Every key used here exists in each file under
//! `locales/`; the parity tests below fail when a translation is missing.

use super::language::Language;
use crate::engine::{
    Calculations, GsmStatus, ValidationResult, ValidationStatus, below_cover_weight, cover_weight_g,
};
use crate::protocol::{Parameter, UnitCheck};

/// Round for display: at most two decimals, no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    rounded.to_string()
}

pub fn parameter_label(param: Parameter, lang: Language) -> String {
    let locale = lang.code();
    match param {
        Parameter::Length => t!("parameter.length", locale = locale),
        Parameter::Breadth => t!("parameter.breadth", locale = locale),
        Parameter::TextPages => t!("parameter.text_pages", locale = locale),
        Parameter::TextGsm => t!("parameter.text_gsm", locale = locale),
        Parameter::CoverGsm => t!("parameter.cover_gsm", locale = locale),
        Parameter::MeasuredWeight => t!("parameter.measured_weight", locale = locale),
    }
    .into_owned()
}

/// The one question asked to collect `param`.
pub fn parameter_question(param: Parameter, lang: Language) -> String {
    let locale = lang.code();
    match param {
        Parameter::Length => t!("question.length", locale = locale),
        Parameter::Breadth => t!("question.breadth", locale = locale),
        Parameter::TextPages => t!("question.text_pages", locale = locale),
        Parameter::TextGsm => t!("question.text_gsm", locale = locale),
        Parameter::CoverGsm => t!("question.cover_gsm", locale = locale),
        Parameter::MeasuredWeight => t!("question.measured_weight", locale = locale),
    }
    .into_owned()
}

/// Confirmation question for a suspicious dimension, `None` when the value
/// is plausible as centimeters.
pub fn unit_question(check: UnitCheck, raw: f64, lang: Language) -> Option<String> {
    let locale = lang.code();
    let value = format_number(raw);
    let text = match check {
        UnitCheck::Centimeters => return None,
        UnitCheck::LikelyInches { as_centimeters } => t!(
            "unit.inches",
            locale = locale,
            value = value,
            converted = format_number(as_centimeters)
        ),
        UnitCheck::LikelyMillimeters { as_centimeters } => t!(
            "unit.millimeters",
            locale = locale,
            value = value,
            converted = format_number(as_centimeters)
        ),
    };
    Some(text.into_owned())
}

/// Non-interactive warning for a dimension that trips the unit policy.
pub fn unit_warning(param: Parameter, check: UnitCheck, raw: f64, lang: Language) -> Option<String> {
    let converted = check.converted()?;
    Some(
        t!(
            "unit.warning",
            locale = lang.code(),
            name = parameter_label(param, lang),
            value = format_number(raw),
            converted = format_number(converted)
        )
        .into_owned(),
    )
}

/// Plain-language description of a validation result.
///
/// States that the specified GSM is correct when the check passed and gives
/// the back-solved GSM instead when it did not.
pub fn describe_result(result: &ValidationResult, lang: Language) -> String {
    let locale = lang.code();
    let Some(calc) = result.calculations else {
        return t!("result.error", locale = locale, message = result.message).into_owned();
    };

    let measured = format_number(calc.measured_weight);
    let min = format_number(calc.min_estimated_weight);
    let max = format_number(calc.max_estimated_weight);
    let actual = format_number(calc.actual_gsm_used);
    let specified = format_number(result.inputs.text_gsm);

    let text = match (result.gsm_status, result.status) {
        (Some(GsmStatus::Correct), _) => t!(
            "result.passed",
            locale = locale,
            measured = measured,
            min = min,
            max = max,
            gsm = specified
        ),
        (_, ValidationStatus::Underweight) if below_cover_weight(&result.inputs) => t!(
            "result.below_cover",
            locale = locale,
            measured = measured,
            cover = format_number(cover_weight_g(&result.inputs))
        ),
        (_, ValidationStatus::Underweight) => t!(
            "result.underweight",
            locale = locale,
            measured = measured,
            min = min,
            max = max,
            actual = actual,
            specified = specified
        ),
        _ => t!(
            "result.overweight",
            locale = locale,
            measured = measured,
            min = min,
            max = max,
            actual = actual,
            specified = specified
        ),
    };
    text.into_owned()
}

/// One-line breakdown of the nominal weight, for the CLI summary.
pub fn nominal_line(calc: &Calculations, lang: Language) -> String {
    t!(
        "result.nominal",
        locale = lang.code(),
        nominal = format_number(calc.nominal_weight),
        area = calc.page_area
    )
    .into_owned()
}

/// Generic apology shown instead of any internal failure.
pub fn apology(lang: Language) -> String {
    t!("error.apology", locale = lang.code()).into_owned()
}

pub fn reset_confirmation(lang: Language) -> String {
    t!("reset.confirmation", locale = lang.code()).into_owned()
}

/// Fixed lines of the terminal dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliText {
    Welcome,
    InvalidNumber,
    AnotherBook,
    Goodbye,
}

pub fn cli_text(which: CliText, lang: Language) -> String {
    let locale = lang.code();
    match which {
        CliText::Welcome => t!("cli.welcome", locale = locale),
        CliText::InvalidNumber => t!("cli.invalid_number", locale = locale),
        CliText::AnotherBook => t!("cli.another_book", locale = locale),
        CliText::Goodbye => t!("cli.goodbye", locale = locale),
    }
    .into_owned()
}
