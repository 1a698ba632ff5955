//! Deterministic terminal rendition of the collection protocol.

use super::report;
use super::style;
use crate::engine::validate;
use crate::prompt::{CliText, Language, cli_text, parameter_question, unit_question};
use crate::protocol::{Parameter, ParameterCollector, UnitPolicy};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};

/// Parse a typed answer such as `20`, `20.5 cm` or `20,5`.
pub fn parse_answer(input: &str, param: Parameter) -> Option<f64> {
    let numeric: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let value: f64 = numeric.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    if param == Parameter::TextPages && value.fract() != 0.0 {
        return None;
    }
    Some(value)
}

fn ask_number(param: Parameter, lang: Language) -> Result<f64> {
    let answer: String = Input::new()
        .with_prompt(parameter_question(param, lang))
        .validate_with(|input: &String| -> Result<(), String> {
            parse_answer(input, param)
                .map(|_| ())
                .ok_or_else(|| cli_text(CliText::InvalidNumber, lang))
        })
        .interact_text()?;
    parse_answer(&answer, param).context("answer failed validation")
}

/// Ask for one parameter, with the unit sub-dialogue for dimensions.
fn ask_parameter(param: Parameter, lang: Language, policy: &UnitPolicy) -> Result<f64> {
    let raw = ask_number(param, lang)?;
    if !param.is_dimension() {
        return Ok(raw);
    }

    let check = policy.check(raw);
    let Some(question) = unit_question(check, raw, lang) else {
        return Ok(raw);
    };
    let confirmed = Confirm::new()
        .with_prompt(question)
        .default(true)
        .interact()?;
    Ok(match check.converted() {
        Some(converted) if confirmed => converted,
        _ => raw,
    })
}

pub fn run(lang: Language) -> Result<()> {
    println!("{}", style::header(cli_text(CliText::Welcome, lang)));
    let policy = UnitPolicy::default();
    let mut collector = ParameterCollector::new();

    loop {
        collector.begin();
        while let Some(param) = collector.expected() {
            let value = ask_parameter(param, lang, &policy)?;
            collector.supply(param, value)?;
        }

        let params = collector
            .parameters()
            .context("all six values were collected but the set is incomplete")?;
        let result = validate(&params);
        collector.mark_validated()?;
        tracing::debug!(status = %result.status, "Interactive validation finished");

        println!();
        println!("{}", report::render(&result, lang));
        println!();

        let again = Confirm::new()
            .with_prompt(cli_text(CliText::AnotherBook, lang))
            .default(false)
            .interact()?;
        if !again {
            break;
        }
    }

    println!("{}", style::dim(cli_text(CliText::Goodbye, lang)));
    Ok(())
}
