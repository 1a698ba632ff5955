use super::engine::TeraEngine;
use super::language::Language;
use super::phrases::{format_number, parameter_label};
use crate::engine::GsmStatus;
use crate::error::PromptError;
use crate::protocol::{CM_PER_INCH, CM_PER_MM, Parameter, UnitPolicy};
use crate::tools::FunctionKind;
use serde::Serialize;
use tera::Context;

// Structure only. All wording comes from the locale files, so the languages
// cannot disagree on which parameters or rules exist.
const SYSTEM_PROMPT_TEMPLATE: &str = "\
{{ intro }}

{{ parameters_heading }}
{% for param in parameters %}{{ loop.index }}. {{ param.label }} ({{ param.key }}, {{ param.unit }})
{% endfor %}
{{ rules_heading }}
{% for rule in rules %}- {{ rule }}
{% endfor %}";

const SYSTEM_PROMPT_NAME: &str = "system_prompt";

#[derive(Debug, Serialize)]
struct ParameterLine {
    label: String,
    key: &'static str,
    unit: String,
}

fn ensure_defaults(engine: &mut TeraEngine) -> Result<(), PromptError> {
    engine.add_template(SYSTEM_PROMPT_NAME, SYSTEM_PROMPT_TEMPLATE)
}

/// Protocol rules in presentation order.
fn rules(lang: Language, policy: &UnitPolicy) -> Vec<String> {
    let locale = lang.code();
    let low = format_number(policy.min_cm);
    let high = format_number(policy.max_cm);
    vec![
        t!("prompt.one_at_a_time", locale = locale).into_owned(),
        t!("prompt.unit_small", locale = locale, low = low, factor = CM_PER_INCH).into_owned(),
        t!("prompt.unit_large", locale = locale, high = high, factor = CM_PER_MM).into_owned(),
        t!("prompt.unit_ok", locale = locale, low = low, high = high).into_owned(),
        t!(
            "prompt.invoke",
            locale = locale,
            function = FunctionKind::ValidateBookGsm.name()
        )
        .into_owned(),
        t!("prompt.present_correct", locale = locale, status = GsmStatus::Correct).into_owned(),
        t!(
            "prompt.present_calculated",
            locale = locale,
            status = GsmStatus::Calculated
        )
        .into_owned(),
        t!("prompt.new_book", locale = locale).into_owned(),
    ]
}

/// Render the instruction text for one language.
pub fn build_system_prompt(
    engine: &mut TeraEngine,
    lang: Language,
    policy: &UnitPolicy,
) -> Result<String, PromptError> {
    ensure_defaults(engine)?;
    let locale = lang.code();

    let parameters: Vec<ParameterLine> = Parameter::ORDERED
        .into_iter()
        .map(|param| ParameterLine {
            label: parameter_label(param, lang),
            key: param.key(),
            unit: param.unit().to_string(),
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("intro", &t!("prompt.intro", locale = locale));
    ctx.insert("parameters_heading", &t!("prompt.parameters_heading", locale = locale));
    ctx.insert("parameters", &parameters);
    ctx.insert("rules_heading", &t!("prompt.rules_heading", locale = locale));
    ctx.insert("rules", &rules(lang, policy));

    engine.render(SYSTEM_PROMPT_NAME, &ctx)
}

/// Pure mapping from language to instruction text, rendered once up front.
#[derive(Debug, Clone)]
pub struct PromptSelector {
    en: String,
    fr: String,
}

impl PromptSelector {
    pub fn new() -> Result<Self, PromptError> {
        let mut engine = TeraEngine::new();
        let policy = UnitPolicy::default();
        Ok(Self {
            en: build_system_prompt(&mut engine, Language::En, &policy)?,
            fr: build_system_prompt(&mut engine, Language::Fr, &policy)?,
        })
    }

    pub fn system_prompt(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::Fr => &self.fr,
        }
    }

    /// Instructions for the follow-up call that only phrases a result.
    pub fn phrasing_prompt(&self, lang: Language) -> String {
        format!(
            "{}\n{}",
            self.system_prompt(lang),
            t!("prompt.phrasing", locale = lang.code())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> PromptSelector {
        PromptSelector::new().unwrap()
    }

    fn rule_lines(prompt: &str) -> Vec<&str> {
        prompt.lines().filter(|line| line.starts_with("- ")).collect()
    }

    #[test]
    fn prompt_lists_parameters_in_collection_order() {
        let prompt = selector().system_prompt(Language::En).to_string();
        let positions: Vec<usize> = Parameter::ORDERED
            .iter()
            .map(|p| prompt.find(&format!("({}, ", p.key())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.contains("1. Length (length, cm)"));
        assert!(prompt.contains("6. Measured weight (measuredWeight, g)"));
    }

    #[test]
    fn prompt_encodes_unit_policy_and_presentation_rules() {
        let selector = selector();
        for lang in Language::ALL {
            let prompt = selector.system_prompt(lang);
            for needle in ["10", "30", "2.54", "0.1", "validate_book_gsm", "CORRECT", "CALCULATED", "actualGSMUsed"] {
                assert!(prompt.contains(needle), "{lang} prompt lacks {needle}");
            }
        }
    }

    #[test]
    fn languages_have_structural_parity() {
        let selector = selector();
        let en = selector.system_prompt(Language::En);
        let fr = selector.system_prompt(Language::Fr);
        assert_ne!(en, fr);

        assert_eq!(rule_lines(en).len(), rule_lines(fr).len());
        assert_eq!(en.lines().count(), fr.lines().count());
        for param in Parameter::ORDERED {
            let key = format!("({}, ", param.key());
            assert_eq!(en.matches(&key).count(), 1);
            assert_eq!(fr.matches(&key).count(), 1);
        }
        for token in ["validate_book_gsm", "CORRECT", "CALCULATED", "2.54", "0.1"] {
            assert_eq!(en.matches(token).count(), fr.matches(token).count(), "{token}");
        }
    }

    #[test]
    fn french_prompt_has_no_english_line() {
        // A clause missing from fr.yml would be rendered in English here.
        let selector = selector();
        let fr_prompt = selector.phrasing_prompt(Language::Fr);
        let fr: Vec<&str> = fr_prompt.lines().collect();
        let en = selector.phrasing_prompt(Language::En);
        for line in en.lines().filter(|line| !line.trim().is_empty()) {
            assert!(!fr.contains(&line), "untranslated prompt line: {line}");
        }
    }

    #[test]
    fn intro_greets_and_explains_gsm() {
        let selector = selector();
        let en = selector.system_prompt(Language::En);
        assert!(en.contains("Greet the user warmly"));
        assert!(en.contains("grams per square meter"));
        let fr = selector.system_prompt(Language::Fr);
        assert!(fr.contains("Accueillez chaleureusement"));
        assert!(fr.contains("grammes par mètre carré"));
    }

    #[test]
    fn no_placeholder_survives_rendering() {
        let selector = selector();
        for lang in Language::ALL {
            let prompt = selector.phrasing_prompt(lang);
            assert!(!prompt.contains("%{"));
            assert!(!prompt.contains("{{"));
            assert!(!prompt.contains(&format!("{}.prompt", lang.code())));
        }
    }

    #[test]
    fn phrasing_prompt_extends_system_prompt() {
        let selector = selector();
        let phrasing = selector.phrasing_prompt(Language::En);
        assert!(phrasing.starts_with(selector.system_prompt(Language::En)));
        assert!(phrasing.len() > selector.system_prompt(Language::En).len());
    }
}
