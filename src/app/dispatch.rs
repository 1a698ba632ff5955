use crate::cli::commands::{Cli, Commands};
use crate::cli::{interactive, report};
use crate::config::Config;
use crate::engine::{GsmParameters, validate};
use crate::prompt::{Language, PromptSelector};
use anyhow::{Context, Result};
use std::sync::Arc;

fn language(code: Option<&str>, config: &Config) -> Language {
    Language::parse_or(code, config.default_language)
}

fn run_validate(params: &GsmParameters, json: bool, lang: Language) -> Result<()> {
    let result = validate(params);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize validation result")?
        );
        return Ok(());
    }

    for warning in report::dimension_warnings(&result, lang) {
        eprintln!("{}", crate::cli::style::yellow(warning));
    }
    println!("{}", report::render(&result, lang));
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            tracing::info!(host = host.as_str(), port, provider = config.provider_name(), "Starting gateway");
            crate::gateway::run_gateway(&host, port, Arc::new(config)).await
        }
        Commands::Validate {
            length,
            breadth,
            text_pages,
            text_gsm,
            cover_gsm,
            measured_weight,
            json,
            language: code,
        } => {
            let params =
                GsmParameters::new(length, breadth, text_pages, text_gsm, cover_gsm, measured_weight);
            run_validate(&params, json, language(code.as_deref(), &config))
        }
        Commands::Interactive { language: code } => {
            interactive::run(language(code.as_deref(), &config))
        }
        Commands::Prompt { language: code } => {
            let prompts = PromptSelector::new()?;
            println!("{}", prompts.system_prompt(language(code.as_deref(), &config)));
            Ok(())
        }
    }
}
