use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::{print_json, read_source, RunContext};
use crate::ai::heuristic::HeuristicProvider;
use crate::ai::{assist as ai_assist, explain_code, AiRegistry};

fn registry(ctx: &RunContext) -> AiRegistry {
    AiRegistry::new(ctx.config.ai.model.as_deref())
}

fn provider_name<'a>(ctx: &'a RunContext, flag: &'a Option<String>) -> Option<&'a str> {
    flag.as_deref().or(ctx.config.ai.provider.as_deref())
}

pub fn explain(ctx: &RunContext, input: &Path, provider: &Option<String>) -> Result<()> {
    let source = read_source(input)?;
    let explanation = explain_code(&source, &registry(ctx), provider_name(ctx, provider));
    if ctx.json {
        return print_json(&explanation);
    }
    println!("{} {}", "summary:".bright_cyan().bold(), explanation.summary);
    for d in &explanation.details {
        println!("  - {}", d);
    }
    if !explanation.suggestions.is_empty() {
        println!("{}", "suggestions:".bright_cyan().bold());
        for s in &explanation.suggestions {
            println!("  * {}", s);
        }
    }
    println!("{}", format!("(source: {})", explanation.source).dimmed());
    Ok(())
}

pub fn assist(ctx: &RunContext, question: &str, file: Option<&Path>, provider: &Option<String>) -> Result<()> {
    let source = match file {
        Some(path) => Some(read_source(path)?),
        None => None,
    };
    let answer = ai_assist(question, source.as_deref(), &registry(ctx), provider_name(ctx, provider));
    if ctx.json {
        return print_json(&answer);
    }
    println!("{}", answer.answer);
    for s in &answer.suggestions {
        println!("  * {}", s);
    }
    println!("{}", format!("(source: {})", answer.source).dimmed());
    Ok(())
}

#[derive(Serialize)]
struct ProviderList {
    providers: Vec<&'static str>,
    fallback: &'static str,
}

pub fn list(ctx: &RunContext) -> Result<()> {
    let list = ProviderList { providers: registry(ctx).list(), fallback: HeuristicProvider.name() };
    if ctx.json {
        return print_json(&list);
    }
    for p in &list.providers {
        println!("{}", p);
    }
    println!("{} (fallback)", list.fallback);
    Ok(())
}
