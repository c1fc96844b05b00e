use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::tokens::report_warnings;
use super::{ok, print_json, read_source, warn, RunContext};
use crate::core::compiler::{CompileStats, Compiler};

#[derive(Serialize)]
struct CompileReport<'a> {
    input: String,
    output: Option<String>,
    compiled_at: String,
    bytecode: &'a [String],
    warnings: Vec<String>,
    stats: &'a CompileStats,
}

pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("spb")
}

pub fn compile(ctx: &RunContext, input: &Path, out: Option<PathBuf>, to_stdout: bool) -> Result<()> {
    let source = read_source(input)?;
    let compiler = Compiler::new().with_header(ctx.config.compiler.header);
    let (mut output, parse_warnings) = compiler.compile_with_diagnostics(&source)?;
    let compiled_at = chrono::Utc::now().to_rfc3339();
    if ctx.config.compiler.header {
        output.bytecode.insert(1, format!("; compiled {} from {}", compiled_at, input.display()));
    }

    let target = if to_stdout { None } else { Some(out.unwrap_or_else(|| default_output(input))) };
    if let Some(path) = &target {
        fs::write(path, output.render()).with_context(|| format!("writing {}", path.display()))?;
    }

    if ctx.json {
        let mut warnings: Vec<String> = parse_warnings.iter().map(|w| w.to_string()).collect();
        warnings.extend(output.warnings.iter().cloned());
        return print_json(&CompileReport {
            input: input.display().to_string(),
            output: target.as_ref().map(|p| p.display().to_string()),
            compiled_at,
            bytecode: &output.bytecode,
            warnings,
            stats: &output.stats,
        });
    }

    report_warnings(ctx, input, &source, &parse_warnings);
    for w in &output.warnings {
        warn(w);
    }
    match &target {
        Some(path) => ok(&format!(
            "compiled {} -> {} ({} declarations, {} lines)",
            input.display(),
            path.display(),
            output.stats.declarations,
            output.bytecode.len()
        )),
        None => print!("{}", output.render()),
    }
    Ok(())
}
