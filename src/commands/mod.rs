//! Subcommand implementations. Each takes the shared `RunContext` and
//! prints either human-readable text or JSON.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::config::SingularisConfig;

pub mod ai;
pub mod compile;
pub mod glyph;
pub mod simulate;
pub mod tokens;

/// An error whose report was already printed; `main` only sets the exit code.
#[derive(Debug)]
pub struct Reported(pub anyhow::Error);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl std::error::Error for Reported {}

pub struct RunContext {
    pub config: SingularisConfig,
    pub json: bool,
    pub pretty_errors: bool,
}

impl RunContext {
    pub fn new(config: SingularisConfig) -> Self {
        Self { config, json: false, pretty_errors: false }
    }
}

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serializing result")?);
    Ok(())
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "warn:".yellow().bold(), message);
}

pub fn ok(message: &str) {
    println!("{} {}", "ok:".green().bold(), message);
}
