// src/core/diagnostics.rs
//! Colored file:line:col diagnostics for parser warnings and CLI errors.

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize, // underline length (use 1 if unknown)
}

impl Span {
    pub fn single(line: usize, col: usize) -> Self {
        Self { line, col, len: 1 }
    }
}

pub fn print_error(filename: &str, source: &str, title: &str, span: Span) {
    eprint!("{}", render(Severity::Error, filename, source, title, &span));
}

pub fn print_warning(filename: &str, source: &str, title: &str, span: Span) {
    eprint!("{}", render(Severity::Warning, filename, source, title, &span));
}

/// Builds the report text; split out so it can be checked without a terminal.
pub fn render(severity: Severity, filename: &str, source: &str, title: &str, span: &Span) -> String {
    let label = match severity {
        Severity::Error => "error:".bright_red().bold(),
        Severity::Warning => "warning:".yellow().bold(),
    };
    let line_text = nth_line(source, span.line).unwrap_or_default();
    let gutter = format!("{:>4}", span.line);
    let underline = " ".repeat(span.col.saturating_sub(1)) + &"^".repeat(span.len.max(1));
    let underline = match severity {
        Severity::Error => underline.bright_red(),
        Severity::Warning => underline.yellow(),
    };

    let mut out = String::new();
    out.push_str(&format!("{} {}\n", label, title.bright_white()));
    out.push_str(&format!(
        "{} {}\n",
        "-->".bright_blue(),
        format!("{}:{}:{}", filename, span.line, span.col).bright_white()
    ));
    out.push_str(&format!(" {} {}\n", " ".repeat(gutter.len()).dimmed(), "|".dimmed()));
    out.push_str(&format!("{} {} {}\n", gutter.dimmed(), "|".dimmed(), line_text));
    out.push_str(&format!(
        " {} {} {}\n\n",
        " ".repeat(gutter.len()).dimmed(),
        "|".dimmed(),
        underline
    ));
    out
}

fn nth_line(src: &str, n: usize) -> Option<String> {
    src.lines().nth(n.saturating_sub(1)).map(|s| s.to_string())
}
