//! `tokens` and `parse`: inspection views of a source file.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::{print_json, read_source, RunContext};
use crate::core::ast::AstNode;
use crate::core::diagnostics::{print_warning, Span};
use crate::core::lexer::Lexer;
use crate::core::parser::{ParseWarning, SingularisParser};

pub fn tokens(ctx: &RunContext, input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let tokens = Lexer::new(&source).tokenize();
    if ctx.json {
        return print_json(&tokens);
    }
    for t in &tokens {
        println!("{}", t);
    }
    Ok(())
}

#[derive(Serialize)]
struct ParseReport<'a> {
    declarations: &'a [AstNode],
    warnings: &'a [ParseWarning],
}

pub fn parse(ctx: &RunContext, input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let mut parser = SingularisParser::new();
    let ast = parser.parse(&source);

    if ctx.json {
        return print_json(&ParseReport { declarations: &ast, warnings: parser.warnings() });
    }
    for node in &ast {
        let p = node.position();
        match node.declared_name() {
            Some(name) => println!("{}:{}\t{} {}", p.line, p.column, node.type_name(), name),
            None => println!("{}:{}\t{}", p.line, p.column, node.type_name()),
        }
    }
    report_warnings(ctx, input, &source, parser.warnings());
    Ok(())
}

pub(crate) fn report_warnings(ctx: &RunContext, input: &Path, source: &str, warnings: &[ParseWarning]) {
    for w in warnings {
        if ctx.pretty_errors {
            let span = Span { line: w.line, col: w.column, len: w.len };
            print_warning(&input.display().to_string(), source, &w.message, span);
        } else {
            super::warn(&w.to_string());
        }
    }
}
