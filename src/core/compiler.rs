// src/core/compiler.rs
//! Singularis compiler pipeline: validate, parse, lower each declaration to
//! human-readable bytecode lines. The output is for display only; nothing
//! executes it.

use std::collections::HashSet;

use serde::Serialize;

use crate::core::{
    ast::{AstNode, ContractStatement, ANONYMOUS_CONTRACT},
    error::{Result, SingularisError},
    parser::{ParseWarning, SingularisParser},
};
use crate::debug_log;

pub const BYTECODE_HEADER: &str = "; SINGULARIS PRIME bytecode";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompileStats {
    pub declarations: usize,
    pub contracts: usize,
    pub enforce_statements: usize,
    pub quantum_keys: usize,
    pub deployments: usize,
    pub functions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileOutput {
    pub bytecode: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: CompileStats,
}

impl CompileOutput {
    pub fn render(&self) -> String {
        let mut out = self.bytecode.join("\n");
        out.push('\n');
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    emit_header: bool,
}

impl Compiler {
    pub fn new() -> Self { Compiler { emit_header: false } }

    pub fn with_header(mut self, emit_header: bool) -> Self {
        self.emit_header = emit_header;
        self
    }

    /// Source → bytecode. Empty input is the only hard error; parser
    /// warnings are folded into the output's warnings.
    pub fn compile_source(&self, code: &str) -> Result<CompileOutput> {
        let (mut output, parse_warnings) = self.compile_with_diagnostics(code)?;
        let mut warnings: Vec<String> = parse_warnings.iter().map(|w| w.to_string()).collect();
        warnings.append(&mut output.warnings);
        output.warnings = warnings;
        Ok(output)
    }

    /// Like `compile_source`, but keeps the parser warnings separate so callers
    /// can report them with their source positions.
    pub fn compile_with_diagnostics(&self, code: &str) -> Result<(CompileOutput, Vec<ParseWarning>)> {
        let summary = self.validate_and_summarize(code)?;
        debug_log!("compiler: {}", summary);

        let mut parser = SingularisParser::new();
        let ast = parser.parse(code);
        debug_log!("compiler: {} declarations parsed", ast.len());

        Ok((self.compile_ast(&ast), parser.warnings().to_vec()))
    }

    pub fn compile_ast(&self, ast: &[AstNode]) -> CompileOutput {
        let mut bytecode = Vec::new();
        let mut warnings = Vec::new();
        let mut stats = CompileStats { declarations: ast.len(), ..Default::default() };
        let mut seen_names: HashSet<String> = HashSet::new();

        if self.emit_header {
            bytecode.push(BYTECODE_HEADER.to_string());
        }

        for (idx, node) in ast.iter().enumerate() {
            let synthesized = matches!(node, AstNode::ContractDeclaration { name, .. } if name == ANONYMOUS_CONTRACT);
            if let Some(name) = node.declared_name().filter(|_| !synthesized) {
                if !name.is_empty() && !seen_names.insert(name.to_string()) {
                    warnings.push(format!("duplicate declaration '{}' at line {}", name, node.position().line));
                }
            }
            match node {
                AstNode::ImportDeclaration { path, .. } => {
                    bytecode.push(format!("IMPORT \"{}\"", path));
                }
                AstNode::Annotation { name, arguments, position } => {
                    if arguments.is_empty() {
                        bytecode.push(format!("ANNOTATE @{}", name));
                    } else {
                        bytecode.push(format!("ANNOTATE @{}({})", name, arguments.join(", ")));
                    }
                    let dangling = !matches!(
                        ast.get(idx + 1),
                        Some(next) if next.declared_name().is_some() || matches!(next, AstNode::Annotation { .. })
                    );
                    if dangling {
                        warnings.push(format!("annotation @{} at line {} does not precede a declaration", name, position.line));
                    }
                }
                AstNode::QuantumKeyDeclaration { name, participants, position } => {
                    stats.quantum_keys += 1;
                    bytecode.push(format!("QKEY_INIT {}", name));
                    if participants.is_empty() {
                        bytecode.push(format!("QKEY_ENTANGLE {}", name));
                    } else {
                        bytecode.push(format!("QKEY_ENTANGLE {} {}", name, participants.join(" ")));
                    }
                    if participants.len() < 2 {
                        warnings.push(format!(
                            "quantum key '{}' at line {} needs at least two participants (found {})",
                            name, position.line, participants.len()
                        ));
                    }
                }
                AstNode::ContractDeclaration { name, body, position } => {
                    stats.contracts += 1;
                    bytecode.push(format!("CONTRACT_BEGIN {}", name));
                    for stmt in body {
                        match stmt {
                            ContractStatement::EnforceStatement { rule, arguments } => {
                                stats.enforce_statements += 1;
                                if arguments.is_empty() {
                                    bytecode.push(format!("  ENFORCE {}", rule));
                                } else {
                                    bytecode.push(format!("  ENFORCE {} {}", rule, arguments.join(" ")));
                                }
                                if let Some(w) = check_threshold(rule, arguments) {
                                    warnings.push(format!("contract '{}': {}", name, w));
                                }
                            }
                            ContractStatement::Statement { text } => {
                                bytecode.push(format!("  INVOKE {}", text));
                            }
                        }
                    }
                    bytecode.push(format!("CONTRACT_END {}", name));
                    if !body.iter().any(ContractStatement::is_enforce) {
                        warnings.push(format!("contract '{}' at line {} enforces nothing", name, position.line));
                    }
                }
                AstNode::ModelDeployment { model, target, properties, .. } => {
                    stats.deployments += 1;
                    bytecode.push(format!("DEPLOY {} -> {}", model, target));
                    for prop in properties {
                        match &prop.value {
                            Some(v) => bytecode.push(format!("  PROP {} = {}", prop.key, v)),
                            None => bytecode.push(format!("  PROP {}", prop.key)),
                        }
                    }
                    bytecode.push(format!("DEPLOY_END {}", model));
                }
                AstNode::FunctionDeclaration { name, parameters, body, .. } => {
                    stats.functions += 1;
                    bytecode.push(format!("FUNC_BEGIN {}({})", name, parameters.join(", ")));
                    for stmt in body {
                        bytecode.push(format!("  STMT {}", collapse_whitespace(stmt)));
                    }
                    bytecode.push(format!("FUNC_END {}", name));
                }
            }
        }
        bytecode.push("HALT".to_string());

        CompileOutput { bytecode, warnings, stats }
    }

    /// Validates code before compilation
    pub fn validate_and_summarize(&self, code: &str) -> Result<String> {
        if code.trim().is_empty() {
            return Err(SingularisError::compile("Code is empty. Nothing to compile."));
        }
        let lines = code.lines().count();
        let chars = code.chars().count();
        Ok(format!("Validation complete: {} lines, {} characters.", lines, chars))
    }
}

// Threshold-style rules take a single probability in [0, 1].
fn check_threshold(rule: &str, arguments: &[String]) -> Option<String> {
    if !rule.to_ascii_lowercase().ends_with("threshold") {
        return None;
    }
    match arguments.first().map(|a| a.parse::<f64>()) {
        None => Some(format!("{} has no value", rule)),
        Some(Err(_)) => Some(format!("{} value '{}' is not numeric", rule, arguments[0])),
        Some(Ok(v)) if !(0.0..=1.0).contains(&v) => Some(format!("{} value {} is outside [0, 1]", rule, v)),
        Some(Ok(_)) => None,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
