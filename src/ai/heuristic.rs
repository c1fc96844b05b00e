//! Local fallback used whenever no remote provider answers. Everything here
//! is derived from the parsed declarations and the compiler's warnings.

use crate::core::ast::{AstNode, ContractStatement};
use crate::core::compiler::Compiler;
use crate::core::parser::SingularisParser;

use super::explain::{Assistance, CodeExplanation, ExplanationSource};

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    pub fn name(&self) -> &'static str { "heuristic" }

    pub fn explain(&self, source: &str) -> CodeExplanation {
        if source.trim().is_empty() {
            return CodeExplanation {
                summary: "The file is empty.".to_string(),
                details: Vec::new(),
                suggestions: vec!["Start with an import or a contract declaration.".to_string()],
                source: ExplanationSource::Heuristic,
            };
        }

        let mut parser = SingularisParser::new();
        let ast = parser.parse(source);
        let compiler = Compiler::new();
        let output = compiler.compile_ast(&ast);
        let stats = &output.stats;

        let summary = if ast.is_empty() {
            "No Singularis declarations were recognized.".to_string()
        } else {
            let mut parts = Vec::new();
            push_count(&mut parts, stats.contracts, "contract");
            push_count(&mut parts, stats.quantum_keys, "quantum key");
            push_count(&mut parts, stats.deployments, "model deployment");
            push_count(&mut parts, stats.functions, "function");
            let imports = ast.iter().filter(|n| matches!(n, AstNode::ImportDeclaration { .. })).count();
            push_count(&mut parts, imports, "import");
            if parts.is_empty() {
                format!("{} declaration(s), annotations only.", ast.len())
            } else {
                format!("{} declaration(s): {}.", ast.len(), parts.join(", "))
            }
        };

        let details = ast.iter().map(describe).collect();

        let mut suggestions: Vec<String> = parser.warnings().iter().map(|w| format!("Check: {}", w)).collect();
        suggestions.extend(output.warnings.iter().map(|w| format!("Check: {}", w)));
        if stats.deployments > 0 && stats.contracts == 0 {
            suggestions.push("Deployments are not guarded by any contract; consider adding one with an enforce statement.".to_string());
        }
        if stats.enforce_statements > 0 && !has_threshold(&ast) {
            suggestions.push("No threshold rule is enforced; explainabilityThreshold(0.0..1.0) is a common choice.".to_string());
        }

        CodeExplanation { summary, details, suggestions, source: ExplanationSource::Heuristic }
    }

    pub fn assist(&self, question: &str, source: Option<&str>) -> Assistance {
        let q = question.to_lowercase();
        let answer = if q.contains("glyph") || q.contains("emoji") {
            "G.L.Y.P.H. programs are line based: `🌌 N` allocates qubits, `🌀 q` applies a Hadamard, \
             `🔗 c t` entangles, `📏 q` measures and `✨ text` prints a message."
        } else if q.contains("contract") || q.contains("enforce") {
            "Contracts group rules: `contract Guard { enforce explainabilityThreshold(0.9); }`. \
             Each `enforce rule(args);` line becomes an ENFORCE instruction."
        } else if q.contains("quantum") || q.contains("entangle") || q.contains("key") {
            "Declare an entangled key with `quantumKey k = entangle(alice, bob);`. \
             It needs at least two participants."
        } else if q.contains("deploy") || q.contains("model") {
            "Deploy a model with `deployModel Name to target { key: value; }`. \
             Each property becomes a PROP line."
        } else if q.contains("function") {
            "Functions are declared as `function name(a, b) { ... }`; their statements are kept as text."
        } else {
            "Singularis Prime files contain imports, annotations, quantum keys, contracts, \
             model deployments and functions. Run `singularis compile FILE` to see the generated bytecode."
        };

        let suggestions = match source {
            Some(src) if !src.trim().is_empty() => self.explain(src).suggestions,
            _ => Vec::new(),
        };
        Assistance { answer: answer.to_string(), suggestions, source: ExplanationSource::Heuristic }
    }
}

fn push_count(parts: &mut Vec<String>, n: usize, noun: &str) {
    match n {
        0 => {}
        1 => parts.push(format!("1 {}", noun)),
        _ => parts.push(format!("{} {}s", n, noun)),
    }
}

fn has_threshold(ast: &[AstNode]) -> bool {
    ast.iter().any(|n| match n {
        AstNode::ContractDeclaration { body, .. } => body.iter().any(|s| {
            matches!(s, ContractStatement::EnforceStatement { rule, .. } if rule.to_ascii_lowercase().ends_with("threshold"))
        }),
        _ => false,
    })
}

fn describe(node: &AstNode) -> String {
    let line = node.position().line;
    match node {
        AstNode::ImportDeclaration { path, .. } => format!("line {}: imports \"{}\"", line, path),
        AstNode::Annotation { name, arguments, .. } => {
            format!("line {}: annotation @{} with {} argument(s)", line, name, arguments.len())
        }
        AstNode::QuantumKeyDeclaration { name, participants, .. } => {
            format!("line {}: quantum key '{}' entangles {}", line, name, participants.join(", "))
        }
        AstNode::ContractDeclaration { name, body, .. } => {
            let rules: Vec<&str> = body
                .iter()
                .filter_map(|s| match s {
                    ContractStatement::EnforceStatement { rule, .. } => Some(rule.as_str()),
                    ContractStatement::Statement { .. } => None,
                })
                .collect();
            if rules.is_empty() {
                format!("line {}: contract '{}' with {} statement(s) and no rules", line, name, body.len())
            } else {
                format!("line {}: contract '{}' enforces {}", line, name, rules.join(", "))
            }
        }
        AstNode::ModelDeployment { model, target, properties, .. } => {
            format!("line {}: deploys model '{}' to {} ({} properties)", line, model, target, properties.len())
        }
        AstNode::FunctionDeclaration { name, parameters, body, .. } => format!(
            "line {}: function {}({}) with {} statement(s)",
            line,
            name,
            parameters.join(", "),
            body.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_declarations() {
        let src = "import \"q/core\";\ncontract Guard { enforce explainabilityThreshold(0.9); }\n";
        let e = HeuristicProvider.explain(src);
        assert_eq!(e.summary, "2 declaration(s): 1 contract, 1 import.");
        assert_eq!(e.details[1], "line 2: contract 'Guard' enforces explainabilityThreshold");
        assert!(e.suggestions.is_empty());
    }

    #[test]
    fn unguarded_deployment_is_flagged() {
        let e = HeuristicProvider.explain("deployModel M to edge { replicas: 2; }");
        assert!(e.suggestions.iter().any(|s| s.contains("not guarded")));
    }

    #[test]
    fn assist_routes_by_topic() {
        let a = HeuristicProvider.assist("How do I entangle a key?", None);
        assert!(a.answer.contains("quantumKey"));
        assert_eq!(a.source, ExplanationSource::Heuristic);
    }
}
