//! Character-scanning parser for Singularis source.
//!
//! One left-to-right pass over the input keeps a position/line/column
//! triple. Each declaration keyword has a hand-written sub-parser that
//! scans forward to its terminator (`;`, `{`, `}` or `)`). Anything that is
//! not a recognised construct is skipped one character at a time, so
//! `parse` always terminates and never fails; malformed input yields a
//! partial AST plus warnings.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::core::ast::{AstNode, ContractStatement, DeploymentProperty, Position, ANONYMOUS_CONTRACT};
use crate::core::lexer::{is_identifier_part, is_identifier_start};
use crate::debug_log;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseWarning {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub len: usize,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

#[derive(Default)]
pub struct SingularisParser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    warnings: Vec<ParseWarning>,
    // (line, column, count) of the current run of skipped characters
    skipped: Option<(usize, usize, usize)>,
}

/// Convenience wrapper: parse and drop the warnings.
pub fn parse(code: &str) -> Vec<AstNode> {
    SingularisParser::new().parse(code)
}

impl SingularisParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main entrypoint. Resets any state from a previous call.
    pub fn parse(&mut self, code: &str) -> Vec<AstNode> {
        self.chars = code.nfc().collect();
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.warnings.clear();
        self.skipped = None;

        let mut nodes = Vec::new();
        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }
            let start = self.position();
            let node = if self.match_keyword("import") {
                Some(self.parse_import(start))
            } else if self.current() == Some('@') && self.peek().map(is_identifier_start).unwrap_or(false) {
                Some(self.parse_annotation(start))
            } else if self.match_keyword("quantumKey") {
                Some(self.parse_quantum_key(start))
            } else if self.match_keyword("contract") {
                Some(self.parse_contract(start))
            } else if self.match_keyword("deployModel") {
                Some(self.parse_deployment(start))
            } else if self.match_keyword("function") {
                Some(self.parse_function(start))
            } else {
                None
            };
            match node {
                Some(node) => {
                    debug_log!("parser: {} at {}:{}", node.type_name(), start.line, start.column);
                    nodes.push(node);
                }
                None => {
                    self.note_skipped();
                    self.advance();
                }
            }
        }
        self.flush_skipped();
        nodes
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /* ── Declarations ─────────────────────────────────────── */

    fn parse_import(&mut self, position: Position) -> AstNode {
        self.skip_inline_whitespace();
        let path = if self.current() == Some('"') {
            let quoted = self.read_string();
            // anything between the closing quote and ';' is ignored
            self.scan_until(&[';', '\n']);
            quoted
        } else {
            self.scan_until(&[';', '\n']).trim().to_string()
        };
        self.match_literal(";");
        if path.is_empty() {
            self.warn_at(position, "import without a path");
        }
        AstNode::ImportDeclaration { path, position }
    }

    fn parse_annotation(&mut self, position: Position) -> AstNode {
        self.advance(); // '@'
        let name = self.read_identifier();
        let arguments = if self.current() == Some('(') {
            self.read_arguments()
        } else {
            Vec::new()
        };
        AstNode::Annotation { name, arguments, position }
    }

    fn parse_quantum_key(&mut self, position: Position) -> AstNode {
        self.skip_inline_whitespace();
        let name = self.read_identifier();
        self.skip_inline_whitespace();
        let participants = if self.match_literal("=") {
            let rhs = self.scan_until(&[';', '\n', '}']);
            participants_from(&rhs)
        } else {
            Vec::new()
        };
        self.match_literal(";");
        if name.is_empty() {
            self.warn_at(position, "quantumKey without a name");
        }
        AstNode::QuantumKeyDeclaration { name, participants, position }
    }

    fn parse_contract(&mut self, position: Position) -> AstNode {
        self.skip_inline_whitespace();
        let mut name = self.read_identifier();
        if name.is_empty() {
            name = ANONYMOUS_CONTRACT.to_string();
        }
        self.skip_trivia();
        let body = if self.current() == Some('{') {
            self.read_block_statements(position, &name)
                .into_iter()
                .map(|text| classify_contract_statement(&text))
                .collect()
        } else {
            self.warn_at(position, &format!("expected '{{' after contract '{}'", name));
            Vec::new()
        };
        AstNode::ContractDeclaration { name, body, position }
    }

    fn parse_deployment(&mut self, position: Position) -> AstNode {
        self.skip_inline_whitespace();
        let model = self.read_identifier();
        self.skip_inline_whitespace();
        let target = if self.match_keyword("to") {
            self.skip_inline_whitespace();
            self.read_target()
        } else {
            String::new()
        };
        self.skip_trivia();
        let properties = if self.current() == Some('{') {
            self.read_block_statements(position, &model)
                .into_iter()
                .map(|text| property_from(&text))
                .collect()
        } else {
            self.match_literal(";");
            Vec::new()
        };
        if target.is_empty() {
            self.warn_at(position, &format!("deployModel '{}' has no target", model));
        }
        AstNode::ModelDeployment { model, target, properties, position }
    }

    fn parse_function(&mut self, position: Position) -> AstNode {
        self.skip_inline_whitespace();
        let name = self.read_identifier();
        self.skip_inline_whitespace();
        let parameters = if self.current() == Some('(') {
            self.read_arguments()
        } else {
            Vec::new()
        };
        self.skip_trivia();
        let body = if self.current() == Some('{') {
            self.read_block_statements(position, &name)
        } else {
            self.match_literal(";");
            Vec::new()
        };
        AstNode::FunctionDeclaration { name, parameters, body, position }
    }

    /* ── Scanning helpers ─────────────────────────────────── */

    /// `{ stmt; stmt; }` → statement texts. Nested blocks stay inside their
    /// statement's text. An unterminated block keeps what was read.
    fn read_block_statements(&mut self, owner: Position, owner_name: &str) -> Vec<String> {
        self.advance(); // '{'
        let mut statements = Vec::new();
        loop {
            self.skip_trivia();
            match self.current() {
                None => {
                    self.warn_at(owner, &format!("unterminated block for '{}'", owner_name));
                    break;
                }
                Some('}') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    let text = self.scan_statement();
                    let text = text.trim().to_string();
                    if self.current() == Some(';') {
                        self.advance();
                    }
                    if !text.is_empty() {
                        statements.push(text);
                    } else if !self.is_at_end() && self.current() != Some('}') {
                        self.advance();
                    }
                }
            }
        }
        statements
    }

    /// Scans one statement: stops before `;` or `}` at depth zero, or right
    /// after a `}` that closes a nested block.
    fn scan_statement(&mut self) -> String {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut in_string = false;
        while let Some(ch) = self.current() {
            if in_string {
                text.push(ch);
                self.advance();
                if ch == '\\' {
                    if let Some(next) = self.current() {
                        text.push(next);
                        self.advance();
                    }
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                ';' if depth == 0 => break,
                '}' if depth == 0 => break,
                '{' | '(' | '[' => depth += 1,
                '}' => {
                    depth -= 1;
                    text.push(ch);
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                ')' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    /// `( a, b = 1, "x" )` → trimmed top-level arguments. Stops early at a
    /// `;` or `{` outside the parentheses.
    fn read_arguments(&mut self) -> Vec<String> {
        self.advance(); // '('
        let mut inner = String::new();
        let mut depth = 0usize;
        let mut in_string = false;
        while let Some(ch) = self.current() {
            if in_string {
                if ch == '"' {
                    in_string = false;
                }
            } else {
                match ch {
                    '"' => in_string = true,
                    '(' => depth += 1,
                    ')' if depth == 0 => {
                        self.advance();
                        break;
                    }
                    ')' => depth -= 1,
                    ';' | '{' if depth == 0 => break,
                    _ => {}
                }
            }
            inner.push(ch);
            self.advance();
        }
        split_arguments(&inner)
    }

    fn read_string(&mut self) -> String {
        self.advance(); // opening quote
        let mut content = String::new();
        while let Some(ch) = self.current() {
            self.advance();
            match ch {
                '"' => break,
                '\\' => {
                    if let Some(next) = self.current() {
                        content.push(next);
                        self.advance();
                    }
                }
                _ => content.push(ch),
            }
        }
        content
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        if !self.current().map(is_identifier_start).unwrap_or(false) {
            return ident;
        }
        while let Some(ch) = self.current() {
            if !is_identifier_part(ch) {
                break;
            }
            ident.push(ch);
            self.advance();
        }
        ident
    }

    // deployment targets may be dotted or hyphenated: `edge-cluster.eu`
    fn read_target(&mut self) -> String {
        let mut target = String::new();
        while let Some(ch) = self.current() {
            if ch.is_whitespace() || matches!(ch, '{' | ';' | '}') {
                break;
            }
            target.push(ch);
            self.advance();
        }
        target
    }

    fn scan_until(&mut self, terminators: &[char]) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current() {
            if terminators.contains(&ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    /// Literal substring comparison; advances past `lit` on success.
    fn match_literal(&mut self, lit: &str) -> bool {
        let len = lit.chars().count();
        if self.pos + len > self.chars.len() {
            return false;
        }
        if !self.chars[self.pos..self.pos + len].iter().copied().eq(lit.chars()) {
            return false;
        }
        for _ in 0..len {
            self.advance();
        }
        true
    }

    /// Like `match_literal`, but only at identifier boundaries on both sides.
    fn match_keyword(&mut self, kw: &str) -> bool {
        if self.pos > 0 && is_identifier_part(self.chars[self.pos - 1]) {
            return false;
        }
        let len = kw.chars().count();
        if self.chars.get(self.pos + len).copied().map(is_identifier_part).unwrap_or(false) {
            return false;
        }
        self.match_literal(kw)
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.current(), Some(' ') | Some('\t')) {
            self.advance();
        }
    }

    fn skip_trivia(&mut self) {
        let before = self.pos;
        loop {
            match (self.current(), self.peek()) {
                (Some(ch), _) if ch.is_whitespace() || ch == '\u{FEFF}' => self.advance(),
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.current() {
                        self.advance();
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    while !self.is_at_end() && !self.match_literal("*/") {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        if self.pos != before {
            self.flush_skipped();
        }
    }

    fn note_skipped(&mut self) {
        match self.skipped.as_mut() {
            Some((_, _, count)) => *count += 1,
            None => self.skipped = Some((self.line, self.column, 1)),
        }
    }

    fn flush_skipped(&mut self) {
        if let Some((line, column, count)) = self.skipped.take() {
            self.warnings.push(ParseWarning {
                message: format!("skipped {} unrecognized character(s)", count),
                line,
                column,
                len: count,
            });
        }
    }

    fn warn_at(&mut self, at: Position, message: &str) {
        self.flush_skipped();
        self.warnings.push(ParseWarning {
            message: message.to_string(),
            line: at.line,
            column: at.column,
            len: 1,
        });
    }

    /* ── Cursor ───────────────────────────────────────────── */

    fn advance(&mut self) {
        if let Some(ch) = self.current() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn position(&self) -> Position {
        Position { line: self.line, column: self.column }
    }
}

/// Splits on commas outside parentheses and quotes.
pub(crate) fn split_arguments(inner: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    for ch in inner.chars() {
        match ch {
            '"' => in_string = !in_string,
            '(' | '[' if !in_string => depth += 1,
            ')' | ']' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    args.push(current.trim().to_string());
    args.retain(|a| !a.is_empty());
    args
}

// `entangle(alice, bob)` → [alice, bob]; a bare `alice, bob` works too
fn participants_from(rhs: &str) -> Vec<String> {
    let rhs = rhs.trim();
    match (rhs.find('('), rhs.rfind(')')) {
        (Some(open), Some(close)) if close > open => split_arguments(&rhs[open + 1..close]),
        (Some(open), None) => split_arguments(&rhs[open + 1..]),
        _ => split_arguments(rhs),
    }
}

fn classify_contract_statement(text: &str) -> ContractStatement {
    let rest = match text.strip_prefix("enforce") {
        Some(rest) if !rest.chars().next().map(is_identifier_part).unwrap_or(false) => rest.trim(),
        _ => return ContractStatement::Statement { text: text.to_string() },
    };
    let rule: String = rest.chars().take_while(|c| is_identifier_part(*c)).collect();
    let tail = rest[rule.len()..].trim();
    let arguments = if let Some(stripped) = tail.strip_prefix('(') {
        split_arguments(stripped.strip_suffix(')').unwrap_or(stripped))
    } else if tail.is_empty() {
        Vec::new()
    } else {
        vec![tail.to_string()]
    };
    ContractStatement::EnforceStatement { rule, arguments }
}

fn property_from(text: &str) -> DeploymentProperty {
    match text.find(|c| c == ':' || c == '=') {
        Some(idx) => DeploymentProperty {
            key: text[..idx].trim().to_string(),
            value: Some(text[idx + 1..].trim().to_string()),
        },
        None => DeploymentProperty { key: text.trim().to_string(), value: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_arguments_respects_nesting_and_quotes() {
        assert_eq!(split_arguments("a, f(b, c), \"x,y\""), vec!["a", "f(b, c)", "\"x,y\""]);
        assert!(split_arguments("   ").is_empty());
    }

    #[test]
    fn enforce_classification() {
        let stmt = classify_contract_statement("enforce explainabilityThreshold(0.85)");
        assert_eq!(
            stmt,
            ContractStatement::EnforceStatement {
                rule: "explainabilityThreshold".into(),
                arguments: vec!["0.85".into()],
            }
        );
        let other = classify_contract_statement("enforcement()");
        assert!(!other.is_enforce());
    }

    #[test]
    fn keyword_needs_boundary() {
        let nodes = parse("importantValue; reimport; contractor { }");
        assert!(nodes.is_empty());
    }

    #[test]
    fn property_split() {
        assert_eq!(
            property_from("replicas: 3"),
            DeploymentProperty { key: "replicas".into(), value: Some("3".into()) }
        );
        assert_eq!(property_from("monitor").value, None);
    }

    #[test]
    fn skipped_runs_are_reported() {
        let mut p = SingularisParser::new();
        let nodes = p.parse("let x = 5;\nimport \"q\";");
        assert_eq!(nodes.len(), 1);
        let w = p.warnings();
        assert_eq!(w.len(), 4); // `let`, `x`, `=`, `5;`
        assert_eq!((w[0].line, w[0].column, w[0].len), (1, 1, 3));
    }
}
