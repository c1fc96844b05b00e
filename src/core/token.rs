// src/core/token.rs
use serde::Serialize;

pub const KEYWORDS: &[&str] = &[
    "import",
    "quantumKey",
    "contract",
    "enforce",
    "deployModel",
    "to",
    "function",
    "entangle",
    "return",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum TokenKind {
    Identifier(String),
    Keyword(String),
    Number(f64),
    String(String),
    Annotation(String),
    Symbol(char),
    Unknown(char),
    Eof,
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Number(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::Annotation(_) => "annotation",
            TokenKind::Symbol(_) => "symbol",
            TokenKind::Unknown(_) => "unknown",
            TokenKind::Eof => "end of file",
        };
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenKind::Identifier(name) => write!(f, "Identifier('{}') @{}:{}", name, self.line, self.column),
            TokenKind::Keyword(kw) => write!(f, "Keyword({}) @{}:{}", kw, self.line, self.column),
            TokenKind::Number(v) => write!(f, "Number({}) @{}:{}", v, self.line, self.column),
            TokenKind::String(s) => write!(f, "String(\"{}\") @{}:{}", s, self.line, self.column),
            TokenKind::Annotation(a) => write!(f, "Annotation(@{}) @{}:{}", a, self.line, self.column),
            TokenKind::Symbol(c) => write!(f, "Symbol('{}') @{}:{}", c, self.line, self.column),
            TokenKind::Unknown(c) => write!(f, "Unknown({:?}) @{}:{}", c, self.line, self.column),
            TokenKind::Eof => write!(f, "EOF @{}:{}", self.line, self.column),
        }
    }
}
