// src/core/ast.rs
//! Declaration-level syntax tree produced by `SingularisParser`.
//! Nodes serialize with a `type` tag, mirroring the JSON the web client
//! consumed.

use serde::Serialize;

/// Name given to `contract { ... }` blocks written without one.
pub const ANONYMOUS_CONTRACT: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AstNode {
    ImportDeclaration {
        path: String,
        position: Position,
    },
    Annotation {
        name: String,
        arguments: Vec<String>,
        position: Position,
    },
    QuantumKeyDeclaration {
        name: String,
        participants: Vec<String>,
        position: Position,
    },
    ContractDeclaration {
        name: String,
        body: Vec<ContractStatement>,
        position: Position,
    },
    ModelDeployment {
        model: String,
        target: String,
        properties: Vec<DeploymentProperty>,
        position: Position,
    },
    FunctionDeclaration {
        name: String,
        parameters: Vec<String>,
        body: Vec<String>,
        position: Position,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ContractStatement {
    EnforceStatement { rule: String, arguments: Vec<String> },
    Statement { text: String },
}

/// `key: value;` or a bare `flag;` inside a deployment block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentProperty {
    pub key: String,
    pub value: Option<String>,
}

impl AstNode {
    pub fn type_name(&self) -> &'static str {
        match self {
            AstNode::ImportDeclaration { .. } => "ImportDeclaration",
            AstNode::Annotation { .. } => "Annotation",
            AstNode::QuantumKeyDeclaration { .. } => "QuantumKeyDeclaration",
            AstNode::ContractDeclaration { .. } => "ContractDeclaration",
            AstNode::ModelDeployment { .. } => "ModelDeployment",
            AstNode::FunctionDeclaration { .. } => "FunctionDeclaration",
        }
    }

    pub fn position(&self) -> Position {
        match self {
            AstNode::ImportDeclaration { position, .. }
            | AstNode::Annotation { position, .. }
            | AstNode::QuantumKeyDeclaration { position, .. }
            | AstNode::ContractDeclaration { position, .. }
            | AstNode::ModelDeployment { position, .. }
            | AstNode::FunctionDeclaration { position, .. } => *position,
        }
    }

    /// Name bound by the declaration, if it binds one.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            AstNode::QuantumKeyDeclaration { name, .. }
            | AstNode::ContractDeclaration { name, .. }
            | AstNode::FunctionDeclaration { name, .. } => Some(name),
            AstNode::ModelDeployment { model, .. } => Some(model),
            AstNode::ImportDeclaration { .. } | AstNode::Annotation { .. } => None,
        }
    }
}

impl ContractStatement {
    pub fn is_enforce(&self) -> bool {
        matches!(self, ContractStatement::EnforceStatement { .. })
    }
}
