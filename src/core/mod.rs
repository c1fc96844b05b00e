//! Core module tree for the Singularis toolkit.

#[macro_use]
pub mod debug; // gated debug logging (SINGULARIS_DEBUG=1) provides debug_log!

pub mod ast;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod glyph;
pub mod lexer;
pub mod parser;
pub mod quantum;
pub mod token;

pub use error::{Result, SingularisError};
pub use token::TokenKind;
