// lexer.rs
//! Token dump for Singularis source. The parser does its own scanning; this
//! lexer backs `singularis tokens`.

use unicode_ident::{is_xid_continue, is_xid_start};
use unicode_normalization::UnicodeNormalization;

use crate::core::token::{Token, TokenKind, KEYWORDS};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.nfc().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    #[inline]
    fn advance_char(&mut self) {
        if let Some(ch) = self.current() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Returns the next token; after the end of input this keeps returning `Eof`.
    pub fn next_token(&mut self) -> Token {
        loop {
            let ch = match self.current() {
                Some(ch) => ch,
                None => return Token::new(TokenKind::Eof, self.line, self.col),
            };
            if ch.is_whitespace() || ch == '\u{FEFF}' {
                self.advance_char();
                continue;
            }
            if ch == '/' && self.peek_char() == Some('/') {
                self.skip_line_comment();
                continue;
            }
            if ch == '/' && self.peek_char() == Some('*') {
                self.skip_block_comment();
                continue;
            }

            let (line, col) = (self.line, self.col);
            let kind = if ch.is_ascii_digit() {
                self.lex_number()
            } else if ch == '"' {
                self.lex_string()
            } else if ch == '@' && self.peek_char().map(is_identifier_start).unwrap_or(false) {
                self.advance_char();
                TokenKind::Annotation(self.read_identifier())
            } else if is_identifier_start(ch) {
                let ident = self.read_identifier();
                if KEYWORDS.contains(&ident.as_str()) {
                    TokenKind::Keyword(ident)
                } else {
                    TokenKind::Identifier(ident)
                }
            } else if "{}()[];:,.=<>+-*/@!&|".contains(ch) {
                self.advance_char();
                TokenKind::Symbol(ch)
            } else {
                self.advance_char();
                TokenKind::Unknown(ch)
            };
            return Token::new(kind, line, col);
        }
    }

    /// Tokenizes the entire input; the last token is always `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current() {
            self.advance_char();
            if ch == '\n' {
                break;
            }
        }
    }

    // unterminated block comments run to end of input
    fn skip_block_comment(&mut self) {
        self.advance_char();
        self.advance_char();
        while let Some(ch) = self.current() {
            if ch == '*' && self.peek_char() == Some('/') {
                self.advance_char();
                self.advance_char();
                return;
            }
            self.advance_char();
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let mut num_str = String::new();
        let mut has_decimal = false;
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
            } else if ch == '.' && !has_decimal && self.peek_char().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                has_decimal = true;
                num_str.push(ch);
            } else {
                break;
            }
            self.advance_char();
        }
        num_str.parse::<f64>().map(TokenKind::Number).unwrap_or(TokenKind::Unknown('0'))
    }

    fn lex_string(&mut self) -> TokenKind {
        self.advance_char(); // opening quote
        let mut content = String::new();
        let mut escape = false;
        while let Some(ch) = self.current() {
            self.advance_char();
            if escape {
                content.push(match ch {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                break;
            } else {
                content.push(ch);
            }
        }
        TokenKind::String(content)
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(ch) = self.current() {
            if !is_identifier_part(ch) {
                break;
            }
            ident.push(ch);
            self.advance_char();
        }
        ident
    }
}

pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch == '_' || is_xid_start(ch)
}

pub(crate) fn is_identifier_part(ch: char) -> bool {
    ch == '_' || is_xid_continue(ch)
}
