//! Token definitions for Wabbit

use serde::Serialize;
use std::fmt;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text; numeric and char values are converted by the parser
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    // ============ Keywords ============
    /// const
    Const,
    /// var
    Var,
    /// print
    Print,
    /// if
    If,
    /// else
    Else,
    /// while
    While,
    /// break
    Break,
    /// continue
    Continue,
    /// true
    True,
    /// false
    False,

    // ============ Identifiers and Literals ============
    Name,
    Integer,
    Float,
    Char,

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Times,
    /// /
    Divide,
    /// <
    Lt,
    /// <=
    Le,
    /// >
    Gt,
    /// >=
    Ge,
    /// ==
    Eq,
    /// !=
    Ne,
    /// &&
    LAnd,
    /// ||
    LOr,
    /// !
    LNot,
    /// =
    Assign,

    // ============ Delimiters ============
    /// ;
    Semi,
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,

    // ============ Special ============
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::Var
                | TokenKind::Print
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Try to convert an identifier to a keyword
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "const" => Some(TokenKind::Const),
            "var" => Some(TokenKind::Var),
            "print" => Some(TokenKind::Print),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "break" => Some(TokenKind::Break),
            "continue" => Some(TokenKind::Continue),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// Two-character operators, matched before their one-character prefixes
    pub fn two_char_operator(a: char, b: char) -> Option<TokenKind> {
        match (a, b) {
            ('=', '=') => Some(TokenKind::Eq),
            ('!', '=') => Some(TokenKind::Ne),
            ('<', '=') => Some(TokenKind::Le),
            ('>', '=') => Some(TokenKind::Ge),
            ('&', '&') => Some(TokenKind::LAnd),
            ('|', '|') => Some(TokenKind::LOr),
            _ => None,
        }
    }

    /// Single-character operators and punctuation
    pub fn one_char_operator(c: char) -> Option<TokenKind> {
        match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Times),
            '/' => Some(TokenKind::Divide),
            '<' => Some(TokenKind::Lt),
            '>' => Some(TokenKind::Gt),
            '=' => Some(TokenKind::Assign),
            '!' => Some(TokenKind::LNot),
            ';' => Some(TokenKind::Semi),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            _ => None,
        }
    }

    /// Get the binding power of a binary operator.
    /// Returns None if not a binary operator
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            // Logical OR (lowest)
            TokenKind::LOr => Some(1),

            // Logical AND
            TokenKind::LAnd => Some(2),

            // Relational and equality share one tier
            TokenKind::Eq
            | TokenKind::Ne
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge => Some(3),

            // Additive
            TokenKind::Plus | TokenKind::Minus => Some(4),

            // Multiplicative (highest for binary)
            TokenKind::Times | TokenKind::Divide => Some(5),

            _ => None,
        }
    }

    /// Name used in "expected ..." diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Const => "'const'",
            TokenKind::Var => "'var'",
            TokenKind::Print => "'print'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Name => "NAME",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Char => "CHAR",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Times => "'*'",
            TokenKind::Divide => "'/'",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Eq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::LAnd => "'&&'",
            TokenKind::LOr => "'||'",
            TokenKind::LNot => "'!'",
            TokenKind::Assign => "'='",
            TokenKind::Semi => "';'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip() {
        for word in ["const", "var", "print", "if", "else", "while", "break", "continue", "true", "false"] {
            let kind = TokenKind::keyword_from_str(word).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.describe(), format!("'{}'", word));
        }
        assert_eq!(TokenKind::keyword_from_str("int"), None);
    }

    #[test]
    fn test_precedence_tiers() {
        let or = TokenKind::LOr.binary_precedence().unwrap();
        let and = TokenKind::LAnd.binary_precedence().unwrap();
        let rel = TokenKind::Le.binary_precedence().unwrap();
        let add = TokenKind::Minus.binary_precedence().unwrap();
        let mul = TokenKind::Divide.binary_precedence().unwrap();
        assert!(or < and && and < rel && rel < add && add < mul);
        assert_eq!(TokenKind::Eq.binary_precedence(), TokenKind::Gt.binary_precedence());
        assert_eq!(TokenKind::Assign.binary_precedence(), None);
        assert_eq!(TokenKind::LNot.binary_precedence(), None);
    }
}
