//! Lexer for Wabbit
//!
//! Converts source code into a lazy stream of tokens. The lexer is an
//! `Iterator<Item = Result<Token>>` that yields a final `Eof` token and then
//! stops; it also stops after the first lexical error.

use log::trace;

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result};

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Start position of current token
    start: usize,
    /// Current line (1-based)
    line: usize,
    /// Set once Eof or an error has been produced
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            start: 0,
            line: 1,
            finished: false,
        }
    }

    /// Rewind to the beginning of the source
    pub fn reset(&mut self) {
        self.pos = 0;
        self.start = 0;
        self.line = 1;
        self.finished = false;
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(ch) = c {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
            }
        }
        c
    }

    fn text(&self) -> String {
        self.source[self.start..self.pos].iter().collect()
    }

    /// Create a token from start to current position
    fn make_token(&self, kind: TokenKind, line: usize) -> Token {
        Token::new(kind, self.text(), line)
    }

    /// Skip whitespace and comments
    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.advance();
                }
                // Line comment
                '/' if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                // Block comment, no nesting
                '/' if self.peek_next() == Some('*') => {
                    let line = self.line;
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek(), self.peek_next()) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => {
                                self.advance();
                            }
                            (None, _) => return Err(Error::UnterminatedComment { line }),
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        let line = self.line;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.text();
        let kind = TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Name);
        Token::new(kind, text, line)
    }

    /// Read a number literal (integer or float)
    fn read_number(&mut self) -> Token {
        let line = self.line;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        // A single '.' makes it a float, digits after it are optional
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
            return self.make_token(TokenKind::Float, line);
        }

        self.make_token(TokenKind::Integer, line)
    }

    /// Read a character literal: one char or one escape between quotes
    fn read_char(&mut self) -> Result<Token> {
        let line = self.line;
        self.advance(); // opening quote

        match self.peek() {
            None | Some('\'') | Some('\n') => return Err(Error::UnterminatedChar { line }),
            Some('\\') => {
                self.advance();
                match self.advance() {
                    None | Some('\n') => return Err(Error::UnterminatedChar { line }),
                    Some('x') => {
                        for _ in 0..2 {
                            if matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                                self.advance();
                            }
                        }
                    }
                    Some(_) => {}
                }
            }
            Some(_) => {
                self.advance();
            }
        }

        if self.peek() != Some('\'') {
            return Err(Error::UnterminatedChar { line });
        }
        self.advance(); // closing quote

        Ok(self.make_token(TokenKind::Char, line))
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace()?;
        self.start = self.pos;
        let line = self.line;

        let Some(c) = self.peek() else {
            return Ok(Token::eof(line));
        };

        if let Some(kind) = self.peek_next().and_then(|n| TokenKind::two_char_operator(c, n)) {
            self.advance();
            self.advance();
            return Ok(self.make_token(kind, line));
        }

        if c.is_ascii_digit() {
            return Ok(self.read_number());
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.read_identifier());
        }

        if c == '\'' {
            return self.read_char();
        }

        if let Some(kind) = TokenKind::one_char_operator(c) {
            self.advance();
            return Ok(self.make_token(kind, line));
        }

        Err(Error::IllegalCharacter { ch: c, line })
    }

    /// Tokenize the entire source and return all tokens, ending with Eof
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        self.by_ref().collect()
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        match &result {
            Ok(token) => {
                trace!("token {:?} {:?} (line {})", token.kind, token.text, token.line);
                if token.kind == TokenKind::Eof {
                    self.finished = true;
                }
            }
            Err(_) => self.finished = true,
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("var x int = 1;").tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[2].kind, TokenKind::Name);
        assert_eq!(tokens[2].text, "int");
        assert_eq!(tokens[3].kind, TokenKind::Assign);
        assert_eq!(tokens[4].kind, TokenKind::Integer);
        assert_eq!(tokens[4].text, "1");
        assert_eq!(tokens[5].kind, TokenKind::Semi);
        assert_eq!(tokens[6].kind, TokenKind::Eof);
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("42 3.14 1. 0").tokenize().unwrap();

        assert_eq!((tokens[0].kind, tokens[0].text.as_str()), (TokenKind::Integer, "42"));
        assert_eq!((tokens[1].kind, tokens[1].text.as_str()), (TokenKind::Float, "3.14"));
        assert_eq!((tokens[2].kind, tokens[2].text.as_str()), (TokenKind::Float, "1."));
        assert_eq!((tokens[3].kind, tokens[3].text.as_str()), (TokenKind::Integer, "0"));
    }

    #[test]
    fn test_two_char_operators_win() {
        assert_eq!(
            kinds("== != <= >= && || < > = !"),
            vec![
                TokenKind::Eq,
                TokenKind::Ne,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::LAnd,
                TokenKind::LOr,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Assign,
                TokenKind::LNot,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("a<=b"), vec![TokenKind::Name, TokenKind::Le, TokenKind::Name, TokenKind::Eof]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("const var print if else while break continue true false truely"),
            vec![
                TokenKind::Const,
                TokenKind::Var,
                TokenKind::Print,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Break,
                TokenKind::Continue,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Name,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_and_lines() {
        let source = "// header\nprint 1; /* spans\ntwo lines */ print 2;\n";
        let tokens = Lexer::new(source).tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Print);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[3].kind, TokenKind::Print);
        assert_eq!(tokens[3].line, 3);
        assert_eq!(tokens.last().unwrap().line, 4);
    }

    #[test]
    fn test_char_literals() {
        let tokens = Lexer::new(r"'a' '\n' '\'' '\x41'").tokenize().unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Char));
        assert_eq!(texts[..4], [r"'a'", r"'\n'", r"'\''", r"'\x41'"]);
    }

    #[test]
    fn test_illegal_character() {
        let err = Lexer::new("print 1;\nprint $;").tokenize().unwrap_err();
        assert_eq!(err, Error::IllegalCharacter { ch: '$', line: 2 });

        let err = Lexer::new("1 & 2").tokenize().unwrap_err();
        assert_eq!(err, Error::IllegalCharacter { ch: '&', line: 1 });
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("print 1;\n/* never closed\n").tokenize().unwrap_err();
        assert_eq!(err, Error::UnterminatedComment { line: 2 });
    }

    #[test]
    fn test_unterminated_char() {
        for source in ["'a", "'ab'", "''", "'\\"] {
            let err = Lexer::new(source).tokenize().unwrap_err();
            assert_eq!(err, Error::UnterminatedChar { line: 1 }, "source {:?}", source);
        }
    }

    #[test]
    fn test_stream_is_lazy_and_stops() {
        let mut lexer = Lexer::new("1 $ 2");
        assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Integer);
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());

        lexer.reset();
        assert_eq!(lexer.next().unwrap().unwrap().text, "1");
    }
}
