//! Line-oriented hand-rolled lexer for the textual IR format.
//!
//! No lookahead beyond a single character is needed: every token starts
//! unambiguously on its first character (`%`, a digit or `-`, a letter, or
//! one of `=`, `,`, `:`).

use crate::common::error::{AnalysisError, AnalysisResult};

use super::token::{Token, TokenKind};

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { chars: src.char_indices().peekable(), src, line: 1 }
    }

    pub fn tokenize(mut self) -> AnalysisResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> AnalysisResult<Token> {
        self.skip_trivia();
        let line = self.line;
        let Some(&(start, c)) = self.chars.peek() else {
            return Ok(Token::new(TokenKind::Eof, line));
        };

        match c {
            '=' => {
                self.chars.next();
                Ok(Token::new(TokenKind::Equals, line))
            }
            ',' => {
                self.chars.next();
                Ok(Token::new(TokenKind::Comma, line))
            }
            ':' => {
                self.chars.next();
                Ok(Token::new(TokenKind::Colon, line))
            }
            '%' => {
                self.chars.next();
                let name = self.consume_ident_tail(start);
                Ok(Token::new(TokenKind::Ident(format!("%{name}")), line))
            }
            '-' | '0'..='9' => self.lex_number(line),
            c if is_word_start(c) => self.lex_word(start, line),
            other => Err(AnalysisError::Parse {
                line,
                message: format!("unexpected character `{other}`"),
            }),
        }
    }

    fn lex_number(&mut self, line: usize) -> AnalysisResult<Token> {
        let start = self.chars.peek().map(|&(i, _)| i).unwrap();
        if self.chars.peek().map(|&(_, c)| c) == Some('-') {
            self.chars.next();
        }
        let mut end = start + 1;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.chars.next();
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.src[start..end];
        let value: i64 = text.parse().map_err(|_| AnalysisError::Parse {
            line,
            message: format!("invalid integer literal `{text}`"),
        })?;
        Ok(Token::new(TokenKind::Int(value), line))
    }

    fn lex_word(&mut self, start: usize, line: usize) -> AnalysisResult<Token> {
        let end = self.consume_word_tail(start);
        let text = &self.src[start..end];
        let kind = TokenKind::from_word(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()));
        Ok(Token::new(kind, line))
    }

    /// Words may contain an internal `-` (`alloc-slot`), unlike plain
    /// identifiers.
    fn consume_word_tail(&mut self, start: usize) -> usize {
        let mut end = start + self.chars.peek().map_or(0, |&(_, c)| c.len_utf8());
        self.chars.next();
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.chars.next();
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        end
    }

    fn consume_ident_tail(&mut self, marker_start: usize) -> String {
        let start = marker_start + 1;
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.chars.next();
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        self.src[start..end].to_string()
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek() {
                Some(&(_, c)) if c == '\n' => {
                    self.line += 1;
                    self.chars.next();
                }
                Some(&(_, c)) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some(&(_, '#')) => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_a_store_instruction() {
        let tokens = Lexer::new("store 1, x\n").tokenize().unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                TokenKind::Store,
                TokenKind::Int(1),
                TokenKind::Comma,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_register_names_and_negative_literals() {
        let tokens = Lexer::new("%1 = add %x, -12").tokenize().unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![
                TokenKind::Ident("%1".to_string()),
                TokenKind::Equals,
                TokenKind::BinOp(crate::ir::BinOp::Add),
                TokenKind::Ident("%x".to_string()),
                TokenKind::Comma,
                TokenKind::Int(-12),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comment_lines() {
        let tokens = Lexer::new("# a comment\nret").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ret);
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = Lexer::new("store 1, x; ret").tokenize().unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { .. }));
    }
}
