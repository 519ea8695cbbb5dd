use std::mem;
use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::ScanError;
use crate::literal::Literal;
use crate::token::{Token, TokenType};

/// Converts source text into a token stream.
///
/// The cursor indices `start` and `current` count characters, not bytes, so
/// lexemes can be sliced straight out of the source by char index. Scanning
/// never stops on an error; bad input is recorded and the scan moves on so a
/// single run can report every lexical problem at once.
pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            tokens: vec![],
            errors: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source and returns the tokens, terminated by EOF.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(TokenType::Eof, String::new(), None, self.line));

        mem::take(&mut self.tokens)
    }

    /// The lexical errors found so far, in source order.
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    /// Consumes and returns the next character.
    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("scanner advanced past the end of source");
        self.current += 1;
        c
    }

    /// Looks at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.reset_cursor();
        self.chars.peek().copied()
    }

    /// Looks one character past the next without consuming anything.
    fn peek_next(&mut self) -> Option<char> {
        self.chars.reset_cursor();
        self.chars.peek_nth(1).copied()
    }

    /// Consumes the next character only if it is the expected one.
    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Pushes a token whose lexeme is the current `[start, current)` slice.
    fn add_token(&mut self, kind: TokenType, literal: Option<Literal>) {
        let lexeme = self.source.substring(self.start, self.current).to_string();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn error(&mut self, message: &str) {
        self.errors.push(ScanError { line: self.line, message: message.to_string() });
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LeftParen, None),
            ')' => self.add_token(TokenType::RightParen, None),
            '{' => self.add_token(TokenType::LeftBrace, None),
            '}' => self.add_token(TokenType::RightBrace, None),
            ',' => self.add_token(TokenType::Comma, None),
            '.' => self.add_token(TokenType::Dot, None),
            '-' => self.add_token(TokenType::Minus, None),
            '+' => self.add_token(TokenType::Plus, None),
            ';' => self.add_token(TokenType::Semicolon, None),
            '*' => self.add_token(TokenType::Star, None),

            '!' => {
                let kind = if self.match_next('=') { TokenType::BangEqual } else { TokenType::Bang };
                self.add_token(kind, None);
            }
            '=' => {
                let kind = if self.match_next('=') { TokenType::EqualEqual } else { TokenType::Equal };
                self.add_token(kind, None);
            }
            '<' => {
                let kind = if self.match_next('=') { TokenType::LessEqual } else { TokenType::Less };
                self.add_token(kind, None);
            }
            '>' => {
                let kind = if self.match_next('=') { TokenType::GreaterEqual } else { TokenType::Greater };
                self.add_token(kind, None);
            }

            '/' => {
                if self.match_next('/') {
                    // A comment runs to the end of the line and emits nothing.
                    while matches!(self.peek(), Some(c) if c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash, None);
                }
            }

            ' ' | '\r' | '\t' => {}

            '\n' => self.line += 1,

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),

            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            _ => self.error("Unexpected character."),
        }
    }

    /// Scans a string literal. Embedded newlines are allowed.
    fn string(&mut self) {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error("Unterminated string.");
            return;
        }

        self.advance(); // The closing quote.

        // The literal value drops the quotes; the lexeme keeps them.
        let value = self.source.substring(self.start + 1, self.current - 1).to_string();
        self.add_token(TokenType::String, Some(Literal::String(value)));
    }

    /// Scans a number literal. A `.` is only part of the number when a digit
    /// follows it, so `123.` is a number and then a dot.
    fn number(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance(); // The dot.

            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let value = self
            .source
            .substring(self.start, self.current)
            .parse::<f64>()
            .expect("scanned digits to parse as a number");
        self.add_token(TokenType::Number, Some(Literal::Number(value)));
    }

    /// Scans an identifier or keyword. Identifier characters are ASCII only.
    fn identifier(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let (kind, literal) = match self.source.substring(self.start, self.current) {
            "and" => (TokenType::And, None),
            "class" => (TokenType::Class, None),
            "else" => (TokenType::Else, None),
            "false" => (TokenType::False, Some(Literal::Bool(false))),
            "for" => (TokenType::For, None),
            "fun" => (TokenType::Fun, None),
            "if" => (TokenType::If, None),
            "nil" => (TokenType::Nil, Some(Literal::Nil)),
            "or" => (TokenType::Or, None),
            "print" => (TokenType::Print, None),
            "return" => (TokenType::Return, None),
            "super" => (TokenType::Super, None),
            "this" => (TokenType::This, None),
            "true" => (TokenType::True, Some(Literal::Bool(true))),
            "var" => (TokenType::Var, None),
            "while" => (TokenType::While, None),
            _ => (TokenType::Identifier, None),
        };

        self.add_token(kind, literal);
    }
}
