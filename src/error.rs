//! Diagnostic types for every phase of the pipeline.
//!
//! Each phase collects its own errors and the driver prints them to standard
//! error through the `Display` impls below, so the exact report formats live
//! in one place. Runtime control flow that is not an error (a `return`
//! unwinding to its call frame) rides the same `Result` channel as
//! [`Unwind::Return`].

use std::fmt::{self, Display};

use crate::token::{Token, TokenType};
use crate::value::Value;

/// An error found while scanning. There is no token to point at yet, only a
/// line.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

/// An error found while parsing, attached to the offending token.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.token.kind == TokenType::Eof {
            write!(f, "[line {}] Error at end: {}", self.token.line, self.message)
        } else {
            write!(
                f,
                "[line {}] Error at '{}': {}",
                self.token.line, self.token.lexeme, self.message
            )
        }
    }
}

/// A scoping violation found by the resolver. Syntactically fine, statically
/// wrong.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Error at '{}': {}",
            self.token.line, self.token.lexeme, self.message
        )
    }
}

/// An error raised during evaluation. Aborts the current top-level run; the
/// token pins the report to a line.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}

/// Non-local exits propagated up through the evaluator. A `return` statement
/// unwinds to the function call that catches it; a runtime error unwinds all
/// the way to the driver. Any `Value` is a legitimate return value, so this
/// must not be encoded as a sentinel.
#[derive(Debug)]
pub enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}
