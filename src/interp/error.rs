//! Error types for the two phases of a run.
//!
//! Parse errors abort before any statement executes; run errors abort on
//! first occurrence. Unrecognized lines are *not* errors at either phase –
//! they flow through as `Statement::Unknown` and only produce a warning.

use thiserror::Error;

/// Parse-time failure. Carries the 1-based source line number and the
/// offending text so the message stands on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("line {line}: malformed function header, expected `function <name>:` – {text}")]
    BadFunctionHeader { line: usize, text: String },

    #[error("line {line}: `{opener}` is never closed with `end`")]
    UnterminatedBlock { line: usize, opener: String },

    #[error("line {line}: malformed `{keyword}` statement, expected {expected} – {text}")]
    BadStatement {
        line: usize,
        keyword: &'static str,
        expected: &'static str,
        text: String,
    },
}

/// Run-time failure. The first one terminates the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("function `{0}` is not defined")]
    UndefinedFunction(String),

    #[error("expected a number, got `{0}`")]
    NotANumber(String),

    #[error("expected a whole number, got `{0}`")]
    NotAWholeNumber(String),

    #[error("malformed condition `{0}`, expected a value or `<lhs> == <rhs>`")]
    BadCondition(String),

    #[error("unsupported comparison `{0}`, only `==` and `!=` are allowed")]
    BadComparison(String),

    #[error("unsupported wait unit `{0}`, use seconds or milliseconds")]
    BadWaitUnit(String),

    #[error("wait duration `{0}` is not a usable number of {1}")]
    BadDuration(String, String),

    #[error("malformed random list `{0}`, expected `random [a, b, ...]`")]
    BadRandomList(String),

    #[error("call depth exceeded {0} nested calls, giving up on what looks like unbounded recursion")]
    CallDepthExceeded(usize),

    #[error("no `start` block found")]
    NoEntryPoint,

    #[error("reading input failed: {0}")]
    Input(#[from] std::io::Error),
}
