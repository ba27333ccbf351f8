use std::collections::HashMap;

use serde::Serialize;

use crate::interp::ast::Statement;

/// One cleaned source line as it comes out of the loader.
///
/// `number` is the 1-based line number in the *original* file, kept so
/// parse errors can point at the right place even though comments and
/// blank lines have already been dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    /// First whitespace-separated token, or "" if the slice was empty.
    pub fn first_token(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }
}

/// Fully parsed script, handed from the block parser to the executor.
///
/// Duplicate function names and duplicate `start` blocks keep the last
/// one parsed; a missing `start` block is rejected at execution time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Program {
    pub functions: HashMap<String, Vec<Statement>>,
    pub entry: Option<Vec<Statement>>,
}
