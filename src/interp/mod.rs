//! The functional core: block parsing, expression evaluation, and the
//! tree-walking executor.

pub mod ast;
pub mod block_parser;
pub mod error;
pub mod exec;
pub mod expr;
pub mod splitter;
pub mod stmt_parser;

use anyhow::Result;

use crate::model::{Program, SourceLine};

/// Parse cleaned source lines into an immutable `Program`.
pub fn parse(lines: &[SourceLine]) -> Result<Program> {
    let program = block_parser::parse_program(lines)?;
    Ok(program)
}
