//! Recursive block parser: flat lines in, statement tree out.
//!
//! The source has no indentation, so structure is recovered by counting.
//! From any opening line, `matching_end` scans forward with a nesting
//! counter – `if`, `when`, `repeat` and `function` as a first token open
//! one more level, `end` closes one – and the block ends exactly where
//! the counter comes back to zero. The same routine serves both levels
//! of recursion: the top-level scan over `function`/`start:` blocks and
//! the body parser's descent into `if`/`when`/`repeat` constructs.

use crate::model::{Program, SourceLine};

use super::ast::Statement;
use super::error::SyntaxError;
use super::stmt_parser;

const OPENERS: [&str; 4] = ["if", "when", "repeat", "function"];

/// Parse the whole cleaned line sequence into a `Program`.
///
/// Top level only reacts to `function <name>:` and `start:` lines; any
/// stray line outside a block is skipped. Duplicate names keep the last
/// definition parsed.
pub fn parse_program(lines: &[SourceLine]) -> Result<Program, SyntaxError> {
    let mut program = Program::default();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        match line.first_token() {
            "function" => {
                let name = function_name(line)?;
                let end = matching_end(lines, i)?;
                let body = parse_body(&lines[i + 1..end])?;
                program.functions.insert(name, body);
                i = end + 1;
            }
            "start:" => {
                let end = matching_end(lines, i)?;
                program.entry = Some(parse_body(&lines[i + 1..end])?);
                i = end + 1;
            }
            _ => i += 1,
        }
    }

    Ok(program)
}

/// Index of the `end` line that closes the block opened at `open_idx`.
fn matching_end(lines: &[SourceLine], open_idx: usize) -> Result<usize, SyntaxError> {
    let mut depth = 1usize;
    for (i, line) in lines.iter().enumerate().skip(open_idx + 1) {
        let first = line.first_token();
        if OPENERS.contains(&first) {
            depth += 1;
        } else if first == "end" {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }
    }

    Err(SyntaxError::UnterminatedBlock {
        line: lines[open_idx].number,
        opener: lines[open_idx].text.clone(),
    })
}

/// Flatten a block's line range into statements, recursing into nested
/// `if`/`when`/`repeat` bodies. Source order is preserved exactly.
fn parse_body(lines: &[SourceLine]) -> Result<Vec<Statement>, SyntaxError> {
    let mut statements = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        match line.first_token() {
            "if" | "when" => {
                let condition = header_rest(line);
                let end = matching_end(lines, i)?;
                let body = parse_body(&lines[i + 1..end])?;
                statements.push(Statement::If { condition, body });
                i = end + 1;
            }
            "repeat" => {
                let count = repeat_count(line)?;
                let end = matching_end(lines, i)?;
                let body = parse_body(&lines[i + 1..end])?;
                statements.push(Statement::Repeat { count, body });
                i = end + 1;
            }
            "function" => {
                // nested definitions are not part of the language; skip
                // the whole block but keep its header visible at run time
                let end = matching_end(lines, i)?;
                statements.push(Statement::Unknown(line.text.clone()));
                i = end + 1;
            }
            _ => {
                statements.push(stmt_parser::parse_statement(line)?);
                i += 1;
            }
        }
    }

    Ok(statements)
}

/// Validate `function <name>:` and return the bare name.
fn function_name(line: &SourceLine) -> Result<String, SyntaxError> {
    let err = || SyntaxError::BadFunctionHeader {
        line: line.number,
        text: line.text.clone(),
    };

    let tokens: Vec<&str> = line.text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(err());
    }
    let name = tokens[1].strip_suffix(':').ok_or_else(err)?;
    if name.is_empty() {
        return Err(err());
    }
    Ok(name.to_string())
}

/// Everything after an `if`/`when` keyword: the raw condition text.
fn header_rest(line: &SourceLine) -> String {
    let first = line.first_token();
    line.text.trim()[first.len()..].trim().to_string()
}

/// Count expression of a `repeat <count> times:` header.
fn repeat_count(line: &SourceLine) -> Result<String, SyntaxError> {
    let err = || SyntaxError::BadStatement {
        line: line.number,
        keyword: "repeat",
        expected: "`repeat <count> times:`",
        text: line.text.clone(),
    };

    let rest = line.text.trim()["repeat".len()..].trim();
    let count = rest
        .strip_suffix("times:")
        .or_else(|| rest.strip_suffix("times"))
        .ok_or_else(err)?
        .trim();
    if count.is_empty() {
        return Err(err());
    }
    Ok(count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<SourceLine> {
        crate::loader::clean_lines(src)
    }

    #[test]
    fn test_parse_program_blocks() {
        let src = "\
# a greeting
function greet:
say \"hi there\"
end

start:
call greet
end
";
        let program = parse_program(&lines(src)).unwrap();
        assert_eq!(
            program.functions.get("greet"),
            Some(&vec![Statement::Say("\"hi there\"".into())])
        );
        assert_eq!(
            program.entry,
            Some(vec![Statement::Call {
                name: "greet".into(),
                args: None,
            }])
        );
    }

    #[test]
    fn test_nested_blocks_keep_order_and_depth() {
        let src = "\
start:
say \"one\"
repeat 2 times:
if x == 1
say \"deep\"
end
say \"after if\"
end
say \"last\"
end
";
        let program = parse_program(&lines(src)).unwrap();
        let entry = program.entry.unwrap();
        assert_eq!(
            entry,
            vec![
                Statement::Say("\"one\"".into()),
                Statement::Repeat {
                    count: "2".into(),
                    body: vec![
                        Statement::If {
                            condition: "x == 1".into(),
                            body: vec![Statement::Say("\"deep\"".into())],
                        },
                        Statement::Say("\"after if\"".into()),
                    ],
                },
                Statement::Say("\"last\"".into()),
            ]
        );
    }

    #[test]
    fn test_when_is_an_if() {
        let src = "\
start:
when mood == \"cozy\"
say \"blankets\"
end
end
";
        let program = parse_program(&lines(src)).unwrap();
        assert_eq!(
            program.entry.unwrap(),
            vec![Statement::If {
                condition: "mood == \"cozy\"".into(),
                body: vec![Statement::Say("\"blankets\"".into())],
            }]
        );
    }

    #[test]
    fn test_unterminated_block_fails() {
        let test_cases = vec![
            "start:\nsay \"hi\"",
            "function greet:\nsay \"hi\"",
            "start:\nif x\nsay \"hi\"\nend",
            "start:\nrepeat 3 times:\nsay \"hi\"\nend",
        ];

        for src in test_cases {
            let result = parse_program(&lines(src));
            assert!(
                matches!(result, Err(SyntaxError::UnterminatedBlock { .. })),
                "parsing {src:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_unterminated_error_names_the_opener() {
        let src = "say \"stray\"\nfunction greet:\nsay \"hi\"";
        match parse_program(&lines(src)) {
            Err(SyntaxError::UnterminatedBlock { line, opener }) => {
                assert_eq!(line, 2);
                assert_eq!(opener, "function greet:");
            }
            other => panic!("expected unterminated block, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_function_headers() {
        let test_cases = vec![
            "function\nsay \"hi\"\nend",
            "function greet\nsay \"hi\"\nend",
            "function :\nsay \"hi\"\nend",
            "function one two:\nsay \"hi\"\nend",
        ];

        for src in test_cases {
            let result = parse_program(&lines(src));
            assert!(
                matches!(result, Err(SyntaxError::BadFunctionHeader { .. })),
                "parsing {src:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_repeat_without_times_fails() {
        let src = "start:\nrepeat 3\nsay \"hi\"\nend\nend";
        let result = parse_program(&lines(src));
        assert!(
            matches!(
                result,
                Err(SyntaxError::BadStatement {
                    keyword: "repeat",
                    ..
                })
            ),
            "got {result:?}"
        );
    }

    #[test]
    fn test_duplicates_keep_the_last_definition() {
        let src = "\
function greet:
say \"first\"
end
function greet:
say \"second\"
end
start:
say \"a\"
end
start:
say \"b\"
end
";
        let program = parse_program(&lines(src)).unwrap();
        assert_eq!(
            program.functions.get("greet"),
            Some(&vec![Statement::Say("\"second\"".into())])
        );
        assert_eq!(program.entry, Some(vec![Statement::Say("\"b\"".into())]));
    }

    #[test]
    fn test_stray_top_level_lines_are_skipped() {
        let src = "say \"floating\"\nstart:\nsay \"hi\"\nend\nend";
        let program = parse_program(&lines(src)).unwrap();
        assert_eq!(program.entry, Some(vec![Statement::Say("\"hi\"".into())]));
    }

    #[test]
    fn test_unknown_lines_are_preserved_in_place() {
        let src = "\
start:
say \"before\"
someday this will parse
say \"after\"
end
";
        let program = parse_program(&lines(src)).unwrap();
        assert_eq!(
            program.entry.unwrap(),
            vec![
                Statement::Say("\"before\"".into()),
                Statement::Unknown("someday this will parse".into()),
                Statement::Say("\"after\"".into()),
            ]
        );
    }
}
