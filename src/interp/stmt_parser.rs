//! Turns one cleaned source line into exactly one `Statement`.
//!
//! Keyword dispatch happens on the first whitespace token. A line no
//! rule matches becomes `Unknown` instead of an error, with one
//! exception: a bare single token such as `greet` is an implicit
//! `call greet`, which is how entry blocks invoke functions without
//! the `call` keyword.

use crate::model::SourceLine;

use super::ast::Statement;
use super::error::SyntaxError;
use super::splitter::{split_list, strip_quotes};

pub fn parse_statement(line: &SourceLine) -> Result<Statement, SyntaxError> {
    let text = line.text.trim();

    match line.first_token() {
        "say" => parse_say(line, text),
        "let" => parse_let(line, text),
        "get" => parse_get(line, text),
        "call" => parse_call(line, text),
        "because" => Ok(Statement::Because(rest_after(text, "because"))),
        "mood" => parse_mood(line, text, "mood"),
        "tone" => parse_mood(line, text, "tone"),
        "wait" => parse_wait(line, text),
        _ => {
            if !text.contains(char::is_whitespace) && !text.ends_with(':') {
                // bare function invocation
                Ok(Statement::Call {
                    name: text.to_string(),
                    args: None,
                })
            } else {
                Ok(Statement::Unknown(text.to_string()))
            }
        }
    }
}

fn parse_say(line: &SourceLine, text: &str) -> Result<Statement, SyntaxError> {
    let expr = rest_after(text, "say");
    if expr.is_empty() {
        return Err(malformed(line, "say", "`say <text>`"));
    }
    Ok(Statement::Say(expr))
}

fn parse_let(line: &SourceLine, text: &str) -> Result<Statement, SyntaxError> {
    let err = || malformed(line, "let", "`let <name> = <value>`");

    let rest = text["let".len()..].trim_start();
    let (name, after_name) = split_first_token(rest);
    if name.is_empty() {
        return Err(err());
    }
    // the `=` must stand alone as the third token
    let Some(value_part) = after_name.trim_start().strip_prefix('=') else {
        return Err(err());
    };
    if !value_part.is_empty() && !value_part.starts_with(char::is_whitespace) {
        return Err(err());
    }
    let expr = value_part.trim();
    if expr.is_empty() {
        return Err(err());
    }

    Ok(Statement::Let {
        name: name.to_string(),
        expr: expr.to_string(),
    })
}

fn parse_get(line: &SourceLine, text: &str) -> Result<Statement, SyntaxError> {
    let err = || malformed(line, "get", "`get <name> as \"prompt\"`");

    let Some(as_pos) = find_keyword(text, " as ", "get".len()) else {
        return Err(err());
    };
    let name = text["get".len()..as_pos].trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(err());
    }

    let raw_prompt = text[as_pos + " as ".len()..].trim();
    if raw_prompt.is_empty() {
        return Err(err());
    }
    // a single missing quote is repaired, anything worse is rejected
    let prompt = repair_quotes(raw_prompt);
    if strip_quotes(&prompt).is_none() {
        return Err(err());
    }

    Ok(Statement::Get {
        name: name.to_string(),
        prompt,
    })
}

fn parse_call(line: &SourceLine, text: &str) -> Result<Statement, SyntaxError> {
    let err = || malformed(line, "call", "`call <name> [with <arg>, ...]`");

    let rest = text["call".len()..].trim();
    if rest.is_empty() {
        return Err(err());
    }

    if let Some(pos) = rest.find(" with ") {
        let name = rest[..pos].trim();
        let args_text = rest[pos + " with ".len()..].trim();
        if name.is_empty() || name.contains(char::is_whitespace) || args_text.is_empty() {
            return Err(err());
        }
        Ok(Statement::Call {
            name: name.to_string(),
            args: Some(split_list(args_text)),
        })
    } else if rest == "with" || rest.ends_with(" with") {
        // `call foo with` – the argument text never arrived
        Err(err())
    } else {
        if rest.contains(char::is_whitespace) {
            return Err(err());
        }
        Ok(Statement::Call {
            name: rest.to_string(),
            args: None,
        })
    }
}

fn parse_mood(
    line: &SourceLine,
    text: &str,
    keyword: &'static str,
) -> Result<Statement, SyntaxError> {
    let err = || malformed(line, keyword, "`mood = <value>`");

    let Some(value_part) = text[keyword.len()..].trim_start().strip_prefix('=') else {
        return Err(err());
    };
    if !value_part.is_empty() && !value_part.starts_with(char::is_whitespace) {
        return Err(err());
    }
    let expr = value_part.trim();
    if expr.is_empty() {
        return Err(err());
    }
    Ok(Statement::Mood(expr.to_string()))
}

fn parse_wait(line: &SourceLine, text: &str) -> Result<Statement, SyntaxError> {
    let rest = rest_after(text, "wait");
    if rest.is_empty() {
        return Err(malformed(line, "wait", "`wait <duration> [unit]`"));
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let last = tokens[tokens.len() - 1];
    if tokens.len() > 2 && last.chars().all(|c| c.is_ascii_alphabetic()) {
        // trailing word is the unit, everything before it the duration
        let duration = rest[..rest.len() - last.len()].trim();
        Ok(Statement::Wait {
            duration: duration.to_string(),
            unit: last.to_string(),
        })
    } else {
        Ok(Statement::Wait {
            duration: rest,
            unit: "seconds".to_string(),
        })
    }
}

fn malformed(line: &SourceLine, keyword: &'static str, expected: &'static str) -> SyntaxError {
    SyntaxError::BadStatement {
        line: line.number,
        keyword,
        expected,
        text: line.text.clone(),
    }
}

/// Everything after the keyword, trimmed.
fn rest_after(text: &str, keyword: &str) -> String {
    text[keyword.len()..].trim().to_string()
}

fn split_first_token(src: &str) -> (&str, &str) {
    match src.find(char::is_whitespace) {
        Some(pos) => (&src[..pos], &src[pos..]),
        None => (src, ""),
    }
}

/// Byte offset of the first ` kw ` occurrence at or after `from`,
/// matched ASCII case-insensitively (` as ` also matches ` AS `).
fn find_keyword(text: &str, kw: &str, from: usize) -> Option<usize> {
    let hay = text.as_bytes();
    let needle = kw.as_bytes();
    hay.windows(needle.len())
        .enumerate()
        .skip(from)
        .find(|(_, w)| w.eq_ignore_ascii_case(needle))
        .map(|(i, _)| i)
}

/// Repair a one-sided quote by appending/prepending the matching one.
/// Already-balanced or entirely unquoted text comes back unchanged.
fn repair_quotes(src: &str) -> String {
    let bytes = src.as_bytes();
    let is_quote = |b: u8| b == b'"' || b == b'\'';
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];

    if is_quote(first) && (src.len() == 1 || last != first) {
        format!("{src}{}", first as char)
    } else if is_quote(last) && !is_quote(first) {
        format!("{}{src}", last as char)
    } else {
        src.to_string()
    }
}
