//! Statement tree for one parsed script.
//!
//! Value expressions stay as raw strings here; the evaluator gives them
//! meaning at run time, so a parsed program can be dumped or inspected
//! without touching any environment.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `say <expr>` – print the evaluated expression.
    Say(String),

    /// `let <name> = <expr>` – bind (or overwrite) a variable.
    Let { name: String, expr: String },

    /// `get <name> as "prompt"` – show the prompt, read one line,
    /// store it verbatim under `name`.
    Get { name: String, prompt: String },

    /// `if <condition>` / `when <condition>` … `end`.
    /// No else branch exists in the language.
    If {
        condition: String,
        body: Vec<Statement>,
    },

    /// `repeat <expr> times:` … `end`.
    Repeat { count: String, body: Vec<Statement> },

    /// `call <name>` or `call <name> with a, b` – also produced for a
    /// bare single-token line (`greet` alone on a line calls `greet`).
    Call {
        name: String,
        args: Option<Vec<String>>,
    },

    /// `because <text>` – narrative annotation, no effect.
    Because(String),

    /// `mood = <expr>` / `tone = <expr>` – sets the mood slot.
    Mood(String),

    /// `wait <expr> [unit]`. The unit defaults to `seconds`; whether it
    /// is one we can actually sleep for is checked at run time.
    Wait { duration: String, unit: String },

    /// Any line the grammar does not recognize. Kept, never rejected;
    /// the executor warns and moves on.
    Unknown(String),
}
