//! Tree-walking executor.
//!
//! One executor owns one environment for the whole run. There is no
//! call-local scoping: a function body reads and writes the same
//! variables as its caller, and `call … with …` arguments are evaluated
//! and then discarded, never bound. The console, delay, and random
//! picker are injected so the walker itself never touches stdin, the
//! wall clock, or a global RNG.

use std::io;
use std::time::Duration;

use crate::model::Program;

use super::ast::Statement;
use super::error::RunError;
use super::expr::{self, Env, Picker, Value};

/// Calls nested deeper than this abort with a dedicated error instead
/// of overflowing the stack. No narrative script nests anywhere close.
const MAX_CALL_DEPTH: usize = 256;

/// Text output and line input.
pub trait Console {
    fn say(&mut self, text: &str);
    /// Display the prompt, block for one line of input, return it raw
    /// (trailing newline included – the executor strips it).
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
    fn warn(&mut self, text: &str);
}

/// Blocking delay, `wait`'s only effect.
pub trait Delay {
    fn sleep(&mut self, duration: Duration);
}

pub struct Executor<'a> {
    program: &'a Program,
    console: &'a mut dyn Console,
    delay: &'a mut dyn Delay,
    picker: &'a mut dyn Picker,
    env: Env,
    mood: Option<Value>,
    depth: usize,
}

impl<'a> Executor<'a> {
    pub fn new(
        program: &'a Program,
        console: &'a mut dyn Console,
        delay: &'a mut dyn Delay,
        picker: &'a mut dyn Picker,
    ) -> Self {
        Self {
            program,
            console,
            delay,
            picker,
            env: Env::new(),
            mood: None,
            depth: 0,
        }
    }

    /// Run the `start` block to completion or to the first error.
    pub fn run(&mut self) -> Result<(), RunError> {
        let program = self.program;
        let entry = program.entry.as_ref().ok_or(RunError::NoEntryPoint)?;
        self.exec_block(entry)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn mood(&self) -> Option<&Value> {
        self.mood.as_ref()
    }

    fn exec_block(&mut self, statements: &[Statement]) -> Result<(), RunError> {
        for statement in statements {
            self.exec_statement(statement)?;
        }
        Ok(())
    }

    fn exec_statement(&mut self, statement: &Statement) -> Result<(), RunError> {
        match statement {
            Statement::Say(expr) => {
                let value = self.eval(expr)?;
                self.console.say(&value.to_string());
                Ok(())
            }

            Statement::Let { name, expr } => {
                let value = self.eval(expr)?;
                self.env.insert(name.clone(), value);
                Ok(())
            }

            Statement::Get { name, prompt } => {
                let prompt = self.eval(prompt)?.to_string();
                let mut input = self.console.ask(&prompt)?;
                if input.ends_with('\n') {
                    input.pop();
                    if input.ends_with('\r') {
                        input.pop();
                    }
                }
                // stored verbatim, no coercion
                self.env.insert(name.clone(), Value::Str(input));
                Ok(())
            }

            Statement::If { condition, body } => {
                if self.eval_condition(condition)? {
                    self.exec_block(body)?;
                }
                Ok(())
            }

            Statement::Repeat { count, body } => {
                let value = self.eval(count)?;
                let n = value
                    .as_int()
                    .ok_or_else(|| RunError::NotAWholeNumber(value.to_string()))?;
                for _ in 0..n.max(0) {
                    self.exec_block(body)?;
                }
                Ok(())
            }

            Statement::Call { name, args } => self.call_function(name, args.as_deref()),

            Statement::Because(_) => Ok(()),

            Statement::Mood(expr) => {
                self.mood = Some(self.eval(expr)?);
                Ok(())
            }

            Statement::Wait { duration, unit } => {
                let value = self.eval(duration)?;
                let amount = value
                    .as_float()
                    .ok_or_else(|| RunError::NotANumber(value.to_string()))?;
                let seconds = match unit.to_ascii_lowercase().as_str() {
                    "seconds" | "second" => amount,
                    "milliseconds" | "millisecond" => amount / 1000.0,
                    _ => return Err(RunError::BadWaitUnit(unit.clone())),
                };
                let pause = Duration::try_from_secs_f64(seconds)
                    .map_err(|_| RunError::BadDuration(value.to_string(), unit.clone()))?;
                self.delay.sleep(pause);
                Ok(())
            }

            Statement::Unknown(raw) => {
                self.console.warn(&format!("skipping unrecognized line: {raw}"));
                Ok(())
            }
        }
    }

    fn call_function(&mut self, name: &str, args: Option<&[String]>) -> Result<(), RunError> {
        // arguments are evaluated (so their errors surface) but the
        // language has no parameter binding – the values go nowhere
        if let Some(args) = args {
            for arg in args {
                self.eval(arg)?;
            }
        }

        let program = self.program;
        let body = program
            .functions
            .get(name)
            .ok_or_else(|| RunError::UndefinedFunction(name.to_string()))?;

        if self.depth >= MAX_CALL_DEPTH {
            return Err(RunError::CallDepthExceeded(MAX_CALL_DEPTH));
        }
        self.depth += 1;
        let result = self.exec_block(body);
        self.depth -= 1;
        result
    }

    /// A condition is either one token (its value's truthiness) or
    /// exactly `lhs op rhs` with `op` one of `==` / `!=`. Both sides
    /// are re-evaluated on every encounter, never cached.
    fn eval_condition(&mut self, raw: &str) -> Result<bool, RunError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        match tokens.as_slice() {
            [single] => Ok(self.eval(single)?.truthy()),
            [lhs, op, rhs] => {
                if *op != "==" && *op != "!=" {
                    return Err(RunError::BadComparison((*op).to_string()));
                }
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                Ok((left == right) == (*op == "=="))
            }
            _ => Err(RunError::BadCondition(raw.to_string())),
        }
    }

    fn eval(&mut self, expr: &str) -> Result<Value, RunError> {
        expr::evaluate(expr, &self.env, &mut *self.picker)
    }
}
