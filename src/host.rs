//! Production collaborators for the executor: real console, real clock,
//! real randomness. Tests substitute their own.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::interp::exec::{Console, Delay};
use crate::interp::expr::Picker;

/// stdout/stdin console. Prompts are printed without a trailing newline
/// and stdout is flushed before blocking on input.
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt} ");
        io::stdout().flush()?;
        let mut buffer = String::new();
        io::stdin().lock().read_line(&mut buffer)?;
        Ok(buffer)
    }

    fn warn(&mut self, text: &str) {
        eprintln!("warning: {text}");
    }
}

/// Wall-clock delay via `thread::sleep`.
pub struct WallClock;

impl Delay for WallClock {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Uniform random choice.
pub struct RandomPicker;

impl Picker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}
