pub mod cli;
pub mod host;
pub mod interp;
pub mod loader;
pub mod model;

use anyhow::Context;
use clap::Parser;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Load ───────────────────────────────────────────────────────
    let lines = loader::load_file(&args.script)?;

    // 2. ── Parse ──────────────────────────────────────────────────────
    let program = interp::parse(&lines).with_context(|| "Parsing script")?;

    if args.dump_ast {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    // 3. ── Execute ────────────────────────────────────────────────────
    let mut console = host::StdConsole;
    let mut delay = host::WallClock;
    let mut picker = host::RandomPicker;
    let mut executor =
        interp::exec::Executor::new(&program, &mut console, &mut delay, &mut picker);
    executor.run().with_context(|| "Running script")?;

    Ok(())
}
