use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Script to run (`.txt` is assumed when no extension is given)
    pub script: PathBuf,

    /// Print the parsed program as JSON instead of executing it
    #[arg(long)]
    pub dump_ast: bool,
}
