use clap::Parser;
use std::path::PathBuf;
use ttb_util::constants::{TTB_TOOL_NAME, TTB_VERSION};

/// Extract the signal dependency graph of an elaborated netlist and write it as a DOT file.
#[derive(Parser, Debug)]
#[command(name = TTB_TOOL_NAME, version = TTB_VERSION)]
pub struct Args {
    // input
    /// Netlist in JSON format.
    pub netlist: PathBuf,
    /// Config file, by default `ttb.toml` is searched in the working directory and its ancestors.
    #[arg(long)]
    pub config: Option<PathBuf>,

    // output
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Basename of the clock signal, which is not reported as a dependency of flip-flops.
    #[arg(long)]
    pub clock: Option<String>,
    /// File listing signals to leave out of the graph, one full name per line.
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,
    #[arg(long)]
    pub ignore_constants: bool,

    // debug
    /// Increase log verbosity, can be repeated.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(long)]
    pub profile: bool,
}
