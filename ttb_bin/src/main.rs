use crate::args::Args;
use crate::util::{find_and_read_config, FoundConfig};
use clap::Parser;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use ttb_core::back::dot::graph_to_dot;
use ttb_core::config::Config;
use ttb_core::diagnostic::{DiagResult, Diagnostic, DiagnosticStringSettings};
use ttb_core::graph::store::SignalGraph;
use ttb_core::netlist::Netlist;
use ttb_core::track::Tracker;
use ttb_util::constants::TTB_CONFIG_FILE_NAME;
use ttb_util::io::IoErrorExt;

mod args;
mod util;

#[global_allocator]
static ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match main_inner(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let s = e.diagnostic().to_string(DiagnosticStringSettings::default());
            eprintln!("{s}\n");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct Timings {
    stages: Vec<(&'static str, Duration)>,
}

impl Timings {
    fn run<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        let time = start.elapsed();
        log::info!("{name}: {time:?}");
        self.stages.push((name, time));
        result
    }
}

fn main_inner(args: Args) -> DiagResult {
    let Args {
        netlist: netlist_path,
        config: config_path,
        output,
        clock,
        ignore_file,
        ignore_constants,
        verbose: _,
        profile,
    } = args;

    let start_all = Instant::now();
    let mut timings = Timings { stages: vec![] };

    // collect settings, command line flags take precedence over the config file
    let mut config = match find_and_read_config(config_path)? {
        Some(FoundConfig { path, source }) => {
            log::info!("using config file {path:?}");
            Config::from_file(&path, &source)?
        }
        None => Config::default(),
    };
    if output.is_some() {
        config.output = output;
    }
    if clock.is_some() {
        config.clock = clock;
    }
    if ignore_file.is_some() {
        config.ignore_file = ignore_file;
    }
    config.ignore_constants |= ignore_constants;

    let Some(output) = config.output.clone() else {
        return Err(Diagnostic::new_input("no output file given")
            .note(format!("pass `-o` or set `output` in `{TTB_CONFIG_FILE_NAME}`"))
            .finish());
    };
    let settings = config.track_settings();
    let filter = config.graph_filter()?;

    // build graph
    let netlist = timings.run("read netlist", || Netlist::from_path(&netlist_path))?;

    let mut graph = SignalGraph::new();
    timings.run("register signals", || graph.register_all_signals(&netlist));

    let mut tracker = Tracker::new(&netlist, &mut graph, &settings);
    timings.run("continuous", || tracker.find_continuous_connections())?;
    timings.run("procedural", || tracker.find_procedural_connections())?;
    let resolved = timings.run("resolve locals", || tracker.resolve_local_signals())?;
    log::info!("traversed {resolved} local signals");

    let compacted = timings.run("compact", || graph.process_local_connections());
    log::info!(
        "removed {} local signals, spliced {} connections",
        compacted.locals_removed,
        compacted.connections_spliced
    );

    let ignored = timings.run("filter", || filter.apply(&mut graph));
    log::info!("ignored {ignored} signals");

    let stats = graph.stats();
    log::info!(
        "graph has {} signals ({} flip-flops, {} inputs), {} constants and {} connections into {} sinks",
        stats.signals,
        stats.flip_flops,
        stats.inputs,
        stats.constants,
        stats.connections,
        stats.sinks
    );
    if stats.locals != 0 {
        log::warn!("{} local signals are left in the graph", stats.locals);
    }

    // write output
    let dot = timings.run("export dot", || graph_to_dot(&graph));
    std::fs::write(&output, dot).map_err(|e| {
        Diagnostic::new_input("failed to write output file")
            .note(e.with_path(output.clone()).to_string())
            .finish()
    })?;

    let time_all = start_all.elapsed();

    if profile {
        eprintln!();
        eprintln!("profiling info:");
        eprintln!("-----------------------------------------------");
        eprintln!("netlist nexuses:  {}", netlist.nexus_count());
        eprintln!("netlist signals:  {}", netlist.signals().len());
        eprintln!("graph signals:    {}", stats.signals + stats.constants);
        eprintln!("graph edges:      {}", stats.connections);
        eprintln!("-----------------------------------------------");
        for (name, time) in &timings.stages {
            eprintln!("{:<18}{:?}", format!("{name}:"), time);
        }
        eprintln!("-----------------------------------------------");
        eprintln!("total:            {:?}", time_all);
        eprintln!();
    }

    Ok(())
}
