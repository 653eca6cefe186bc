// The graph is the output, everything else goes through `log`.
#![deny(clippy::print_stdout)]

pub mod back;
pub mod config;
pub mod diagnostic;
pub mod graph;
pub mod netlist;
pub mod track;
pub mod util;

use crate::diagnostic::DiagResult;
use crate::graph::store::SignalGraph;
use crate::netlist::Netlist;
use crate::track::{TrackSettings, Tracker};

/// Run all tracking stages and compact the result.
///
/// The command line driver runs the same stages one by one to time them.
pub fn build_signal_graph(netlist: &Netlist, settings: &TrackSettings) -> DiagResult<SignalGraph> {
    let mut graph = SignalGraph::new();
    graph.register_all_signals(netlist);

    let mut tracker = Tracker::new(netlist, &mut graph, settings);
    tracker.find_continuous_connections()?;
    tracker.find_procedural_connections()?;
    let resolved = tracker.resolve_local_signals()?;

    let stats = graph.process_local_connections();
    log::info!(
        "traversed {resolved} local signals, removed {} and spliced {} connections",
        stats.locals_removed,
        stats.connections_spliced
    );
    Ok(graph)
}
