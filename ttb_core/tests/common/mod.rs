#![allow(dead_code)]

use ttb_core::diagnostic::DiagError;
use ttb_core::graph::store::SignalGraph;
use ttb_core::netlist::Netlist;
use ttb_core::track::TrackSettings;

/// Every connection of the graph as `source[msb:lsb] -> sink[msb:lsb]`, in graph order.
pub fn edges(graph: &SignalGraph) -> Vec<String> {
    graph
        .connections()
        .map(|c| {
            let source = graph.signal(c.source.signal).full_name(c.source.id);
            let sink = graph.signal(c.sink.signal).full_name(c.sink.id);
            format!("{source}{} -> {sink}{}", c.source.slice, c.sink.slice)
        })
        .collect()
}

pub fn build(netlist: &Netlist) -> SignalGraph {
    ttb_core::build_signal_graph(netlist, &TrackSettings::default()).unwrap()
}

pub fn build_edges(netlist: &Netlist) -> Vec<String> {
    edges(&build(netlist))
}

pub fn build_with_clock(netlist: &Netlist, clock: &str) -> SignalGraph {
    let settings = TrackSettings {
        clock: Some(clock.to_owned()),
    };
    ttb_core::build_signal_graph(netlist, &settings).unwrap()
}

pub fn build_err(netlist: &Netlist) -> DiagError {
    ttb_core::build_signal_graph(netlist, &TrackSettings::default()).unwrap_err()
}
