mod common;

use common::{build, edges};
use ttb_core::graph::store::SignalGraph;
use ttb_core::netlist::builder::NetlistBuilder;
use ttb_core::netlist::ir::{LogicKind, LpmKind};
use ttb_core::track::{TrackSettings, Tracker};

#[test]
fn local_spliced_out() {
    // gen = a; b = gen[7:4];
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (_, na) = b.wire(top, "a", 8);
    let (_, ngen) = b.local(top, "gen", 8);
    let (_, nb) = b.wire(top, "b", 4);
    b.logic(LogicKind::Buf, vec![ngen, na]);
    b.part_select(LpmKind::PartVp, 4, 4, nb, ngen);

    let graph = build(&b.finish().unwrap());
    assert_eq!(edges(&graph), vec!["top.a[7:4] -> top.b[3:0]"]);

    let (local, _) = graph.signals().find(|(_, s)| s.basename == "gen").unwrap();
    assert!(graph.is_hidden(local));
    assert!(graph.connections_into(local).is_empty());
    assert!(!graph.is_source(local));
}

#[test]
fn chained_locals() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (_, na) = b.wire(top, "a", 4);
    let (_, nl1) = b.local(top, "l1", 4);
    let (_, nl2) = b.local(top, "l2", 4);
    let (_, ny) = b.wire(top, "y", 4);
    b.logic(LogicKind::Buf, vec![nl1, na]);
    b.logic(LogicKind::Buf, vec![nl2, nl1]);
    b.logic(LogicKind::Buf, vec![ny, nl2]);
    let netlist = b.finish().unwrap();

    let settings = TrackSettings::default();
    let mut graph = SignalGraph::new();
    graph.register_all_signals(&netlist);
    let mut tracker = Tracker::new(&netlist, &mut graph, &settings);
    tracker.find_continuous_connections().unwrap();
    assert_eq!(edges(tracker.graph()), vec!["top.l2[3:0] -> top.y[3:0]"]);

    // l2 is found first, l1 only once l2 has been traversed
    assert_eq!(tracker.resolve_local_signals().unwrap(), 2);
    assert_eq!(
        edges(&graph),
        vec![
            "top.l2[3:0] -> top.y[3:0]",
            "top.l1[3:0] -> top.l2[3:0]",
            "top.a[3:0] -> top.l1[3:0]",
        ]
    );

    let stats = graph.process_local_connections();
    assert_eq!(stats.locals_removed, 2);
    assert_eq!(stats.connections_spliced, 2);
    assert_eq!(edges(&graph), vec!["top.a[3:0] -> top.y[3:0]"]);
    assert_eq!(graph.stats().locals, 0);
}

#[test]
fn local_without_loads() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (_, na) = b.wire(top, "a", 2);
    let (_, ngen) = b.local(top, "gen", 2);
    b.logic(LogicKind::Not, vec![ngen, na]);

    // never used as a source, so never traversed
    let graph = build(&b.finish().unwrap());
    assert!(edges(&graph).is_empty());
}
