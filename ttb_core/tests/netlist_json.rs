mod common;

use common::{build_edges, edges};
use ttb_core::diagnostic::DiagKind;
use ttb_core::netlist::builder::NetlistBuilder;
use ttb_core::netlist::ir::{ExprKind, LpmKind, ProcessKind};
use ttb_core::netlist::Netlist;
use ttb_core::track::TrackSettings;

const AND_GATE: &str = r#"{
    "nexus_count": 3,
    "scopes": [{ "name": "top", "kind": "module" }],
    "signals": [
        { "scope": 0, "name": "a", "port": "input", "words": [0] },
        { "scope": 0, "name": "b", "port": "input", "words": [1] },
        { "scope": 0, "name": "y", "port": "output", "words": [2] }
    ],
    "logic": [{ "kind": "and", "pins": [2, 0, 1] }]
}"#;

#[test]
fn load_gate() {
    let netlist = Netlist::from_json(AND_GATE).unwrap();
    assert_eq!(netlist.nexus_count(), 3);
    assert_eq!(netlist.scope_path(netlist.root_scopes()[0]), "top");
    assert_eq!(
        build_edges(&netlist),
        vec!["top.a[0:0] -> top.y[0:0]", "top.b[0:0] -> top.y[0:0]"]
    );
}

#[test]
fn inputs_are_marked() {
    let netlist = Netlist::from_json(AND_GATE).unwrap();
    let graph = ttb_core::build_signal_graph(&netlist, &TrackSettings::default()).unwrap();
    let stats = graph.stats();
    assert_eq!(stats.signals, 3);
    assert_eq!(stats.inputs, 2);
    assert_eq!(stats.connections, 2);
    assert_eq!(stats.sinks, 1);
}

#[test]
fn reject_nexus_out_of_range() {
    let src = r#"{
        "nexus_count": 1,
        "scopes": [{ "name": "top", "kind": "module" }],
        "signals": [{ "scope": 0, "name": "a", "words": [4] }]
    }"#;
    let err = Netlist::from_json(src).unwrap_err();
    assert_eq!(err.kind(), DiagKind::Input);
    assert!(err.title().contains("missing"), "{err}");
}

#[test]
fn reject_top_level_task() {
    let src = r#"{
        "nexus_count": 0,
        "scopes": [{ "name": "t", "kind": "task" }]
    }"#;
    let err = Netlist::from_json(src).unwrap_err();
    assert_eq!(err.kind(), DiagKind::Unsupported);
    assert!(err.title().contains("top level scope type `task`"), "{err}");
}

#[test]
fn reject_forward_statement() {
    let src = r#"{
        "nexus_count": 0,
        "scopes": [{ "name": "top", "kind": "module" }],
        "statements": [
            { "kind": { "wait": { "events": [], "body": 1 } }, "loc": { "file": "top.v", "line": 4 } },
            { "kind": "noop" }
        ],
        "processes": [{ "kind": "initial", "scope": 0, "body": 0 }]
    }"#;
    let err = Netlist::from_json(src).unwrap_err();
    assert_eq!(err.kind(), DiagKind::Input);
    assert!(err.title().contains("not declared before it"), "{err}");
    assert_eq!(err.diagnostic().location.as_ref().map(|l| l.line), Some(4));
}

#[test]
fn reject_signal_without_words() {
    let src = r#"{
        "nexus_count": 0,
        "scopes": [{ "name": "top", "kind": "module" }],
        "signals": [{ "scope": 0, "name": "a", "words": [] }]
    }"#;
    let err = Netlist::from_json(src).unwrap_err();
    assert!(err.title().contains("has no words"), "{err}");
}

#[test]
fn reject_malformed_json() {
    let err = Netlist::from_json("{ \"nexus_count\": 0, \"bogus\": 1 }").unwrap_err();
    assert_eq!(err.kind(), DiagKind::Input);
    assert_eq!(err.title(), "failed to parse netlist");

    let err = Netlist::from_json("{").unwrap_err();
    assert_eq!(err.title(), "failed to parse netlist");
}

#[test]
fn builder_design_survives_json() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (_, nclk) = b.input(top, "clk", 1);
    let (x, nx) = b.wire(top, "x", 8);
    let (_, nlo) = b.wire(top, "lo", 4);
    let (y, _) = b.reg(top, "y", 4);
    b.part_select(LpmKind::PartVp, 4, 0, nlo, nx);

    let base = b.expr_signal(x);
    let offset = b.expr_value(4, 32);
    let rval = b.expr(
        4,
        ExprKind::Select {
            base,
            offset: Some(offset),
        },
    );
    let assign = b.assign_nb(y, rval);
    let body = b.wait_posedge(nclk, assign);
    b.process(ProcessKind::Always, top, body);

    let json = serde_json::to_string(b.design()).unwrap();
    let direct = b.finish().unwrap();
    let loaded = Netlist::from_json(&json).unwrap();

    let settings = TrackSettings {
        clock: Some("clk".to_owned()),
    };
    let direct = ttb_core::build_signal_graph(&direct, &settings).unwrap();
    let loaded = ttb_core::build_signal_graph(&loaded, &settings).unwrap();
    assert_eq!(edges(&direct), edges(&loaded));
    assert_eq!(
        edges(&loaded),
        vec!["top.x[3:0] -> top.lo[3:0]", "top.x[7:4] -> top.y[3:0]"]
    );
}

#[test]
fn reject_part_select_beyond_index_range() {
    let src = r#"{
        "nexus_count": 2,
        "scopes": [{ "name": "top", "kind": "module" }],
        "signals": [
            { "scope": 0, "name": "x", "msb": 7, "words": [0] },
            { "scope": 0, "name": "y", "msb": 3, "words": [1] }
        ],
        "lpms": [{ "kind": "part_pv", "width": 4, "q": 1, "data": [0], "base": 4294967294 }]
    }"#;
    let err = Netlist::from_json(src).unwrap_err();
    assert_eq!(err.kind(), DiagKind::Input);
    assert!(err.title().contains("4 bits at base 4294967294"), "{err}");
}

#[test]
fn reject_signal_spanning_all_indices() {
    let src = r#"{
        "nexus_count": 1,
        "scopes": [{ "name": "top", "kind": "module" }],
        "signals": [{ "scope": 0, "name": "huge", "msb": 4294967295, "lsb": 0, "words": [0] }]
    }"#;
    let err = Netlist::from_json(src).unwrap_err();
    assert!(err.title().contains("signal `huge` is wider than 32 bit indices"), "{err}");
}
