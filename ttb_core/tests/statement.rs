mod common;

use common::{build, build_edges, build_err, build_with_clock, edges};
use ttb_core::diagnostic::DiagKind;
use ttb_core::graph::signal::SignalKind;
use ttb_core::netlist::builder::NetlistBuilder;
use ttb_core::netlist::ir::{
    EventInfo, ExprKind, Lval, LvalTarget, ProcessKind, StmtKind, UnsupportedExprKind, UnsupportedStmtKind,
};
use ttb_core::netlist::Netlist;

/// `always @(posedge clk) q <= d;`
fn flip_flop_netlist() -> Netlist {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (_, nclk) = b.input(top, "clk", 1);
    let (d, _) = b.input(top, "d", 4);
    let (q, _) = b.reg(top, "q", 4);

    let rval = b.expr_signal(d);
    let assign = b.assign_nb(q, rval);
    let body = b.wait_posedge(nclk, assign);
    b.process(ProcessKind::Always, top, body);
    b.finish().unwrap()
}

#[test]
fn flip_flop() {
    let netlist = flip_flop_netlist();
    let graph = build(&netlist);
    assert_eq!(
        edges(&graph),
        vec!["top.d[3:0] -> top.q[3:0]", "top.clk[0:0] -> top.q[3:0]"]
    );

    let q = graph
        .signals()
        .find(|(_, s)| s.basename == "q")
        .map(|(_, s)| s.clone())
        .unwrap();
    assert!(q.is_flip_flop);
}

#[test]
fn flip_flop_with_clock_setting() {
    let graph = build_with_clock(&flip_flop_netlist(), "clk");
    assert_eq!(edges(&graph), vec!["top.d[3:0] -> top.q[3:0]"]);
    assert!(graph.signals().any(|(_, s)| s.basename == "q" && s.is_flip_flop));
}

#[test]
fn conditional_adds_control_sources() {
    // always @(en) if (en) y = a; else y = b;
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (en, nen) = b.wire(top, "en", 1);
    let (a, _) = b.wire(top, "a", 1);
    let (bb, _) = b.wire(top, "b", 1);
    let (y, _) = b.reg(top, "y", 1);

    let ea = b.expr_signal(a);
    let if_true = b.assign(y, ea);
    let eb = b.expr_signal(bb);
    let if_false = b.assign(y, eb);
    let cond = b.expr_signal(en);
    let condit = b.stmt(StmtKind::Condit {
        cond,
        if_true: Some(if_true),
        if_false: Some(if_false),
    });
    let wait = b.stmt(StmtKind::Wait {
        events: vec![EventInfo {
            any: vec![nen],
            ..EventInfo::default()
        }],
        body: Some(condit),
    });
    b.process(ProcessKind::Always, top, wait);

    let graph = build(&b.finish().unwrap());
    assert_eq!(
        edges(&graph),
        vec![
            "top.a[0:0] -> top.y[0:0]",
            "top.en[0:0] -> top.y[0:0]",
            "top.b[0:0] -> top.y[0:0]",
        ]
    );
    assert!(graph.signals().all(|(_, s)| !s.is_flip_flop));
}

#[test]
fn part_select_target() {
    // y[7:4] = a;
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 4);
    let (y, _) = b.reg(top, "y", 8);

    let rval = b.expr_signal(a);
    let offset = b.expr_value(4, 32);
    let assign = b.stmt(StmtKind::Assign {
        lvals: vec![Lval {
            width: 4,
            target: LvalTarget::Signal(y),
            part_offset: Some(offset),
            word: None,
        }],
        rval,
    });
    b.process(ProcessKind::Initial, top, assign);

    assert_eq!(build_edges(&b.finish().unwrap()), vec!["top.a[3:0] -> top.y[7:4]"]);
}

#[test]
fn non_constant_part_select_target() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 1);
    let (i, _) = b.wire(top, "i", 3);
    let (y, _) = b.reg(top, "y", 8);

    let rval = b.expr_signal(a);
    let offset = b.expr_signal(i);
    let assign = b.stmt_at(
        StmtKind::Assign {
            lvals: vec![Lval {
                width: 1,
                target: LvalTarget::Signal(y),
                part_offset: Some(offset),
                word: None,
            }],
            rval,
        },
        "top.v",
        7,
    );
    b.process(ProcessKind::Initial, top, assign);

    let err = build_err(&b.finish().unwrap());
    assert_eq!(err.kind(), DiagKind::Unsupported);
    assert!(err.title().contains("non-constant part select offset"), "{err}");
    assert_eq!(err.diagnostic().location.as_ref().map(|l| l.line), Some(7));
}

#[test]
fn concatenation_rval() {
    // y = {a, b};
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 3);
    let (bb, _) = b.wire(top, "b", 5);
    let (y, _) = b.reg(top, "y", 8);

    let ea = b.expr_signal(a);
    let eb = b.expr_signal(bb);
    let rval = b.expr(
        8,
        ExprKind::Concat {
            parts: vec![ea, eb],
            repeat: 1,
        },
    );
    let assign = b.assign(y, rval);
    b.process(ProcessKind::Initial, top, assign);

    assert_eq!(
        build_edges(&b.finish().unwrap()),
        vec!["top.a[2:0] -> top.y[7:5]", "top.b[4:0] -> top.y[4:0]"]
    );
}

#[test]
fn part_select_rval() {
    // y = x[5:2];
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (x, _) = b.wire(top, "x", 8);
    let (y, _) = b.reg(top, "y", 4);

    let base = b.expr_signal(x);
    let offset = b.expr_value(2, 32);
    let rval = b.expr(
        4,
        ExprKind::Select {
            base,
            offset: Some(offset),
        },
    );
    let assign = b.assign(y, rval);
    b.process(ProcessKind::Initial, top, assign);

    assert_eq!(build_edges(&b.finish().unwrap()), vec!["top.x[5:2] -> top.y[3:0]"]);
}

#[test]
fn part_select_rval_offset_out_of_range() {
    // y = x[32'hffff_fffe +: 4];
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (x, _) = b.wire(top, "x", 8);
    let (y, _) = b.reg(top, "y", 4);

    let base = b.expr_signal(x);
    let offset = b.expr_value(0xffff_fffe, 32);
    let rval = b.expr(
        4,
        ExprKind::Select {
            base,
            offset: Some(offset),
        },
    );
    let lval = b.lval(y);
    let assign = b.stmt_at(
        StmtKind::Assign {
            lvals: vec![lval],
            rval,
        },
        "top.v",
        9,
    );
    b.process(ProcessKind::Initial, top, assign);

    let err = build_err(&b.finish().unwrap());
    assert_eq!(err.kind(), DiagKind::Input);
    assert!(err.title().contains("offset 4294967294 of `x`"), "{err}");
    assert_eq!(err.diagnostic().location.as_ref().map(|l| l.line), Some(9));
}

#[test]
fn part_select_target_offset_out_of_range() {
    // y[32'hffff_fffe +: 4] = a;
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 4);
    let (y, _) = b.reg(top, "y", 8);

    let rval = b.expr_signal(a);
    let offset = b.expr_value(0xffff_fffe, 32);
    let assign = b.stmt(StmtKind::Assign {
        lvals: vec![Lval {
            width: 4,
            target: LvalTarget::Signal(y),
            part_offset: Some(offset),
            word: None,
        }],
        rval,
    });
    b.process(ProcessKind::Initial, top, assign);

    let err = build_err(&b.finish().unwrap());
    assert_eq!(err.kind(), DiagKind::Input);
    assert!(err.title().contains("in assignment to `y`, beyond 32 bit indices"), "{err}");
}

#[test]
fn counter_feeds_itself() {
    // always @(posedge clk) count <= count + 1;
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (_, nclk) = b.input(top, "clk", 1);
    let (count, _) = b.reg(top, "count", 4);

    let left = b.expr_signal(count);
    let right = b.expr_number("0001");
    let rval = b.expr(
        4,
        ExprKind::Binary {
            op: '+',
            left,
            right,
        },
    );
    let assign = b.assign_nb(count, rval);
    let body = b.wait_posedge(nclk, assign);
    b.process(ProcessKind::Always, top, body);

    let graph = build_with_clock(&b.finish().unwrap(), "clk");
    assert_eq!(
        edges(&graph),
        vec!["top.count[3:0] -> top.count[3:0]", "const.0.0001[3:0] -> top.count[3:0]"]
    );
    let constant = graph.signals().find(|(_, s)| s.is_constant()).map(|(_, s)| s.kind);
    assert!(matches!(constant, Some(SignalKind::Expression(_))));
}

#[test]
fn unsupported_statement_has_location() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let body = b.stmt_at(StmtKind::Unsupported(UnsupportedStmtKind::While), "design.v", 12);
    b.process(ProcessKind::Initial, top, body);

    let err = build_err(&b.finish().unwrap());
    assert_eq!(err.kind(), DiagKind::Unsupported);
    assert!(err.title().contains("statement type `while`"), "{err}");
    let location = err.diagnostic().location.clone().unwrap();
    assert_eq!(location.file.to_str(), Some("design.v"));
    assert_eq!(location.line, 12);
}

#[test]
fn unsupported_expression() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (y, _) = b.reg(top, "y", 32);
    let rval = b.expr(32, ExprKind::Unsupported(UnsupportedExprKind::Sfunc));
    let lval = b.lval(y);
    let assign = b.stmt_at(
        StmtKind::Assign {
            lvals: vec![lval],
            rval,
        },
        "design.v",
        3,
    );
    b.process(ProcessKind::Initial, top, assign);

    let err = build_err(&b.finish().unwrap());
    assert!(err.title().contains("expression type `sfunc`"), "{err}");
    assert_eq!(err.diagnostic().location.as_ref().map(|l| l.line), Some(3));
}

#[test]
fn concatenated_targets() {
    // {x, y} = a;
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 2);
    let (x, _) = b.reg(top, "x", 1);
    let (y, _) = b.reg(top, "y", 1);
    let rval = b.expr_signal(a);
    let lvals = vec![b.lval(x), b.lval(y)];
    let assign = b.stmt(StmtKind::Assign {
        lvals,
        rval,
    });
    b.process(ProcessKind::Initial, top, assign);

    let err = build_err(&b.finish().unwrap());
    assert!(err.title().contains("2 concatenated targets"), "{err}");
}

#[test]
fn memory_target() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 8);
    let (mem, _) = b.reg(top, "mem", 8);
    let n1 = b.nexus();
    {
        let info = b.signal_mut(mem);
        info.array_dimensions = 1;
        info.words.push(Some(n1));
    }
    let rval = b.expr_signal(a);
    let assign = b.assign(mem, rval);
    b.process(ProcessKind::Initial, top, assign);

    let err = build_err(&b.finish().unwrap());
    assert!(err.title().contains("memory word of `mem`"), "{err}");
}

#[test]
fn event_needs_single_signal() {
    let mut b = NetlistBuilder::new();
    let top = b.module("top");
    let (a, _) = b.wire(top, "a", 1);
    let (y, _) = b.reg(top, "y", 1);
    let unnamed = b.nexus();
    let rval = b.expr_signal(a);
    let assign = b.assign(y, rval);
    let body = b.wait_posedge(unnamed, assign);
    b.process(ProcessKind::Always, top, body);

    let err = build_err(&b.finish().unwrap());
    assert_eq!(err.kind(), DiagKind::Unsupported);
    assert!(err.title().contains("with 0 signals attached"), "{err}");
}
