use crate::diagnostic::DiagResult;
use crate::netlist::ir::{
    ConstInfo, Design, EventInfo, Expr, ExprInfo, ExprKind, Logic, LogicInfo, LogicKind, Lpm, LpmInfo, LpmKind, Lval,
    LvalTarget, NetConst, NetSignal, Nexus, OtherDevice, OtherDeviceInfo, OtherDeviceKind, PortDirection, ProcessInfo,
    ProcessKind, Scope, ScopeInfo, ScopeKind, SignalInfo, SignalType, SourceLoc, Stmt, StmtInfo, StmtKind,
};
use crate::netlist::Netlist;
use crate::util::arena::IndexType;

/// Programmatic construction of a [Design], mostly used by tests and by front-ends linked as a library.
///
/// Children of statements and expressions must be created before their parents.
#[derive(Debug, Default)]
pub struct NetlistBuilder {
    design: Design,
}

impl NetlistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nexus(&mut self) -> Nexus {
        let index = self.design.nexus_count;
        self.design.nexus_count += 1;
        Nexus::from_index(index)
    }

    pub fn module(&mut self, name: &str) -> Scope {
        self.scope(name, ScopeKind::Module, None)
    }

    pub fn scope(&mut self, name: &str, kind: ScopeKind, parent: Option<Scope>) -> Scope {
        self.design.scopes.push(ScopeInfo {
            name: name.to_owned(),
            kind,
            parent,
        })
    }

    /// Declare a `width`-bit wire `[width-1:0]` on a fresh nexus.
    pub fn wire(&mut self, scope: Scope, name: &str, width: u32) -> (NetSignal, Nexus) {
        let nexus = self.nexus();
        (self.wire_on(scope, name, width, nexus), nexus)
    }

    /// Declare a `width`-bit wire `[width-1:0]` attached to an existing nexus.
    pub fn wire_on(&mut self, scope: Scope, name: &str, width: u32, nexus: Nexus) -> NetSignal {
        self.signal(SignalInfo {
            scope,
            name: name.to_owned(),
            kind: SignalType::Wire,
            port: PortDirection::None,
            msb: width - 1,
            lsb: 0,
            array_dimensions: 0,
            array_base: 0,
            words: vec![Some(nexus)],
            local: false,
        })
    }

    pub fn reg(&mut self, scope: Scope, name: &str, width: u32) -> (NetSignal, Nexus) {
        let (signal, nexus) = self.wire(scope, name, width);
        self.signal_mut(signal).kind = SignalType::Reg;
        (signal, nexus)
    }

    pub fn input(&mut self, scope: Scope, name: &str, width: u32) -> (NetSignal, Nexus) {
        let (signal, nexus) = self.wire(scope, name, width);
        self.signal_mut(signal).port = PortDirection::Input;
        (signal, nexus)
    }

    /// Declare an elaborator-generated intermediate wire.
    pub fn local(&mut self, scope: Scope, name: &str, width: u32) -> (NetSignal, Nexus) {
        let (signal, nexus) = self.wire(scope, name, width);
        self.signal_mut(signal).local = true;
        (signal, nexus)
    }

    pub fn signal(&mut self, info: SignalInfo) -> NetSignal {
        self.design.signals.push(info)
    }

    pub fn signal_mut(&mut self, signal: NetSignal) -> &mut SignalInfo {
        &mut self.design.signals[signal]
    }

    pub fn logic(&mut self, kind: LogicKind, pins: Vec<Nexus>) -> Logic {
        self.design.logic.push(LogicInfo { kind, pins })
    }

    pub fn lpm(&mut self, info: LpmInfo) -> Lpm {
        self.design.lpms.push(info)
    }

    /// Device that combines all of `data` without any bit rearrangement, e.g. an adder.
    pub fn lpm_basic(&mut self, kind: LpmKind, width: u32, q: Nexus, data: Vec<Nexus>) -> Lpm {
        self.lpm(LpmInfo {
            kind,
            width,
            q,
            data,
            select: None,
            base: 0,
            base_nexus: None,
        })
    }

    pub fn mux(&mut self, width: u32, q: Nexus, select: Nexus, data: Vec<Nexus>) -> Lpm {
        self.lpm(LpmInfo {
            kind: LpmKind::Mux,
            width,
            q,
            data,
            select: Some(select),
            base: 0,
            base_nexus: None,
        })
    }

    /// `kind` is either [LpmKind::PartVp] or [LpmKind::PartPv].
    pub fn part_select(&mut self, kind: LpmKind, width: u32, base: u32, q: Nexus, input: Nexus) -> Lpm {
        self.lpm(LpmInfo {
            kind,
            width,
            q,
            data: vec![input],
            select: None,
            base,
            base_nexus: None,
        })
    }

    /// Inputs are listed least significant first.
    pub fn concat(&mut self, width: u32, q: Nexus, inputs: Vec<Nexus>) -> Lpm {
        self.lpm_basic(LpmKind::Concat, width, q, inputs)
    }

    /// Constant driver, `bits` most significant first.
    pub fn constant(&mut self, bits: &str, nexus: Nexus) -> NetConst {
        self.design.constants.push(ConstInfo {
            bits: bits.to_owned(),
            nexus,
        })
    }

    pub fn other(&mut self, kind: OtherDeviceKind, pins: Vec<Nexus>) -> OtherDevice {
        self.design.others.push(OtherDeviceInfo { kind, pins })
    }

    pub fn expr(&mut self, width: u32, kind: ExprKind) -> Expr {
        self.design.expressions.push(ExprInfo { width, kind })
    }

    pub fn expr_signal(&mut self, signal: NetSignal) -> Expr {
        let width = self.design.signals[signal].width();
        self.expr(width, ExprKind::Signal { signal, word: None })
    }

    pub fn expr_number(&mut self, bits: &str) -> Expr {
        self.expr(
            bits.len() as u32,
            ExprKind::Number {
                bits: bits.to_owned(),
            },
        )
    }

    /// Number literal holding `value` in `width` bits.
    pub fn expr_value(&mut self, value: u64, width: u32) -> Expr {
        let bits: String = (0..width)
            .rev()
            .map(|i| if i < 64 && (value >> i) & 1 == 1 { '1' } else { '0' })
            .collect();
        self.expr_number(&bits)
    }

    pub fn stmt(&mut self, kind: StmtKind) -> Stmt {
        self.design.statements.push(StmtInfo { kind, loc: None })
    }

    pub fn stmt_at(&mut self, kind: StmtKind, file: &str, line: u32) -> Stmt {
        self.design.statements.push(StmtInfo {
            kind,
            loc: Some(SourceLoc {
                file: file.into(),
                line,
            }),
        })
    }

    /// Non-blocking assignment of `rval` to all of `target`.
    pub fn assign_nb(&mut self, target: NetSignal, rval: Expr) -> Stmt {
        let lval = self.lval(target);
        self.stmt(StmtKind::AssignNb {
            lvals: vec![lval],
            rval,
        })
    }

    pub fn assign(&mut self, target: NetSignal, rval: Expr) -> Stmt {
        let lval = self.lval(target);
        self.stmt(StmtKind::Assign {
            lvals: vec![lval],
            rval,
        })
    }

    pub fn lval(&self, target: NetSignal) -> Lval {
        Lval {
            width: self.design.signals[target].width(),
            target: LvalTarget::Signal(target),
            part_offset: None,
            word: None,
        }
    }

    /// Wait on the positive edge of `nexus`.
    pub fn wait_posedge(&mut self, nexus: Nexus, body: Stmt) -> Stmt {
        self.stmt(StmtKind::Wait {
            events: vec![EventInfo {
                pos: vec![nexus],
                neg: vec![],
                any: vec![],
            }],
            body: Some(body),
        })
    }

    pub fn process(&mut self, kind: ProcessKind, scope: Scope, body: Stmt) {
        self.design.processes.push(ProcessInfo { kind, scope, body });
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn finish(self) -> DiagResult<Netlist> {
        Netlist::new(self.design)
    }
}
