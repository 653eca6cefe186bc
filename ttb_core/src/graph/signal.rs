use crate::graph::connection::Slice;
use crate::netlist::ir::{Expr, ExprKind, NetConst, NetSignal, PortDirection};
use crate::netlist::Netlist;
use crate::new_index_type;
use std::hash::{Hash, Hasher};
use ttb_util::constants::TTB_CONST_NAME_PREFIX;

new_index_type!(pub SignalIdx);

/// The netlist object a graph node stands for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SignalKind {
    Signal(NetSignal),
    Constant(NetConst),
    /// A literal number in a procedural expression.
    Expression(Expr),
}

/// A node of the dependency graph.
///
/// Two signals are equal if they wrap the same netlist object, the other fields are derived state.
#[derive(Debug, Clone)]
pub struct Signal {
    pub kind: SignalKind,
    /// Array base for declared signals, instance number for constants.
    pub id: u32,
    pub msb: u32,
    pub lsb: u32,
    pub is_flip_flop: bool,
    pub is_input: bool,
    pub is_local: bool,
    pub is_arrayed: bool,
    /// Scope path for declared signals, the constant prefix otherwise.
    pub scope_name: String,
    /// Declared name, or the value bits of a constant.
    pub basename: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SignalCategory {
    FlipFlop,
    Input,
    Signal,
    Constant,
}

impl Signal {
    pub fn from_net_signal(netlist: &Netlist, signal: NetSignal) -> Signal {
        let info = netlist.signal(signal);
        Signal {
            kind: SignalKind::Signal(signal),
            id: info.array_base,
            msb: info.msb.max(info.lsb),
            lsb: info.msb.min(info.lsb),
            is_flip_flop: false,
            is_input: info.port == PortDirection::Input,
            is_local: info.local,
            is_arrayed: info.is_arrayed(),
            scope_name: netlist.scope_path(info.scope),
            basename: info.name.clone(),
        }
    }

    pub fn from_constant(netlist: &Netlist, constant: NetConst, id: u32) -> Signal {
        let info = netlist.constant(constant);
        Signal::new_constant(SignalKind::Constant(constant), id, &info.bits)
    }

    /// Returns `None` if the expression is not a number literal.
    pub fn from_expression(netlist: &Netlist, expr: Expr, id: u32) -> Option<Signal> {
        match &netlist.expr(expr).kind {
            ExprKind::Number { bits } => Some(Signal::new_constant(SignalKind::Expression(expr), id, bits)),
            _ => None,
        }
    }

    fn new_constant(kind: SignalKind, id: u32, bits: &str) -> Signal {
        Signal {
            kind,
            id,
            msb: bits.len() as u32 - 1,
            lsb: 0,
            is_flip_flop: false,
            is_input: false,
            is_local: false,
            is_arrayed: false,
            scope_name: TTB_CONST_NAME_PREFIX.to_owned(),
            basename: bits.to_owned(),
        }
    }

    pub fn is_constant(&self) -> bool {
        match self.kind {
            SignalKind::Signal(_) => false,
            SignalKind::Constant(_) | SignalKind::Expression(_) => true,
        }
    }

    pub fn natural_slice(&self) -> Slice {
        Slice::new(self.msb, self.lsb)
    }

    pub fn width(&self) -> u32 {
        self.natural_slice().width()
    }

    /// Hierarchical name of the given word of this signal.
    ///
    /// Arrayed signals include the word as an extra path component, constants include their instance number.
    pub fn full_name(&self, word: u32) -> String {
        let Signal {
            kind,
            id,
            scope_name,
            basename,
            is_arrayed,
            ..
        } = self;
        match kind {
            SignalKind::Signal(_) if *is_arrayed => format!("{scope_name}.{}.{basename}", id + word),
            SignalKind::Signal(_) => format!("{scope_name}.{basename}"),
            SignalKind::Constant(_) | SignalKind::Expression(_) => format!("{scope_name}.{id}.{basename}"),
        }
    }

    pub fn category(&self) -> SignalCategory {
        if self.is_constant() {
            SignalCategory::Constant
        } else if self.is_flip_flop {
            SignalCategory::FlipFlop
        } else if self.is_input {
            SignalCategory::Input
        } else {
            SignalCategory::Signal
        }
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Signal {}

impl Hash for Signal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state)
    }
}
