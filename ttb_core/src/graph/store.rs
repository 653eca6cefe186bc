use crate::graph::connection::Connection;
use crate::graph::signal::{Signal, SignalIdx, SignalKind};
use crate::netlist::ir::{Expr, NetConst, NetSignal, Scope};
use crate::netlist::Netlist;
use crate::util::arena::Arena;
use crate::util::data::{IndexMapExt, VecExt};
use indexmap::{IndexMap, IndexSet};

/// Registry of discovered signals together with the fan-in of each sink.
///
/// Everything is kept in insertion order so the graph is identical between runs.
#[derive(Debug, Default)]
pub struct SignalGraph {
    signals: Arena<SignalIdx, Signal>,
    lookup: IndexMap<SignalKind, SignalIdx>,
    fan_in: IndexMap<SignalIdx, Vec<Connection>>,
    hidden: IndexSet<SignalIdx>,
    next_constant_id: u32,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct GraphStats {
    pub signals: usize,
    pub constants: usize,
    pub flip_flops: usize,
    pub inputs: usize,
    pub locals: usize,
    pub sinks: usize,
    pub connections: usize,
}

impl SignalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every declared signal, visiting top-level scopes in order and each scope depth first.
    pub fn register_all_signals(&mut self, netlist: &Netlist) {
        for &scope in netlist.root_scopes() {
            self.register_scope(netlist, scope);
        }
    }

    fn register_scope(&mut self, netlist: &Netlist, scope: Scope) {
        let children = netlist.scope_children(scope);
        for &signal in &children.signals {
            self.register_signal(netlist, signal);
        }
        for &child in &children.scopes {
            self.register_scope(netlist, child);
        }
    }

    pub fn register_signal(&mut self, netlist: &Netlist, signal: NetSignal) -> SignalIdx {
        let kind = SignalKind::Signal(signal);
        if let Some(&idx) = self.lookup.get(&kind) {
            return idx;
        }
        let idx = self.signals.push(Signal::from_net_signal(netlist, signal));
        self.lookup.insert_first(kind, idx);
        idx
    }

    /// Register a constant driver, allocating its instance number on first sight.
    pub fn register_constant(&mut self, netlist: &Netlist, constant: NetConst) -> SignalIdx {
        let kind = SignalKind::Constant(constant);
        if let Some(&idx) = self.lookup.get(&kind) {
            return idx;
        }
        let id = self.next_constant_id();
        let idx = self.signals.push(Signal::from_constant(netlist, constant, id));
        self.lookup.insert_first(kind, idx);
        idx
    }

    /// Register a number literal, returns `None` if `expr` is not one.
    pub fn register_expression(&mut self, netlist: &Netlist, expr: Expr) -> Option<SignalIdx> {
        let kind = SignalKind::Expression(expr);
        if let Some(&idx) = self.lookup.get(&kind) {
            return Some(idx);
        }
        let signal = Signal::from_expression(netlist, expr, self.next_constant_id)?;
        self.next_constant_id += 1;
        let idx = self.signals.push(signal);
        self.lookup.insert_first(kind, idx);
        Some(idx)
    }

    fn next_constant_id(&mut self) -> u32 {
        let id = self.next_constant_id;
        self.next_constant_id += 1;
        id
    }

    pub fn lookup(&self, kind: SignalKind) -> Option<SignalIdx> {
        self.lookup.get(&kind).copied()
    }

    pub fn signal(&self, idx: SignalIdx) -> &Signal {
        &self.signals[idx]
    }

    pub fn signal_mut(&mut self, idx: SignalIdx) -> &mut Signal {
        &mut self.signals[idx]
    }

    pub fn signals(&self) -> impl Iterator<Item = (SignalIdx, &Signal)> {
        self.signals.iter()
    }

    /// Store `connection` unless an identical one is already present. Returns whether it was new.
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        let fan_in = self.fan_in.entry(connection.sink.signal).or_default();
        let added = fan_in.push_unique(connection);
        if added {
            log::trace!("connection {:?}", connection);
        }
        added
    }

    pub fn connections_into(&self, sink: SignalIdx) -> &[Connection] {
        self.fan_in.get(&sink).map_or(&[], Vec::as_slice)
    }

    /// All sinks in insertion order, each with its fan-in.
    pub fn sinks(&self) -> impl Iterator<Item = (SignalIdx, &[Connection])> {
        self.fan_in.iter().map(|(&sink, conns)| (sink, conns.as_slice()))
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.fan_in.values().flatten()
    }

    pub fn connection_count(&self) -> usize {
        self.fan_in.values().map(Vec::len).sum()
    }

    /// Whether `signal` is the source of at least one connection.
    pub fn is_source(&self, signal: SignalIdx) -> bool {
        self.connections().any(|c| c.source.signal == signal)
    }

    pub(crate) fn fan_in_mut(&mut self) -> &mut IndexMap<SignalIdx, Vec<Connection>> {
        &mut self.fan_in
    }

    /// Remove `signal` from the graph: its fan-in, every connection it drives, and its node in exports.
    pub fn hide(&mut self, signal: SignalIdx) {
        self.fan_in.shift_remove(&signal);
        for conns in self.fan_in.values_mut() {
            conns.retain(|c| c.source.signal != signal);
        }
        self.fan_in.retain(|_, conns| !conns.is_empty());
        self.hidden.insert(signal);
    }

    pub fn is_hidden(&self, signal: SignalIdx) -> bool {
        self.hidden.contains(&signal)
    }

    pub(crate) fn mark_hidden(&mut self, signal: SignalIdx) {
        self.hidden.insert(signal);
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            sinks: self.fan_in.len(),
            connections: self.connection_count(),
            ..GraphStats::default()
        };
        for (idx, signal) in &self.signals {
            if self.is_hidden(idx) {
                continue;
            }
            if signal.is_constant() {
                stats.constants += 1;
                continue;
            }
            stats.signals += 1;
            stats.flip_flops += signal.is_flip_flop as usize;
            stats.inputs += signal.is_input as usize;
            stats.locals += signal.is_local as usize;
        }
        stats
    }
}
