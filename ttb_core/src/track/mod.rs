//! Discovery of connections between signals.
//!
//! Continuous assignments are found by walking backwards from each signal through the nexuses and devices
//! that drive it until other signals are reached, see [nexus]. Procedural assignments are found by walking the
//! statement trees of the processes, see [statement].

pub mod expression;
pub mod logic;
pub mod lpm;
pub mod nexus;
pub mod slice;
pub mod statement;

use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::{Connection, Endpoint, Slice};
use crate::graph::signal::{SignalIdx, SignalKind};
use crate::graph::store::SignalGraph;
use crate::netlist::ir::Nexus;
use crate::netlist::Netlist;
use crate::track::slice::SliceContext;
use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct TrackSettings {
    /// Basename of the clock signal. The clock is not reported as a control dependency of flip-flops.
    pub clock: Option<String>,
}

/// The sink of a traversal: the signal word all discovered sources are connected to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Sink {
    pub signal: SignalIdx,
    pub id: u32,
}

pub struct Tracker<'a> {
    netlist: &'a Netlist,
    graph: &'a mut SignalGraph,
    settings: &'a TrackSettings,

    /// Nexuses on the current traversal path.
    explored: IndexSet<Nexus>,
    /// Signals that have been used as the root of a traversal.
    roots: IndexSet<SignalIdx>,
}

impl<'a> Tracker<'a> {
    pub fn new(netlist: &'a Netlist, graph: &'a mut SignalGraph, settings: &'a TrackSettings) -> Self {
        Tracker {
            netlist,
            graph,
            settings,
            explored: IndexSet::new(),
            roots: IndexSet::new(),
        }
    }

    pub fn graph(&self) -> &SignalGraph {
        &*self.graph
    }

    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }

    /// Traverse from every registered signal that is not generated by the elaborator.
    pub fn find_continuous_connections(&mut self) -> DiagResult {
        let roots: Vec<SignalIdx> = self
            .graph
            .signals()
            .filter(|(_, s)| !s.is_local && matches!(s.kind, SignalKind::Signal(_)))
            .map(|(idx, _)| idx)
            .collect();

        for root in roots {
            self.propagate_root(root)?;
        }
        Ok(())
    }

    /// Traverse the elaborator-generated signals that are used as a source but were never traversed themselves,
    /// until none are left. Returns the number of traversed signals.
    pub fn resolve_local_signals(&mut self) -> DiagResult<usize> {
        let mut count = 0;
        loop {
            let sources: IndexSet<SignalIdx> = self.graph.connections().map(|c| c.source.signal).collect();
            let pending: Vec<SignalIdx> = self
                .graph
                .signals()
                .filter(|&(idx, s)| s.is_local && !self.roots.contains(&idx) && sources.contains(&idx))
                .map(|(idx, _)| idx)
                .collect();
            if pending.is_empty() {
                break;
            }

            for local in pending {
                self.propagate_root(local)?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Traverse from each word of `root`.
    pub fn propagate_root(&mut self, root: SignalIdx) -> DiagResult {
        let netlist = self.netlist;
        let signal = match self.graph.signal(root).kind {
            SignalKind::Signal(signal) => signal,
            kind => {
                return Err(Diagnostic::new_internal(format!("cannot traverse from non-signal {kind:?}")).finish());
            }
        };
        self.roots.insert(root);

        let info = netlist.signal(signal);
        for (word, &nexus) in info.words.iter().enumerate() {
            let Some(nexus) = nexus else {
                log::warn!("skipping word {word} of `{}` without nexus", info.name);
                continue;
            };
            let sink = Sink {
                signal: root,
                id: word as u32,
            };

            self.check_explored_empty("before", sink)?;
            let result = self.propagate_nexus(nexus, sink, SliceContext::EMPTY);
            self.check_explored_empty("after", sink)?;
            result?;
        }
        Ok(())
    }

    fn check_explored_empty(&self, when: &str, sink: Sink) -> DiagResult {
        if self.explored.is_empty() {
            Ok(())
        } else {
            let name = self.graph.signal(sink.signal).full_name(sink.id);
            Err(Diagnostic::new_internal(format!(
                "explored set contains {} nexuses {when} traversing `{name}`",
                self.explored.len()
            ))
            .finish())
        }
    }

    fn sink_endpoint(&self, sink: Sink, slice: Option<Slice>) -> Endpoint {
        Endpoint {
            signal: sink.signal,
            id: sink.id,
            slice: slice.unwrap_or_else(|| self.graph.signal(sink.signal).natural_slice()),
        }
    }

    fn connect(&mut self, source: Endpoint, sink: Endpoint) {
        if log::log_enabled!(log::Level::Debug) {
            let source_name = self.graph.signal(source.signal).full_name(source.id);
            let sink_name = self.graph.signal(sink.signal).full_name(sink.id);
            log::debug!("{source_name}{} -> {sink_name}{}", source.slice, sink.slice);
        }
        self.graph.add_connection(Connection { source, sink });
    }
}
