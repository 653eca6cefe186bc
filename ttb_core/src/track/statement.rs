use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::{Endpoint, Slice};
use crate::graph::signal::SignalIdx;
use crate::netlist::ir::{
    EdgeKind, EventInfo, Expr, Lval, LvalTarget, Nexus, NexusObject, SignalType, Stmt, StmtInfo, StmtKind,
};
use crate::track::Tracker;
use crate::util::data::VecExt;
use indexmap::IndexSet;

/// State inherited from the enclosing statements.
#[derive(Debug, Clone, Default)]
struct Control {
    /// Condition and event signals, every assignment below depends on them.
    sources: Vec<Endpoint>,
    /// Whether the statement only runs on a signal edge.
    edge_sensitive: bool,
}

impl Tracker<'_> {
    /// Walk the statement tree of every process in netlist order.
    pub fn find_procedural_connections(&mut self) -> DiagResult {
        let netlist = self.netlist;
        for (index, process) in netlist.processes().iter().enumerate() {
            log::debug!(
                "process {index} ({}) in `{}`",
                process.kind,
                netlist.scope_path(process.scope)
            );
            let mut visited = IndexSet::new();
            self.process_statement(process.body, &Control::default(), &mut visited)?;
        }
        Ok(())
    }

    fn process_statement(&mut self, stmt: Stmt, control: &Control, visited: &mut IndexSet<Stmt>) -> DiagResult {
        let netlist = self.netlist;
        let info = netlist.stmt(stmt);
        if !visited.insert(stmt) {
            return Err(Diagnostic::new_internal(format!("{stmt:?} is reachable twice in the same process"))
                .location(info.loc.clone())
                .finish());
        }
        self.process_statement_kind(info, control, visited)
            .map_err(|e| e.or_location(info.loc.as_ref()))
    }

    fn process_statement_kind(
        &mut self,
        info: &StmtInfo,
        control: &Control,
        visited: &mut IndexSet<Stmt>,
    ) -> DiagResult {
        match &info.kind {
            StmtKind::Noop => Ok(()),
            StmtKind::Assign { lvals, rval } | StmtKind::AssignNb { lvals, rval } => {
                self.process_assign(lvals, *rval, control)
            }
            &StmtKind::Condit {
                cond,
                if_true,
                if_false,
            } => {
                let mut inner = control.clone();
                for source in self.expr_sources(cond, None)? {
                    inner.sources.push_unique(source.source);
                }
                if let Some(if_true) = if_true {
                    self.process_statement(if_true, &inner, visited)?;
                }
                if let Some(if_false) = if_false {
                    self.process_statement(if_false, &inner, visited)?;
                }
                Ok(())
            }
            StmtKind::Wait { events, body } => {
                let mut inner = control.clone();
                for event in events {
                    self.process_event(event, &mut inner)?;
                }
                if let &Some(body) = body {
                    self.process_statement(body, &inner, visited)?;
                }
                Ok(())
            }
            StmtKind::Unsupported(kind) => {
                Err(Diagnostic::new_unsupported(format!("statement type `{kind}`")).finish())
            }
        }
    }

    fn process_event(&mut self, event: &EventInfo, control: &mut Control) -> DiagResult {
        let EventInfo { pos, neg, any } = event;
        control.edge_sensitive |= event.is_edge_sensitive();

        for (edge, nexuses) in [(EdgeKind::Pos, pos), (EdgeKind::Neg, neg), (EdgeKind::Any, any)] {
            for &nexus in nexuses {
                let source = self.event_source(nexus, edge)?;
                if self.is_clock(source.signal) {
                    log::debug!("not connecting clock `{}`", self.graph.signal(source.signal).full_name(source.id));
                    continue;
                }
                control.sources.push_unique(source);
            }
        }
        Ok(())
    }

    /// The single signal attached to an event nexus.
    fn event_source(&mut self, nexus: Nexus, edge: EdgeKind) -> DiagResult<Endpoint> {
        let netlist = self.netlist;
        let signals: Vec<_> = netlist
            .nexus_ptrs(nexus)
            .iter()
            .filter_map(|ptr| match ptr.object {
                NexusObject::Signal(signal) => Some((signal, ptr.pin)),
                _ => None,
            })
            .collect();

        match signals.as_slice() {
            &[(signal, pin)] => {
                let signal = self.graph.register_signal(netlist, signal);
                Ok(Endpoint {
                    signal,
                    id: pin,
                    slice: self.graph.signal(signal).natural_slice(),
                })
            }
            _ => Err(Diagnostic::new_unsupported(format!(
                "{edge} event on {nexus:?} with {} signals attached",
                signals.len()
            ))
            .note("an event must be attached to exactly one signal")
            .finish()),
        }
    }

    fn is_clock(&self, signal: SignalIdx) -> bool {
        let signal = self.graph.signal(signal);
        match &self.settings.clock {
            Some(clock) => !signal.is_constant() && &signal.basename == clock,
            None => false,
        }
    }

    /// Connect the sources of `rval` to the target bits. A target reading itself is a plain self-connection,
    /// not a loopback.
    fn process_assign(&mut self, lvals: &[Lval], rval: Expr, control: &Control) -> DiagResult {
        let netlist = self.netlist;
        let lval = match lvals {
            [lval] => lval,
            _ => {
                return Err(Diagnostic::new_unsupported(format!(
                    "assignment to {} concatenated targets",
                    lvals.len()
                ))
                .finish())
            }
        };
        let &Lval {
            width,
            ref target,
            part_offset,
            word,
        } = lval;

        let target = match *target {
            LvalTarget::Signal(signal) => signal,
            LvalTarget::Nested(_) => {
                return Err(Diagnostic::new_unsupported("nested assignment target").finish());
            }
        };
        let target_info = netlist.signal(target);
        if word.is_some() || target_info.is_arrayed() {
            return Err(
                Diagnostic::new_unsupported(format!("assignment to memory word of `{}`", target_info.name)).finish(),
            );
        }

        let sink_signal = self.graph.register_signal(netlist, target);
        let sink_slice = match part_offset {
            None => self.graph.signal(sink_signal).natural_slice(),
            Some(offset) => match self.const_value(offset) {
                Some(offset) => Slice::checked_from_base(offset, width).ok_or_else(|| {
                    Diagnostic::new_input(format!(
                        "part select of {width} bits at offset {offset} in assignment to `{}`, beyond 32 bit indices",
                        target_info.name
                    ))
                    .finish()
                })?,
                None => {
                    return Err(Diagnostic::new_unsupported(format!(
                        "non-constant part select offset in assignment to `{}`",
                        target_info.name
                    ))
                    .finish());
                }
            },
        };

        // only registers can hold a value between edges
        if control.edge_sensitive && target_info.kind == SignalType::Reg {
            self.graph.signal_mut(sink_signal).is_flip_flop = true;
        }

        let sink = |slice: Slice| Endpoint {
            signal: sink_signal,
            id: 0,
            slice,
        };
        for source in self.expr_sources(rval, Some(sink_slice))? {
            self.connect(source.source, sink(source.sink_slice.unwrap_or(sink_slice)));
        }
        for &source in &control.sources {
            self.connect(source, sink(sink_slice));
        }
        Ok(())
    }
}
