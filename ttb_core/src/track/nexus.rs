use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::Endpoint;
use crate::graph::signal::SignalKind;
use crate::netlist::ir::{NetConst, NetSignal, Nexus, NexusObject, NexusPtr};
use crate::track::slice::SliceContext;
use crate::track::{Sink, Tracker};
use crate::util::iter::IterExt;

impl Tracker<'_> {
    /// Connect every signal that drives `nexus` to `sink`, looking through logic gates and LPM devices.
    ///
    /// `nexus` is kept in the explored set while its connection points are visited, reaching it again on the
    /// same path is handled as a loopback.
    pub fn propagate_nexus(&mut self, nexus: Nexus, sink: Sink, ctx: SliceContext) -> DiagResult {
        if self.explored.contains(&nexus) {
            return self.propagate_loopback(nexus, sink, ctx);
        }

        self.explored.insert(nexus);
        let result = self.propagate_nexus_ptrs(nexus, sink, ctx);
        self.explored.shift_remove(&nexus);
        result
    }

    fn propagate_nexus_ptrs(&mut self, nexus: Nexus, sink: Sink, ctx: SliceContext) -> DiagResult {
        let netlist = self.netlist;
        let ptrs = netlist.nexus_ptrs(nexus);

        // signals first, devices driving a nexus that already has a signal are reached through that signal
        let mut signal_processed = false;
        for ptr in ptrs {
            if let NexusObject::Signal(signal) = ptr.object {
                signal_processed |= self.propagate_signal(signal, ptr.pin, sink, ctx);
            }
        }

        for &NexusPtr { pin, object } in ptrs {
            log::trace!("{nexus:?} pin {pin} of {object:?}");
            match object {
                NexusObject::Signal(_) => {}
                NexusObject::Logic(logic) => {
                    if !signal_processed {
                        self.propagate_logic(logic, pin, sink, ctx)?;
                    }
                }
                NexusObject::Lpm(lpm) => {
                    if !signal_processed {
                        self.propagate_lpm(lpm, nexus, sink, ctx)?;
                    }
                }
                NexusObject::Constant(constant) => {
                    if !signal_processed {
                        self.propagate_constant(constant, sink, ctx);
                    }
                }
                NexusObject::Other(_, kind) => {
                    return Err(Diagnostic::new_unsupported(format!("nexus pointer type `{kind}`"))
                        .note(format!("while tracking `{}`", self.sink_name(sink)))
                        .finish());
                }
            }
        }

        Ok(())
    }

    /// Returns whether a connection was made, which is the case unless `signal` is the sink itself.
    fn propagate_signal(&mut self, signal: NetSignal, pin: u32, sink: Sink, ctx: SliceContext) -> bool {
        let source = self.graph.register_signal(self.netlist, signal);
        if source == sink.signal {
            return false;
        }

        let source = Endpoint {
            signal: source,
            id: pin,
            slice: ctx.source_or(self.graph.signal(source).natural_slice()),
        };
        let sink = self.sink_endpoint(sink, ctx.sink());
        self.connect(source, sink);
        true
    }

    fn propagate_constant(&mut self, constant: NetConst, sink: Sink, ctx: SliceContext) {
        let source = self.graph.register_constant(self.netlist, constant);
        let source = Endpoint {
            signal: source,
            id: 0,
            slice: ctx.source_or(self.graph.signal(source).natural_slice()),
        };
        let sink = self.sink_endpoint(sink, ctx.sink());
        self.connect(source, sink);
    }

    /// A nexus on the current path was reached again.
    ///
    /// If the only signal on it is the sink, part of the sink feeds back into another part of itself and the
    /// pending slices say which parts. If the slices are the same this is a combinational loop.
    fn propagate_loopback(&mut self, nexus: Nexus, sink: Sink, ctx: SliceContext) -> DiagResult {
        let netlist = self.netlist;
        let signal_ptr = netlist
            .nexus_ptrs(nexus)
            .iter()
            .filter_map(|ptr| match ptr.object {
                NexusObject::Signal(signal) => Some((signal, ptr.pin)),
                _ => None,
            })
            .single();

        let loop_signal = signal_ptr.filter(|&(signal, _)| {
            self.graph.lookup(SignalKind::Signal(signal)) == Some(sink.signal)
        });
        let Some((_, pin)) = loop_signal else {
            log::warn!(
                "skipping revisited {nexus:?} while tracking `{}`, it is not a loopback",
                self.sink_name(sink)
            );
            return Ok(());
        };

        let natural = self.graph.signal(sink.signal).natural_slice();
        let source_slice = ctx.source_or(natural);
        let sink_slice = ctx.sink_or(natural);
        if source_slice == sink_slice {
            return Err(Diagnostic::new_internal(format!(
                "infinite loopback on `{}{source_slice}`",
                self.sink_name(sink)
            ))
            .note("the signal drives itself through combinational logic")
            .finish());
        }

        let source = Endpoint {
            signal: sink.signal,
            id: pin,
            slice: source_slice,
        };
        let sink = self.sink_endpoint(sink, Some(sink_slice));
        self.connect(source, sink);
        Ok(())
    }

    pub(super) fn sink_name(&self, sink: Sink) -> String {
        self.graph.signal(sink.signal).full_name(sink.id)
    }
}
