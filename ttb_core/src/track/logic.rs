use crate::diagnostic::DiagResult;
use crate::netlist::ir::Logic;
use crate::track::slice::SliceContext;
use crate::track::{Sink, Tracker};

impl Tracker<'_> {
    /// Gates are only traversed from their output, pin 0. Every input bit may influence every output bit.
    pub(super) fn propagate_logic(&mut self, logic: Logic, pin: u32, sink: Sink, ctx: SliceContext) -> DiagResult {
        if pin != 0 {
            return Ok(());
        }

        let netlist = self.netlist;
        let info = netlist.logic(logic);
        log::debug!("through {} gate {:?}", info.kind, logic);
        for &input in &info.pins[1..] {
            self.propagate_nexus(input, sink, ctx)?;
        }
        Ok(())
    }
}
