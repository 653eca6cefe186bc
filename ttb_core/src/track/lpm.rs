use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::Slice;
use crate::netlist::ir::{Lpm, LpmInfo, LpmKind, Nexus, NexusObject};
use crate::track::slice::{SliceContext, SliceRole};
use crate::track::{Sink, Tracker};

impl Tracker<'_> {
    /// Traverse an LPM device, but only when `nexus` is its output.
    ///
    /// Unsupported device kinds are fatal on either side of the device.
    pub(super) fn propagate_lpm(&mut self, lpm: Lpm, nexus: Nexus, sink: Sink, ctx: SliceContext) -> DiagResult {
        let netlist = self.netlist;
        let info = netlist.lpm(lpm);
        if info.q == nexus {
            log::debug!("through {} device {:?}", info.kind, lpm);
        }

        match info.kind {
            LpmKind::Abs
            | LpmKind::Array
            | LpmKind::CastInt
            | LpmKind::CastInt2
            | LpmKind::CastReal
            | LpmKind::Ff
            | LpmKind::Mod
            | LpmKind::Repeat
            | LpmKind::Sfunc
            | LpmKind::SignExt
            | LpmKind::Substitute
            | LpmKind::Ufunc => Err(Diagnostic::new_unsupported(format!("LPM device type `{}`", info.kind))
                .note(format!("while tracking `{}`", self.sink_name(sink)))
                .finish()),
            _ if info.q != nexus => Ok(()),
            LpmKind::Add
            | LpmKind::Sub
            | LpmKind::Mult
            | LpmKind::Divide
            | LpmKind::Pow
            | LpmKind::CmpEq
            | LpmKind::CmpEeq
            | LpmKind::CmpEqx
            | LpmKind::CmpEqz
            | LpmKind::CmpNe
            | LpmKind::CmpNee
            | LpmKind::CmpGe
            | LpmKind::CmpGt
            | LpmKind::ReAnd
            | LpmKind::ReNand
            | LpmKind::ReOr
            | LpmKind::ReNor
            | LpmKind::ReXor
            | LpmKind::ReXnor
            | LpmKind::Shiftl
            | LpmKind::Shiftr => self.propagate_lpm_basic(info, sink, ctx),
            LpmKind::Mux => self.propagate_lpm_mux(info, sink, ctx),
            LpmKind::PartVp => self.propagate_lpm_part_select(lpm, info, SliceRole::Source, sink, ctx),
            LpmKind::PartPv => self.propagate_lpm_part_select(lpm, info, SliceRole::Sink, sink, ctx),
            LpmKind::Concat | LpmKind::Concatz => self.propagate_lpm_concat(lpm, info, sink, ctx),
        }
    }

    fn propagate_lpm_basic(&mut self, info: &LpmInfo, sink: Sink, ctx: SliceContext) -> DiagResult {
        for &input in &info.data {
            self.propagate_nexus(input, sink, ctx)?;
        }
        Ok(())
    }

    fn propagate_lpm_mux(&mut self, info: &LpmInfo, sink: Sink, ctx: SliceContext) -> DiagResult {
        if let Some(select) = info.select {
            self.propagate_nexus(select, sink, ctx)?;
        }
        self.propagate_lpm_basic(info, sink, ctx)
    }

    /// A vector to part select picks source bits, a part to vector select places bits in the sink.
    fn propagate_lpm_part_select(
        &mut self,
        lpm: Lpm,
        info: &LpmInfo,
        role: SliceRole,
        sink: Sink,
        ctx: SliceContext,
    ) -> DiagResult {
        if info.base_nexus.is_some() {
            return Err(
                Diagnostic::new_unsupported(format!("non-constant base for part select device {lpm:?}"))
                    .note(format!("while tracking `{}`", self.sink_name(sink)))
                    .finish(),
            );
        }
        let Some(&input) = info.data.first() else {
            return Err(Diagnostic::new_input(format!("part select device {lpm:?} has no input")).finish());
        };

        let Some(slice) = Slice::checked_from_base(info.base, info.width) else {
            return Err(Diagnostic::new_input(format!(
                "part select device {lpm:?} selects {} bits at base {}, beyond 32 bit indices",
                info.width, info.base
            ))
            .finish());
        };
        let ctx = ctx.with(role, slice)?;
        self.propagate_nexus(input, sink, ctx)
    }

    /// Inputs are ordered from the least significant bits upwards.
    ///
    /// A pending source range selects bits of the concatenated output. Each input only receives the part of
    /// that range covering its own bits, and inputs outside of it are skipped.
    fn propagate_lpm_concat(&mut self, lpm: Lpm, info: &LpmInfo, sink: Sink, ctx: SliceContext) -> DiagResult {
        let mut next_lsb = Some(0);
        for &input in &info.data {
            let width = self.concat_input_width(lpm, input)?;
            let Some(range) = next_lsb.and_then(|lsb| Slice::checked_from_base(lsb, width)) else {
                return Err(
                    Diagnostic::new_input(format!("concatenation device {lpm:?} is wider than 32 bit indices"))
                        .finish(),
                );
            };
            next_lsb = range.msb.checked_add(1);

            let input_ctx = match ctx.source() {
                None => ctx.with(SliceRole::Sink, range)?,
                Some(selected) => {
                    let Some(overlap) = range.overlap(selected) else {
                        log::trace!("input {input:?} of {lpm:?} is outside of selected {selected}");
                        continue;
                    };
                    ctx.without_source()
                        .with(SliceRole::Sink, overlap.shift_down(selected.lsb))?
                        .with(SliceRole::Source, overlap.shift_down(range.lsb))?
                }
            };
            self.propagate_nexus(input, sink, input_ctx)?;
        }
        Ok(())
    }

    /// The width of a concatenation input is taken from the signal or constant attached to it.
    fn concat_input_width(&self, lpm: Lpm, input: Nexus) -> DiagResult<u32> {
        let netlist = self.netlist;
        let ptrs = netlist.nexus_ptrs(input);

        for ptr in ptrs {
            if let NexusObject::Signal(signal) = ptr.object {
                return Ok(netlist.signal(signal).width());
            }
        }
        for ptr in ptrs {
            match ptr.object {
                NexusObject::Constant(constant) => return Ok(netlist.constant(constant).width()),
                NexusObject::Lpm(other) if other != lpm => {
                    return Err(Diagnostic::new_unsupported(format!(
                        "concatenation input driven by LPM device type `{}` without a signal",
                        netlist.lpm(other).kind
                    ))
                    .finish());
                }
                _ => {}
            }
        }
        Err(Diagnostic::new_unsupported(format!(
            "concatenation input {input:?} of device {lpm:?} without a signal or constant"
        ))
        .finish())
    }
}
