use crate::graph::connection::{Connection, Endpoint, Slice};
use crate::graph::signal::SignalIdx;
use crate::graph::store::SignalGraph;
use crate::util::data::VecExt;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CompactStats {
    pub locals_removed: usize,
    pub connections_spliced: usize,
}

impl SignalGraph {
    /// Remove every elaborator-generated signal by connecting its drivers directly to its loads.
    pub fn process_local_connections(&mut self) -> CompactStats {
        let locals: Vec<SignalIdx> = self
            .signals()
            .filter(|(_, s)| s.is_local)
            .map(|(idx, _)| idx)
            .collect();

        let mut stats = CompactStats::default();
        for local in locals {
            stats.connections_spliced += self.remove_local(local);
            stats.locals_removed += 1;
        }
        stats
    }

    fn remove_local(&mut self, local: SignalIdx) -> usize {
        let fan_in = self.fan_in_mut();
        let incoming: Vec<Connection> = fan_in
            .shift_remove(&local)
            .unwrap_or_default()
            .into_iter()
            .filter(|c| c.source.signal != local)
            .collect();

        let mut spliced = 0;
        for conns in fan_in.values_mut() {
            if !conns.iter().any(|c| c.source.signal == local) {
                continue;
            }

            // rebuild the list so spliced connections take the place of the one they replace
            let mut result = Vec::with_capacity(conns.len());
            for &outgoing in conns.iter() {
                if outgoing.source.signal != local {
                    result.push_unique(outgoing);
                    continue;
                }
                for inc in &incoming {
                    if let Some(conn) = splice(inc, &outgoing) {
                        spliced += result.push_unique(conn) as usize;
                    }
                }
            }
            *conns = result;
        }
        fan_in.retain(|_, conns| !conns.is_empty());
        self.mark_hidden(local);

        log::debug!(
            "removed local signal {}, spliced {} connections",
            self.signal(local).full_name(0),
            spliced
        );
        spliced
    }
}

/// Combine `incoming: S[s] -> L[a]` and `outgoing: L[b] -> T[t]` into `S -> T` over the bits of `L` they
/// have in common. Ranges are only shifted on the sides where the replaced connection was width matched.
pub fn splice(incoming: &Connection, outgoing: &Connection) -> Option<Connection> {
    if incoming.sink.signal != outgoing.source.signal || incoming.sink.id != outgoing.source.id {
        return None;
    }
    let overlap = incoming.sink.slice.overlap(outgoing.source.slice)?;

    let source_slice = if incoming.is_width_matched() {
        translate(overlap, incoming.sink.slice, incoming.source.slice)
    } else {
        incoming.source.slice
    };
    let sink_slice = if outgoing.is_width_matched() {
        translate(overlap, outgoing.source.slice, outgoing.sink.slice)
    } else {
        outgoing.sink.slice
    };

    Some(Connection {
        source: Endpoint {
            slice: source_slice,
            ..incoming.source
        },
        sink: Endpoint {
            slice: sink_slice,
            ..outgoing.sink
        },
    })
}

/// Map `bits`, a sub-range of `from`, onto the corresponding bits of the equally wide range `to`.
fn translate(bits: Slice, from: Slice, to: Slice) -> Slice {
    Slice::new(bits.msb - from.lsb + to.lsb, bits.lsb - from.lsb + to.lsb)
}
