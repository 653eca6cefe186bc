use crate::graph::signal::SignalIdx;
use crate::graph::store::SignalGraph;
use indexmap::IndexSet;

/// Removal of nodes the user is not interested in, applied after compaction.
#[derive(Debug, Clone, Default)]
pub struct GraphFilter {
    pub ignore_constants: bool,
    /// Full names of signals to remove.
    pub ignore_names: IndexSet<String>,
}

impl GraphFilter {
    /// Parse an ignore list: one full signal name per line, blank lines and `#` comments are skipped.
    pub fn parse_ignore_list(source: &str) -> impl Iterator<Item = String> + '_ {
        source
            .lines()
            .map(|line| line.split_once('#').map_or(line, |(before, _)| before).trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
    }

    pub fn is_empty(&self) -> bool {
        !self.ignore_constants && self.ignore_names.is_empty()
    }

    /// Returns the number of removed signals.
    pub fn apply(&self, graph: &mut SignalGraph) -> usize {
        if self.is_empty() {
            return 0;
        }

        let removed: Vec<SignalIdx> = graph
            .signals()
            .filter(|&(idx, signal)| {
                if graph.is_hidden(idx) {
                    return false;
                }
                if signal.is_constant() {
                    return self.ignore_constants;
                }
                // arrayed signals are matched per word
                let words = if signal.is_arrayed { word_count(graph, idx) } else { 1 };
                (0..words).any(|word| self.ignore_names.contains(&signal.full_name(word)))
            })
            .map(|(idx, _)| idx)
            .collect();

        for &idx in &removed {
            log::debug!("ignoring signal {}", graph.signal(idx).full_name(0));
            graph.hide(idx);
        }
        removed.len()
    }
}

fn word_count(graph: &SignalGraph, signal: SignalIdx) -> u32 {
    graph
        .connections()
        .flat_map(|c| [c.source, c.sink])
        .filter(|e| e.signal == signal)
        .map(|e| e.id + 1)
        .max()
        .unwrap_or(1)
}
