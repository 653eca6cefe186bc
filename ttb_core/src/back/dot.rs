use crate::graph::signal::{SignalCategory, SignalIdx};
use crate::graph::store::SignalGraph;
use indexmap::IndexSet;
use itertools::Itertools;
use ttb_util::{swrite, swriteln};

impl SignalCategory {
    pub fn dot_shape(self) -> &'static str {
        match self {
            SignalCategory::FlipFlop => "square",
            SignalCategory::Input => "invtriangle",
            SignalCategory::Signal => "ellipse",
            SignalCategory::Constant => "none",
        }
    }
}

/// Render the graph in Graphviz format: one node per signal word that takes part in a connection,
/// one edge per connection.
pub fn graph_to_dot(graph: &SignalGraph) -> String {
    let nodes: IndexSet<(SignalIdx, u32)> = graph
        .connections()
        .flat_map(|c| [(c.source.signal, c.source.id), (c.sink.signal, c.sink.id)])
        .filter(|&(signal, _)| !graph.is_hidden(signal))
        .collect();

    let mut f = String::new();
    swriteln!(f, "digraph G {{");

    for &(idx, word) in nodes.iter().sorted() {
        let signal = graph.signal(idx);
        let name = signal.full_name(word);
        swriteln!(
            f,
            "    {} [shape={}, label={}];",
            quote(&name),
            signal.category().dot_shape(),
            quote(&format!("{name}{}", signal.natural_slice()))
        );
    }

    for (_, conns) in graph.sinks() {
        for conn in conns {
            let source = graph.signal(conn.source.signal).full_name(conn.source.id);
            let sink = graph.signal(conn.sink.signal).full_name(conn.sink.id);
            swrite!(f, "    {} -> {}", quote(&source), quote(&sink));
            swriteln!(f, " [label={}];", quote(&conn.label()));
        }
    }

    swriteln!(f, "}}");
    f
}

fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    result
}

#[cfg(test)]
mod test {
    use crate::back::dot::quote;

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("top.a"), "\"top.a\"");
        assert_eq!(quote("top.\\weird\"name"), "\"top.\\\\weird\\\"name\"");
    }
}
