use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::{Endpoint, Slice};
use crate::netlist::ir::{Expr, ExprKind};
use crate::track::Tracker;
use crate::util::data::VecExt;

/// A signal read by an expression.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ExprSource {
    pub source: Endpoint,
    /// The bits of the assignment target this source is placed in, if only part of it.
    pub sink_slice: Option<Slice>,
}

impl Tracker<'_> {
    /// Collect the sources of `expr` in operand order.
    ///
    /// If `target` is given, `expr` is the right-hand side of an assignment to those bits, and a top-level
    /// concatenation places each operand in its own part of the target.
    pub fn expr_sources(&mut self, expr: Expr, target: Option<Slice>) -> DiagResult<Vec<ExprSource>> {
        let netlist = self.netlist;
        let mut result = vec![];

        match (&netlist.expr(expr).kind, target) {
            (ExprKind::Concat { parts, repeat: 1 }, Some(target)) => {
                // operands are listed most significant first
                let total = parts.iter().try_fold(0u32, |acc, &p| acc.checked_add(netlist.expr(p).width));
                let Some(mut lsb) = total else {
                    return Err(
                        Diagnostic::new_input(format!("concatenation {expr:?} is wider than 32 bit indices")).finish(),
                    );
                };
                for &part in parts {
                    let width = netlist.expr(part).width;
                    lsb -= width;

                    let mut sources = vec![];
                    self.collect_expr_sources(part, &mut sources)?;

                    let Some(sink_slice) = place_in_target(target, Slice::from_base(lsb, width)) else {
                        log::debug!("operand {part:?} is truncated by the assignment");
                        continue;
                    };
                    for source in sources {
                        result.push_unique(ExprSource {
                            source,
                            sink_slice: Some(sink_slice),
                        });
                    }
                }
            }
            _ => {
                let mut sources = vec![];
                self.collect_expr_sources(expr, &mut sources)?;
                result.extend(sources.into_iter().map(|source| ExprSource {
                    source,
                    sink_slice: None,
                }));
            }
        }

        Ok(result)
    }

    fn collect_expr_sources(&mut self, expr: Expr, result: &mut Vec<Endpoint>) -> DiagResult {
        let netlist = self.netlist;
        let info = netlist.expr(expr);

        match &info.kind {
            ExprKind::Number { .. } => {
                let Some(signal) = self.graph.register_expression(netlist, expr) else {
                    return Err(Diagnostic::new_internal(format!("number {expr:?} is not a literal")).finish());
                };
                result.push_unique(Endpoint {
                    signal,
                    id: 0,
                    slice: self.graph.signal(signal).natural_slice(),
                });
            }
            &ExprKind::Signal { signal, word } => {
                let id = match word {
                    None => 0,
                    Some(word) => match self.const_value(word) {
                        Some(value) => value,
                        None => {
                            // any word could be read, the index itself is a dependency too
                            self.collect_expr_sources(word, result)?;
                            0
                        }
                    },
                };
                let signal = self.graph.register_signal(netlist, signal);
                result.push_unique(Endpoint {
                    signal,
                    id,
                    slice: self.graph.signal(signal).natural_slice(),
                });
            }
            &ExprKind::Select { base, offset } => {
                let offset_value = match offset {
                    None => Some(0),
                    Some(offset) => self.const_value(offset),
                };
                match (&netlist.expr(base).kind, offset_value) {
                    (&ExprKind::Signal { signal, word: None }, Some(offset_value)) => {
                        let Some(slice) = Slice::checked_from_base(offset_value, info.width) else {
                            return Err(Diagnostic::new_input(format!(
                                "part select of {} bits at offset {offset_value} of `{}`, beyond 32 bit indices",
                                info.width,
                                netlist.signal(signal).name
                            ))
                            .finish());
                        };
                        let signal = self.graph.register_signal(netlist, signal);
                        result.push_unique(Endpoint { signal, id: 0, slice });
                    }
                    _ => {
                        self.collect_expr_sources(base, result)?;
                        if let Some(offset) = offset {
                            self.collect_expr_sources(offset, result)?;
                        }
                    }
                }
            }
            &ExprKind::Unary { op: _, operand } => {
                self.collect_expr_sources(operand, result)?;
            }
            &ExprKind::Binary { op: _, left, right } => {
                self.collect_expr_sources(left, result)?;
                self.collect_expr_sources(right, result)?;
            }
            &ExprKind::Ternary {
                cond,
                if_true,
                if_false,
            } => {
                self.collect_expr_sources(cond, result)?;
                self.collect_expr_sources(if_true, result)?;
                self.collect_expr_sources(if_false, result)?;
            }
            ExprKind::Concat { parts, repeat: _ } => {
                for &part in parts {
                    self.collect_expr_sources(part, result)?;
                }
            }
            ExprKind::Unsupported(kind) => {
                return Err(Diagnostic::new_unsupported(format!("expression type `{kind}`")).finish());
            }
        }
        Ok(())
    }

    /// The value of `expr` if it is a fully known number literal that fits in 32 bits.
    pub fn const_value(&self, expr: Expr) -> Option<u32> {
        match &self.netlist.expr(expr).kind {
            ExprKind::Number { bits } => {
                let significant = bits.trim_start_matches('0');
                if significant.len() > 32 {
                    return None;
                }
                if significant.is_empty() {
                    return Some(0);
                }
                u32::from_str_radix(significant, 2).ok()
            }
            _ => None,
        }
    }
}

/// Interpret `part`, relative to the lowest bit of `target`, as absolute bits of the target.
/// Bits above the target are dropped, `None` if nothing is left.
fn place_in_target(target: Slice, part: Slice) -> Option<Slice> {
    let width = target.width();
    if part.lsb >= width {
        return None;
    }
    let part = Slice::new(part.msb.min(width - 1), part.lsb);
    target.nest(part)
}
