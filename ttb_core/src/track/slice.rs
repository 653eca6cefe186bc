use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::connection::Slice;

/// Bit ranges picked out by the part-select and concatenation devices between the current nexus and the
/// sink of the traversal.
///
/// Passed down by value, so a callee never affects the context of its caller.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SliceContext {
    source: Option<Slice>,
    sink: Option<Slice>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SliceRole {
    Source,
    Sink,
}

impl SliceContext {
    pub const EMPTY: SliceContext = SliceContext {
        source: None,
        sink: None,
    };

    /// Push a range for `role`.
    ///
    /// A sink range is encountered outermost first, so a second sink range is relative to the pending one.
    /// A source range is encountered innermost last, so the pending source range is relative to the new one.
    pub fn with(self, role: SliceRole, slice: Slice) -> DiagResult<SliceContext> {
        let mut result = self;
        match role {
            SliceRole::Source => {
                result.source = Some(match self.source {
                    None => slice,
                    Some(pending) => nest(role, slice, pending)?,
                });
            }
            SliceRole::Sink => {
                result.sink = Some(match self.sink {
                    None => slice,
                    Some(pending) => nest(role, pending, slice)?,
                });
            }
        }
        Ok(result)
    }

    /// The same context with the pending source range dropped, once a device has consumed it.
    pub fn without_source(self) -> SliceContext {
        SliceContext { source: None, ..self }
    }

    pub fn source(&self) -> Option<Slice> {
        self.source
    }

    pub fn sink(&self) -> Option<Slice> {
        self.sink
    }

    pub fn source_or(&self, natural: Slice) -> Slice {
        self.source.unwrap_or(natural)
    }

    pub fn sink_or(&self, natural: Slice) -> Slice {
        self.sink.unwrap_or(natural)
    }
}

fn nest(role: SliceRole, outer: Slice, inner: Slice) -> DiagResult<Slice> {
    outer.nest(inner).ok_or_else(|| {
        Diagnostic::new_internal(format!("{role} slice {inner} does not fit in enclosing {role} slice {outer}")).finish()
    })
}

#[cfg(test)]
mod test {
    use crate::diagnostic::DiagKind;
    use crate::graph::connection::Slice;
    use crate::track::slice::{SliceContext, SliceRole};

    #[test]
    fn single_push() {
        let ctx = SliceContext::EMPTY.with(SliceRole::Source, Slice::new(7, 4)).unwrap();
        assert_eq!(ctx.source(), Some(Slice::new(7, 4)));
        assert_eq!(ctx.sink(), None);
        assert_eq!(ctx.sink_or(Slice::new(3, 0)), Slice::new(3, 0));
    }

    #[test]
    fn sink_nests_into_pending() {
        // y[7:4] = {a, b} with b 2 bits wide: b lands at y[5:4]
        let ctx = SliceContext::EMPTY
            .with(SliceRole::Sink, Slice::new(7, 4))
            .unwrap()
            .with(SliceRole::Sink, Slice::new(1, 0))
            .unwrap();
        assert_eq!(ctx.sink(), Some(Slice::new(5, 4)));
    }

    #[test]
    fn source_nests_pending() {
        // (x[11:4])[3:2] is x[7:6]
        let ctx = SliceContext::EMPTY
            .with(SliceRole::Source, Slice::new(3, 2))
            .unwrap()
            .with(SliceRole::Source, Slice::new(11, 4))
            .unwrap();
        assert_eq!(ctx.source(), Some(Slice::new(7, 6)));
    }

    #[test]
    fn caller_context_unchanged() {
        let outer = SliceContext::EMPTY.with(SliceRole::Sink, Slice::new(7, 4)).unwrap();
        let _inner = outer.with(SliceRole::Source, Slice::new(3, 0)).unwrap();
        assert_eq!(outer.source(), None);
    }

    #[test]
    fn without_source_keeps_sink() {
        let ctx = SliceContext::EMPTY
            .with(SliceRole::Sink, Slice::new(7, 4))
            .unwrap()
            .with(SliceRole::Source, Slice::new(3, 0))
            .unwrap()
            .without_source();
        assert_eq!(ctx.source(), None);
        assert_eq!(ctx.sink(), Some(Slice::new(7, 4)));
    }

    #[test]
    fn does_not_fit() {
        let err = SliceContext::EMPTY
            .with(SliceRole::Sink, Slice::new(3, 0))
            .unwrap()
            .with(SliceRole::Sink, Slice::new(7, 4))
            .unwrap_err();
        assert_eq!(err.kind(), DiagKind::Internal);
    }
}
