use crate::graph::signal::SignalIdx;
use std::fmt::{Display, Formatter};

/// Inclusive bit range `[msb:lsb]`, always with `msb >= lsb`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Slice {
    pub msb: u32,
    pub lsb: u32,
}

impl Slice {
    pub fn new(msb: u32, lsb: u32) -> Self {
        debug_assert!(msb >= lsb, "slice [{msb}:{lsb}] is reversed");
        Slice { msb, lsb }
    }

    /// The `width` bits starting at `base`.
    pub fn from_base(base: u32, width: u32) -> Self {
        Slice::new(base + width - 1, base)
    }

    /// Like [Slice::from_base], but `None` if `width` is zero or the slice does not fit in 32 bits.
    pub fn checked_from_base(base: u32, width: u32) -> Option<Self> {
        let msb = base.checked_add(width.checked_sub(1)?)?;
        Some(Slice::new(msb, base))
    }

    pub fn width(self) -> u32 {
        self.msb - self.lsb + 1
    }

    pub fn overlap(self, other: Slice) -> Option<Slice> {
        let msb = self.msb.min(other.msb);
        let lsb = self.lsb.max(other.lsb);
        (msb >= lsb).then(|| Slice::new(msb, lsb))
    }

    /// Move this slice up by `offset` bits.
    pub fn shift_up(self, offset: u32) -> Slice {
        Slice::new(self.msb + offset, self.lsb + offset)
    }

    pub fn shift_down(self, offset: u32) -> Slice {
        Slice::new(self.msb - offset, self.lsb - offset)
    }

    /// Interpret `inner`, given relative to the lowest bit of `self`, as an absolute slice.
    /// Returns `None` if it does not fit in `self`.
    pub fn nest(self, inner: Slice) -> Option<Slice> {
        (inner.msb < self.width()).then(|| inner.shift_up(self.lsb))
    }
}

impl Display for Slice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

/// One side of a connection: a signal word and the bits of it that participate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Endpoint {
    pub signal: SignalIdx,
    /// Array word, zero for plain vectors.
    pub id: u32,
    pub slice: Slice,
}

/// Directed edge: the `source` bits influence the `sink` bits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Connection {
    pub source: Endpoint,
    pub sink: Endpoint,
}

impl Connection {
    /// `[source_msb:source_lsb]->[sink_msb:sink_lsb]`
    pub fn label(&self) -> String {
        format!("{}->{}", self.source.slice, self.sink.slice)
    }

    pub fn is_width_matched(&self) -> bool {
        self.source.slice.width() == self.sink.slice.width()
    }
}

#[cfg(test)]
mod test {
    use crate::graph::connection::Slice;

    #[test]
    fn from_base() {
        assert_eq!(Slice::from_base(4, 4), Slice::new(7, 4));
        assert_eq!(Slice::from_base(0, 1), Slice::new(0, 0));
    }

    #[test]
    fn checked_from_base() {
        assert_eq!(Slice::checked_from_base(4, 4), Some(Slice::new(7, 4)));
        assert_eq!(Slice::checked_from_base(u32::MAX - 3, 4), Some(Slice::new(u32::MAX, u32::MAX - 3)));
        assert_eq!(Slice::checked_from_base(0xffff_fffe, 4), None);
        assert_eq!(Slice::checked_from_base(0, 0), None);
    }

    #[test]
    fn overlap() {
        let a = Slice::new(7, 0);
        assert_eq!(a.overlap(Slice::new(11, 4)), Some(Slice::new(7, 4)));
        assert_eq!(Slice::new(3, 0).overlap(Slice::new(7, 4)), None);
    }

    #[test]
    fn nest() {
        let outer = Slice::new(7, 4);
        assert_eq!(outer.nest(Slice::new(1, 0)), Some(Slice::new(5, 4)));
        assert_eq!(outer.nest(Slice::new(3, 0)), Some(Slice::new(7, 4)));
        assert_eq!(outer.nest(Slice::new(4, 0)), None);
    }

    #[test]
    fn display() {
        assert_eq!(Slice::new(7, 4).to_string(), "[7:4]");
    }
}
