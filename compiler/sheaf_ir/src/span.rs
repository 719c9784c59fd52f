//! Source location spans.

use std::fmt;

/// Byte range in the formula source, `start..end`.
///
/// Trees built in code (quick-fix replacements, tests) use [`Span::DUMMY`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for generated nodes.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create from a byte range, saturating offsets that do not fit in `u32`.
    #[inline]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        Span { start, end }
    }

    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Slice the covered text out of `source`, if the span is in bounds.
    pub fn snippet(self, source: &str) -> Option<&str> {
        source.get(self.to_range())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_slices_source() {
        let source = "1{m} + 2{s}";
        assert_eq!(Span::new(7, 11).snippet(source), Some("2{s}"));
        assert_eq!(Span::new(7, 40).snippet(source), None);
    }
}
