//! Source location spans.
//!
//! A span is a byte range into one [`SourceChunk`](crate::SourceChunk),
//! identified by its [`ChunkId`]. Synthesized nodes (prelude declarations,
//! recovery placeholders with no better location) use [`Span::VIRTUAL`].

use std::fmt;

/// Index of a chunk in the [`SourceMap`](crate::SourceMap).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ChunkId(u32);

impl ChunkId {
    /// Sentinel chunk for spans that do not point into any source.
    pub const NONE: ChunkId = ChunkId(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ChunkId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range `start..end` into one source chunk.
///
/// Layout: 12 bytes. `start <= end` always holds; zero-width spans mark
/// insertion points for error recovery.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub chunk: ChunkId,
}

impl Default for Span {
    fn default() -> Self {
        Span::VIRTUAL
    }
}

impl Span {
    /// Span of synthesized code with no source location.
    pub const VIRTUAL: Span = Span {
        start: 0,
        end: 0,
        chunk: ChunkId::NONE,
    };

    #[inline]
    pub const fn new(chunk: ChunkId, start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Span { start, end, chunk }
    }

    /// Zero-width span at `offset`.
    #[inline]
    pub const fn point(chunk: ChunkId, offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
            chunk,
        }
    }

    /// Build a span from a lexer byte range, saturating at `u32::MAX`.
    #[inline]
    pub fn from_range(chunk: ChunkId, range: std::ops::Range<usize>) -> Self {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX).max(start);
        Span { start, end, chunk }
    }

    #[inline]
    pub const fn is_virtual(self) -> bool {
        self.chunk.0 == ChunkId::NONE.0
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely inside `self` (same chunk).
    #[inline]
    pub fn contains_span(self, other: Span) -> bool {
        self.chunk == other.chunk && self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both. A virtual span absorbs nothing: merging
    /// with one returns the other side unchanged.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        if self.is_virtual() {
            return other;
        }
        if other.is_virtual() || other.chunk != self.chunk {
            return self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            chunk: self.chunk,
        }
    }

    /// Zero-width span at the end of this one.
    #[inline]
    #[must_use]
    pub const fn end_point(self) -> Span {
        Span {
            start: self.end,
            end: self.end,
            chunk: self.chunk,
        }
    }

    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual() {
            f.write_str("<virtual>")
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Span;
    crate::static_assert_size!(Span, 12);
}

#[cfg(test)]
mod tests;
