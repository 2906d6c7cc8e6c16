//! Source chunks and the map that owns them.
//!
//! Every compiled unit (the main script and each `use`d library) becomes one
//! [`SourceChunk`]. Chunks are immutable once added; spans refer to them by
//! [`ChunkId`].

use crate::{ChunkId, Span};

/// 1-based line and column (column counted in bytes).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A named source text with precomputed line starts.
#[derive(Clone, Debug)]
pub struct SourceChunk {
    id: ChunkId,
    name: String,
    text: String,
    line_starts: Vec<u32>,
}

impl SourceChunk {
    fn new(id: ChunkId, name: String, text: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        SourceChunk {
            id,
            name,
            text,
            line_starts,
        }
    }

    #[inline]
    pub fn id(&self) -> ChunkId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines (a trailing newline opens one more, empty line).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Map a byte offset to its line and column. Offsets past the end clamp
    /// to the last position.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(u32::try_from(self.text.len()).unwrap_or(u32::MAX));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        LineCol {
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            col: offset - self.line_starts[line] + 1,
        }
    }

    /// Text of a 1-based line without its newline.
    pub fn line_text(&self, line: u32) -> &str {
        let Some(idx) = (line as usize).checked_sub(1) else {
            return "";
        };
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.text.len(), |&next| next as usize);
        self.text[start as usize..end].trim_end_matches(['\n', '\r'])
    }

    /// Text covered by `span`, or `""` if it lies outside this chunk.
    pub fn slice(&self, span: Span) -> &str {
        if span.chunk != self.id {
            return "";
        }
        self.text.get(span.to_range()).unwrap_or("")
    }
}

/// Owns every chunk of one compilation session.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    chunks: Vec<SourceChunk>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chunk and return its id.
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) -> ChunkId {
        let id = ChunkId::from_raw(u32::try_from(self.chunks.len()).unwrap_or(u32::MAX - 1));
        self.chunks.push(SourceChunk::new(id, name.into(), text.into()));
        id
    }

    pub fn get(&self, id: ChunkId) -> Option<&SourceChunk> {
        self.chunks.get(id.index())
    }

    /// Text covered by `span`; empty for virtual spans.
    pub fn slice(&self, span: Span) -> &str {
        self.get(span.chunk).map_or("", |chunk| chunk.slice(span))
    }

    /// `name:line:col` of the start of `span`, if it has a location.
    pub fn location(&self, span: Span) -> Option<String> {
        let chunk = self.get(span.chunk)?;
        let LineCol { line, col } = chunk.line_col(span.start);
        Some(format!("{}:{line}:{col}", chunk.name))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests;
