use crate::Code;
use ember_ir::Span;

/// A recorded, non-fatal lexer or parser problem.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Issue {
    pub code: Code,
    pub span: Span,
}

/// Sink the lexer and parser push issues into.
///
/// A unit is syntactically ok iff its sink stayed empty.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Issues {
    list: Vec<Issue>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn raise(&mut self, code: Code, span: Span) {
        self.list.push(Issue { code, span });
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.list.iter()
    }

    /// Codes in the order they were raised.
    pub fn codes(&self) -> Vec<Code> {
        self.list.iter().map(|issue| issue.code).collect()
    }

    pub fn contains(&self, code: Code) -> bool {
        self.list.iter().any(|issue| issue.code == code)
    }

    pub fn append(&mut self, other: Issues) {
        self.list.extend(other.list);
    }

    /// Issues ordered by chunk then position, for stable reporting.
    pub fn sorted(&self) -> Vec<Issue> {
        let mut sorted = self.list.clone();
        sorted.sort_by_key(|issue| (issue.span.chunk, issue.span.start, issue.span.end));
        sorted
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.list
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
