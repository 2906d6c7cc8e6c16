//! Single-pass lexer that groups brackets as it scans.
//!
//! Tokens go straight into a stack of open frames. An opening bracket pushes
//! a frame, a closing bracket pops back to its opener, and the popped frame
//! becomes a [`TokenGroup`] in its parent. Three kinds of frame need more
//! than that:
//!
//! - *Candidate* frames hold a `<` glued to an identifier. They close as a
//!   generic group on `>`, or are demoted back to a plain `<` (contents
//!   spliced into the parent) when anything that cannot appear in a type
//!   argument list shows up.
//! - *Source* frames hold foreign text after `source {`. Their contents are
//!   scanned by hand, not by logos, until `${` or the closing `}`.
//! - The root frame, which never closes.

use crate::escape::{check_escapes, string_body};
use crate::raw_token::RawToken;
use ember_diagnostic::{Code, Issues};
use ember_ir::{ChunkId, Span, Token, TokenFlags, TokenGroup, TokenKind, TokenNode, TokenTree};
use logos::Logos;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum FrameKind {
    Root,
    Group,
    Candidate,
    /// `depth` counts unbalanced `{` inside the foreign text.
    Source { depth: u32 },
}

struct Frame {
    kind: FrameKind,
    open: Token,
    contents: Vec<TokenNode>,
}

/// Whether the next `{` opens a source block.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum SourceArm {
    Off,
    /// Just saw `source` or `use`.
    Keyword,
    /// Saw `source <ident>`.
    Label,
}

pub(crate) struct Lexer<'src, 'i> {
    raw: logos::Lexer<'src, RawToken>,
    source: &'src str,
    chunk: ChunkId,
    issues: &'i mut Issues,
    frames: Vec<Frame>,
    /// End offset of the last token, or `None` after a comment.
    last_end: Option<usize>,
    /// Last token emitted (closers included).
    prev: Option<Token>,
    /// Span of a backtick waiting for its operator.
    marker: Option<Span>,
    arm: SourceArm,
}

impl<'src, 'i> Lexer<'src, 'i> {
    pub(crate) fn new(source: &'src str, chunk: ChunkId, issues: &'i mut Issues) -> Self {
        Lexer {
            raw: RawToken::lexer(source),
            source,
            chunk,
            issues,
            frames: vec![Frame {
                kind: FrameKind::Root,
                open: Token::virtual_at(TokenKind::Unknown, Span::point(chunk, 0)),
                contents: Vec::new(),
            }],
            last_end: None,
            prev: None,
            marker: None,
            arm: SourceArm::Off,
        }
    }

    pub(crate) fn run(mut self) -> TokenTree {
        loop {
            if let FrameKind::Source { .. } = self.top().kind {
                self.scan_source_text();
                continue;
            }
            let Some(result) = self.raw.next() else {
                break;
            };
            let range = self.raw.span();
            let span = Span::from_range(self.chunk, range.clone());
            let glued = self.last_end == Some(range.start);
            self.last_end = Some(range.end);
            match result {
                Ok(RawToken::LineComment) => self.last_end = None,
                Ok(raw) => self.raw_token(raw, span, glued),
                Err(()) => {
                    self.issues.raise(Code::UnknownCharacter, span);
                    self.emit(TokenKind::Unknown, span, glued);
                }
            }
        }
        self.finish()
    }

    #[inline]
    fn top(&self) -> &Frame {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    #[inline]
    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn text(&self, span: Span) -> &'src str {
        &self.source[span.to_range()]
    }

    // === Raw token conversion ===

    fn raw_token(&mut self, raw: RawToken, span: Span, glued: bool) {
        if raw == RawToken::Backtick {
            if let Some(pending) = self.marker.replace(span) {
                self.issues.raise(Code::MarkerWithoutOperator, pending);
            }
            return;
        }

        if let Some(marker) = self.marker.take() {
            let marked = raw.simple_kind().and_then(TokenKind::marked);
            match marked {
                Some(kind) if glued => {
                    self.emit(kind, marker.merge(span), false);
                    return;
                }
                _ => self.issues.raise(Code::MarkerWithoutOperator, marker),
            }
        }

        match raw {
            RawToken::Word => self.word(span, glued),
            RawToken::ColonWord => self.colon_word(span, glued),
            RawToken::BarePrefix => {
                self.issues.raise(Code::EmptyPrefixedName, span);
                self.emit(TokenKind::Unknown, span, glued);
            }
            RawToken::Str | RawToken::UnterminatedStr => {
                if raw == RawToken::UnterminatedStr {
                    self.issues.raise(Code::UnterminatedString, span);
                }
                let body = string_body(self.text(span));
                check_escapes(body, span.start + 1, self.chunk, self.issues);
                self.emit(TokenKind::Str, span, glued);
            }
            RawToken::LParen | RawToken::LBracket | RawToken::LBrace => {
                let kind = raw.simple_kind().unwrap_or(TokenKind::Unknown);
                self.open(kind, span, glued);
            }
            RawToken::RParen | RawToken::RBracket | RawToken::RBrace => {
                let kind = raw.simple_kind().unwrap_or(TokenKind::Unknown);
                self.close(Token::new(kind, span).with_flags(glue_flag(glued)));
            }
            RawToken::Lt if glued && self.prev.is_some_and(|t| t.kind == TokenKind::Ident) => {
                self.arm = SourceArm::Off;
                self.push_frame(FrameKind::Candidate, TokenKind::LAngle, span, glued);
            }
            RawToken::Gt if self.top().kind == FrameKind::Candidate => {
                self.close_frame(Token::new(TokenKind::RAngle, span).with_flags(glue_flag(glued)));
            }
            _ => {
                let kind = raw.simple_kind().unwrap_or(TokenKind::Unknown);
                self.emit(kind, span, glued);
            }
        }
    }

    fn word(&mut self, span: Span, glued: bool) {
        let text = self.text(span);
        if glued
            && self
                .prev
                .is_some_and(|t| matches!(t.kind, TokenKind::Int | TokenKind::Hex | TokenKind::Float))
        {
            self.issues.raise(Code::LetterDirectlyAfterNumber, span);
        }
        let kind = if text == "_" {
            TokenKind::Underscore
        } else {
            TokenKind::keyword(text).unwrap_or(TokenKind::Ident)
        };
        let next_arm = match (kind, self.arm) {
            (TokenKind::KwSource | TokenKind::KwUse, _) => SourceArm::Keyword,
            (TokenKind::Ident, SourceArm::Keyword) => SourceArm::Label,
            _ => SourceArm::Off,
        };
        self.emit(kind, span, glued);
        self.arm = next_arm;
    }

    /// `:name` glued to a value is `:` then `name` (`x:f32`); otherwise a
    /// symbol.
    fn colon_word(&mut self, span: Span, glued: bool) {
        let after_value = glued && self.prev.is_some_and(|t| t.kind.ends_value());
        if !after_value {
            self.emit(TokenKind::Symbol, span, glued);
            return;
        }
        let colon = Span::new(self.chunk, span.start, span.start + 1);
        let word = Span::new(self.chunk, span.start + 1, span.end);
        self.emit(TokenKind::Colon, colon, true);
        let kind = TokenKind::keyword(self.text(word)).unwrap_or(TokenKind::Ident);
        self.emit(kind, word, true);
    }

    // === Frames ===

    /// Append a token to the innermost frame, demoting candidates that
    /// cannot hold it.
    fn emit(&mut self, kind: TokenKind, span: Span, glued: bool) {
        self.demote_candidates_rejecting(kind);
        let token = Token::new(kind, span).with_flags(glue_flag(glued));
        self.top_mut().contents.push(TokenNode::Token(token));
        self.prev = Some(token);
        if kind != TokenKind::Ident {
            self.arm = SourceArm::Off;
        }
    }

    fn demote_candidates_rejecting(&mut self, kind: TokenKind) {
        while self.top().kind == FrameKind::Candidate && !allowed_in_generics(kind) {
            self.demote();
        }
    }

    fn open(&mut self, kind: TokenKind, span: Span, glued: bool) {
        let source = kind == TokenKind::LBrace && self.arm != SourceArm::Off;
        self.arm = SourceArm::Off;
        let frame = if source {
            FrameKind::Source { depth: 0 }
        } else {
            FrameKind::Group
        };
        self.push_frame(frame, kind, span, glued);
    }

    fn push_frame(&mut self, frame: FrameKind, kind: TokenKind, span: Span, glued: bool) {
        let open = Token::new(kind, span).with_flags(glue_flag(glued));
        self.frames.push(Frame {
            kind: frame,
            open,
            contents: Vec::new(),
        });
        self.prev = Some(open);
    }

    /// Turn the innermost candidate back into a plain `<` followed by its
    /// contents.
    fn demote(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let mut lt = frame.open;
        lt.kind = TokenKind::Lt;
        let parent = self.top_mut();
        parent.contents.push(TokenNode::Token(lt));
        parent.contents.extend(frame.contents);
    }

    /// Close the innermost frame with `close`.
    fn close_frame(&mut self, close: Token) {
        if self.frames.len() <= 1 {
            return;
        }
        let Some(frame) = self.frames.pop() else {
            return;
        };
        self.top_mut().contents.push(TokenNode::Group(TokenGroup {
            open: frame.open,
            close,
            contents: frame.contents,
        }));
        self.prev = Some(close);
        self.arm = SourceArm::Off;
    }

    /// Close a frame that the source never closed.
    fn close_unterminated(&mut self, at: Span) {
        let frame = self.top();
        let (code, kind) = match frame.kind {
            FrameKind::Source { .. } => (Code::UnterminatedSourceBlock, TokenKind::RBrace),
            _ => (
                Code::MismatchedOpeningParen,
                frame.open.kind.closing().unwrap_or(TokenKind::RParen),
            ),
        };
        self.issues.raise(code, frame.open.span);
        self.close_frame(Token::virtual_at(kind, at));
    }

    fn close(&mut self, close: Token) {
        while self.top().kind == FrameKind::Candidate {
            self.demote();
        }
        let matching = self.frames.iter().rposition(|frame| {
            frame.kind != FrameKind::Root
                && frame.kind != FrameKind::Candidate
                && frame.open.kind.closing() == Some(close.kind)
        });
        let Some(target) = matching else {
            self.issues.raise(Code::MismatchedClosingParen, close.span);
            return;
        };
        let at = Span::point(self.chunk, close.span.start);
        while self.frames.len() > target + 1 {
            if self.top().kind == FrameKind::Candidate {
                self.demote();
            } else {
                self.close_unterminated(at);
            }
        }
        self.close_frame(close);
    }

    fn finish(mut self) -> TokenTree {
        if let Some(marker) = self.marker.take() {
            self.issues.raise(Code::MarkerWithoutOperator, marker);
        }
        let end = Span::point(self.chunk, u32::try_from(self.source.len()).unwrap_or(u32::MAX));
        while self.frames.len() > 1 {
            if self.top().kind == FrameKind::Candidate {
                self.demote();
            } else {
                self.close_unterminated(end);
            }
        }
        let root = self.frames.pop().map(|f| f.contents).unwrap_or_default();
        TokenTree { nodes: root, end }
    }

    // === Source blocks ===

    /// Scan foreign text in the innermost source frame up to `${`, the
    /// closing `}`, or end of input.
    fn scan_source_text(&mut self) {
        let FrameKind::Source { mut depth } = self.top().kind else {
            return;
        };
        let start = self.raw.span().end;
        let rest = self.raw.remainder().as_bytes();
        let mut i = 0;
        loop {
            let Some(found) = memchr::memchr3(b'{', b'}', b'$', &rest[i..]) else {
                // Unterminated: everything left is text.
                self.raw.bump(rest.len());
                self.source_text(start, start + rest.len());
                let end = Span::point(self.chunk, u32::try_from(start + rest.len()).unwrap_or(u32::MAX));
                self.close_unterminated(end);
                return;
            };
            let at = i + found;
            match rest[at] {
                b'{' => {
                    depth += 1;
                    i = at + 1;
                }
                b'}' if depth > 0 => {
                    depth -= 1;
                    i = at + 1;
                }
                b'}' => {
                    self.raw.bump(at + 1);
                    self.source_text(start, start + at);
                    let span = Span::from_range(self.chunk, start + at..start + at + 1);
                    self.close_frame(Token::new(TokenKind::RBrace, span));
                    self.last_end = Some(start + at + 1);
                    return;
                }
                _ if rest.get(at + 1) == Some(&b'{') => {
                    self.raw.bump(at + 2);
                    self.source_text(start, start + at);
                    if let FrameKind::Source { depth: saved } = &mut self.top_mut().kind {
                        *saved = depth;
                    }
                    let span = Span::from_range(self.chunk, start + at..start + at + 2);
                    self.push_frame(FrameKind::Group, TokenKind::InterpOpen, span, false);
                    self.last_end = Some(start + at + 2);
                    return;
                }
                _ => i = at + 1,
            }
        }
    }

    fn source_text(&mut self, start: usize, end: usize) {
        if start < end {
            let span = Span::from_range(self.chunk, start..end);
            let token = Token::new(TokenKind::SourceText, span);
            self.top_mut().contents.push(TokenNode::Token(token));
        }
    }
}

#[inline]
fn glue_flag(glued: bool) -> TokenFlags {
    if glued {
        TokenFlags::GLUED
    } else {
        TokenFlags::empty()
    }
}

/// Tokens that may appear directly inside a generic argument list.
#[inline]
fn allowed_in_generics(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident | TokenKind::Int | TokenKind::Comma | TokenKind::Colon | TokenKind::Pipe
    )
}
