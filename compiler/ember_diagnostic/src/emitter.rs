//! Terminal rendering of issues and compile errors.
//!
//! ```text
//! error[E102]: expected `;`
//!  --> main.ember:1:10
//!   |
//! 1 | let x = 1
//!   |          ^
//! ```

use crate::{CompileError, ErrorKind, Issue, Issues};
use ember_ir::{SourceMap, Span};
use std::io::{self, Write};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Rendering limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// Stop after this many issues; the rest are summarised in one line.
    pub error_limit: usize,
    pub color: ColorMode,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            color: ColorMode::Auto,
        }
    }
}

/// Writes diagnostics with source snippets.
pub struct TerminalEmitter<'s, W: Write> {
    writer: W,
    sources: &'s SourceMap,
    colors: bool,
    config: DiagnosticConfig,
}

impl<'s, W: Write> TerminalEmitter<'s, W> {
    pub fn new(writer: W, sources: &'s SourceMap, config: DiagnosticConfig, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            sources,
            colors: config.color.should_use_colors(is_tty),
            config,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&mut self, text: &str, color: &str) -> io::Result<()> {
        if self.colors {
            write!(self.writer, "{color}{text}{}", colors::RESET)
        } else {
            write!(self.writer, "{text}")
        }
    }

    /// Emit up to `error_limit` issues in source order. Returns how many
    /// were written.
    pub fn emit_issues(&mut self, issues: &Issues) -> io::Result<usize> {
        let sorted = issues.sorted();
        let shown = sorted.len().min(self.config.error_limit);
        for issue in &sorted[..shown] {
            self.emit_issue(issue)?;
        }
        let hidden = sorted.len() - shown;
        if hidden > 0 {
            let line = format!(
                "... and {hidden} more issue{}\n",
                if hidden == 1 { "" } else { "s" }
            );
            self.paint(&line, colors::WARNING)?;
        }
        Ok(shown)
    }

    pub fn emit_issue(&mut self, issue: &Issue) -> io::Result<()> {
        self.paint(&format!("error[{}]", issue.code), colors::ERROR)?;
        self.paint(&format!(": {}\n", issue.code.message()), colors::BOLD)?;
        self.snippet(issue.span)
    }

    pub fn emit_error(&mut self, error: &CompileError) -> io::Result<()> {
        let color = match error.kind {
            ErrorKind::Issue | ErrorKind::Bug => colors::ERROR,
            ErrorKind::Todo => colors::WARNING,
        };
        self.paint(&error.kind.to_string(), color)?;
        self.paint(&format!(": {}\n", error.message), colors::BOLD)?;
        if let Some(span) = error.span {
            self.snippet(span)?;
        }
        if error.kind == ErrorKind::Bug {
            writeln!(self.writer, "note: this is a compiler bug, please report it")?;
        }
        Ok(())
    }

    fn snippet(&mut self, span: Span) -> io::Result<()> {
        let Some(chunk) = self.sources.get(span.chunk) else {
            return Ok(());
        };
        let start = chunk.line_col(span.start);
        let end = chunk.line_col(span.end);
        let number = start.line.to_string();
        let pad = " ".repeat(number.len());
        self.paint(&format!("{pad}--> "), colors::GUTTER)?;
        writeln!(self.writer, "{}:{}:{}", chunk.name(), start.line, start.col)?;
        self.paint(&format!("{pad} |\n"), colors::GUTTER)?;

        let text = chunk.line_text(start.line);
        self.paint(&format!("{number} | "), colors::GUTTER)?;
        writeln!(self.writer, "{text}")?;

        let line_len = u32::try_from(text.len()).unwrap_or(u32::MAX);
        let last_col = if end.line == start.line {
            end.col
        } else {
            line_len + 1
        };
        let width = last_col.saturating_sub(start.col).max(1) as usize;
        self.paint(&format!("{pad} | "), colors::GUTTER)?;
        let carets = format!(
            "{}{}\n",
            " ".repeat(start.col.saturating_sub(1) as usize),
            "^".repeat(width)
        );
        self.paint(&carets, colors::ERROR)
    }
}

/// Render issues to a string without color.
pub fn render_issues(sources: &SourceMap, issues: &Issues, config: DiagnosticConfig) -> String {
    let config = DiagnosticConfig {
        color: ColorMode::Never,
        ..config
    };
    let mut emitter = TerminalEmitter::new(Vec::new(), sources, config, false);
    let _ = emitter.emit_issues(issues);
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}

/// Render a compile error to a string without color.
pub fn render_error(sources: &SourceMap, error: &CompileError) -> String {
    let config = DiagnosticConfig {
        color: ColorMode::Never,
        ..DiagnosticConfig::default()
    };
    let mut emitter = TerminalEmitter::new(Vec::new(), sources, config, false);
    let _ = emitter.emit_error(error);
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}
