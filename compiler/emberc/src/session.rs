//! One compilation: sources, names, declarations and outputs.

use crate::loader::ModuleLoader;
use crate::options::CompileOptions;
use ember_diagnostic::emitter::{render_error, render_issues};
use ember_diagnostic::{CompileError, Issues};
use ember_emit::{Output, Program};
use ember_ir::ast::{ItemKind, UseDecl};
use ember_ir::{SourceMap, StringInterner};
use ember_parse::parse_source;
use ember_types::Target;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

/// Why a compilation stopped. Carries the sources so it can be rendered.
#[derive(Debug, Error)]
pub enum CompileFailure {
    #[error("{} syntax issue{}", issues.len(), if issues.len() == 1 { "" } else { "s" })]
    Parse { issues: Issues, sources: SourceMap },
    #[error("{error}")]
    Error { error: CompileError, sources: SourceMap },
}

impl CompileFailure {
    /// Terminal rendering without color.
    pub fn render(&self, options: &CompileOptions) -> String {
        match self {
            CompileFailure::Parse { issues, sources } => render_issues(sources, issues, options.diagnostic_config()),
            CompileFailure::Error { error, sources } => render_error(sources, error),
        }
    }

    pub fn sources(&self) -> &SourceMap {
        match self {
            CompileFailure::Parse { sources, .. } | CompileFailure::Error { sources, .. } => sources,
        }
    }
}

/// Internal stop reason; sources are attached when the session ends.
enum Stop {
    Parse(Issues),
    Error(CompileError),
}

impl From<CompileError> for Stop {
    fn from(err: CompileError) -> Self {
        Stop::Error(err)
    }
}

/// The result of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compiled {
    outputs: Vec<(Target, Output)>,
    signatures: Vec<String>,
    glsl_header: bool,
}

impl Compiled {
    /// Full text for `target`, or `None` if it was not requested.
    pub fn render(&self, target: Target) -> Option<String> {
        self.output(target).map(|out| out.render(target, self.glsl_header))
    }

    pub fn output(&self, target: Target) -> Option<&Output> {
        self.outputs.iter().find(|(t, _)| *t == target).map(|(_, out)| out)
    }

    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.outputs.iter().map(|(t, _)| *t)
    }

    /// `fn name(a: T) -> R` of every declared function.
    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }
}

/// Owns everything one compilation accumulates. Units are processed in
/// order, each item declared and emitted exactly once.
pub struct Session {
    options: CompileOptions,
    sources: SourceMap,
    interner: StringInterner,
    program: Program,
    loaded: FxHashSet<String>,
    /// Units whose items are being processed, innermost last.
    active: Vec<String>,
}

impl Session {
    pub fn new(options: CompileOptions) -> Result<Self, CompileError> {
        let interner = StringInterner::new();
        let program = Program::new(&interner)?;
        Ok(Session {
            options,
            sources: SourceMap::new(),
            interner,
            program,
            loaded: FxHashSet::default(),
            active: Vec::new(),
        })
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Compile the root unit and everything it uses.
    #[tracing::instrument(level = "debug", skip_all, fields(unit = name))]
    pub fn compile(mut self, name: &str, source: &str, loader: &mut dyn ModuleLoader) -> Result<Compiled, CompileFailure> {
        match self.unit(name, source, loader) {
            Ok(()) => Ok(self.finish()),
            Err(Stop::Parse(issues)) => Err(CompileFailure::Parse {
                issues,
                sources: self.sources,
            }),
            Err(Stop::Error(error)) => Err(CompileFailure::Error {
                error,
                sources: self.sources,
            }),
        }
    }

    fn finish(self) -> Compiled {
        let outputs = self
            .options
            .targets
            .iter()
            .map(|&t| (t, self.program.output(t).clone()))
            .collect();
        Compiled {
            outputs,
            signatures: self.program.signatures(),
            glsl_header: self.options.glsl_header,
        }
    }

    fn unit(&mut self, name: &str, source: &str, loader: &mut dyn ModuleLoader) -> Result<(), Stop> {
        let chunk = self.sources.add(name, source);
        let mut issues = Issues::new();
        let script = parse_source(source, chunk, &self.interner, &mut issues);
        if !issues.is_ok() {
            return Err(Stop::Parse(issues));
        }

        self.active.push(name.to_owned());
        for item in &script.items {
            match &item.kind {
                ItemKind::Use(decl) => self.use_unit(decl, loader)?,
                _ => self.program.item(&self.interner, item, &self.options.targets)?,
            }
        }
        self.active.pop();
        self.loaded.insert(name.to_owned());
        debug!(unit = name, items = script.items.len(), "unit done");
        Ok(())
    }

    fn use_unit(&mut self, decl: &UseDecl, loader: &mut dyn ModuleLoader) -> Result<(), Stop> {
        let name = decl.name.as_str();
        if self.active.iter().any(|n| n == name) {
            return Err(CompileError::issue(format!("cyclic use of `{name}`")).at(decl.name_span).into());
        }
        if self.loaded.contains(name) {
            debug!(unit = name, "already loaded");
            return Ok(());
        }
        let source = loader
            .load(name)
            .map_err(|err| CompileError::from(err).at(decl.name_span))?;
        self.unit(name, &source, loader)
    }
}

/// Compile `source` (named `name`) with the given options.
pub fn compile(
    name: &str,
    source: &str,
    loader: &mut dyn ModuleLoader,
    options: CompileOptions,
) -> Result<Compiled, CompileFailure> {
    let session = Session::new(options).map_err(|error| CompileFailure::Error {
        error,
        sources: SourceMap::new(),
    })?;
    session.compile(name, source, loader)
}
