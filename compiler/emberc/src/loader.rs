//! Sources for `use "name";`.

use ember_diagnostic::CompileError;
use rustc_hash::FxHashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no module named `{0}`")]
    NotFound(String),
    #[error("cannot read module `{name}` from {}: {source}", path.display())]
    Io {
        name: String,
        path: PathBuf,
        source: io::Error,
    },
}

impl From<LoadError> for CompileError {
    fn from(err: LoadError) -> Self {
        CompileError::issue(err.to_string())
    }
}

/// Resolves module names to source text.
pub trait ModuleLoader {
    fn load(&mut self, name: &str) -> Result<String, LoadError>;
}

/// Modules held in memory, for tests and embedding.
#[derive(Default, Debug, Clone)]
pub struct MemoryLoader {
    modules: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.modules.insert(name.into(), source.into());
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&mut self, name: &str) -> Result<String, LoadError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_owned()))
    }
}

/// Reads `<root>/<name>.ember`.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsLoader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.ember"))
    }
}

impl ModuleLoader for FsLoader {
    fn load(&mut self, name: &str) -> Result<String, LoadError> {
        let path = self.path_of(name);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(name.to_owned()),
            _ => LoadError::Io {
                name: name.to_owned(),
                path,
                source,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_loader_finds_inserted_modules() {
        let mut loader = MemoryLoader::new().with("shapes", "const N = 1;");
        assert_eq!(loader.load("shapes").unwrap(), "const N = 1;");
        let err = loader.load("colors").unwrap_err();
        assert_eq!(err.to_string(), "no module named `colors`");
        assert_eq!(CompileError::from(err).message, "no module named `colors`");
    }

    #[test]
    fn fs_loader_appends_the_extension() {
        let loader = FsLoader::new("lib");
        assert_eq!(loader.path_of("noise"), Path::new("lib").join("noise.ember"));
        let mut loader = FsLoader::new(std::env::temp_dir().join("ember-no-such-dir"));
        assert!(matches!(loader.load("noise"), Err(LoadError::NotFound(name)) if name == "noise"));
    }
}
