//! The Ember compiler driver.
//!
//! A [`Session`] lexes and parses each unit, resolves `use` through a
//! [`ModuleLoader`], and hands every item to the emitter for each
//! requested target. [`compile`] is the one-call entry point.

mod loader;
mod logging;
mod options;
mod session;

pub use loader::{FsLoader, LoadError, MemoryLoader, ModuleLoader};
pub use logging::init_tracing;
pub use options::{CompileOptions, OptionError};
pub use session::{compile, CompileFailure, Compiled, Session};
