//! Compile options and the command-line flags that set them.

use ember_diagnostic::emitter::DiagnosticConfig;
use ember_types::Target;
use thiserror::Error;

/// What a compilation produces and how failures are reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Backends to emit, in output order.
    pub targets: Vec<Target>,
    /// Issues rendered before the rest are summarised.
    pub error_limit: usize,
    /// Prefix GLSL output with the `#version`/`precision` header.
    pub glsl_header: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            targets: Target::ALL.to_vec(),
            error_limit: DiagnosticConfig::default().error_limit,
            glsl_header: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown target `{0}` (expected js, glsl or both)")]
    UnknownTarget(String),
    #[error("`--error-limit` needs a positive number, found `{0}`")]
    BadErrorLimit(String),
    #[error("unknown option `{0}`")]
    Unknown(String),
}

impl CompileOptions {
    /// Apply one `--flag`. Returns `Ok(false)` for arguments that are not
    /// flags at all.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, OptionError> {
        if !arg.starts_with("--") {
            return Ok(false);
        }
        if let Some(name) = arg.strip_prefix("--target=") {
            self.targets = match name {
                "both" => Target::ALL.to_vec(),
                _ => vec![Target::from_name(name).ok_or_else(|| OptionError::UnknownTarget(name.to_owned()))?],
            };
        } else if let Some(limit) = arg.strip_prefix("--error-limit=") {
            self.error_limit = match limit.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(OptionError::BadErrorLimit(limit.to_owned())),
            };
        } else if arg == "--no-header" {
            self.glsl_header = false;
        } else {
            return Err(OptionError::Unknown(arg.to_owned()));
        }
        Ok(true)
    }

    pub fn diagnostic_config(&self) -> DiagnosticConfig {
        DiagnosticConfig {
            error_limit: self.error_limit,
            ..DiagnosticConfig::default()
        }
    }
}
