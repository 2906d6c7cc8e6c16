//! Lexical scopes of the emitter.

use crate::Value;
use ember_ir::Name;
use ember_types::Type;
use rustc_hash::FxHashMap;

/// Emitted statements and local bindings of one lexical scope.
///
/// Lookups walk the enclosing blocks of the current [`Frame`] from the
/// innermost outwards, so a local shadows every outer binding of its name.
#[derive(Default, Debug)]
pub struct Block {
    pub lines: Vec<String>,
    locals: FxHashMap<Name, Value>,
}

impl Block {
    pub fn bind(&mut self, name: Name, value: Value) {
        self.locals.insert(name, value);
    }

    pub fn local(&self, name: Name) -> Option<&Value> {
        self.locals.get(&name)
    }
}

/// A loop that `break`/`continue` can target.
#[derive(Clone, Debug)]
pub(crate) struct LoopFrame {
    pub label: Option<Name>,
    /// Backend label, JavaScript only.
    pub backend: Option<String>,
}

/// Emission state of one function body (or of the top level).
#[derive(Default, Debug)]
pub(crate) struct Frame {
    pub blocks: Vec<Block>,
    pub loops: Vec<LoopFrame>,
    /// Type arguments of the template being instantiated.
    pub type_params: FxHashMap<Name, Type>,
}

impl Frame {
    pub fn new() -> Self {
        Frame {
            blocks: vec![Block::default()],
            ..Frame::default()
        }
    }

    pub fn lookup(&self, name: Name) -> Option<&Value> {
        self.blocks.iter().rev().find_map(|b| b.local(name))
    }
}

/// Indent `lines` one level into `out`.
pub(crate) fn indent_into(out: &mut Vec<String>, lines: Vec<String>) {
    out.extend(lines.into_iter().map(|line| format!("  {line}")));
}
