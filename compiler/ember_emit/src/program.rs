use crate::prelude::{self, Builtins};
use crate::{Declarations, Emitter, Output};
use ember_diagnostic::CompileResult;
use ember_ir::StringInterner;
use ember_types::{IdGenerator, Target};
use std::rc::Rc;

/// Everything one compilation accumulates: fresh-name counter,
/// declarations (a child of the prelude) and the text of every target.
pub struct Program {
    pub ids: IdGenerator,
    pub decls: Declarations,
    pub builtins: Rc<Builtins>,
    outputs: [Output; 2],
}

impl Program {
    pub fn new(interner: &StringInterner) -> CompileResult<Self> {
        let mut ids = IdGenerator::new();
        let (prelude, builtins) = prelude::build(&mut ids, interner)?;
        Ok(Program {
            ids,
            decls: Declarations::child(Rc::new(prelude)),
            builtins: Rc::new(builtins),
            outputs: [Output::default(), Output::default()],
        })
    }

    pub fn emitter<'a>(&'a mut self, target: Target, interner: &'a StringInterner) -> Emitter<'a> {
        Emitter::new(target, interner, self)
    }

    #[inline]
    pub fn output(&self, target: Target) -> &Output {
        &self.outputs[target.index()]
    }

    #[inline]
    pub fn output_mut(&mut self, target: Target) -> &mut Output {
        &mut self.outputs[target.index()]
    }

    /// `fn name(a: T) -> R` for every function declared by the program,
    /// in declaration order.
    pub fn signatures(&self) -> Vec<String> {
        self.decls.declared().iter().map(|f| f.signature()).collect()
    }
}
