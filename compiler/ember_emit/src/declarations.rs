//! The compile-time environment: types, overload sets, constants and
//! external parameters, chained to a parent scope.

use crate::{Candidate, Function, Value};
use ember_ir::Name;
use ember_types::Type;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Key of an anonymous `:sym { .. }` struct: symbol, field names, field types.
pub(crate) type AnonKey = (Name, Vec<Name>, Vec<Type>);

#[derive(Default)]
pub struct Declarations {
    parent: Option<Rc<Declarations>>,
    types: FxHashMap<Name, Type>,
    fns: FxHashMap<Name, Vec<Rc<Function>>>,
    consts: FxHashMap<Name, Value>,
    params: FxHashMap<Name, Type>,
    symbols: FxHashMap<Name, Type>,
    anon: FxHashMap<AnonKey, Type>,
    /// Functions declared in this scope, in declaration order.
    declared: Vec<Rc<Function>>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope whose lookups fall back to `parent`.
    pub fn child(parent: Rc<Declarations>) -> Self {
        Declarations {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<&Rc<Declarations>> {
        self.parent.as_ref()
    }

    fn chain(&self) -> impl Iterator<Item = &Declarations> {
        std::iter::successors(Some(self), |d| d.parent.as_deref())
    }

    /// The outermost scope (the prelude).
    pub fn root(&self) -> &Declarations {
        self.chain().last().unwrap_or(self)
    }

    // === Types ===

    pub fn ty(&self, name: Name) -> Option<&Type> {
        self.chain().find_map(|d| d.types.get(&name))
    }

    pub fn has_own_type(&self, name: Name) -> bool {
        self.types.contains_key(&name)
    }

    pub fn add_type(&mut self, name: Name, ty: Type) {
        self.types.insert(name, ty);
    }

    // === Functions ===

    pub fn add_fn(&mut self, name: Name, f: Rc<Function>) {
        self.declared.push(f.clone());
        self.fns.entry(name).or_default().push(f);
    }

    /// Every overload of `name`, innermost scope first, tagged with its
    /// scope depth.
    pub fn candidates(&self, name: Name) -> Vec<Candidate> {
        self.chain()
            .enumerate()
            .flat_map(|(depth, d)| {
                d.fns
                    .get(&name)
                    .into_iter()
                    .flatten()
                    .map(move |f| (depth, f.clone()))
            })
            .collect()
    }

    pub fn has_fn(&self, name: Name) -> bool {
        self.chain().any(|d| d.fns.contains_key(&name))
    }

    /// Functions declared directly in this scope.
    pub fn declared(&self) -> &[Rc<Function>] {
        &self.declared
    }

    // === Values ===

    pub fn constant(&self, name: Name) -> Option<&Value> {
        self.chain().find_map(|d| d.consts.get(&name))
    }

    pub fn add_const(&mut self, name: Name, value: Value) {
        self.consts.insert(name, value);
    }

    pub fn param(&self, name: Name) -> Option<&Type> {
        self.chain().find_map(|d| d.params.get(&name))
    }

    pub fn add_param(&mut self, name: Name, ty: Type) {
        self.params.insert(name, ty);
    }

    // === Derived struct types ===

    pub(crate) fn symbol(&self, name: Name) -> Option<&Type> {
        self.chain().find_map(|d| d.symbols.get(&name))
    }

    pub(crate) fn add_symbol(&mut self, name: Name, ty: Type) {
        self.symbols.insert(name, ty);
    }

    pub(crate) fn anon(&self, key: &AnonKey) -> Option<&Type> {
        self.chain().find_map(|d| d.anon.get(key))
    }

    pub(crate) fn add_anon(&mut self, key: AnonKey, ty: Type) {
        self.anon.insert(key, ty);
    }
}
