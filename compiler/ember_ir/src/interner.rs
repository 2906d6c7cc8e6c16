//! String interner for identifiers.
//!
//! Interned strings are leaked to `&'static str`, so lookups hand out plain
//! references without holding the lock. One interner lives for a whole
//! session (including every `use`d library), which bounds the leak.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct Inner {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Maps identifier text to [`Name`] handles and back.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl StringInterner {
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, Name::EMPTY);
        StringInterner {
            inner: RwLock::new(Inner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern `s`, returning the existing handle if already present.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.inner.read().map.get(s) {
            return name;
        }
        let mut guard = self.inner.write();
        if let Some(&name) = guard.map.get(s) {
            return name;
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(u32::try_from(guard.strings.len()).unwrap_or(u32::MAX));
        guard.strings.push(leaked);
        guard.map.insert(leaked, name);
        name
    }

    /// Look up a handle without interning.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.inner.read().map.get(s).copied()
    }

    /// Text of `name`. Handles from another interner resolve to `""`.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.inner
            .read()
            .strings
            .get(name.raw() as usize)
            .copied()
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
