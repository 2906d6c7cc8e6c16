/// Source of fresh identifiers for one compilation.
///
/// Struct ids, group ids, temporaries and backend names all draw from the
/// same counter, so every minted name is unique within the compilation.
#[derive(Debug)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator { next: 1 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// `stem_N`, with characters a backend cannot use in names replaced.
    pub fn fresh(&mut self, stem: &str) -> String {
        let id = self.next_id();
        let mut name: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            name.insert(0, '_');
        }
        format!("{name}_{id}")
    }

    /// Fresh temporary: `_tN`.
    pub fn temp(&mut self) -> String {
        format!("_t{}", self.next_id())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_are_unique_and_sanitized() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.fresh("area"), "area_1");
        assert_eq!(ids.temp(), "_t2");
        assert_eq!(ids.fresh(":sym"), "_sym_3");
        assert_eq!(ids.fresh(""), "__4");
        assert_eq!(ids.fresh("9lives"), "_9lives_5");
        assert_eq!(ids.next_id(), 6);
    }
}
