//! Per-target output of a compilation.

use ember_types::Target;

/// Backend text accumulated for one target, in emission order.
#[derive(Default, Debug, Clone)]
pub struct Output {
    /// GLSL `struct` declarations.
    pub structs: Vec<String>,
    /// GLSL `uniform` declarations for `param`s.
    pub uniforms: Vec<String>,
    /// Function definitions. Callees always precede their callers.
    pub functions: Vec<String>,
    /// Top-level statements (runtime asserts on JavaScript).
    pub main: Vec<String>,
}

/// Header lines of a standalone GLSL ES 3.00 fragment.
pub const GLSL_HEADER: &str = "#version 300 es\nprecision highp float;\nprecision highp int;";

impl Output {
    /// Join everything into one source text.
    pub fn render(&self, target: Target, header: bool) -> String {
        let mut sections: Vec<String> = Vec::new();
        if header && target == Target::Glsl {
            sections.push(GLSL_HEADER.to_owned());
        }
        if !self.uniforms.is_empty() {
            sections.push(self.uniforms.join("\n"));
        }
        sections.extend(self.structs.iter().cloned());
        sections.extend(self.functions.iter().cloned());
        if !self.main.is_empty() {
            sections.push(self.main.join("\n"));
        }
        let mut out = sections.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.uniforms.is_empty() && self.functions.is_empty() && self.main.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_sections() {
        let out = Output {
            structs: vec!["struct _S1 {\n  float _0;\n  int _1;\n};".into()],
            uniforms: vec!["uniform float u_t;".into()],
            functions: vec!["float f_2() {\n  return 1.0;\n}".into()],
            main: vec![],
        };
        assert_eq!(
            out.render(Target::Glsl, true),
            "#version 300 es\nprecision highp float;\nprecision highp int;\n\nuniform float u_t;\n\n\
             struct _S1 {\n  float _0;\n  int _1;\n};\n\nfloat f_2() {\n  return 1.0;\n}\n"
        );
        assert_eq!(Output::default().render(Target::Js, true), "");
    }
}
