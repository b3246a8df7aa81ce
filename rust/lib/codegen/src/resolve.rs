//! Target-language type resolution.
//!
//! One algorithm shared by every emitter, parameterized on the target.
//! Resolution is total: dangling references and malformed payloads come
//! back as the target's dynamic fallback, never as an error, so a
//! partially-specified schema still compiles end to end.

use std::collections::BTreeSet;

use crate::model::{FieldType, Primitive};

/// A target language the compiler can resolve types for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    TypeScript,
    Go,
}

/// Resolve a field type into a type expression for `target`. `known` is
/// the set of declared schema names; a reference outside it falls back to
/// the dynamic type.
pub fn resolve(ty: &FieldType, known: &BTreeSet<String>, target: Target) -> String {
    match ty {
        FieldType::Primitive(p) => primitive(*p, target).to_string(),
        FieldType::Reference(name) => {
            if known.contains(name) {
                name.clone()
            } else {
                fallback(target).to_string()
            }
        }
        FieldType::Array(elem) => {
            let inner = resolve(elem, known, target);
            match target {
                Target::TypeScript => format!("{}[]", inner),
                Target::Go => format!("[]{}", inner),
            }
        }
        FieldType::Unknown => fallback(target).to_string(),
    }
}

/// The target's dynamic/unknown-type fallback.
pub fn fallback(target: Target) -> &'static str {
    match target {
        Target::TypeScript => "any",
        Target::Go => "interface{}",
    }
}

fn primitive(p: Primitive, target: Target) -> &'static str {
    match (p, target) {
        (Primitive::String, _) => "string",
        (Primitive::Number, Target::TypeScript) => "number",
        (Primitive::Number, Target::Go) => "float64",
        (Primitive::Boolean, Target::TypeScript) => "boolean",
        (Primitive::Boolean, Target::Go) => "bool",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn known(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn primitives_per_target() {
        let k = known(&[]);
        let ty = FieldType::Primitive(Primitive::Number);
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "number");
        assert_eq!(resolve(&ty, &k, Target::Go), "float64");

        let ty = FieldType::Primitive(Primitive::Boolean);
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "boolean");
        assert_eq!(resolve(&ty, &k, Target::Go), "bool");
    }

    #[test]
    fn known_reference_is_nominal() {
        let k = known(&["Widget"]);
        let ty = FieldType::Reference("Widget".to_string());
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "Widget");
        assert_eq!(resolve(&ty, &k, Target::Go), "Widget");
    }

    #[test]
    fn dangling_reference_falls_back() {
        let k = known(&["Widget"]);
        let ty = FieldType::Reference("Gadget".to_string());
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "any");
        assert_eq!(resolve(&ty, &k, Target::Go), "interface{}");
    }

    #[test]
    fn primitive_keyword_in_reference_position() {
        // Schema authors may write bare primitive names where a schema
        // name is expected.
        let k = known(&[]);
        assert_eq!(resolve(&FieldType::named("string"), &k, Target::Go), "string");
        assert_eq!(
            resolve(&FieldType::named("number"), &k, Target::TypeScript),
            "number"
        );
    }

    #[test]
    fn arrays_wrap_the_element_type() {
        let k = known(&["Widget"]);
        let ty = FieldType::Array(Box::new(FieldType::Primitive(Primitive::String)));
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "string[]");
        assert_eq!(resolve(&ty, &k, Target::Go), "[]string");

        let ty = FieldType::Array(Box::new(FieldType::Reference("Widget".to_string())));
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "Widget[]");
        assert_eq!(resolve(&ty, &k, Target::Go), "[]Widget");
    }

    #[test]
    fn nested_arrays_resolve_recursively() {
        let k = known(&[]);
        let ty = FieldType::Array(Box::new(FieldType::Array(Box::new(
            FieldType::Primitive(Primitive::Number),
        ))));
        assert_eq!(resolve(&ty, &k, Target::TypeScript), "number[][]");
        assert_eq!(resolve(&ty, &k, Target::Go), "[][]float64");
    }

    #[test]
    fn totality_over_malformed_payloads() {
        let k = known(&[]);
        for payload in [json!(7), json!(null), json!([1]), json!({"type": "maybe"})] {
            let ty = FieldType::from_value(&payload);
            assert_eq!(resolve(&ty, &k, Target::TypeScript), "any");
            assert_eq!(resolve(&ty, &k, Target::Go), "interface{}");
        }
    }
}
