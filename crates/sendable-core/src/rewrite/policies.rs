//! Built-in policies

use super::policy::{DeclPolicy, has_visibility};
use crate::cst::ast::{Decl, DeclKind};

fn default_visibility() -> Vec<String> {
    vec!["public".to_string(), "open".to_string()]
}

/// A `var` member whose first binding is stored rather than computed
///
/// Type-level storage counts as well, and so does a `var` declared inside a
/// `#if` block: it is stored state in every build where the condition holds.
pub fn has_mutable_stored_state(decl: &Decl) -> bool {
    decl.variables().iter().any(|var| {
        var.is_var()
            && var
                .bindings()
                .next()
                .is_some_and(|binding| !binding.has_accessor())
    })
}

/// Plain marker on public value types
///
/// With `protocols` set, eligible protocols get the marker too. For a
/// protocol the entry is a requirement on conforming types, not a conformance
/// of the protocol itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainMarkerPolicy {
    pub visibility: Vec<String>,
    pub protocols: bool,
}

impl Default for PlainMarkerPolicy {
    fn default() -> Self {
        Self {
            visibility: default_visibility(),
            protocols: false,
        }
    }
}

impl PlainMarkerPolicy {
    pub fn new(visibility: Vec<String>, protocols: bool) -> Self {
        Self {
            visibility,
            protocols,
        }
    }
}

impl DeclPolicy for PlainMarkerPolicy {
    fn struct_decl(&self, decl: &Decl) -> bool {
        has_visibility(decl, &self.visibility)
    }

    fn enum_decl(&self, decl: &Decl) -> bool {
        has_visibility(decl, &self.visibility)
    }

    fn protocol_decl(&self, decl: &Decl) -> bool {
        self.protocols && has_visibility(decl, &self.visibility)
    }
}

/// Which classes get the unchecked marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UncheckedScope {
    /// Classes with a stored `var`
    #[default]
    MutableState,
    /// Every class
    AllClasses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UncheckedMarkerPolicy {
    pub scope: UncheckedScope,
}

impl UncheckedMarkerPolicy {
    pub fn new(scope: UncheckedScope) -> Self {
        Self { scope }
    }
}

impl DeclPolicy for UncheckedMarkerPolicy {
    fn class_decl(&self, decl: &Decl) -> bool {
        match self.scope {
            UncheckedScope::MutableState => has_mutable_stored_state(decl),
            UncheckedScope::AllClasses => true,
        }
    }
}

/// `final` on classes that carry the plain marker
///
/// An `@unchecked` entry does not count. `open` classes are left alone since
/// they exist to be subclassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalModifierPolicy {
    pub marker: String,
}

impl FinalModifierPolicy {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl DeclPolicy for FinalModifierPolicy {
    fn class_decl(&self, decl: &Decl) -> bool {
        if decl.has_modifier("open") {
            return false;
        }
        decl.inheritance_clause().is_some_and(|clause| {
            clause.entries().any(|entry| {
                entry.type_ref().is_some_and(|ty| {
                    !ty.is_attributed() && ty.base_name().as_deref() == Some(self.marker.as_str())
                })
            })
        })
    }
}

/// Plain marker on classes without mutable stored state, at any visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImmutableClassPolicy;

impl DeclPolicy for ImmutableClassPolicy {
    fn class_decl(&self, decl: &Decl) -> bool {
        !decl.has_modifier("open") && !has_mutable_stored_state(decl)
    }
}

/// Declarations of the listed kinds, optionally filtered by visibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePolicy {
    pub kinds: Vec<DeclKind>,
    pub visibility: Option<Vec<String>>,
}

impl AttributePolicy {
    pub fn new(kinds: Vec<DeclKind>, visibility: Option<Vec<String>>) -> Self {
        Self { kinds, visibility }
    }

    fn applies(&self, decl: &Decl) -> bool {
        self.kinds.contains(&decl.kind())
            && self
                .visibility
                .as_deref()
                .is_none_or(|visibility| has_visibility(decl, visibility))
    }
}

impl DeclPolicy for AttributePolicy {
    fn struct_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }

    fn enum_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }

    fn class_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }

    fn actor_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }

    fn protocol_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }

    fn extension_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }

    fn function_decl(&self, decl: &Decl) -> bool {
        self.applies(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_swift;
    use crate::rewrite::policy::should_apply;

    fn answers(policy: &dyn DeclPolicy, source: &str) -> Vec<bool> {
        let (tree, errors) = parse_swift(source);
        assert!(errors.is_empty(), "{errors:?}");
        tree.source_file()
            .unwrap()
            .decls()
            .map(|d| should_apply(policy, &d))
            .collect()
    }

    #[test]
    fn test_plain_marker_policy() {
        let source = "public struct A {}\nstruct B {}\nopen class C {}\npublic enum D {}\npublic protocol E {}\npublic actor F {}\n";
        assert_eq!(
            answers(&PlainMarkerPolicy::default(), source),
            vec![true, false, false, true, false, false]
        );
        assert_eq!(
            answers(&PlainMarkerPolicy::new(default_visibility(), true), source),
            vec![true, false, false, true, true, false]
        );
    }

    #[test]
    fn test_unchecked_policy_looks_for_stored_vars() {
        let source = r#"class Stored {
    var count = 0
}
class Computed {
    var count: Int { 0 }
}
class Constant {
    let count = 0
}
class Shared {
    static var count = 0
}
class Nested {
    struct Inner {
        var count = 0
    }
}
"#;
        assert_eq!(
            answers(&UncheckedMarkerPolicy::default(), source),
            vec![true, false, false, true, false]
        );
        assert_eq!(
            answers(&UncheckedMarkerPolicy::new(UncheckedScope::AllClasses), source),
            vec![true; 5]
        );
    }

    #[test]
    fn test_conditional_stored_var_counts_as_mutable() {
        let source = "class Debug {\n#if DEBUG\n    var hits = 0\n#endif\n}\nclass Release {\n#if DEBUG\n    let hits = 0\n#endif\n}\n";
        assert_eq!(
            answers(&UncheckedMarkerPolicy::default(), source),
            vec![true, false]
        );
        assert_eq!(answers(&ImmutableClassPolicy, source), vec![false, true]);
    }

    #[test]
    fn test_final_policy_needs_bare_marker() {
        let source = "class A: Sendable {}\nclass B: @unchecked Sendable {}\nopen class C: Sendable {}\nclass D {}\nstruct E: Sendable {}\n";
        assert_eq!(
            answers(&FinalModifierPolicy::new("Sendable"), source),
            vec![true, false, false, false, false]
        );
    }

    #[test]
    fn test_immutable_class_policy() {
        let source = "class A { let a = 1 }\nclass B { var b = 1 }\nopen class C {}\nclass D {}\n";
        assert_eq!(
            answers(&ImmutableClassPolicy, source),
            vec![true, false, false, true]
        );
    }

    #[test]
    fn test_attribute_policy() {
        let policy = AttributePolicy::new(
            vec![DeclKind::Class, DeclKind::Function],
            Some(vec!["public".to_string()]),
        );
        assert_eq!(
            answers(&policy, "public class A {}\nclass B {}\npublic func c() {}\npublic struct D {}\n"),
            vec![true, false, true, false]
        );
        let any_visibility = AttributePolicy::new(vec![DeclKind::Struct], None);
        assert_eq!(
            answers(&any_visibility, "struct A {}\nclass B {}\n"),
            vec![true, false]
        );
    }
}
