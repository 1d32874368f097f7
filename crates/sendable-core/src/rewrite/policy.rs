//! Per-declaration decision policy

use std::fmt;

use crate::cst::ast::{Decl, DeclKind};

/// Decides which declarations a pass edits
///
/// Every method defaults to `false`, so a policy only names the kinds it
/// cares about. Declarations a policy declines are still walked into.
pub trait DeclPolicy: Send + Sync + fmt::Debug {
    fn struct_decl(&self, _decl: &Decl) -> bool {
        false
    }

    fn enum_decl(&self, _decl: &Decl) -> bool {
        false
    }

    fn class_decl(&self, _decl: &Decl) -> bool {
        false
    }

    fn actor_decl(&self, _decl: &Decl) -> bool {
        false
    }

    fn protocol_decl(&self, _decl: &Decl) -> bool {
        false
    }

    fn extension_decl(&self, _decl: &Decl) -> bool {
        false
    }

    fn function_decl(&self, _decl: &Decl) -> bool {
        false
    }
}

/// Ask `policy` about `decl`
pub fn should_apply(policy: &dyn DeclPolicy, decl: &Decl) -> bool {
    match decl.kind() {
        DeclKind::Struct => policy.struct_decl(decl),
        DeclKind::Enum => policy.enum_decl(decl),
        DeclKind::Class => policy.class_decl(decl),
        DeclKind::Actor => policy.actor_decl(decl),
        DeclKind::Protocol => policy.protocol_decl(decl),
        DeclKind::Extension => policy.extension_decl(decl),
        DeclKind::Function => policy.function_decl(decl),
    }
}

/// Whether `decl` carries one of the `visibility` modifiers
pub fn has_visibility(decl: &Decl, visibility: &[String]) -> bool {
    visibility.iter().any(|v| decl.has_modifier(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_swift;

    #[derive(Debug)]
    struct ClassesOnly;

    impl DeclPolicy for ClassesOnly {
        fn class_decl(&self, _decl: &Decl) -> bool {
            true
        }
    }

    #[test]
    fn test_unlisted_kinds_are_declined() {
        let (tree, _) = parse_swift("class A {}\nstruct B {}\nactor C {}\nfunc d() {}\n");
        let answers: Vec<_> = tree
            .source_file()
            .unwrap()
            .decls()
            .map(|d| should_apply(&ClassesOnly, &d))
            .collect();
        assert_eq!(answers, vec![true, false, false, false]);
    }

    #[test]
    fn test_visibility() {
        let (tree, _) = parse_swift("open class A {}\nclass B {}\n");
        let visibility = vec!["public".to_string(), "open".to_string()];
        let answers: Vec<_> = tree
            .source_file()
            .unwrap()
            .decls()
            .map(|d| has_visibility(&d, &visibility))
            .collect();
        assert_eq!(answers, vec![true, false]);
    }
}
