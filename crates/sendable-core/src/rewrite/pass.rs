//! A policy paired with the edit it triggers

use std::sync::Arc;

use super::edit::{Edit, Marker};
use super::policies::{
    AttributePolicy, FinalModifierPolicy, ImmutableClassPolicy, PlainMarkerPolicy,
    UncheckedMarkerPolicy, UncheckedScope,
};
use super::policy::DeclPolicy;
use super::walker::Walker;
use crate::cst::SyntaxTree;
use crate::cst::ast::DeclKind;
use crate::result::Result;

/// Tree produced by a pass or pipeline, with the number of edited declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub tree: SyntaxTree,
    pub edits: usize,
}

impl RewriteOutcome {
    pub fn changed(&self) -> bool {
        self.edits > 0
    }
}

/// One tree-to-tree transformation
#[derive(Debug, Clone)]
pub struct Pass {
    name: String,
    policy: Arc<dyn DeclPolicy>,
    edit: Edit,
}

impl Pass {
    pub fn new(name: impl Into<String>, policy: impl DeclPolicy + 'static, edit: Edit) -> Self {
        Self {
            name: name.into(),
            policy: Arc::new(policy),
            edit,
        }
    }

    /// `@attribute Marker` on classes with mutable stored state
    pub fn unchecked_marker(marker: &str, attribute: &str) -> Self {
        Self::new(
            "unchecked",
            UncheckedMarkerPolicy::new(UncheckedScope::MutableState),
            Edit::InheritType(Marker::unchecked(marker, attribute)),
        )
    }

    /// `@attribute Marker` on every class
    pub fn unchecked_all_classes(marker: &str, attribute: &str) -> Self {
        Self::new(
            "unchecked",
            UncheckedMarkerPolicy::new(UncheckedScope::AllClasses),
            Edit::InheritType(Marker::unchecked(marker, attribute)),
        )
    }

    /// `Marker` on value types with one of the `visibility` modifiers
    pub fn plain_marker(marker: &str, visibility: Vec<String>, protocols: bool) -> Self {
        Self::new(
            "marker",
            PlainMarkerPolicy::new(visibility, protocols),
            Edit::InheritType(Marker::plain(marker)),
        )
    }

    /// `Marker` on classes without mutable stored state
    pub fn immutable_classes(marker: &str) -> Self {
        Self::new(
            "immutable-classes",
            ImmutableClassPolicy,
            Edit::InheritType(Marker::plain(marker)),
        )
    }

    /// `keyword` on classes that carry the plain `marker`
    pub fn final_modifier(marker: &str, keyword: &str) -> Self {
        Self::new(
            "final",
            FinalModifierPolicy::new(marker),
            Edit::AddModifier(keyword.to_string()),
        )
    }

    /// `@name` on declarations of the given kinds
    pub fn attribute(name: &str, kinds: Vec<DeclKind>, visibility: Option<Vec<String>>) -> Self {
        Self::new(
            "attribute",
            AttributePolicy::new(kinds, visibility),
            Edit::AddAttribute(name.to_string()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &dyn DeclPolicy {
        self.policy.as_ref()
    }

    pub fn edit(&self) -> &Edit {
        &self.edit
    }

    /// Run the pass over a whole tree
    ///
    /// Untouched subtrees are shared with the input.
    pub fn run(&self, tree: &SyntaxTree) -> Result<RewriteOutcome> {
        let mut walker = Walker::new(&self.name, self.policy.as_ref(), &self.edit);
        let tree = match walker.rewrite_items(tree.green())? {
            Some(green) => SyntaxTree::new(green),
            None => tree.clone(),
        };
        Ok(RewriteOutcome {
            tree,
            edits: walker.edits(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_swift;

    fn run(pass: &Pass, source: &str) -> RewriteOutcome {
        let (tree, errors) = parse_swift(source);
        assert!(errors.is_empty(), "{errors:?}");
        pass.run(&tree).unwrap()
    }

    #[test]
    fn test_unchanged_tree_is_shared() {
        let (tree, _) = parse_swift("struct Internal {}\n");
        let outcome = Pass::plain_marker("Sendable", vec!["public".into()], false)
            .run(&tree)
            .unwrap();
        assert!(!outcome.changed());
        assert_eq!(outcome.tree, tree);
    }

    #[test]
    fn test_unchecked_pass_variants() {
        let source = "class Counter {\n    var count = 0\n}\nclass Constant {\n    let value = 1\n}\n";
        let outcome = run(&Pass::unchecked_marker("Sendable", "unchecked"), source);
        assert_eq!(
            outcome.tree.print(),
            "class Counter: @unchecked Sendable {\n    var count = 0\n}\nclass Constant {\n    let value = 1\n}\n"
        );
        let outcome = run(&Pass::unchecked_all_classes("Sendable", "unchecked"), source);
        assert_eq!(outcome.edits, 2);
    }

    #[test]
    fn test_final_pass() {
        let outcome = run(
            &Pass::final_modifier("Sendable", "final"),
            "public class Obj: Sendable {}\n",
        );
        assert_eq!(outcome.tree.print(), "public final class Obj: Sendable {}\n");
    }

    #[test]
    fn test_accessors() {
        let pass = Pass::immutable_classes("Sendable");
        assert_eq!(pass.name(), "immutable-classes");
        assert_eq!(pass.edit(), &Edit::InheritType(Marker::plain("Sendable")));
        assert!(format!("{:?}", pass.policy()).contains("ImmutableClassPolicy"));
    }
}
