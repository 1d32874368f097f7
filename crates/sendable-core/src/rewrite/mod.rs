//! Policy-driven declaration rewriting
//!
//! A [`Pass`] pairs a [`DeclPolicy`] with an [`Edit`]. Running it walks the
//! tree bottom-up, asks the policy about every declaration and applies the
//! edit where the policy agrees. A [`Pipeline`] chains passes.
//!
//! Edits never mutate the input: each one builds a new green node for the
//! edited declaration and its ancestors, sharing everything else.

mod attribute;
mod clause;
mod modifier;
mod walker;

pub mod edit;
pub mod pass;
pub mod pipeline;
pub mod policies;
pub mod policy;

use rowan::{GreenNodeData, NodeOrToken};

use crate::cst::SwiftSyntaxKind;
use crate::cst::trivia::{GreenElement, to_owned_element};

pub use edit::{Edit, Marker, ShapeError};
pub use pass::{Pass, RewriteOutcome};
pub use pipeline::Pipeline;
pub use policies::{
    AttributePolicy, FinalModifierPolicy, ImmutableClassPolicy, PlainMarkerPolicy,
    UncheckedMarkerPolicy, UncheckedScope, has_mutable_stored_state,
};
pub use policy::{DeclPolicy, has_visibility, should_apply};

fn owned_children(node: &GreenNodeData) -> Vec<GreenElement> {
    node.children().map(to_owned_element).collect()
}

/// First child node of `kind`, with its index among all children
fn find_child_node(
    node: &GreenNodeData,
    kind: SwiftSyntaxKind,
) -> Option<(usize, &GreenNodeData)> {
    node.children().enumerate().find_map(|(index, child)| match child {
        NodeOrToken::Node(child) if child.kind() == kind.into() => Some((index, child)),
        _ => None,
    })
}
