//! Ordered passes over one source unit

use tracing::debug;

use super::pass::{Pass, RewriteOutcome};
use crate::config::{PassKind, RewriteConfiguration};
use crate::cst::ast::DeclKind;
use crate::cst::{SyntaxTree, parse_swift};
use crate::error::SendableError;
use crate::result::Result;

/// Passes applied in order, each to the output of the previous one
///
/// # Example
///
/// ```rust
/// use sendable_core::Pipeline;
///
/// let pipeline = Pipeline::auto_sendable();
/// let output = pipeline
///     .rewrite_source("public struct Point: Codable {\n    let x: Int\n}\n")
///     .unwrap();
/// assert_eq!(output, "public struct Point: Codable, Sendable {\n    let x: Int\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    passes: Vec<Pass>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pass(mut self, pass: Pass) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Unchecked marker, then plain marker, then `final`
    pub fn auto_sendable() -> Self {
        Self::from_config(&RewriteConfiguration::default())
    }

    /// `@unchecked Sendable` on every class
    pub fn unchecked_only() -> Self {
        let config = RewriteConfiguration::default();
        Self::new().with_pass(Pass::unchecked_all_classes(
            config.marker(),
            config.unchecked_attribute(),
        ))
    }

    /// Passes listed in `config.passes`, in that order
    pub fn from_config(config: &RewriteConfiguration) -> Self {
        let marker = config.marker();
        config
            .passes()
            .into_iter()
            .map(|kind| match kind {
                PassKind::Unchecked => {
                    Pass::unchecked_marker(marker, config.unchecked_attribute())
                }
                PassKind::Marker => {
                    Pass::plain_marker(marker, config.visibility(), config.protocols())
                }
                PassKind::ImmutableClasses => Pass::immutable_classes(marker),
                PassKind::Final => Pass::final_modifier(marker, config.final_modifier()),
            })
            .fold(Self::new(), Self::with_pass)
    }

    /// A single attribute pass
    pub fn attribute(name: &str, kinds: Vec<DeclKind>, visibility: Option<Vec<String>>) -> Self {
        Self::new().with_pass(Pass::attribute(name, kinds, visibility))
    }

    /// Run every pass, counting edited declarations
    pub fn run(&self, tree: &SyntaxTree) -> Result<RewriteOutcome> {
        let mut outcome = RewriteOutcome {
            tree: tree.clone(),
            edits: 0,
        };
        for pass in &self.passes {
            let step = pass.run(&outcome.tree)?;
            debug!("Pass '{}' edited {} declarations", pass.name(), step.edits);
            outcome.tree = step.tree;
            outcome.edits += step.edits;
        }
        Ok(outcome)
    }

    pub fn rewrite(&self, tree: &SyntaxTree) -> Result<SyntaxTree> {
        Ok(self.run(tree)?.tree)
    }

    /// Parse, rewrite and print
    ///
    /// Source with syntax errors is rejected rather than rewritten.
    pub fn rewrite_source(&self, source: &str) -> Result<String> {
        let (tree, errors) = parse_swift(source);
        if let Some(err) = SendableError::from_syntax_errors(&errors) {
            return Err(err);
        }
        Ok(self.rewrite(&tree)?.print())
    }
}
