//! Thin wrapper over Rowan's green node builder

use rowan::{GreenNode, GreenNodeBuilder};

use super::SwiftSyntaxKind;

/// Builder the parser drives while walking the token stream
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: SwiftSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: SwiftSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    pub fn finish(self) -> GreenNode {
        self.inner.finish()
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
