//! Sendable Core
//!
//! Lossless, policy-driven rewriting of Swift declarations. The engine parses
//! a source unit into a tree that keeps every byte, walks the declarations
//! bottom-up, and adds `Sendable`, `@unchecked Sendable`, `final` or an
//! attribute wherever a pass's policy asks for it. Untouched code prints back
//! byte for byte.
//!
//! ```rust
//! use sendable_core::{Pipeline, parse, print, rewrite};
//!
//! let (tree, errors) = parse("public struct Point {\n    var x = 0\n}\n");
//! assert!(errors.is_empty());
//!
//! let tree = rewrite(&tree, &Pipeline::auto_sendable()).unwrap();
//! assert_eq!(print(&tree), "public struct Point: Sendable {\n    var x = 0\n}\n");
//! ```

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diff;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod result;
pub mod rewrite;

pub use config::{
    CONFIG_FILE_NAMES, ConfigLoader, FilesConfiguration, PassKind, RewriteConfiguration,
    SendableConfiguration,
};
pub use cst::ast::DeclKind;
pub use cst::{RoundTripValidator, SyntaxError, SyntaxTree};
pub use diff::{generate_unified_diff, generate_unified_diff_plain};
pub use discovery::list_source_files;
pub use driver::{Driver, FileOutcome, FileReport, Mode, RunSummary, read_source, write_atomic};
pub use error::{ErrorKind, SendableError};
pub use result::Result;
pub use rewrite::{
    DeclPolicy, Edit, Marker, Pass, Pipeline, RewriteOutcome, ShapeError, should_apply,
};

/// Parse Swift source into a lossless tree
///
/// Never fails; syntax errors are returned next to the tree.
pub fn parse(source: &str) -> (SyntaxTree, Vec<SyntaxError>) {
    cst::parse_swift(source)
}

/// Source text of a tree
pub fn print(tree: &SyntaxTree) -> String {
    tree.print()
}

/// Run every pass of `pipeline` over `tree`
pub fn rewrite(tree: &SyntaxTree, pipeline: &Pipeline) -> Result<SyntaxTree> {
    pipeline.rewrite(tree)
}

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` wins over `default_directive`.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
