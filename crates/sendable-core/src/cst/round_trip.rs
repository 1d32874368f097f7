//! Lossless and idempotence checks for tree transformations
//!
//! Validates two properties every transformation of a Swift file must have:
//!
//! 1. `parse(source).print() == source`
//! 2. Running a transformation on its own output changes nothing
//!
//! # Example
//!
//! ```rust
//! use sendable_core::cst::RoundTripValidator;
//!
//! let validator = RoundTripValidator::new();
//! let result = validator.validate("struct A: Equatable {}\n");
//! assert!(result.is_valid());
//! ```

use super::{SyntaxTree, parse_swift};

/// Result of a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub original: String,
    /// Text after parsing and, for transformation checks, one application
    pub printed: String,
    pub differences: Vec<Difference>,
    /// Syntax errors reported for the original source
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Human readable list of what went wrong
    pub fn issues(&self) -> Vec<String> {
        let mut issues: Vec<String> = self
            .differences
            .iter()
            .map(|d| format!("{:?}: {}", d.kind, d.description))
            .collect();
        if !self.errors.is_empty() {
            issues.push(format!("source had {} syntax errors", self.errors.len()));
        }
        issues
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub kind: DifferenceKind,
    pub description: String,
    /// Byte offset of the first differing character
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceKind {
    /// Printing the parsed tree did not reproduce the source
    NotLossless,
    /// The output of a transformation does not parse to the same text
    ReparseMismatch,
    /// A second application changed the output again
    NotIdempotent,
}

#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    /// Treat syntax errors in the source as a failure
    pub reject_errors: bool,
}

impl RoundTripValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            reject_errors: true,
        }
    }

    /// Check that parsing and printing reproduces `source`
    pub fn validate(&self, source: &str) -> ValidationResult {
        let (tree, errors) = parse_swift(source);
        let printed = tree.print();
        let mut differences = Vec::new();
        if let Some(offset) = first_difference(source, &printed) {
            differences.push(Difference {
                kind: DifferenceKind::NotLossless,
                description: "printed tree differs from source".to_string(),
                offset,
            });
        }
        self.finish(source, printed, differences, errors.iter().map(|e| e.to_string()).collect())
    }

    /// Check a transformation for losslessness and idempotence
    ///
    /// `transform` is applied to the parsed source and then again to its own
    /// output; both outputs must agree and must reparse to themselves.
    pub fn validate_transform<F, E>(&self, source: &str, transform: F) -> Result<ValidationResult, E>
    where
        F: Fn(&SyntaxTree) -> Result<SyntaxTree, E>,
    {
        let (tree, errors) = parse_swift(source);
        let errors: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        let mut differences = Vec::new();

        if let Some(offset) = first_difference(source, &tree.print()) {
            differences.push(Difference {
                kind: DifferenceKind::NotLossless,
                description: "printed tree differs from source".to_string(),
                offset,
            });
        }

        let once = transform(&tree)?.print();
        let (reparsed, _) = parse_swift(&once);
        if let Some(offset) = first_difference(&once, &reparsed.print()) {
            differences.push(Difference {
                kind: DifferenceKind::ReparseMismatch,
                description: "transformed text does not reparse losslessly".to_string(),
                offset,
            });
        }

        let twice = transform(&reparsed)?.print();
        if let Some(offset) = first_difference(&once, &twice) {
            differences.push(Difference {
                kind: DifferenceKind::NotIdempotent,
                description: "second application changed the output".to_string(),
                offset,
            });
        }

        Ok(self.finish(source, once, differences, errors))
    }

    fn finish(
        &self,
        source: &str,
        printed: String,
        differences: Vec<Difference>,
        errors: Vec<String>,
    ) -> ValidationResult {
        let is_valid = differences.is_empty() && (!self.reject_errors || errors.is_empty());
        ValidationResult {
            is_valid,
            original: source.to_string(),
            printed,
            differences,
            errors,
        }
    }
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    Some(
        a.bytes()
            .zip(b.bytes())
            .position(|(x, y)| x != y)
            .unwrap_or_else(|| a.len().min(b.len())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_validate_accepts_odd_input() {
        let validator = RoundTripValidator::new();
        for source in ["", "\n\n", "struct A<", "}}", "/* open", "let s = \"\\(x)\""] {
            assert!(validator.validate(source).is_valid(), "{source:?}");
        }
    }

    #[test]
    fn test_strict_rejects_syntax_errors() {
        let result = RoundTripValidator::strict().validate("struct A {");
        assert!(!result.is_valid());
        assert_eq!(result.issues(), vec!["source had 1 syntax errors".to_string()]);
    }

    #[test]
    fn test_identity_transform_is_idempotent() {
        let result = RoundTripValidator::new()
            .validate_transform("class A {}\n", |t| Ok::<_, Infallible>(t.clone()))
            .unwrap();
        assert!(result.is_valid());
        assert_eq!(result.printed, "class A {}\n");
    }

    #[test]
    fn test_non_idempotent_transform_is_detected() {
        let append = |t: &SyntaxTree| {
            let (tree, _) = parse_swift(&format!("{}x", t.print()));
            Ok::<_, Infallible>(tree)
        };
        let result = RoundTripValidator::new()
            .validate_transform("let a = 1", append)
            .unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.differences[0].kind, DifferenceKind::NotIdempotent);
        assert_eq!(result.differences[0].offset, 10);
    }
}
