//! Rowan language implementation for Swift
//!
//! Connects [`SwiftSyntaxKind`] to Rowan's generic tree types.

use rowan::Language;

use super::SwiftSyntaxKind;

/// Zero-sized marker type tying Rowan's trees to [`SwiftSyntaxKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwiftLanguage;

impl Language for SwiftLanguage {
    type Kind = SwiftSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Raw kinds only ever come from trees we built ourselves
        SwiftSyntaxKind::from_raw(raw.0).unwrap_or(SwiftSyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Red tree node
pub type SwiftSyntaxNode = rowan::SyntaxNode<SwiftLanguage>;
/// Red tree token
pub type SwiftSyntaxToken = rowan::SyntaxToken<SwiftLanguage>;
/// Either a node or a token
pub type SwiftSyntaxElement = rowan::NodeOrToken<SwiftSyntaxNode, SwiftSyntaxToken>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for &kind in SwiftSyntaxKind::ALL {
            let raw = SwiftLanguage::kind_to_raw(kind);
            assert_eq!(SwiftLanguage::kind_from_raw(raw), kind);
        }
    }

    #[test]
    fn test_discriminants_are_contiguous() {
        for (index, &kind) in SwiftSyntaxKind::ALL.iter().enumerate() {
            assert_eq!(kind as u16 as usize, index, "{kind:?} is out of order");
        }
    }

    #[test]
    fn test_unknown_raw_maps_to_error() {
        assert_eq!(
            SwiftLanguage::kind_from_raw(rowan::SyntaxKind(u16::MAX)),
            SwiftSyntaxKind::Error
        );
    }
}
