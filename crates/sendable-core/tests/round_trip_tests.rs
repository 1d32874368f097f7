//! Round-trip validation of realistic Swift files
//!
//! Every file must print back byte for byte, and every pipeline must produce
//! output that reparses to itself and is stable under a second run.

use sendable_core::cst::{DifferenceKind, RoundTripValidator, SyntaxTree};
use sendable_core::{DeclKind, Pipeline, SendableError};

const MODELS: &str = r#"//
//  Models.swift
//

import Foundation

/// A user account.
public struct Account: Codable, Hashable {
    public let id: UUID
    public var displayName: String
    var avatar: URL? = nil

    public init(id: UUID, displayName: String) {
        self.id = id
        self.displayName = displayName
    }
}

public enum Role: String, CaseIterable {
    case owner = "owner", member
    case guest
}

@available(iOS 15.0, *)
public final class Session {
    public private(set) var token: String
    private let lock = NSLock()

    public init(token: String) { self.token = token }
}

public protocol AccountStore: AnyObject {
    func load(id: UUID) async throws -> Account
}
"#;

const SERVICES: &str = r#"import Combine

open class BaseService {
    open func start() {}
}

public class Settings {
    public let theme: String
    public var isDark: Bool {
        theme == "dark"
    }
    static let shared = Settings(theme: "light")

    init(theme: String) { self.theme = theme }
}

public actor Counter {
    private var value = 0
    public struct Snapshot { let value: Int }
}

extension Settings {
    public enum Theme { case light, dark }
}

#if DEBUG
public struct DebugMenu<Content>: Equatable where Content: Equatable {
    let content: Content
}
#endif

func helper() -> Int {
    struct Local { let x = 1 }
    return Local().x
}
"#;

const CRLF: &str = "public struct Windows {\r\n    let path: String\r\n}\r\n";

fn sources() -> [(&'static str, &'static str); 3] {
    [("Models.swift", MODELS), ("Services.swift", SERVICES), ("Windows.swift", CRLF)]
}

fn pipelines() -> Vec<(&'static str, Pipeline)> {
    vec![
        ("auto-sendable", Pipeline::auto_sendable()),
        ("unchecked", Pipeline::unchecked_only()),
        (
            "attribute",
            Pipeline::attribute(
                "MainActor",
                vec![DeclKind::Class, DeclKind::Struct, DeclKind::Function],
                Some(vec!["public".to_string()]),
            ),
        ),
    ]
}

#[test]
fn test_sources_print_back_unchanged() {
    let validator = RoundTripValidator::strict();
    for (name, source) in sources() {
        let result = validator.validate(source);
        assert!(result.is_valid(), "{name}: {:?}", result.issues());
        assert_eq!(result.printed, source);
    }
}

#[test]
fn test_pipelines_are_lossless_and_stable() {
    let validator = RoundTripValidator::strict();
    for (file, source) in sources() {
        for (name, pipeline) in pipelines() {
            let result = validator
                .validate_transform(source, |tree: &SyntaxTree| pipeline.rewrite(tree))
                .unwrap();
            assert!(result.is_valid(), "{name} on {file}: {:?}", result.issues());
        }
    }
}

#[test]
fn test_auto_sendable_on_models() {
    let output = Pipeline::auto_sendable().rewrite_source(MODELS).unwrap();
    assert!(output.contains("public struct Account: Codable, Hashable, Sendable {"));
    assert!(output.contains("public enum Role: String, CaseIterable, Sendable {"));
    assert!(output.contains("public final class Session: @unchecked Sendable {"));
    assert!(output.contains("public protocol AccountStore: AnyObject {"));
    assert!(output.starts_with("//\n//  Models.swift\n//\n\nimport Foundation\n\n/// A user account.\n"));
}

#[test]
fn test_auto_sendable_on_services() {
    let output = Pipeline::auto_sendable().rewrite_source(SERVICES).unwrap();
    assert!(output.contains("open class BaseService {"));
    assert!(output.contains("public class Settings {"));
    assert!(output.contains("public actor Counter {"));
    assert!(output.contains("    public struct Snapshot: Sendable { let value: Int }"));
    assert!(output.contains("    public enum Theme: Sendable { case light, dark }"));
    assert!(output.contains(
        "public struct DebugMenu<Content>: Equatable, Sendable where Content: Equatable {"
    ));
    assert!(output.contains("    struct Local { let x = 1 }"));
}

#[test]
fn test_crlf_line_endings_survive() {
    let output = Pipeline::auto_sendable().rewrite_source(CRLF).unwrap();
    assert_eq!(
        output,
        "public struct Windows: Sendable {\r\n    let path: String\r\n}\r\n"
    );
}

#[test]
fn test_attribute_pipeline_respects_visibility() {
    let pipeline = Pipeline::attribute(
        "MainActor",
        vec![DeclKind::Class],
        Some(vec!["public".to_string()]),
    );
    let output = pipeline.rewrite_source(SERVICES).unwrap();
    assert!(output.contains("open class BaseService {"));
    assert!(output.contains("\n@MainActor public class Settings {"));
}

#[test]
fn test_validator_reports_unstable_transforms() {
    let validator = RoundTripValidator::new();
    let counter = std::sync::atomic::AtomicUsize::new(0);
    let result = validator
        .validate_transform("struct A {}\n", |tree: &SyntaxTree| {
            // different output on each call
            let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let (next, _) = sendable_core::parse(&format!("{}// {n}\n", tree.print()));
            Ok::<_, SendableError>(next)
        })
        .unwrap();
    assert!(!result.is_valid());
    assert!(
        result
            .differences
            .iter()
            .any(|d| d.kind == DifferenceKind::NotIdempotent)
    );
}
