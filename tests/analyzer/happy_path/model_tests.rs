//! Realistic Model Documents
//!
//! Multi-module documents combining definitions, component members and
//! topologies, checked for clean analysis and cross-reference resolution.

use crate::analyzer::{analyze_text, assert_clean, nested_document, symbols_of_kind};
use fpp_rs::core::analyzer::GLOBAL_SCOPE;
use fpp_rs::core::scanner::{Modifiers, TokenKind};
use fpp_rs::core::semantic_tokens::encode;
use pretty_assertions::assert_eq;

const FLIGHT_SOFTWARE: &str = r#"# Flight software model
@ Shared types
module Fsw {
    constant RATE = 10
    enum Mode : U8 { IDLE, ACTIVE = 2 } default IDLE
    struct Sample { value: F64 format "{.3f}", flags: [4] bool }
    array Window = [RATE * 2] Sample
    type Handle
    type Alias = U32

    port Data(sample: Sample, mode: Mode) -> bool

    @ Samples a sensor at a fixed rate
    queued component Sampler {
        async input port dataIn: Data
        output port dataOut: [2] Data
        sync command SET_MODE(mode: Mode) opcode 0x01
        event ModeChanged(mode: Mode) severity activity high format "mode {}"
        telemetry Count: U32 id 0x10 update on change
        param Gain: U16 default RATE
    }

    instance sampler: Sampler base id 0x100 queue size 10 stack size 4096 priority 50 {
        phase 1 """
        setup();
        """
    }
    instance backup: Sampler base id 0x200

    topology Main {
        instance sampler
        instance backup
        connections Wiring {
            sampler.dataOut[0] -> backup.dataIn
            backup.dataOut -> sampler.dataIn
        }
    }
}
"#;

#[test]
fn flight_software_model_is_clean() {
    let result = analyze_text(FLIGHT_SOFTWARE);

    assert_clean(&result);
    // global, Fsw, Sampler and the SET_MODE parameter list
    assert_eq!(result.peak_scope_depth, 4);
    assert_eq!(symbols_of_kind(&result, TokenKind::Namespace), ["Fsw"]);
    assert_eq!(symbols_of_kind(&result, TokenKind::Component), ["Sampler"]);
    assert_eq!(symbols_of_kind(&result, TokenKind::Instance), ["sampler", "backup"]);
    assert_eq!(symbols_of_kind(&result, TokenKind::Topology), ["Main"]);
    assert_eq!(symbols_of_kind(&result, TokenKind::TypeParam), ["Handle", "Alias"]);
}

#[test]
fn references_take_the_declared_kind() {
    let result = analyze_text(FLIGHT_SOFTWARE);

    let occurrences = |text: &str| -> Vec<(TokenKind, Modifiers)> {
        result
            .tokens
            .iter()
            .filter(|t| t.text() == text)
            .map(|t| (t.kind(), t.modifiers()))
            .collect()
    };

    assert_eq!(
        occurrences("RATE"),
        [
            (TokenKind::Variable, Modifiers::DECLARATION),
            (TokenKind::Variable, Modifiers::empty()),
            (TokenKind::Variable, Modifiers::empty()),
        ]
    );
    assert_eq!(
        occurrences("IDLE"),
        [
            (TokenKind::EnumMember, Modifiers::DECLARATION | Modifiers::READONLY),
            (TokenKind::EnumMember, Modifiers::READONLY),
        ]
    );
    assert_eq!(
        occurrences("Sample"),
        [
            (TokenKind::Struct, Modifiers::DECLARATION),
            (TokenKind::Struct, Modifiers::empty()),
            (TokenKind::Struct, Modifiers::empty()),
        ]
    );
    assert_eq!(
        occurrences("dataIn")[0],
        (TokenKind::Port, Modifiers::DECLARATION | Modifiers::ASYNC)
    );
}

#[test]
fn symbols_record_their_enclosing_scope() {
    let result = analyze_text(FLIGHT_SOFTWARE);
    let scope = |name: &str| result.symbol(name).map(|s| s.scope.as_str());

    assert_eq!(scope("Fsw"), Some(GLOBAL_SCOPE));
    assert_eq!(scope("RATE"), Some("Fsw"));
    assert_eq!(scope("IDLE"), Some("Fsw.Mode"));
    assert_eq!(scope("value"), Some("Fsw.Sample"));
    assert_eq!(scope("SET_MODE"), Some("Fsw.Sampler"));
    assert_eq!(scope("Main"), Some("Fsw"));
}

#[test]
fn semantic_tokens_cover_every_classified_identifier() {
    let result = analyze_text(FLIGHT_SOFTWARE);
    let data = encode(&result.classified);

    assert_eq!(data.len(), result.classified.len() * 5);
    // first classified identifier is the module name on line 3
    assert_eq!(&data[..3], [2, 7, 3]);
}

#[test]
fn deeply_nested_modules() {
    let result = analyze_text(&nested_document(6));

    assert_clean(&result);
    // six modules plus the enum/struct opened inside the deepest one
    assert_eq!(result.peak_scope_depth, 8);
    assert_eq!(symbols_of_kind(&result, TokenKind::Namespace).len(), 6);
    assert_eq!(
        result.symbol("limit5").map(|s| s.scope.as_str()),
        Some("M0.M1.M2.M3.M4.M5")
    );
    assert_eq!(
        result.symbol("a5").map(|s| s.scope.as_str()),
        Some("M0.M1.M2.M3.M4.M5.E5")
    );
}
