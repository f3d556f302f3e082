use cubehub_core::errors::{CardConversionError, ExError, ExErrorKind};
use std::error::Error as _;

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidManifest, "ERR_INVALID_MANIFEST"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::CorruptedMapping, "ERR_CORRUPTED_MAPPING"),
        (ExErrorKind::HeadMismatch, "ERR_HEAD_MISMATCH"),
        (ExErrorKind::CardConversion, "ERR_CARD_CONVERSION"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::ExternalService, "ERR_EXTERNAL_SERVICE"),
        (ExErrorKind::Timeout, "ERR_TIMEOUT"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    let mut seen = std::collections::HashSet::new();
    for (kind, code) in kinds {
        assert_eq!(kind.code(), code);
        assert!(seen.insert(code), "duplicate code {}", code);
    }
}

#[test]
fn test_build_chain_reports_every_stage() {
    let root = ExError::new(ExErrorKind::Persistence)
        .with_op("upsert_cards")
        .with_message("disk I/O error");
    let err = ExError::wrap("build_cube", ExError::wrap("load_cards", root));

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.op_chain(), vec!["build_cube", "load_cards", "upsert_cards"]);

    let source = err.source().expect("wrapped error has a source");
    assert!(source.to_string().contains("load_cards"));
    assert_eq!(err.root_cause().message(), "disk I/O error");
}

#[test]
fn test_malformed_payload_from_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let conversion: CardConversionError = json_err.into();
    let ex_err: ExError = conversion.into();

    assert_eq!(ex_err.kind(), ExErrorKind::CardConversion);
    assert_eq!(ex_err.op(), Some("to_card"));
    assert!(ex_err.message().starts_with("Malformed card payload"));
}

#[test]
fn test_display_without_op_or_entity() {
    let err = ExError::new(ExErrorKind::Internal).with_message("lock poisoned");
    assert_eq!(err.to_string(), "[ERR_INTERNAL]: lock poisoned");
}
