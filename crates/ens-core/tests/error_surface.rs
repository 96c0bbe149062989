use ens_core::errors::{EnsError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("strategy", "all_perm")
        .with_context("reason", "example")
}

#[test]
fn strategy_not_found_surface() {
    let err = EnsError::StrategyNotFound(sample_info("ens.strategy_not_found", "missing"));
    assert_eq!(err.info().code, "ens.strategy_not_found");
    assert!(err.info().context.contains_key("strategy"));
}

#[test]
fn duplicate_strategy_surface() {
    let err = EnsError::DuplicateStrategy(sample_info("ens.duplicate_strategy", "taken"));
    assert_eq!(err.info().code, "ens.duplicate_strategy");
}

#[test]
fn user_strategy_surface() {
    let err = EnsError::UserStrategy(sample_info("ens.user_strategy", "boom"));
    assert!(err.to_string().starts_with("user strategy error: boom"));
}

#[test]
fn empty_ensemble_surface() {
    let err = EnsError::EmptyEnsemble(ErrorInfo::new("ens.empty_ensemble", "no members"))
        .with_context("ensemble", "demo");
    assert_eq!(err.info().context["ensemble"], "demo");
    assert!(matches!(err, EnsError::EmptyEnsemble(_)));
}

#[test]
fn display_renders_context_and_hint() {
    let info = ErrorInfo::new("E001", "problem")
        .with_context("b", "2")
        .with_context("a", "1")
        .with_hint("try again");
    assert_eq!(
        info.to_string(),
        "problem (code: E001) | context: [a=1, b=2] | hint: try again"
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = EnsError::Config(ErrorInfo::new("ens.config", "bad name"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Config");
    let decoded: EnsError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}
