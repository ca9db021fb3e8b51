//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints that
//! name the offending source or setting.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
///
/// Falls back to [`ErrorCode::suggestion`] when the context carries nothing
/// more specific.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::SourceLoadFailed => suggest_source_load_failed(context),
        ErrorCode::ProviderTimeout => suggest_provider_timeout(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_source_load_failed(context: Option<&Value>) -> String {
    let source = context
        .and_then(|c| c.get("source"))
        .and_then(Value::as_str);
    let reason = context
        .and_then(|c| c.get("reason"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    match source {
        Some(source) if reason.contains("not found") => format!(
            "Term source '{source}' does not exist. Fix the path, or pass it with --optional-source if it may be absent"
        ),
        Some(source) => format!(
            "Term source '{source}' could not be read. It must hold a `terms` object or a bare array of records with a non-empty `term`"
        ),
        None => ErrorCode::SourceLoadFailed.suggestion().to_string(),
    }
}

fn suggest_provider_timeout(context: Option<&Value>) -> String {
    let timeout_ms = context
        .and_then(|c| c.get("timeout_ms"))
        .and_then(Value::as_u64);

    match timeout_ms {
        Some(ms) => format!(
            "Embedding call did not finish within {ms}ms. Raise `embedding.timeout_ms` (TERMALIGN_EMBEDDING_TIMEOUT_MS) or check the backend"
        ),
        None => ErrorCode::ProviderTimeout.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    let key = context
        .and_then(|c| c.get("config_key"))
        .and_then(Value::as_str);

    match key {
        Some(key) => format!("Set `{key}` in termalign.toml or the matching TERMALIGN_* variable"),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}
