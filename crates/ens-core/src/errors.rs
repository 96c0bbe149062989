//! Structured error types shared across the ensemble crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`EnsError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (strategy names, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for ensemble generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EnsError {
    /// The requested strategy name is not registered.
    #[error("strategy not found: {0}")]
    StrategyNotFound(ErrorInfo),
    /// A strategy with the same name was already registered.
    #[error("duplicate strategy: {0}")]
    DuplicateStrategy(ErrorInfo),
    /// A caller supplied strategy failed or returned malformed data.
    #[error("user strategy error: {0}")]
    UserStrategy(ErrorInfo),
    /// An ensemble without members was bound to launch settings.
    #[error("empty ensemble: {0}")]
    EmptyEnsemble(ErrorInfo),
    /// Invalid ensemble configuration values.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl EnsError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EnsError::StrategyNotFound(info)
            | EnsError::DuplicateStrategy(info)
            | EnsError::UserStrategy(info)
            | EnsError::EmptyEnsemble(info)
            | EnsError::Config(info)
            | EnsError::Serde(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            EnsError::StrategyNotFound(info)
            | EnsError::DuplicateStrategy(info)
            | EnsError::UserStrategy(info)
            | EnsError::EmptyEnsemble(info)
            | EnsError::Config(info)
            | EnsError::Serde(info) => info,
        }
    }

    /// Attaches an extra context entry without changing the error family.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_mut().context.insert(key.into(), value.into());
        self
    }
}
