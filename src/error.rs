//! Error types for predicate translation.

use thiserror::Error;

use crate::ast::{CompoundKind, OperatorTag};

/// The main error type for registry and translation operations.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// Malformed criteria at registration time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A comparison names criteria the registry does not know.
    #[error("Unknown criteria '{name}'{}", did_you_mean(.suggestion))]
    UnknownCriteria {
        name: String,
        suggestion: Option<String>,
    },

    /// A node kind that is neither a compound nor a comparison.
    #[error("Unsupported expression: '{kind}'")]
    UnsupportedExpression { kind: String },

    /// A compound node with the wrong number of children.
    #[error("Malformed {kind} expression: {children} child expression(s)")]
    MalformedCompound { kind: CompoundKind, children: usize },

    /// A tree nested deeper than the translator renders.
    #[error("Expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// The operator is not offered by the criteria (strict mode only).
    #[error("Operator {operator} is not supported by criteria '{criteria}'")]
    UnsupportedOperator {
        criteria: String,
        operator: OperatorTag,
    },

    /// Failed to parse a predicate expression string.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Malformed JSON expression tree.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed criteria file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

impl PredicateError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an unsupported expression error for a node kind.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedExpression { kind: kind.into() }
    }
}

/// Result type alias for predicate operations.
pub type PredicateResult<T> = Result<T, PredicateError>;
