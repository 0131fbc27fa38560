//! Error types of the contact form core.
//!
//! Validation failure is never an error: a field that does not pass its rules
//! simply carries `valid = false`. The enums below cover the remaining failure
//! surfaces: malformed controller input, broken schemas and a failing
//! submission collaborator.

use thiserror::Error;

use crate::field::FieldKind;

/// Input handed to the [`FormController`](crate::controller::FormController)
/// that cannot be mapped onto the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{name}` is a {kind} field and cannot take a selection")]
    NotSelectable { name: String, kind: FieldKind },
    #[error("option {selection_id} is not offered by field `{name}`")]
    UnknownOption { name: String, selection_id: i64 },
}

/// Problems detected while parsing or building a [`FormSchema`](crate::schema::FormSchema).
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("select field `{0}` needs at least one option")]
    MissingOptions(String),
    #[error("field `{name}` is a {kind} field and must not declare options")]
    UnexpectedOptions { name: String, kind: FieldKind },
    #[error("rule `{rule}` can never apply to {kind} field `{field}`")]
    RuleMismatch {
        field: String,
        rule: String,
        kind: FieldKind,
    },
    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a [`Submitter`](crate::submit::Submitter).
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
}
