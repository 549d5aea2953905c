//! Error types for ontology construction and rule registration.

use oxrdf::{BlankNodeIdParseError, IriParseError, LanguageTagParseError};

/// Main error type for `oxreason` operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OntologyError {
    /// A resource could not be built.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// A rule could not be registered.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Error raised when a resource is built from invalid arguments.
///
/// This is the only fatal error of the crate: mutation guards reject invalid
/// insertions without failing and reasoning or validation problems surface as
/// evidences inside reports.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConstructionError {
    /// The identifier is empty.
    #[error("Resource identifiers must not be empty")]
    EmptyIdentifier,

    /// The identifier is not a valid IRI.
    #[error(transparent)]
    InvalidIri(#[from] IriParseError),

    /// The identifier is not a valid blank node id.
    #[error(transparent)]
    InvalidBlankNodeId(#[from] BlankNodeIdParseError),

    /// The language tag of a plain literal is invalid.
    #[error(transparent)]
    InvalidLanguageTag(#[from] LanguageTagParseError),

    /// The value of a typed literal is not in the lexical space of its datatype.
    #[error("'{value}' is not a valid lexical form for datatype <{datatype}>")]
    InvalidLexicalForm { value: String, datatype: String },
}

impl ConstructionError {
    /// Creates an invalid lexical form error.
    pub fn invalid_lexical_form(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::InvalidLexicalForm {
            value: value.into(),
            datatype: datatype.into(),
        }
    }
}

/// Error raised when a rule catalog is extended.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// A rule with the same name is already in the catalog.
    #[error("A rule named '{name}' is already registered")]
    DuplicateRule { name: String },
}

impl RuleError {
    /// Creates a duplicate rule error.
    pub fn duplicate_rule(name: impl Into<String>) -> Self {
        Self::DuplicateRule { name: name.into() }
    }
}
