use crate::op::Direction;

/// Rejected rule definition, raised while a mapping, stage or pipeline is
/// assembled and never while a tree is processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("duplicate key `{key}` in object pattern")]
    DuplicateKey { key: String },

    #[error("variable `{name}` is used by the {direction} build pattern but never bound by its match pattern")]
    UnboundVariable { name: String, direction: Direction },

    #[error("invalid variable name `{0}`: expected an identifier")]
    InvalidVariable(String),

    #[error("invalid type name `{0}`: expected `name` or `namespace:name`")]
    InvalidTypeName(String),

    #[error("{0} may only appear at the top of a pattern")]
    NestedComposite(&'static str),

    #[error("annotation field patterns may not declare reserved key `{0}`")]
    ReservedKey(String),

    #[error("{0} build pattern needs a composite match pattern on the other side")]
    UnpairedComposite(&'static str),
}

/// The top level of a tree does not have the envelope shape the pipeline was
/// configured for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: expected a top-level object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("malformed envelope: expected exactly one top-level key, found {count}")]
    KeyCount { count: usize },

    #[error("malformed envelope: expected top-level key `{expected}`, found `{found}`")]
    UnexpectedKey { expected: String, found: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("invalid JSON tree: {0}")]
    Json(#[from] serde_json::Error),
}
