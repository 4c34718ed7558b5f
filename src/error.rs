//! Error types shared by the classifier, the interpreter, and both consumers.

use serde_json::Value;
use thiserror::Error;

/// Result type for walker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal walker errors. There is no local recovery: the first bad node
/// anywhere in the tree fails the whole call, and the offending descriptor
/// travels with the error.
#[derive(Error, Debug)]
pub enum Error {
    /// The `kind` discriminator does not map to any registered tag.
    #[error("unknown schema kind `{kind}`: {node}")]
    UnknownKind { kind: String, node: Value },

    /// The discriminator matched, but the payload is not shaped as documented.
    #[error("shape mismatch, expected {expected}: {node}")]
    ShapeMismatch { expected: String, node: Value },

    /// A recognized node that this consumer cannot represent.
    #[error("unsupported input ({what}): {node}")]
    UnsupportedInput { what: &'static str, node: Value },

    /// A recognized but not-yet-supported combination.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

impl Error {
    pub(crate) fn shape(expected: impl Into<String>, node: &Value) -> Self {
        Error::ShapeMismatch {
            expected: expected.into(),
            node: node.clone(),
        }
    }

    pub(crate) fn unsupported(what: &'static str, node: &Value) -> Self {
        Error::UnsupportedInput {
            what,
            node: node.clone(),
        }
    }
}
