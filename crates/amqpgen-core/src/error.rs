use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed protocol spec: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error("unknown type: {0}")]
    UnknownType(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("malformed protocol spec: {0}")]
    Malformed(String),
}

/// The three fatal failure classes of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownDomain,
    UnknownType,
    MalformedSpec,
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::Resolve(ResolveError::UnknownDomain(_)) => ErrorKind::UnknownDomain,
            TransformError::Resolve(ResolveError::UnknownType(_)) => ErrorKind::UnknownType,
            TransformError::Parse(_) | TransformError::Malformed(_) => ErrorKind::MalformedSpec,
        }
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("generation failed: {0}")]
    Other(String),
}

/// Errors raised by the reference wire codec.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("payload truncated while reading {0}")]
    Truncated(String),

    #[error("argument {name}: expected {expected} value")]
    TypeMismatch { name: String, expected: String },

    #[error("expected {expected} argument values, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("{field} is {len} bytes, longer than its length prefix allows")]
    TooLong { field: String, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
