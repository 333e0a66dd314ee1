//! Error types for command dispatch.
//!
//! Every failure a caller can see comes back as an [`EngineError`]. Errors
//! raised after the command name was resolved are wrapped in
//! [`EngineError::Command`] so messages read `brighten: argument 0: ...`;
//! use [`EngineError::root_cause`] to match on the underlying kind.

use std::fmt;

use pixkit_ops::OpsError;
use thiserror::Error;

use crate::args::ArgumentType;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Kind of artifact stored under a cache name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// An [`Image`](pixkit_core::Image).
    Image,
    /// A [`Histogram`](pixkit_core::Histogram).
    Histogram,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Image => "image",
            ArtifactKind::Histogram => "histogram",
        })
    }
}

/// Errors returned by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No command registered under this name.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Keyword outside the keyword table, or not accepted by the command.
    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),

    /// A keyword the command cannot run without.
    #[error("missing required keyword '{0}'")]
    MissingKeyword(&'static str),

    /// Positional argument count differs from the signature.
    #[error("expected {expected} arguments, got {found}")]
    ArgumentCountMismatch {
        /// Signature length.
        expected: usize,
        /// Arguments supplied.
        found: usize,
    },

    /// Positional argument of the wrong type.
    #[error("argument {slot}: expected {expected}, got {found}")]
    ArgumentTypeMismatch {
        /// Zero-based argument index.
        slot: usize,
        /// Type the signature declares.
        expected: ArgumentType,
        /// Type supplied.
        found: ArgumentType,
    },

    /// Artifact name that is empty or contains whitespace.
    #[error("invalid artifact name '{0}'")]
    InvalidName(String),

    /// Numeric parameter outside its accepted range.
    #[error("invalid parameter: {0}")]
    InvalidParameterRange(String),

    /// Images that must match in size do not.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Cache holds no artifact of this kind under this name.
    #[error("no {kind} named '{name}'")]
    NotFound {
        /// Requested name.
        name: String,
        /// Requested kind.
        kind: ArtifactKind,
    },

    /// Text where an integer was expected.
    #[error("{argument}: '{text}' is not an integer")]
    MalformedNumericArgument {
        /// Which argument (`argument 2`, `split`, ...).
        argument: String,
        /// Offending text.
        text: String,
    },

    /// Failure reported by an image codec.
    #[error("codec error: {0}")]
    Codec(String),

    /// Error raised while running a named command.
    #[error("{command}: {source}")]
    Command {
        /// Command name.
        command: String,
        /// Underlying error.
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Builds a [`EngineError::NotFound`].
    pub fn not_found(name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self::NotFound {
            name: name.into(),
            kind,
        }
    }

    /// Wraps `self` with the name of the command that raised it.
    pub fn in_command(self, command: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, with every [`EngineError::Command`] layer removed.
    pub fn root_cause(&self) -> &EngineError {
        let mut err = self;
        while let EngineError::Command { source, .. } = err {
            err = source;
        }
        err
    }
}

impl From<OpsError> for EngineError {
    fn from(err: OpsError) -> Self {
        match err {
            OpsError::SizeMismatch(msg) => EngineError::SizeMismatch(msg),
            OpsError::InvalidParameter(msg) | OpsError::InvalidDimensions(msg) => {
                EngineError::InvalidParameterRange(msg)
            }
            OpsError::Core(e) => EngineError::InvalidParameterRange(e.to_string()),
        }
    }
}

impl From<pixkit_core::Error> for EngineError {
    fn from(err: pixkit_core::Error) -> Self {
        EngineError::InvalidParameterRange(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause() {
        let err = EngineError::not_found("img", ArtifactKind::Image).in_command("blur");
        assert_eq!(err.to_string(), "blur: no image named 'img'");
        assert!(matches!(err.root_cause(), EngineError::NotFound { .. }));
    }

    #[test]
    fn test_from_ops() {
        let err: EngineError = OpsError::InvalidParameter("ratio".into()).into();
        assert!(matches!(err, EngineError::InvalidParameterRange(_)));
        let err: EngineError = OpsError::SizeMismatch("mask".into()).into();
        assert!(matches!(err, EngineError::SizeMismatch(_)));
    }
}
