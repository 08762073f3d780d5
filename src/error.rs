//! Error types for option catalogs and resolution passes.

/// Which uniqueness rule a duplicate option broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    LongName,
    ShortName,
    PropertyKey,
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateKind::LongName => write!(f, "long name"),
            DuplicateKind::ShortName => write!(f, "short name"),
            DuplicateKind::PropertyKey => write!(f, "property key"),
        }
    }
}

/// Errors raised while building a registry or resolving options.
///
/// `InvalidDescriptor` and `DuplicateOption` are catalog bugs and surface at
/// startup. `InvalidValue` is user input and fails a single resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid option descriptor '{option}': {reason}")]
    InvalidDescriptor { option: String, reason: String },

    #[error("Duplicate option {kind} '{name}'")]
    DuplicateOption { kind: DuplicateKind, name: String },

    #[error("{message}")]
    InvalidValue {
        option: String,
        value: String,
        message: String,
    },

    #[error("Resolved value for '{option}' does not match the option kind")]
    ValueKindMismatch { option: String },
}

impl Error {
    pub(crate) fn invalid_descriptor(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidDescriptor {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// The option long name or property key the error is about.
    pub fn option(&self) -> &str {
        match self {
            Error::InvalidDescriptor { option, .. }
            | Error::InvalidValue { option, .. }
            | Error::ValueKindMismatch { option } => option,
            Error::DuplicateOption { name, .. } => name,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
