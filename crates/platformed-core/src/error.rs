//! Specialization error types.

use platformed_syntax::SyntaxError;

/// Errors that abort specialization of a module.
#[derive(Debug, thiserror::Error)]
pub enum SpecializeError {
    /// The conditional-call marker import appears in a module that is not
    /// marked as platformed.
    #[error(
        "Module \"{module}\" contains import from \"virtual:platformed\", but wasn't marked as \".platformed\""
    )]
    Misuse { module: String },

    /// A conditional call or its object argument has an unsupported shape.
    #[error("{detail} (in module \"{module}\")")]
    Structural { module: String, detail: String },

    /// Neither the target platform nor the fallback has a value.
    #[error(
        "Unable to find override for platform \"{platform}\" in module \"{module}\". Content was: \"{content}\""
    )]
    Coverage {
        platform: String,
        module: String,
        content: String,
    },

    /// A platform-suffixed import has an extension of no known resource kind.
    #[error(
        "Unable to determine platformed import kind. Expected {expected}, but received \"{extension}\" (import `{import}` in module \"{module}\")"
    )]
    Classification {
        module: String,
        import: String,
        extension: String,
        expected: String,
    },

    /// Invalid platform configuration.
    #[error("invalid platform configuration: {detail}")]
    Registry { detail: String },

    /// The module source could not be tokenized.
    #[error("unable to parse module \"{module}\": {source}")]
    Syntax {
        module: String,
        #[source]
        source: SyntaxError,
    },
}

/// Result type alias for specialization operations.
pub type Result<T> = std::result::Result<T, SpecializeError>;
