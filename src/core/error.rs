use thiserror::Error;

/// Errors produced while compiling a `docker run` invocation into a
/// compose document.
///
/// Every parse-time error aborts the compile; there is no partial-success
/// mode. The tokenizer's "no more flags" and "skip token" outcomes are
/// control signals, not errors, and never surface here.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The invocation contained no tokens after stripping the
    /// `docker run` prefix.
    #[error("empty docker run command")]
    EmptyInvocation,

    /// Flag scanning consumed every token and no image reference remained.
    #[error("no image specified in docker run command")]
    MissingImage,

    /// A malformed flag token, e.g. a bare `-`.
    #[error("invalid docker run flag {0:?}")]
    InvalidFlag(String),

    /// A non-boolean flag with no inline value and no following token to
    /// consume as its value.
    #[error("docker run flag {0:?} is missing an argument")]
    MissingFlagArgument(String),

    /// A value that cannot be parsed for its flag, e.g. `--tty=yes`.
    #[error("invalid value {value:?} for docker run flag {flag:?}")]
    InvalidFlagValue { flag: String, value: String },

    /// A `--ulimit` value not of the form `name=soft:hard` with integer
    /// soft and hard components.
    #[error("invalid ulimit value {0:?}, expected name=soft:hard")]
    InvalidUlimitValue(String),

    /// A flag absent from the registry, reported only in strict mode.
    /// The default behavior is to drop unknown flags with a warning.
    #[error("unknown docker run flag {0:?}")]
    UnknownFlag(String),

    /// The finished tree could not be rendered. This indicates a builder
    /// invariant violation rather than bad user input.
    #[error("failed to serialize compose document")]
    Serialization(#[from] serde_yaml::Error),
}
