use thiserror::Error;

/// Why a command line failed to parse. Every variant is user-facing and
/// renders as a single message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Not enough arguments")]
    NoMoreTokens,
    #[error("No {kind} named '{token}' was found")]
    NoSuchEntity { kind: String, token: String },
    #[error("'{token}' matches more than one {kind}: {}", .matches.join(", "))]
    AmbiguousMatch {
        kind: String,
        token: String,
        matches: Vec<String>,
    },
    #[error("Selector '{selector}' did not match any target")]
    NoSelectorTarget { selector: String },
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelectorSyntax { selector: String, reason: String },
    #[error("'{token}' is out of range, expected a value between {min} and {max}")]
    ValueOutOfRange {
        token: String,
        min: String,
        max: String,
    },
    #[error("'{token}' is not a valid {expected}")]
    MalformedValue { token: String, expected: String },
    #[error("You do not have permission to do that ({permission})")]
    PermissionDenied { permission: String },
    #[error("Too many arguments: {remaining}")]
    TooManyArguments { remaining: String },
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },
}

impl ParseError {
    pub fn no_such(kind: &str, token: impl Into<String>) -> Self {
        ParseError::NoSuchEntity {
            kind: kind.to_string(),
            token: token.into(),
        }
    }

    pub fn ambiguous(kind: &str, token: impl Into<String>, matches: Vec<String>) -> Self {
        ParseError::AmbiguousMatch {
            kind: kind.to_string(),
            token: token.into(),
            matches,
        }
    }

    pub fn malformed(token: impl Into<String>, expected: impl Into<String>) -> Self {
        ParseError::MalformedValue {
            token: token.into(),
            expected: expected.into(),
        }
    }

    pub fn out_of_range(
        token: impl Into<String>,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        ParseError::ValueOutOfRange {
            token: token.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn permission_denied(permission: impl Into<String>) -> Self {
        ParseError::PermissionDenied {
            permission: permission.into(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Permission denied: {permission}")]
    PermissionDenied { permission: String },
    #[error("This command can only be executed by players")]
    PlayerOnly,
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Error)]
pub enum InternalError {
    #[error(
        "Internal error: Argument '{name}' not found in ParseContext (command registration bug)"
    )]
    MissingArgument { name: String },
    #[error(
        "Internal error: Argument '{name}' has wrong type, expected {expected} \
         (command registration bug)"
    )]
    WrongArgumentType { name: String, expected: String },
    #[error("Internal error (bug): {message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn runtime(message: impl Into<String>) -> Self {
        CommandError::Runtime(RuntimeError::Message(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(InternalError::Message {
            message: message.into(),
        })
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
