pub mod frame;
pub mod scanner;

/// Represents errors that can occur while decoding a RESP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespError {
    /// The line preceding the payload did not end in `\r\n`.
    InvalidCrlf,
    /// A bulk string's trailing `\r\n` was missing or malformed.
    MissingTerminatingCrlf,
    /// A bulk string's payload was shorter than its declared length.
    UnexpectedEof,
    /// A length field (`$N`, `*N`, `:N`) was not a valid signed 64-bit integer.
    InvalidInteger(String),
    /// An array length was negative.
    NegativeArrayLength,
    /// The inline-command tokenizer failed (e.g. an unterminated quote).
    InvalidInline(String),
    /// Any other error with a descriptive message.
    Other(String),
}

impl std::fmt::Display for RespError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RespError::InvalidCrlf => write!(f, "Invalid CRLF, expected \"\\r\\n\""),
            RespError::MissingTerminatingCrlf => write!(f, "Terminating CRLF not found"),
            RespError::UnexpectedEof => write!(f, "unexpected EOF"),
            RespError::InvalidInteger(s) => write!(f, "invalid integer: {}", s),
            RespError::NegativeArrayLength => {
                write!(f, "Number of indexes must be zero or positive")
            }
            RespError::InvalidInline(s) => write!(f, "invalid inline command: {}", s),
            RespError::Other(s) => s.fmt(f),
        }
    }
}

impl std::error::Error for RespError {}
