//! Error type shared by the tree, codec and registry.

use std::fmt;
use std::io;

/// Why a record was refused before it reached the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Name is the empty string.
    EmptyName,
    /// Name is longer than [`crate::record::NAME_MAX_LEN`] bytes.
    NameTooLong,
    /// Name contains `\n` or `\r`.
    LineTerminator,
    /// Name contains whitespace but the layout separates fields by whitespace.
    Whitespace,
    /// Budget, income or spending is NaN or infinite.
    NonFinite,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidReason::EmptyName => "name is empty",
            InvalidReason::NameTooLong => "name is too long",
            InvalidReason::LineTerminator => "name contains a line terminator",
            InvalidReason::Whitespace => "name contains whitespace",
            InvalidReason::NonFinite => "economic figure is not finite",
        };
        f.write_str(msg)
    }
}

/// What was wrong with a persisted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended in the middle of a record.
    Truncated,
    /// A single-line record did not have exactly five fields.
    FieldCount(usize),
    /// Population field is not a non-negative integer.
    Integer(String),
    /// Budget, income or spending field is not a number.
    Float(String),
    /// Name field failed validation.
    Name(InvalidReason),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Truncated => f.write_str("input ends in the middle of a record"),
            ParseErrorKind::FieldCount(n) => write!(f, "expected 5 fields, found {}", n),
            ParseErrorKind::Integer(s) => write!(f, "invalid population {:?}", s),
            ParseErrorKind::Float(s) => write!(f, "invalid number {:?}", s),
            ParseErrorKind::Name(reason) => write!(f, "invalid name: {}", reason),
        }
    }
}

/// Error type for store operations.
#[derive(Debug)]
pub enum Error {
    /// A record was rejected before insertion.
    InvalidRecord {
        /// The offending name, as given.
        name: String,
        reason: InvalidReason,
    },
    /// A snapshot could not be decoded. `line` is 1-based.
    Parse { line: usize, kind: ParseErrorKind },
    /// The snapshot file could not be opened, read or written.
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRecord { name, reason } => {
                write!(f, "invalid record {:?}: {}", name, reason)
            }
            Error::Parse { line, kind } => write!(f, "parse error on line {}: {}", line, kind),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
