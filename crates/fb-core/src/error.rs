use crate::host::HostFault;
use std::fmt::Display;
use std::result;
use thiserror::Error;

/// Operand shape does not fit a callable's declared parameter count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArityError {
    #[error("rank too high: positional arguments need a vector, got rank {rank}")]
    RankTooHigh { rank: usize },
    #[error("expected {expected}, got {got}")]
    Count { expected: usize, got: usize },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("arity error: {0}")]
    Arity(#[from] ArityError),
    /// `index` is 1-based.
    #[error("argument {index}: {source}")]
    Argument { index: usize, source: Box<Error> },
    /// `index` is 0-based into the flat element buffer.
    #[error("element {index}: {source}")]
    Element { index: usize, source: Box<Error> },
    #[error("cannot convert {got} to {want}")]
    Conversion { got: String, want: String },
    #[error("unsupported conversion for kind {kind}")]
    UnsupportedConversion { kind: String },
    #[error("{0}")]
    Host(HostFault),
    #[error("no such field: {name}")]
    NoSuchField { name: String },
    #[error("not a record: {ty}")]
    NotARecord { ty: String },
    #[error("type {ty} is not constructible")]
    NotConstructible { ty: String },
    #[error("{callee} returned {got} values, expected {expected}")]
    ReturnMismatch {
        callee: String,
        expected: usize,
        got: usize,
    },
    #[error("host object {ty} is already borrowed")]
    Borrowed { ty: String },
    #[error("{0}")]
    Generic(eyre::Report),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn conversion(got: impl Display, want: impl Display) -> Self {
        Error::Conversion {
            got: got.to_string(),
            want: want.to_string(),
        }
    }

    pub fn unsupported(kind: impl Display) -> Self {
        Error::UnsupportedConversion {
            kind: kind.to_string(),
        }
    }

    pub fn argument(index: usize, source: Error) -> Self {
        Error::Argument {
            index,
            source: Box::new(source),
        }
    }

    pub fn element(index: usize, source: Error) -> Self {
        Error::Element {
            index,
            source: Box::new(source),
        }
    }

    /// Strip `Argument` and `Element` wrappers down to the failure that caused them.
    pub fn root(&self) -> &Error {
        match self {
            Error::Argument { source, .. } | Error::Element { source, .. } => source.root(),
            other => other,
        }
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(eyre::Report::msg(s))
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(eyre::Report::msg(s.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(eyre::Report::new(e))
    }
}

impl From<HostFault> for Error {
    fn from(fault: HostFault) -> Self {
        Error::Host(fault)
    }
}
