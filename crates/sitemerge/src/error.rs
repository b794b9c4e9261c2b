//! Error types for sitemerge

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Position in an XML source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in an XML source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    UnterminatedMarkup,
    InvalidEntity { entity: String },
    InvalidUtf8,
    UnboundPrefix { prefix: String },
    DuplicateAttribute { name: String },
    MissingRoot,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    InvalidPattern { pattern: String },
    Io { path: PathBuf },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::UnterminatedMarkup => write!(f, "unterminated markup"),
            Self::InvalidEntity { entity } => write!(f, "invalid xml entity: &{entity};"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::UnboundPrefix { prefix } => write!(f, "unbound namespace prefix: {prefix}"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::MissingRoot => write!(f, "no root element"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::InvalidPattern { pattern } => write!(f, "invalid file pattern: {pattern}"),
            Self::Io { path } => write!(f, "i/o failure on {}", path.display()),
        }
    }
}

/// Main error type for sitemerge
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Wrap an I/O failure on `path`
    pub fn io(path: &Path, source: &std::io::Error) -> Self {
        Self::with_message(
            ErrorKind::Io {
                path: path.to_path_buf(),
            },
            Span::empty(),
            format!("{}: {source}", path.display()),
        )
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error points into an XML source
    pub const fn is_syntax(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::Io { .. } | ErrorKind::InvalidPattern { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_syntax() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Result type alias for sitemerge
pub type Result<T> = std::result::Result<T, Error>;
