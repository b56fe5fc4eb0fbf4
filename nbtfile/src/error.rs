//! Contains the Error and Result type used by the tokenizer, emitter and tree
//! codec.
use std::fmt::Display;

use crate::Tag;

/// Various errors that can occur while reading or writing NBT.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input ended part way through a tag. The stream cannot be
    /// resumed.
    UnexpectedEof,

    /// A tag ordinal outside of `0..=10` was read.
    InvalidTag(u8),

    /// The tokens or bytes do not form a valid document. For example the
    /// first tag was not a compound, a list element had the wrong kind, or
    /// something was emitted after the document was complete.
    Structure,

    /// Expected unicode data but was not valid. Contained bytes are the
    /// invalid data.
    Nonunicode(Vec<u8>),

    /// A value did not fit in the width it was meant to be stored in, such as
    /// 300 as a Byte or a string longer than 65535 bytes.
    OutOfRange,

    /// A value of the wrong kind was given to a typed container, eg an Int
    /// pushed onto a list of Bytes.
    TypeMismatch,

    /// Any other IO error from the underlying reader or writer.
    Io,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self {
            msg: format!("invalid nbt tag value: {}", tag),
            kind: ErrorKind::InvalidTag(tag),
        }
    }

    pub(crate) fn structure(msg: impl Display) -> Self {
        Self {
            msg: format!("invalid nbt structure: {}", msg),
            kind: ErrorKind::Structure,
        }
    }

    pub(crate) fn no_root_compound(found: Tag) -> Self {
        Self::structure(format!("expected root compound, found {:?}", found))
    }

    pub(crate) fn nonunicode(data: &[u8]) -> Self {
        Self {
            msg: format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
            kind: ErrorKind::Nonunicode(data.to_vec()),
        }
    }

    pub(crate) fn out_of_range(msg: impl Display) -> Self {
        Self {
            msg: format!("value out of range: {}", msg),
            kind: ErrorKind::OutOfRange,
        }
    }

    pub(crate) fn type_mismatch(expected: Tag, found: Tag) -> Self {
        Self {
            msg: format!("expected {:?}, found {:?}", expected, found),
            kind: ErrorKind::TypeMismatch,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self {
                msg: "eof: unexpectedly ran out of input".to_owned(),
                kind: ErrorKind::UnexpectedEof,
            },
            _ => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io,
            },
        }
    }
}
