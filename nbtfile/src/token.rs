//! The flat token model exchanged by the [`Tokenizer`][crate::Tokenizer] and
//! [`Emitter`][crate::Emitter].

use crate::Tag;

/// Where a token sits in its parent container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// The `End` closing a compound, which has no name on the wire.
    None,
    /// A member of a compound, or the root compound. Like string payloads,
    /// keys are the raw bytes from the wire and may not be UTF-8.
    Key(Vec<u8>),
    /// An element of a list. The `End` closing a list carries the element
    /// count here.
    Index(i32),
}

impl Name {
    /// The key, if this is a key holding valid UTF-8.
    pub fn as_key(&self) -> Option<&str> {
        self.key_bytes().and_then(|key| std::str::from_utf8(key).ok())
    }

    /// The raw bytes of the key, if this is a key.
    pub fn key_bytes(&self) -> Option<&[u8]> {
        match self {
            Name::Key(key) => Some(key),
            _ => None,
        }
    }

    /// The position in the parent list, if this is an index.
    pub fn as_index(&self) -> Option<i32> {
        match self {
            Name::Index(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Name {
    fn from(key: &str) -> Self {
        Name::Key(key.as_bytes().to_vec())
    }
}

impl From<String> for Name {
    fn from(key: String) -> Self {
        Name::Key(key.into_bytes())
    }
}

impl From<Vec<u8>> for Name {
    fn from(key: Vec<u8>) -> Self {
        Name::Key(key)
    }
}

impl From<i32> for Name {
    fn from(index: i32) -> Self {
        Name::Index(index)
    }
}

/// A single NBT tag with its name and, for everything except compounds and
/// lists, its value.
///
/// Lists and compounds are opened by a `List` or `Compound` token and closed
/// by an `End` token. A `List` token carries the kind of its elements, not
/// their number; the number is on the `End`.
///
/// String payloads and compound keys are the raw bytes from the wire. They
/// are normally UTF-8 but the tokenizer passes malformed data through
/// untouched. The emitter refuses to write either when it is not UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    End(Name),
    Byte(Name, i8),
    Short(Name, i16),
    Int(Name, i32),
    Long(Name, i64),
    Float(Name, f32),
    Double(Name, f64),
    ByteArray(Name, Vec<u8>),
    String(Name, Vec<u8>),
    List(Name, Tag),
    Compound(Name),
}

impl Token {
    /// An unnamed `End`, closing the innermost compound or list.
    pub fn end() -> Self {
        Token::End(Name::None)
    }

    /// A `Compound` opening token.
    pub fn compound(name: impl Into<Name>) -> Self {
        Token::Compound(name.into())
    }

    /// A `List` opening token for elements of kind `element`.
    pub fn list(name: impl Into<Name>, element: Tag) -> Self {
        Token::List(name.into(), element)
    }

    /// A `String` token holding the UTF-8 bytes of `value`.
    pub fn string(name: impl Into<Name>, value: &str) -> Self {
        Token::String(name.into(), value.as_bytes().to_vec())
    }

    /// The kind of this token.
    pub fn tag(&self) -> Tag {
        match self {
            Token::End(_) => Tag::End,
            Token::Byte(..) => Tag::Byte,
            Token::Short(..) => Tag::Short,
            Token::Int(..) => Tag::Int,
            Token::Long(..) => Tag::Long,
            Token::Float(..) => Tag::Float,
            Token::Double(..) => Tag::Double,
            Token::ByteArray(..) => Tag::ByteArray,
            Token::String(..) => Tag::String,
            Token::List(..) => Tag::List,
            Token::Compound(_) => Tag::Compound,
        }
    }

    pub fn name(&self) -> &Name {
        match self {
            Token::End(name)
            | Token::Byte(name, _)
            | Token::Short(name, _)
            | Token::Int(name, _)
            | Token::Long(name, _)
            | Token::Float(name, _)
            | Token::Double(name, _)
            | Token::ByteArray(name, _)
            | Token::String(name, _)
            | Token::List(name, _)
            | Token::Compound(name) => name,
        }
    }
}
