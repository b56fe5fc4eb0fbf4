//! nbtfile reads and writes NBT (Named Binary Tag) data, the typed binary
//! tree format Minecraft uses for world data, player files and chunks.
//!
//! There are three levels to work at:
//!
//! * Tokens. [`Tokenizer`] turns a byte stream into a flat sequence of
//!   [`Token`]s and [`Emitter`] turns tokens back into bytes. Neither holds
//!   more than one token in memory (apart from list bodies while emitting)
//!   and neither recurses, so documents of any depth are fine.
//! * Typed trees. [`decode_tree`] and [`encode_tree`] convert between bytes
//!   and a [`Compound`] of [`Value`]s, preserving every tag kind and key order.
//! * Plain data. [`load`] gives a loose [`PlainValue`] for quick inspection.
//!
//! Documents on disk are usually gzip compressed. The functions at the top
//! of this crate ([`tokenize`], [`emit`], [`read`], [`write`], [`load`])
//! handle that; the types themselves work on raw NBT.
//!
//! # Quick example
//!
//! ```
//! use nbtfile::{Compound, List, Tag, Value};
//!
//! # fn main() -> nbtfile::error::Result<()> {
//! let mut level = Compound::new();
//! level.insert("LevelName", "world");
//! level.insert("hardcore", Value::Byte(0));
//!
//! let mut pos = List::new(Tag::Double);
//! pos.push(1.5)?;
//! pos.push(64.0)?;
//! level.insert("Pos", pos);
//!
//! let bytes = nbtfile::write(Vec::new(), "Data", &level)?;
//! let (name, read_back) = nbtfile::read(bytes.as_slice())?;
//!
//! assert_eq!(name, "Data");
//! assert_eq!(read_back, level);
//! # Ok(())
//! # }
//! ```

use std::convert::TryFrom;
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

pub mod emitter;
pub mod error;
pub mod io;
pub mod plain;
pub mod token;
pub mod tokenizer;
pub mod tree;

mod value;

pub use emitter::{Emitter, IntoItem};
pub use plain::{decode_plain, PlainValue};
pub use token::{Name, Token};
pub use tokenizer::Tokenizer;
pub use tree::{decode_tree, encode_tree};
pub use value::*;

#[cfg(test)]
mod test;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound or List.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Raw bytes with an i32 length.
    ByteArray = 7,
    /// A UTF-8 string with a u16 length.
    String = 8,
    /// A list of unnamed values that all have the same tag.
    List = 9,
    /// A struct-like structure of named values.
    Compound = 10,
}

/// Tags indexed by their ordinal on the wire.
const TAGS_BY_ORDINAL: [Tag; 11] = [
    Tag::End,
    Tag::Byte,
    Tag::Short,
    Tag::Int,
    Tag::Long,
    Tag::Float,
    Tag::Double,
    Tag::ByteArray,
    Tag::String,
    Tag::List,
    Tag::Compound,
];

impl Tag {
    /// The byte that represents this tag on the wire.
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        TAGS_BY_ORDINAL.get(value as usize).copied().ok_or(())
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag.ordinal()
    }
}

/// Tokenize a gzip compressed document.
pub fn tokenize<R: Read>(reader: R) -> Tokenizer<GzDecoder<R>> {
    Tokenizer::new(GzDecoder::new(reader))
}

/// Emit a gzip compressed document. `body` is given an emitter and must
/// produce one complete document, starting with the root compound. Returns
/// the writer once the gzip stream is finished.
///
/// ```
/// use nbtfile::Tag;
///
/// # fn main() -> nbtfile::error::Result<()> {
/// let bytes = nbtfile::emit(Vec::new(), |e| {
///     e.with_compound("test", |e| {
///         e.with_list("foo", Tag::Byte, |e| {
///             e.emit_item(12)?;
///             e.emit_item(43)
///         })
///     })
/// })?;
/// assert!(!bytes.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn emit<W, F>(writer: W, body: F) -> error::Result<W>
where
    W: Write,
    F: FnOnce(&mut Emitter<GzEncoder<W>>) -> error::Result<()>,
{
    let mut emitter = Emitter::new(GzEncoder::new(writer, Compression::default()));
    body(&mut emitter)?;
    let encoder = emitter.finish()?;
    Ok(encoder.finish()?)
}

/// Read a gzip compressed document as a typed tree.
pub fn read<R: Read>(reader: R) -> error::Result<(String, Compound)> {
    decode_tree(GzDecoder::new(reader))
}

/// Write `root` as a gzip compressed document named `name`, returning the
/// writer.
pub fn write<W: Write>(writer: W, name: &str, root: &Compound) -> error::Result<W> {
    emit(writer, |e| {
        e.with_compound(name, |e| tree::emit_members(e, root))
    })
}

/// Read a gzip compressed document as a [`PlainValue`]. See
/// [`decode_plain`].
pub fn load<R: Read>(reader: R) -> error::Result<PlainValue> {
    decode_plain(GzDecoder::new(reader))
}
