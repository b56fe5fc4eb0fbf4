//! Push tokens into a writer as NBT bytes.

use std::io::Write;

use crate::error::{Error, Result};
use crate::io::{array_len, string_len, write_f32, write_f64, write_fixed_int, WriteNbt};
use crate::{Name, Tag, Token};

/// Emitter is the dual of [`Tokenizer`][crate::Tokenizer]: it accepts the
/// same tokens and writes the equivalent bytes. Does not do compression, see
/// [`emit`][crate::emit] for gzip output.
///
/// A list is prefixed by its element count on the wire, but the count is only
/// known when the list's `End` arrives. Each open list therefore writes its
/// elements into its own buffer. Anything emitted inside a list, including
/// nested lists once they close, lands in the innermost open list's buffer;
/// when a list closes its header and body are written to the next buffer out,
/// or to the real writer if no other list is open.
///
/// Names, strings and byte arrays are checked before anything is written, so
/// a token rejected for its content leaves the writer and the open list
/// counts untouched and the document can carry on. If writing itself fails
/// the writer is left holding an incomplete document, which should be
/// discarded.
///
/// # Example
///
/// ```
/// use nbtfile::{Emitter, Tag, Token};
///
/// # fn main() -> nbtfile::error::Result<()> {
/// let mut emitter = Emitter::new(Vec::new());
/// emitter.with_compound("level", |e| {
///     e.emit_token(Token::Int("version".into(), 19133))?;
///     e.with_list("scores", Tag::Short, |e| {
///         e.emit_item(12)?;
///         e.emit_item(43)
///     })
/// })?;
/// let bytes = emitter.finish()?;
/// assert_eq!(bytes[0], 0x0a);
/// # Ok(())
/// # }
/// ```
pub struct Emitter<W: Write> {
    writer: W,
    position: Position,
    layers: Vec<Layer>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    Top,
    Body,
    Finished,
}

#[derive(Debug)]
enum Layer {
    List {
        element: Tag,
        count: usize,
        body: Vec<u8>,
    },
    Compound,
}

/// Where bytes for the current token go: the innermost open list's body, or
/// the real writer.
fn sink<'a, W: Write>(writer: &'a mut W, layers: &'a mut [Layer]) -> &'a mut dyn Write {
    for layer in layers.iter_mut().rev() {
        if let Layer::List { body, .. } = layer {
            return body;
        }
    }
    writer
}

impl<W: Write> Emitter<W> {
    /// Create an emitter that writes an uncompressed document to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: Position::Top,
            layers: Vec::new(),
        }
    }

    /// Emit a single token.
    pub fn emit_token(&mut self, token: Token) -> Result<()> {
        // Validate before anything reaches the writer.
        check_payload(&token)?;

        match self.position {
            Position::Finished => Err(Error::structure(format!(
                "unexpected {:?} after the end of the document",
                token.tag()
            ))),
            Position::Top => self.emit_root(token),
            Position::Body => match self.layers.last() {
                Some(Layer::List { element, .. }) => {
                    let element = *element;
                    self.emit_in_list(element, token)
                }
                Some(Layer::Compound) => self.emit_in_compound(token),
                None => Err(Error::structure("no open compound or list")),
            },
        }
    }

    /// Emit the next element of the innermost list. The value is converted
    /// to the list's element kind.
    pub fn emit_item<T: IntoItem>(&mut self, value: T) -> Result<()> {
        let element = match (self.position, self.layers.last()) {
            (Position::Body, Some(Layer::List { element, .. })) => *element,
            _ => return Err(Error::structure("emit_item called outside of a list")),
        };
        let token = value.into_item(element)?;
        self.emit_token(token)
    }

    /// Emit a compound, run `body` to fill it, then emit the matching `End`.
    /// The `End` is emitted even if `body` fails; the error from `body` is
    /// the one returned.
    ///
    /// Inside a list the name is ignored.
    pub fn with_compound<F>(&mut self, name: impl Into<Name>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.emit_token(Token::Compound(name.into()))?;
        let result = body(self);
        let end = self.emit_token(Token::end());
        result.and(end)
    }

    /// Emit a list of `element`s, run `body` to fill it, then emit the
    /// matching `End`. The `End` is emitted even if `body` fails; the error
    /// from `body` is the one returned.
    ///
    /// Inside a list the name is ignored.
    pub fn with_list<F>(&mut self, name: impl Into<Name>, element: Tag, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.emit_token(Token::List(name.into(), element))?;
        let result = body(self);
        let end = self.emit_token(Token::end());
        result.and(end)
    }

    /// Whether the root compound has been closed.
    pub fn is_finished(&self) -> bool {
        self.position == Position::Finished
    }

    /// Gets a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Return the underlying writer, provided the document is complete.
    pub fn finish(self) -> Result<W> {
        if self.is_finished() {
            Ok(self.writer)
        } else {
            Err(Error::structure(format!(
                "document incomplete with {} open compounds or lists",
                self.layers.len()
            )))
        }
    }

    /// Return the underlying writer whether or not the document is complete.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit_root(&mut self, token: Token) -> Result<()> {
        match token {
            Token::Compound(Name::Key(name)) => {
                check_key(&name)?;
                self.writer.write_tag(Tag::Compound)?;
                self.writer.write_size_prefixed_bytes(&name)?;
                self.layers.push(Layer::Compound);
                self.position = Position::Body;
                Ok(())
            }
            Token::Compound(_) => Err(Error::structure("root compound needs a name")),
            other => Err(Error::no_root_compound(other.tag())),
        }
    }

    fn emit_in_compound(&mut self, token: Token) -> Result<()> {
        if let Token::End(_) = token {
            let out = sink(&mut self.writer, &mut self.layers);
            out.write_tag(Tag::End)?;
            self.pop_layer();
            return Ok(());
        }

        let name = match token.name() {
            Name::Key(key) => key,
            _ => {
                return Err(Error::structure(format!(
                    "{:?} in a compound needs a name",
                    token.tag()
                )))
            }
        };
        check_key(name)?;

        let out = sink(&mut self.writer, &mut self.layers);
        out.write_tag(token.tag())?;
        out.write_size_prefixed_bytes(name)?;
        self.emit_payload(token)
    }

    fn emit_in_list(&mut self, element: Tag, token: Token) -> Result<()> {
        if let Token::End(_) = token {
            let (element, count, body) = match self.layers.pop() {
                Some(Layer::List {
                    element,
                    count,
                    body,
                }) => (element, count, body),
                _ => return Err(Error::structure("expected to be in a list")),
            };

            let out = sink(&mut self.writer, &mut self.layers);
            out.write_list_header(element, count)?;
            out.write_all(&body)?;
            if self.layers.is_empty() {
                self.position = Position::Finished;
            }
            return Ok(());
        }

        if token.tag() != element {
            return Err(Error::structure(format!(
                "unexpected {:?} in a list of {:?}",
                token.tag(),
                element
            )));
        }

        // A nested list or compound pushes its own layer, so remember ours.
        let depth = self.layers.len() - 1;
        self.emit_payload(token)?;
        if let Some(Layer::List { count, .. }) = self.layers.get_mut(depth) {
            *count += 1;
        }
        Ok(())
    }

    fn emit_payload(&mut self, token: Token) -> Result<()> {
        let out = sink(&mut self.writer, &mut self.layers);
        match token {
            Token::End(_) => return Err(Error::structure("End has no payload")),
            Token::Byte(_, v) => write_fixed_int(out, 1, v.into())?,
            Token::Short(_, v) => write_fixed_int(out, 2, v.into())?,
            Token::Int(_, v) => write_fixed_int(out, 4, v.into())?,
            Token::Long(_, v) => write_fixed_int(out, 8, v)?,
            Token::Float(_, v) => write_f32(out, v)?,
            Token::Double(_, v) => write_f64(out, v)?,
            Token::ByteArray(_, bytes) => out.write_byte_array(&bytes)?,
            Token::String(_, bytes) => out.write_size_prefixed_bytes(&bytes)?,
            Token::List(_, element) => self.layers.push(Layer::List {
                element,
                count: 0,
                body: Vec::new(),
            }),
            Token::Compound(_) => self.layers.push(Layer::Compound),
        }
        Ok(())
    }

    fn pop_layer(&mut self) {
        self.layers.pop();
        if self.layers.is_empty() {
            self.position = Position::Finished;
        }
    }
}

fn check_payload(token: &Token) -> Result<()> {
    match token {
        Token::String(_, bytes) => {
            std::str::from_utf8(bytes).map_err(|_| Error::nonunicode(bytes))?;
            string_len(bytes.len())?;
        }
        Token::ByteArray(_, bytes) => {
            array_len(bytes.len())?;
        }
        _ => {}
    }
    Ok(())
}

fn check_key(key: &[u8]) -> Result<()> {
    std::str::from_utf8(key).map_err(|_| Error::nonunicode(key))?;
    string_len(key.len())?;
    Ok(())
}

/// Values that [`Emitter::emit_item`] can turn into a list element of a given
/// kind.
pub trait IntoItem {
    /// Convert to a list element of kind `element`, or fail if the value does
    /// not fit that kind.
    fn into_item(self, element: Tag) -> Result<Token>;
}

fn item_mismatch(element: Tag, what: &str) -> Error {
    Error::structure(format!("cannot emit {} into a list of {:?}", what, element))
}

impl IntoItem for i64 {
    fn into_item(self, element: Tag) -> Result<Token> {
        use std::convert::TryFrom;

        let out_of_range = |_| Error::out_of_range(format!("{} as {:?}", self, element));
        let name = Name::None;
        Ok(match element {
            Tag::Byte => Token::Byte(name, i8::try_from(self).map_err(out_of_range)?),
            Tag::Short => Token::Short(name, i16::try_from(self).map_err(out_of_range)?),
            Tag::Int => Token::Int(name, i32::try_from(self).map_err(out_of_range)?),
            Tag::Long => Token::Long(name, self),
            _ => return Err(item_mismatch(element, "an integer")),
        })
    }
}

macro_rules! into_item_widening {
    ($($ty:ty),*) => {
        $(
            impl IntoItem for $ty {
                fn into_item(self, element: Tag) -> Result<Token> {
                    i64::from(self).into_item(element)
                }
            }
        )*
    };
}

into_item_widening!(i8, i16, i32, u8, u16, u32);

impl IntoItem for f64 {
    fn into_item(self, element: Tag) -> Result<Token> {
        match element {
            Tag::Float => Ok(Token::Float(Name::None, self as f32)),
            Tag::Double => Ok(Token::Double(Name::None, self)),
            _ => Err(item_mismatch(element, "a float")),
        }
    }
}

impl IntoItem for f32 {
    fn into_item(self, element: Tag) -> Result<Token> {
        match element {
            Tag::Float => Ok(Token::Float(Name::None, self)),
            Tag::Double => Ok(Token::Double(Name::None, self.into())),
            _ => Err(item_mismatch(element, "a float")),
        }
    }
}

impl IntoItem for &str {
    fn into_item(self, element: Tag) -> Result<Token> {
        match element {
            Tag::String => Ok(Token::string(Name::None, self)),
            _ => Err(item_mismatch(element, "a string")),
        }
    }
}

impl IntoItem for String {
    fn into_item(self, element: Tag) -> Result<Token> {
        match element {
            Tag::String => Ok(Token::String(Name::None, self.into_bytes())),
            _ => Err(item_mismatch(element, "a string")),
        }
    }
}

impl IntoItem for &[u8] {
    fn into_item(self, element: Tag) -> Result<Token> {
        self.to_vec().into_item(element)
    }
}

impl IntoItem for Vec<u8> {
    fn into_item(self, element: Tag) -> Result<Token> {
        match element {
            Tag::ByteArray => Ok(Token::ByteArray(Name::None, self)),
            _ => Err(item_mismatch(element, "a byte array")),
        }
    }
}
