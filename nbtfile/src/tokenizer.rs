//! Pull tokens out of an NBT byte stream without prior knowledge of the
//! structure.

use std::io::Read;

use crate::error::{Error, Result};
use crate::io::{read_f32, read_f64, read_fixed_int, ReadNbt};
use crate::{Name, Tag, Token};

/// Tokenizer can take any reader and split it into [`Token`]s. Does not do
/// decompression, see [`tokenize`][crate::tokenize] for gzip input.
///
/// Each call to [`next_token`][Tokenizer::next_token] reads exactly the bytes
/// of one token. Nesting is tracked with an explicit stack of layers, so
/// arbitrarily deep documents do not recurse.
///
/// Once the root compound is closed, or any error is returned, the tokenizer
/// is finished and only returns `None`.
///
/// # Example
///
/// Dump a document with some indentation to show the structure.
///
/// ```
/// use nbtfile::{Tokenizer, Token};
///
/// let input = [0x0a, 0x00, 0x03, b'f', b'o', b'o', 0x00];
/// let mut indent = 0;
///
/// for token in Tokenizer::new(&input[..]) {
///     let token = token.unwrap();
///     if let Token::End(_) = token {
///         indent -= 4;
///     }
///     println!("{:indent$}{:?}", "", token, indent = indent);
///     if let Token::Compound(_) | Token::List(..) = token {
///         indent += 4;
///     }
/// }
/// ```
pub struct Tokenizer<R: Read> {
    reader: R,
    position: Position,
    layers: Vec<Layer>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    Top,
    Body,
    Finished,
}

#[derive(Debug, Clone)]
enum Layer {
    List { element: Tag, len: i32, offset: i32 },
    Compound,
}

impl<R: Read> Tokenizer<R> {
    /// Create new tokenizer for the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            position: Position::Top,
            layers: Vec::new(),
        }
    }

    /// Read the next token. Returns `Ok(None)` once the document is complete.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let result = self.next_inner();
        if result.is_err() {
            self.position = Position::Finished;
        }
        result
    }

    /// How many compounds and lists are currently open.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes this tokenizer, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_inner(&mut self) -> Result<Option<Token>> {
        match self.position {
            Position::Finished => Ok(None),
            Position::Top => {
                let tag = self.reader.read_tag()?;
                if tag != Tag::Compound {
                    return Err(Error::no_root_compound(tag));
                }
                let name = self.reader.read_size_prefixed_bytes()?;
                self.layers.push(Layer::Compound);
                self.position = Position::Body;
                Ok(Some(Token::Compound(Name::Key(name))))
            }
            Position::Body => self.next_in_layer().map(Some),
        }
    }

    fn next_in_layer(&mut self) -> Result<Token> {
        match self.layers.last_mut() {
            Some(Layer::List {
                element,
                len,
                offset,
            }) => {
                if *offset < *len {
                    let element = *element;
                    let index = *offset;
                    *offset += 1;
                    self.read_payload(element, Name::Index(index))
                } else {
                    let len = *len;
                    self.pop_layer();
                    Ok(Token::End(Name::Index(len)))
                }
            }
            Some(Layer::Compound) => {
                let tag = self.reader.read_tag()?;
                if tag == Tag::End {
                    // End tags have no name or value.
                    self.pop_layer();
                    return Ok(Token::End(Name::None));
                }

                let name = self.reader.read_size_prefixed_bytes()?;
                self.read_payload(tag, Name::Key(name))
            }
            None => Err(Error::structure("read past the end of the document")),
        }
    }

    fn pop_layer(&mut self) {
        self.layers.pop();
        if self.layers.is_empty() {
            self.position = Position::Finished;
        }
    }

    fn read_payload(&mut self, tag: Tag, name: Name) -> Result<Token> {
        let reader = &mut self.reader;
        Ok(match tag {
            Tag::End => return Err(Error::structure("unexpected End tag with a payload")),
            Tag::Byte => Token::Byte(name, read_fixed_int(reader, 1)? as i8),
            Tag::Short => Token::Short(name, read_fixed_int(reader, 2)? as i16),
            Tag::Int => Token::Int(name, read_fixed_int(reader, 4)? as i32),
            Tag::Long => Token::Long(name, read_fixed_int(reader, 8)?),
            Tag::Float => Token::Float(name, read_f32(reader)?),
            Tag::Double => Token::Double(name, read_f64(reader)?),
            Tag::ByteArray => Token::ByteArray(name, reader.read_byte_array()?),
            Tag::String => Token::String(name, reader.read_size_prefixed_bytes()?),
            Tag::List => {
                let (element, len) = reader.read_list_header()?;
                self.layers.push(Layer::List {
                    element,
                    len,
                    offset: 0,
                });
                Token::List(name, element)
            }
            Tag::Compound => {
                self.layers.push(Layer::Compound);
                Token::Compound(name)
            }
        })
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
