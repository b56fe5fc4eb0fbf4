//! Read and write whole documents as a [`Compound`] tree.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::{Compound, Emitter, List, Name, Token, Tokenizer, Value};

/// Read an uncompressed document, returning the root compound's name and
/// contents.
///
/// Every scalar keeps its tag, so writing the result back with
/// [`encode_tree`] reproduces the input. A string, key or root name that is
/// not valid UTF-8 is an error.
pub fn decode_tree<R: Read>(reader: R) -> Result<(String, Compound)> {
    let mut tokenizer = Tokenizer::new(reader);

    let root_name = match tokenizer.next_token()? {
        Some(Token::Compound(Name::Key(name))) => utf8(name)?,
        _ => return Err(Error::structure("expected root compound")),
    };

    // Containers still being filled, with the name they will be inserted
    // under once complete.
    let mut stack: Vec<(Name, Value)> = vec![(Name::None, Value::Compound(Compound::new()))];

    while let Some(token) = tokenizer.next_token()? {
        let (name, value) = match token {
            Token::End(_) => {
                let (name, value) = stack
                    .pop()
                    .ok_or_else(|| Error::structure("unbalanced End"))?;
                if stack.is_empty() {
                    return match value {
                        Value::Compound(root) => Ok((root_name, root)),
                        _ => Err(Error::structure("root is not a compound")),
                    };
                }
                (name, value)
            }
            Token::List(name, element) => {
                stack.push((name, Value::List(List::new(element))));
                continue;
            }
            Token::Compound(name) => {
                stack.push((name, Value::Compound(Compound::new())));
                continue;
            }
            Token::Byte(name, v) => (name, Value::Byte(v)),
            Token::Short(name, v) => (name, Value::Short(v)),
            Token::Int(name, v) => (name, Value::Int(v)),
            Token::Long(name, v) => (name, Value::Long(v)),
            Token::Float(name, v) => (name, Value::Float(v)),
            Token::Double(name, v) => (name, Value::Double(v)),
            Token::ByteArray(name, v) => (name, Value::ByteArray(v)),
            Token::String(name, v) => {
                (name, Value::String(utf8(v)?))
            }
        };

        match stack.last_mut() {
            Some((_, Value::Compound(parent))) => {
                let key = match name {
                    Name::Key(key) => utf8(key)?,
                    _ => return Err(Error::structure("compound member without a name")),
                };
                parent.insert(key, value);
            }
            Some((_, Value::List(parent))) => parent.push(value)?,
            _ => return Err(Error::structure("value outside of a container")),
        }
    }

    Err(Error::structure("document ended before the root compound closed"))
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::nonunicode(e.as_bytes()))
}

/// Write `root` as an uncompressed document named `name`.
pub fn encode_tree<W: Write>(writer: W, name: &str, root: &Compound) -> Result<()> {
    let mut emitter = Emitter::new(writer);
    emitter.with_compound(name, |e| emit_members(e, root))?;
    emitter.finish()?;
    Ok(())
}

pub(crate) fn emit_members<W: Write>(emitter: &mut Emitter<W>, compound: &Compound) -> Result<()> {
    for (key, value) in compound {
        emit_value(emitter, key.as_str().into(), value)?;
    }
    Ok(())
}

fn emit_value<W: Write>(emitter: &mut Emitter<W>, name: Name, value: &Value) -> Result<()> {
    match value {
        Value::Byte(v) => emitter.emit_token(Token::Byte(name, *v)),
        Value::Short(v) => emitter.emit_token(Token::Short(name, *v)),
        Value::Int(v) => emitter.emit_token(Token::Int(name, *v)),
        Value::Long(v) => emitter.emit_token(Token::Long(name, *v)),
        Value::Float(v) => emitter.emit_token(Token::Float(name, *v)),
        Value::Double(v) => emitter.emit_token(Token::Double(name, *v)),
        Value::ByteArray(v) => emitter.emit_token(Token::ByteArray(name, v.clone())),
        Value::String(v) => emitter.emit_token(Token::String(name, v.as_bytes().to_vec())),
        Value::List(list) => emitter.with_list(name, list.element_tag(), |e| {
            for item in list {
                emit_value(e, Name::None, item)?;
            }
            Ok(())
        }),
        Value::Compound(compound) => emitter.with_compound(name, |e| emit_members(e, compound)),
    }
}
