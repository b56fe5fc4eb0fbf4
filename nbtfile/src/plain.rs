//! A loose view of a document for callers who only want to look at the data
//! and never write it back.

use std::io::Read;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::{Name, Token, Tokenizer};

/// NBT data with the tag kinds folded away: all integers are `i64`, all
/// floats `f64`. Compounds keep their key order.
///
/// This implements `Serialize`, so it can be handed to any serde format, eg
/// `serde_json::to_string(&plain)`. Byte arrays serialize as bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlainValue {
    Integer(i64),
    Float(f64),
    #[serde(with = "serde_bytes")]
    Bytes(Vec<u8>),
    String(String),
    List(Vec<PlainValue>),
    Map(IndexMap<String, PlainValue>),
}

impl PlainValue {
    pub fn get(&self, key: &str) -> Option<&PlainValue> {
        match self {
            PlainValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            PlainValue::Integer(v) => Some(v),
            _ => None,
        }
    }
}

/// Read an uncompressed document as a [`PlainValue`]. The result is a map
/// with a single entry, the root compound under its own name. Strings and
/// keys that are not valid UTF-8 are decoded lossily.
pub fn decode_plain<R: Read>(reader: R) -> Result<PlainValue> {
    let mut stack: Vec<(Name, PlainValue)> = vec![(Name::None, PlainValue::Map(IndexMap::new()))];

    for token in Tokenizer::new(reader) {
        let (name, value) = match token? {
            Token::End(_) => match stack.pop() {
                Some(entry) => entry,
                None => return Err(Error::structure("unbalanced End")),
            },
            Token::Compound(name) => {
                stack.push((name, PlainValue::Map(IndexMap::new())));
                continue;
            }
            Token::List(name, _) => {
                stack.push((name, PlainValue::List(Vec::new())));
                continue;
            }
            Token::Byte(name, v) => (name, PlainValue::Integer(v.into())),
            Token::Short(name, v) => (name, PlainValue::Integer(v.into())),
            Token::Int(name, v) => (name, PlainValue::Integer(v.into())),
            Token::Long(name, v) => (name, PlainValue::Integer(v)),
            Token::Float(name, v) => (name, PlainValue::Float(v.into())),
            Token::Double(name, v) => (name, PlainValue::Float(v)),
            Token::ByteArray(name, v) => (name, PlainValue::Bytes(v)),
            Token::String(name, v) => (
                name,
                PlainValue::String(String::from_utf8_lossy(&v).into_owned()),
            ),
        };

        match stack.last_mut() {
            Some((_, PlainValue::Map(map))) => {
                let key = match name {
                    Name::Key(key) => String::from_utf8_lossy(&key).into_owned(),
                    _ => return Err(Error::structure("compound member without a name")),
                };
                map.insert(key, value);
            }
            Some((_, PlainValue::List(items))) => items.push(value),
            _ => return Err(Error::structure("value outside of a container")),
        }
    }

    match stack.pop() {
        Some((_, root)) if stack.is_empty() => Ok(root),
        _ => Err(Error::structure("document ended before the root compound closed")),
    }
}
