use std::convert::TryFrom;
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::{Name, Tag, Token};

#[allow(clippy::float_cmp)]
mod value;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(Tag::$tag), $val);
            assert_eq!(Tag::try_from($val as u8), Ok(Tag::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
    }

    for value in 11..=u8::MAX {
        assert!(Tag::try_from(value).is_err())
    }
}

pub fn key(n: &str) -> Name {
    Name::Key(n.as_bytes().to_vec())
}

pub fn index(i: i32) -> Name {
    Name::Index(i)
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

/// Documents with the exact tokens they consist of. The tokenizer must
/// produce these tokens from the bytes, and the emitter must produce these
/// bytes from the tokens.
pub fn documents() -> Vec<(&'static str, Vec<u8>, Vec<Token>)> {
    let mut docs = vec![
        (
            "basic document",
            b"\x0a\x00\x03foo\x00".to_vec(),
            vec![Token::Compound(key("foo")), Token::End(Name::None)],
        ),
        (
            "signed integers",
            b"\x0a\x00\x03foo\x03\x00\x03bar\xff\xff\xff\xfe\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Int(key("bar"), -2),
                Token::end(),
            ],
        ),
        (
            "int field",
            b"\x0a\x00\x03foo\x03\x00\x03bar\x01\x02\x03\x04\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Int(key("bar"), 0x01020304),
                Token::end(),
            ],
        ),
        (
            "short field",
            b"\x0a\x00\x03foo\x02\x00\x03bar\x4e\x5a\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Short(key("bar"), 0x4e5a),
                Token::end(),
            ],
        ),
        (
            "byte field",
            b"\x0a\x00\x03foo\x01\x00\x03bar\x4e\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Byte(key("bar"), 0x4e),
                Token::end(),
            ],
        ),
        (
            "string field",
            b"\x0a\x00\x03foo\x08\x00\x03bar\x00\x04hoge\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::string("bar", "hoge"),
                Token::end(),
            ],
        ),
        (
            "byte array field",
            b"\x0a\x00\x03foo\x07\x00\x03bar\x00\x00\x00\x05\x01\x02\x03\x04\x05\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::ByteArray(key("bar"), vec![1, 2, 3, 4, 5]),
                Token::end(),
            ],
        ),
        (
            "long field",
            b"\x0a\x00\x03foo\x04\x00\x03bar\x01\x02\x03\x04\x05\x06\x07\x08\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Long(key("bar"), 0x0102030405060708),
                Token::end(),
            ],
        ),
        (
            "float field",
            b"\x0a\x00\x03foo\x05\x00\x03bar\x3f\xa0\x00\x00\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Float(key("bar"), 1.25),
                Token::end(),
            ],
        ),
        (
            "double field",
            b"\x0a\x00\x03foo\x06\x00\x03bar\x3f\xf4\x00\x00\x00\x00\x00\x00\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Double(key("bar"), 1.25),
                Token::end(),
            ],
        ),
        (
            "nested compound",
            b"\x0a\x00\x03foo\x0a\x00\x03bar\x01\x00\x04hoge\x4e\x00\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::Compound(key("bar")),
                Token::Byte(key("hoge"), 0x4e),
                Token::end(),
                Token::end(),
            ],
        ),
        (
            "nested lists",
            b"\x0a\x00\x03foo\x09\x00\x03bar\x09\x00\x00\x00\x01\x01\x00\x00\x00\x01\x4a\x00"
                .to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::List(key("bar"), Tag::List),
                Token::List(index(0), Tag::Byte),
                Token::Byte(index(0), 0x4a),
                Token::End(index(1)),
                Token::End(index(1)),
                Token::end(),
            ],
        ),
        (
            "empty list",
            b"\x0a\x00\x03foo\x09\x00\x03bar\x00\x00\x00\x00\x00\x00".to_vec(),
            vec![
                Token::Compound(key("foo")),
                Token::List(key("bar"), Tag::End),
                Token::End(index(0)),
                Token::end(),
            ],
        ),
        (
            "compounds in a list",
            b"\x0a\x00\x00\x09\x00\x01l\x0a\x00\x00\x00\x02\x01\x00\x01a\x01\x00\x00\x00".to_vec(),
            vec![
                Token::Compound(key("")),
                Token::List(key("l"), Tag::Compound),
                Token::Compound(index(0)),
                Token::Byte(key("a"), 1),
                Token::end(),
                Token::Compound(index(1)),
                Token::end(),
                Token::End(index(2)),
                Token::end(),
            ],
        ),
    ];

    // Two elements of each simple numeric kind in a list, 9 then 5.
    let simple: [(Tag, Vec<u8>, fn(Name, i64) -> Token); 6] = [
        (Tag::Byte, vec![9, 5], |n, v| Token::Byte(n, v as i8)),
        (Tag::Short, vec![0, 9, 0, 5], |n, v| Token::Short(n, v as i16)),
        (Tag::Int, vec![0, 0, 0, 9, 0, 0, 0, 5], |n, v| {
            Token::Int(n, v as i32)
        }),
        (
            Tag::Long,
            [9i64.to_be_bytes(), 5i64.to_be_bytes()].concat(),
            |n, v| Token::Long(n, v),
        ),
        (
            Tag::Float,
            [9f32.to_be_bytes(), 5f32.to_be_bytes()].concat(),
            |n, v| Token::Float(n, v as f32),
        ),
        (
            Tag::Double,
            [9f64.to_be_bytes(), 5f64.to_be_bytes()].concat(),
            |n, v| Token::Double(n, v as f64),
        ),
    ];

    for (tag, payload, make) in simple.iter() {
        let mut bytes = b"\x0a\x00\x03foo\x09\x00\x03bar".to_vec();
        bytes.push(tag.ordinal());
        bytes.extend_from_slice(&2i32.to_be_bytes());
        bytes.extend_from_slice(payload);
        bytes.push(0);

        docs.push((
            "list of simple values",
            bytes,
            vec![
                Token::Compound(key("foo")),
                Token::List(key("bar"), *tag),
                make(index(0), 9),
                make(index(1), 5),
                Token::End(index(2)),
                Token::end(),
            ],
        ));
    }

    docs
}
