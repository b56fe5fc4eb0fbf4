//! Fixed width integer and float codec, plus the small wire primitives shared
//! by the tokenizer and emitter.
//!
//! NBT stores every number big-endian. Integers are two's complement and are
//! 1, 2, 4 or 8 bytes wide.
use std::convert::{TryFrom, TryInto};
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::Tag;

fn check_width(n_bytes: usize) -> Result<u32> {
    match n_bytes {
        1 | 2 | 4 | 8 => Ok(8 * n_bytes as u32),
        _ => Err(Error::out_of_range(format!(
            "integer width of {} bytes",
            n_bytes
        ))),
    }
}

/// Read a big-endian signed integer that is `n_bytes` wide.
pub fn read_fixed_int<R: Read + ?Sized>(reader: &mut R, n_bytes: usize) -> Result<i64> {
    let bits = check_width(n_bytes)?;
    let raw = reader.read_uint::<BigEndian>(n_bytes)?;

    if bits == 64 {
        return Ok(raw as i64);
    }

    let sign_bit = 1u64 << (bits - 1);
    if raw & sign_bit != 0 {
        Ok(raw as i64 - (1i64 << bits))
    } else {
        Ok(raw as i64)
    }
}

/// Write `value` as a big-endian signed integer that is `n_bytes` wide. Fails
/// without writing anything if the value does not fit.
pub fn write_fixed_int<W: Write + ?Sized>(writer: &mut W, n_bytes: usize, value: i64) -> Result<()> {
    let bits = check_width(n_bytes)?;

    let raw = if bits == 64 {
        value as u64
    } else {
        let limit = 1i64 << (bits - 1);
        if value < -limit || value >= limit {
            return Err(Error::out_of_range(format!(
                "{} does not fit in {} bits",
                value, bits
            )));
        }
        (value as u64) & ((1u64 << bits) - 1)
    };

    writer.write_uint::<BigEndian>(raw, n_bytes)?;
    Ok(())
}

pub fn read_f32<R: Read + ?Sized>(reader: &mut R) -> Result<f32> {
    Ok(reader.read_f32::<BigEndian>()?)
}

pub fn read_f64<R: Read + ?Sized>(reader: &mut R) -> Result<f64> {
    Ok(reader.read_f64::<BigEndian>()?)
}

pub fn write_f32<W: Write + ?Sized>(writer: &mut W, value: f32) -> Result<()> {
    writer.write_f32::<BigEndian>(value)?;
    Ok(())
}

pub fn write_f64<W: Write + ?Sized>(writer: &mut W, value: f64) -> Result<()> {
    writer.write_f64::<BigEndian>(value)?;
    Ok(())
}

/// Read exactly `len` bytes without trusting `len` for the allocation up
/// front.
fn read_bytes<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

/// The u16 length prefix for a string or name of `len` bytes.
pub(crate) fn string_len(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::out_of_range(format!("string of {} bytes", len)))
}

/// The i32 length prefix for a byte array or list of `len` elements.
pub(crate) fn array_len(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| Error::out_of_range(format!("length {} too large", len)))
}

pub(crate) trait ReadNbt: Read {
    fn read_tag(&mut self) -> Result<Tag> {
        let ordinal = self.read_u8()?;
        Tag::try_from(ordinal).map_err(|_| Error::invalid_tag(ordinal))
    }

    /// A u16 length followed by that many bytes. The bytes are not checked
    /// to be UTF-8.
    fn read_size_prefixed_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u16::<BigEndian>()? as usize;
        read_bytes(self, len)
    }

    fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let len = self.read_i32::<BigEndian>()?;
        let len: usize = len
            .try_into()
            .map_err(|_| Error::structure(format!("negative byte array length {}", len)))?;
        read_bytes(self, len)
    }

    fn read_list_header(&mut self) -> Result<(Tag, i32)> {
        let element = self.read_tag()?;
        let len = self.read_i32::<BigEndian>()?;
        if len < 0 {
            return Err(Error::structure(format!("negative list length {}", len)));
        }
        if element == Tag::End && len != 0 {
            return Err(Error::structure(format!(
                "list of End tags with {} elements",
                len
            )));
        }
        Ok((element, len))
    }
}

impl<T> ReadNbt for T where T: Read + ?Sized {}

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag.ordinal())?;
        Ok(())
    }

    fn write_size_prefixed_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len = string_len(bytes.len())?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(bytes)?;
        Ok(())
    }

    fn write_byte_array(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_len(bytes.len())?;
        self.write_all(bytes)?;
        Ok(())
    }

    fn write_list_header(&mut self, element: Tag, len: usize) -> Result<()> {
        self.write_tag(element)?;
        self.write_len(len)
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = array_len(len)?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write + ?Sized {}
