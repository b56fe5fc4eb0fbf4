//! Region files: many independently compressed NBT chunks in one file.
//!
//! A region holds a 32x32 grid of chunks. [`RegionFile`] stores and fetches
//! the raw bytes of each chunk, compressing them on the way in. Those bytes
//! are usually an NBT document, and [`RegionFile::get_document`] and
//! [`RegionFile::store_document`] go straight to and from a
//! [`nbtfile::Compound`].
//!
//! [`RegionDirectory`] maps world chunk coordinates onto the region files of
//! a directory.
//!
//! ```no_run
//! use nbtregion::RegionFile;
//!
//! # fn main() -> nbtregion::Result<()> {
//! let mut region = RegionFile::open("world/region/r.0.0.mcr")?;
//! region.store_chunk(3, 7, b"chunk data")?;
//! assert_eq!(region.get_chunk(3, 7)?.as_deref(), Some(&b"chunk data"[..]));
//! region.delete_chunk(3, 7)?;
//! # Ok(())
//! # }
//! ```

mod files;
mod region;

pub use files::*;
pub use flate2::Compression;
pub use region::*;

#[cfg(test)]
mod test;

#[derive(Debug)]
pub enum Error {
    InsufficientData,
    Io(std::io::Error),
    Nbt(nbtfile::error::Error),
    InvalidOffset(usize, usize),
    InvalidChunkMeta(u8),
    ChunkTooLarge,
    RegionFull,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<nbtfile::error::Error> for Error {
    fn from(err: nbtfile::error::Error) -> Error {
        Error::Nbt(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InsufficientData => f.write_str("insufficient data to parse chunk"),
            Error::Io(e) => f.write_fmt(format_args!("io error: {}", e)),
            Error::Nbt(e) => f.write_fmt(format_args!("nbt error: {}", e)),
            Error::InvalidOffset(x, z) => {
                f.write_fmt(format_args!("invalid offset: x = {}, z = {}", x, z))
            }
            Error::InvalidChunkMeta(scheme) => f.write_fmt(format_args!(
                "compression scheme {} was not recognised for chunk",
                scheme
            )),
            Error::ChunkTooLarge => f.write_str("chunk needs more than 255 sectors"),
            Error::RegionFull => f.write_str("region has no sector addresses left"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Nbt(e) => Some(e),
            _ => None,
        }
    }
}
