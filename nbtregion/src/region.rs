use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::ZlibEncoder;
use flate2::Compression;
use log::{debug, trace};
use nbtfile::Compound;
use num_enum::TryFromPrimitive;

use crate::{Error, Result};

/// the size in bytes of a 'sector' in a region file. Sectors are the
/// allocation unit for chunks. For example, a chunk might be `3 *
/// SECTOR_SIZE` bytes. The actual compressed bytes of a chunk may be smaller
/// and the exact value is tracked in the chunk header.
pub const SECTOR_SIZE: usize = 4096;

/// the size of the region file header: the location table then the timestamp
/// table, one sector each.
pub const REGION_HEADER_SIZE: usize = 2 * SECTOR_SIZE;

/// size of header for each chunk in the region file. This header precedes the
/// compressed chunk data.
pub const CHUNK_HEADER_SIZE: usize = 5;

/// Width and depth of a region in chunks.
pub const REGION_WIDTH: usize = 32;

/// First sector after the header, where chunk data starts.
const FIRST_DATA_SECTOR: u64 = 2;

/// Sector addresses are stored in 24 bits.
const MAX_SECTOR_ADDRESS: u64 = 0xFF_FFFF;

/// Sector counts are stored in 8 bits.
const MAX_SECTOR_COUNT: usize = 255;

/// A region file on disk: up to 32x32 independently compressed chunks, each
/// addressed by local coordinates `x` and `z` in `0..32`.
///
/// Space is handed out append-only. Each store writes the chunk at the
/// high-water mark of the file, and the sectors a chunk used before it was
/// rewritten or deleted are never reused. There is no compaction.
///
/// The file is only created by the first [`store_chunk`][Self::store_chunk],
/// and is removed again when the last chunk is deleted. It is reopened for
/// every operation, so nothing is held open between calls. Two `RegionFile`s
/// for the same path will not see each other's allocations and must not be
/// used together.
#[derive(Debug)]
pub struct RegionFile {
    path: PathBuf,
    // next free sector. Never below FIRST_DATA_SECTOR.
    high_water: u64,
    live: BTreeSet<usize>,
    compression: Compression,
}

impl RegionFile {
    /// Open the region at `path`. This never creates the file. If it exists,
    /// the set of stored chunks and the end of the allocated space are
    /// recovered from its location table.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut region = Self {
            path: path.into(),
            high_water: FIRST_DATA_SECTOR,
            live: BTreeSet::new(),
            compression: Compression::fast(),
        };

        let mut file = match region.open_existing(false)? {
            Some(file) => file,
            None => return Ok(region),
        };

        let mut table = vec![0u8; SECTOR_SIZE];
        read_header_sector(&mut file, &mut table)?;

        let mut entries = table.as_slice();
        for slot in 0..REGION_WIDTH * REGION_WIDTH {
            let loc = ChunkLocation::from_entry(entries.read_u32::<BigEndian>()?);
            if loc.is_empty() {
                continue;
            }

            region.live.insert(slot);
            region.high_water = region.high_water.max(loc.offset + loc.sectors);
        }

        debug!(
            "opened region {} with {} chunks, next sector {}",
            region.path.display(),
            region.live.len(),
            region.high_water
        );
        Ok(region)
    }

    /// Set the zlib compression level used when storing chunks.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of chunks currently stored.
    pub fn chunk_count(&self) -> usize {
        self.live.len()
    }

    /// Read the chunk at `x`, `z`, returning the uncompressed data, or `None`
    /// if there is no such chunk. Never creates the file.
    pub fn get_chunk(&self, x: usize, z: usize) -> Result<Option<Vec<u8>>> {
        let pos = header_pos(x, z)?;

        let mut file = match self.open_existing(false)? {
            Some(file) => file,
            None => return Ok(None),
        };

        let loc = match read_location(&mut file, pos)? {
            Some(loc) => loc,
            None => return Ok(None),
        };

        file.seek(SeekFrom::Start(loc.offset * SECTOR_SIZE as u64))?;
        let mut sectors = Vec::new();
        (&mut file)
            .take(loc.sectors * SECTOR_SIZE as u64)
            .read_to_end(&mut sectors)?;

        let meta = ChunkMeta::new(&sectors)?;
        let end = CHUNK_HEADER_SIZE + meta.compressed_len as usize;
        let compressed = sectors
            .get(CHUNK_HEADER_SIZE..end)
            .ok_or(Error::InsufficientData)?;

        trace!(
            "read chunk {},{} from sector {} ({:?}, {} bytes)",
            x,
            z,
            loc.offset,
            meta.compression_scheme,
            compressed.len()
        );

        let data = match meta.compression_scheme {
            CompressionScheme::Zlib => {
                let mut decoder = flate2::write::ZlibDecoder::new(vec![]);
                decoder.write_all(compressed)?;
                decoder.finish()?
            }
            CompressionScheme::Gzip => {
                let mut decoder = flate2::write::GzDecoder::new(vec![]);
                decoder.write_all(compressed)?;
                decoder.finish()?
            }
            CompressionScheme::Uncompressed => compressed.to_vec(),
        };

        Ok(Some(data))
    }

    /// Store `content` as the chunk at `x`, `z`, stamped with the current
    /// time. The data is zlib compressed. Creates the file if needed.
    pub fn store_chunk(&mut self, x: usize, z: usize, content: &[u8]) -> Result<()> {
        self.store_chunk_with_timestamp(x, z, content, now())
    }

    /// Store `content` as the chunk at `x`, `z` with the given timestamp, in
    /// seconds since the Unix epoch.
    ///
    /// The chunk always goes to fresh sectors at the end of the file. If the
    /// slot was already in use its old sectors are abandoned.
    pub fn store_chunk_with_timestamp(
        &mut self,
        x: usize,
        z: usize,
        content: &[u8],
        timestamp: u32,
    ) -> Result<()> {
        let pos = header_pos(x, z)?;

        let mut compressed = vec![];
        ZlibEncoder::new(content, self.compression).read_to_end(&mut compressed)?;

        let required_sectors =
            unstable_div_ceil(CHUNK_HEADER_SIZE + compressed.len(), SECTOR_SIZE);
        if required_sectors > MAX_SECTOR_COUNT {
            return Err(Error::ChunkTooLarge);
        }

        let offset = self.high_water;
        if offset > MAX_SECTOR_ADDRESS {
            return Err(Error::RegionFull);
        }

        let mut file = self.open_or_create()?;

        let mut payload = Vec::with_capacity(required_sectors * SECTOR_SIZE);
        payload.extend_from_slice(&chunk_meta(compressed.len(), CompressionScheme::Zlib)?);
        payload.extend_from_slice(&compressed);
        payload.resize(required_sectors * SECTOR_SIZE, 0);

        file.seek(SeekFrom::Start(offset * SECTOR_SIZE as u64))?;
        file.write_all(&payload)?;

        let loc = ChunkLocation {
            offset,
            sectors: required_sectors as u64,
        };
        write_header_entry(&mut file, pos, loc.to_entry())?;
        write_header_entry(&mut file, pos + SECTOR_SIZE as u64, timestamp)?;

        self.high_water = offset + loc.sectors;
        let slot = pos as usize / 4;
        if !self.live.insert(slot) {
            trace!("chunk {},{} rewritten, old sectors abandoned", x, z);
        }

        trace!(
            "allocated sectors {}..{} for chunk {},{}",
            offset,
            self.high_water,
            x,
            z
        );
        debug!("stored chunk {},{} in {}", x, z, self.path.display());
        Ok(())
    }

    /// Delete the chunk at `x`, `z`. Its slot is cleared and its timestamp
    /// refreshed. Deleting the last chunk removes the file. Deleting a chunk
    /// that does not exist is not an error.
    pub fn delete_chunk(&mut self, x: usize, z: usize) -> Result<()> {
        let pos = header_pos(x, z)?;
        let slot = pos as usize / 4;

        if let Some(mut file) = self.open_existing(true)? {
            write_header_entry(&mut file, pos, 0)?;
            write_header_entry(&mut file, pos + SECTOR_SIZE as u64, now())?;
        }

        self.live.remove(&slot);
        debug!("deleted chunk {},{} from {}", x, z, self.path.display());

        if self.live.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => debug!("removed empty region {}", self.path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            self.high_water = FIRST_DATA_SECTOR;
        }

        Ok(())
    }

    /// The timestamp recorded for `x`, `z`, or `None` if the file does not
    /// exist. A slot that was never written reads as 0.
    pub fn chunk_timestamp(&self, x: usize, z: usize) -> Result<Option<u32>> {
        let pos = header_pos(x, z)?;
        let mut file = match self.open_existing(false)? {
            Some(file) => file,
            None => return Ok(None),
        };

        file.seek(SeekFrom::Start(pos + SECTOR_SIZE as u64))?;
        Ok(Some(file.read_u32::<BigEndian>()?))
    }

    /// Where the chunk at `x`, `z` lives in the file, if it exists.
    pub fn chunk_location(&self, x: usize, z: usize) -> Result<Option<ChunkLocation>> {
        let pos = header_pos(x, z)?;
        match self.open_existing(false)? {
            Some(mut file) => read_location(&mut file, pos),
            None => Ok(None),
        }
    }

    /// Read the chunk at `x`, `z` as an NBT document.
    pub fn get_document(&self, x: usize, z: usize) -> Result<Option<(String, Compound)>> {
        match self.get_chunk(x, z)? {
            Some(data) => Ok(Some(nbtfile::decode_tree(data.as_slice())?)),
            None => Ok(None),
        }
    }

    /// Store `root` as an NBT document named `name` in the chunk at `x`, `z`.
    pub fn store_document(
        &mut self,
        x: usize,
        z: usize,
        name: &str,
        root: &Compound,
    ) -> Result<()> {
        let mut data = Vec::new();
        nbtfile::encode_tree(&mut data, name, root)?;
        self.store_chunk(x, z, &data)
    }

    fn open_existing(&self, write: bool) -> Result<Option<File>> {
        match OpenOptions::new().read(true).write(write).open(&self.path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn open_or_create(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;

        // zeroed location and timestamp tables.
        if file.metadata()?.len() < REGION_HEADER_SIZE as u64 {
            debug!("creating region file {}", self.path.display());
            file.set_len(REGION_HEADER_SIZE as u64)?;
        }
        Ok(file)
    }
}

fn now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

fn read_header_sector(file: &mut File, buf: &mut [u8]) -> Result<()> {
    file.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::InsufficientData,
        _ => e.into(),
    })
}

fn read_location(file: &mut File, pos: u64) -> Result<Option<ChunkLocation>> {
    file.seek(SeekFrom::Start(pos))?;
    let mut buf = [0u8; 4];
    read_header_sector(file, &mut buf)?;

    let loc = ChunkLocation::from_entry(u32::from_be_bytes(buf));
    if loc.is_empty() {
        Ok(None)
    } else {
        Ok(Some(loc))
    }
}

fn write_header_entry(file: &mut File, pos: u64, value: u32) -> Result<()> {
    file.seek(SeekFrom::Start(pos))?;
    file.write_u32::<BigEndian>(value)?;
    Ok(())
}

/// Length and compression method that precede the chunk data.
fn chunk_meta(compressed_len: usize, scheme: CompressionScheme) -> Result<[u8; 5]> {
    // the stored length includes the compression method byte, so +1.
    let len = u32::try_from(compressed_len + 1).map_err(|_| Error::ChunkTooLarge)?;

    let mut buf = [0u8; 5];
    let mut c = Cursor::new(buf.as_mut_slice());
    c.write_u32::<BigEndian>(len)?;
    c.write_u8(scheme as u8)?;
    Ok(buf)
}

/// Compression schemes a chunk payload can be stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CompressionScheme {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
}

// copied from rust std unstable_div_ceil function
pub const fn unstable_div_ceil(lhs: usize, rhs: usize) -> usize {
    let d = lhs / rhs;
    let r = lhs % rhs;
    if r > 0 && rhs > 0 {
        d + 1
    } else {
        d
    }
}

/// Byte position of the location entry for `x`, `z`. Slots are laid out
/// x-major. The timestamp entry is one sector further on.
fn header_pos(x: usize, z: usize) -> Result<u64> {
    if x >= REGION_WIDTH || z >= REGION_WIDTH {
        return Err(Error::InvalidOffset(x, z));
    }
    Ok((4 * (x * REGION_WIDTH + z)) as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLocation {
    /// The offset, in units of 4kiB sectors, into the region file this chunk is
    /// located at. Offset 0 is the start of the file.
    pub offset: u64,

    /// The number of 4 kiB sectors that this chunk occupies in the region file.
    pub sectors: u64,
}

impl ChunkLocation {
    fn from_entry(entry: u32) -> Self {
        Self {
            offset: (entry >> 8) as u64,
            sectors: (entry & 0xFF) as u64,
        }
    }

    fn to_entry(self) -> u32 {
        ((self.offset as u32) << 8) | (self.sectors as u32 & 0xFF)
    }

    fn is_empty(&self) -> bool {
        self.offset == 0 && self.sectors == 0
    }
}

/// Encodes how the NBT-Data is compressed
#[derive(Debug)]
struct ChunkMeta {
    pub compressed_len: u32,
    pub compression_scheme: CompressionScheme,
}

impl ChunkMeta {
    fn new(data: &[u8]) -> Result<Self> {
        if data.len() < CHUNK_HEADER_SIZE {
            return Err(Error::InsufficientData);
        }

        let mut buf = &data[..CHUNK_HEADER_SIZE];
        let len = buf.read_u32::<BigEndian>()?;
        let scheme = buf.read_u8()?;
        let scheme =
            CompressionScheme::try_from(scheme).map_err(|_| Error::InvalidChunkMeta(scheme))?;

        // this len includes the compression byte.
        let compressed_len = len.checked_sub(1).ok_or(Error::InsufficientData)?;

        Ok(Self {
            compressed_len,
            compression_scheme: scheme,
        })
    }
}
