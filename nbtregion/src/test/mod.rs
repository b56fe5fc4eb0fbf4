use std::io::Cursor;

use byteorder::{BigEndian, WriteBytesExt};

use crate::SECTOR_SIZE;

mod files;

/// Builds raw region file bytes by hand, for data the `RegionFile` API
/// would never write itself.
pub struct Builder {
    locations: Vec<u8>,
    timestamps: Vec<u8>,
    sectors: Vec<u8>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            locations: vec![0; SECTOR_SIZE],
            timestamps: vec![0; SECTOR_SIZE],
            sectors: Vec::new(),
        }
    }

    pub fn location(mut self, x: usize, z: usize, offset: u32, sectors: u8) -> Self {
        let pos = 4 * (x * 32 + z);
        self.locations[pos..pos + 3].copy_from_slice(&offset.to_be_bytes()[1..4]);
        self.locations[pos + 3] = sectors;
        self
    }

    pub fn timestamp(mut self, x: usize, z: usize, timestamp: u32) -> Self {
        let pos = 4 * (x * 32 + z);
        self.timestamps[pos..pos + 4].copy_from_slice(&timestamp.to_be_bytes());
        self
    }

    /// Append a chunk payload with the given length field and method byte,
    /// padded to whole sectors.
    pub fn payload(mut self, len: u32, method: u8, data: &[u8]) -> Self {
        let mut c = Cursor::new(Vec::new());
        c.write_u32::<BigEndian>(len).unwrap();
        c.write_u8(method).unwrap();
        let mut payload = c.into_inner();
        payload.extend_from_slice(data);

        let padded = (payload.len() + SECTOR_SIZE - 1) / SECTOR_SIZE * SECTOR_SIZE;
        payload.resize(padded, 0);
        self.sectors.extend_from_slice(&payload);
        self
    }

    pub fn build(self) -> Vec<u8> {
        [self.locations, self.timestamps, self.sectors].concat()
    }
}
