//! Binary corpus snapshots.
//!
//! Layout: 4-byte magic `KWIC`, little-endian `u32` format version,
//! little-endian CRC32 of the payload, then the postcard-encoded payload.

use std::path::Path;

use super::memory::Layout;
use super::{CorpusError, MemoryCorpus};

pub const MAGIC: [u8; 4] = *b"KWIC";
pub const VERSION: u32 = 1;
const HEADER_SIZE: usize = 12;

impl MemoryCorpus {
    /// Serialize the corpus to a snapshot.
    pub fn to_binary(&self) -> Vec<u8> {
        let payload = postcard::to_allocvec(self.layout()).expect("serialization should not fail");

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }

    /// Load a corpus from snapshot bytes, checking magic, version and checksum.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CorpusError> {
        if bytes.len() < HEADER_SIZE || bytes[0..4] != MAGIC {
            return Err(CorpusError::BadMagic);
        }

        let version = read_u32(bytes, 4);
        if version != VERSION {
            return Err(CorpusError::UnsupportedVersion(version));
        }

        let expected = read_u32(bytes, 8);
        let payload = &bytes[HEADER_SIZE..];
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(CorpusError::ChecksumMismatch { expected, actual });
        }

        let layout: Layout = postcard::from_bytes(payload).map_err(CorpusError::Binary)?;
        Self::from_layout(layout)
    }

    /// Memory-map a snapshot file and load it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the map is read-only and dropped before returning; the corpus
        // owns decoded copies of everything it keeps.
        let map = unsafe { memmap2::Mmap::map(&file)? };
        Self::from_binary(&map)
    }

    /// Write the snapshot to `path`.
    pub fn write_snapshot(&self, path: impl AsRef<Path>) -> Result<(), CorpusError> {
        std::fs::write(path, self.to_binary())?;
        Ok(())
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
