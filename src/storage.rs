//! Compressed file container.
//!
//! A file is a MessagePack metadata record followed directly by the packed
//! bitstream, eight bits per byte, most significant bit first, with the last
//! byte zero-padded. The metadata records how many bits are meaningful so
//! padding never reaches the decoder.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::Bits;

pub const FORMAT_VERSION: u32 = 1;

/// Upper bound on the bits handed out by one `extract` call.
pub const DEFAULT_CHUNK_BITS: usize = 8 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    version: u32,
    header: Vec<u8>,
    symbol_count: u64,
    bit_len: u64,
}

/// Collects a header and bits, and writes them out on `close`.
pub struct StorageWriter<W: Write> {
    out: W,
    header: Vec<u8>,
    symbol_count: u64,
    bits: Bits,
}

impl StorageWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::file_open(path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> StorageWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header: Vec::new(),
            symbol_count: 0,
            bits: Bits::new(),
        }
    }

    pub fn set_header(&mut self, header: Vec<u8>) {
        self.header = header;
    }

    pub fn set_symbol_count(&mut self, count: u64) {
        self.symbol_count = count;
    }

    /// Appends `bits` to the packed region.
    pub fn insert(&mut self, bits: &BitSlice<u8, Msb0>) {
        self.bits.extend_from_bitslice(bits);
    }

    /// Writes metadata and packed bits, flushes, and hands back the sink.
    pub fn close(self) -> Result<W> {
        let Self {
            mut out,
            header,
            symbol_count,
            mut bits,
        } = self;

        let meta = Metadata {
            version: FORMAT_VERSION,
            header,
            symbol_count,
            bit_len: bits.len() as u64,
        };
        rmp_serde::encode::write(&mut out, &meta)?;

        bits.force_align();
        bits.set_uninitialized(false);
        out.write_all(&bits.into_vec())?;
        out.flush()?;

        Ok(out)
    }
}

/// A loaded container, handing its bits out in chunks.
#[derive(Debug)]
pub struct StorageReader {
    header: Vec<u8>,
    symbol_count: u64,
    bits: Bits,
    pos: usize,
    chunk_bits: usize,
}

impl StorageReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_open(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(mut input: R) -> Result<Self> {
        let meta: Metadata = rmp_serde::from_read(&mut input)?;
        if meta.version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(meta.version));
        }

        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        if data.len() as u64 != meta.bit_len.div_ceil(8) {
            return Err(Error::CorruptStream {
                bit: data.len() * 8,
                reason: "packed region does not match the recorded bit length",
            });
        }

        let mut bits = Bits::from_vec(data);
        bits.truncate(meta.bit_len as usize);

        Ok(Self {
            header: meta.header,
            symbol_count: meta.symbol_count,
            bits,
            pos: 0,
            chunk_bits: DEFAULT_CHUNK_BITS,
        })
    }

    pub fn with_chunk_bits(mut self, chunk_bits: usize) -> Self {
        self.chunk_bits = chunk_bits.max(1);
        self
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }

    /// Number of meaningful bits stored.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Appends the next chunk of bits to `buf`. Returns `false` once every
    /// bit has been handed out.
    pub fn extract(&mut self, buf: &mut Bits) -> bool {
        if self.pos >= self.bits.len() {
            return false;
        }

        let end = (self.pos + self.chunk_bits).min(self.bits.len());
        buf.extend_from_bitslice(&self.bits[self.pos..end]);
        self.pos = end;
        true
    }
}
