//! Static Huffman compression for text files.
//!
//! Compression counts byte frequencies, builds a Huffman tree, assigns each
//! byte the path to its leaf as a code, and stores a textual header of
//! symbol/code pairs in front of the packed bitstream. Decompression rebuilds
//! the tree from that header and walks it bit by bit.
//!
//! ```no_run
//! use huffpack::Options;
//!
//! let opts = Options::default();
//! huffpack::compress("notes.txt", "notes.huff", &opts)?;
//! huffpack::decompress("notes.huff", "notes.out", &opts)?;
//! # Ok::<(), huffpack::Error>(())
//! ```

use bitvec::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod header;
pub mod storage;
pub mod tree;

pub use decoder::Decoder;
pub use encoder::{CodeTable, Encoded, Encoder, SymbolPolicy};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use storage::{StorageReader, StorageWriter};
pub use tree::{huffman, Node};

/// Bits as they are packed on disk.
pub type Bits = BitVec<u8, Msb0>;

/// Knobs shared by both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub symbol_policy: SymbolPolicy,
    /// Bits pulled from storage per `extract` call while decompressing.
    pub chunk_bits: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            symbol_policy: SymbolPolicy::default(),
            chunk_bits: storage::DEFAULT_CHUNK_BITS,
        }
    }
}

/// Sizes seen by one compression or decompression run. Byte counts on the
/// compressed side cover the header and packed bits, not the container
/// framing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Symbols encoded or decoded.
    pub symbols: u64,
    pub distinct_symbols: usize,
    pub encoded_bits: u64,
}

/// Compresses the file at `input` into a new file at `output`.
///
/// The content is fully encoded before `output` is created, so a rejected
/// input leaves any existing file there untouched.
pub fn compress(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    opts: &Options,
) -> Result<Report> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let content = fs::read(input).map_err(|e| Error::file_open(input, e))?;

    let prepared = prepare(&content, opts)?;
    let report = prepared.store(StorageWriter::create(output)?)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        bytes_in = report.input_bytes,
        bytes_out = report.output_bytes,
        "compressed"
    );

    Ok(report)
}

/// Compresses `content` through an already opened storage writer.
pub fn compress_to<W: Write>(
    content: &[u8],
    storage: StorageWriter<W>,
    opts: &Options,
) -> Result<Report> {
    prepare(content, opts)?.store(storage)
}

/// Everything a container holds, computed before any output is touched.
struct Prepared {
    header: Vec<u8>,
    encoded: Encoded,
    input_bytes: u64,
    distinct_symbols: usize,
}

fn prepare(content: &[u8], opts: &Options) -> Result<Prepared> {
    if let Some(offset) = content.iter().position(|&b| b == header::DELIMITER) {
        return Err(Error::DelimiterCollision { offset });
    }

    let freq = FrequencyTable::from_bytes(content);
    debug!(distinct = freq.len(), total = freq.total(), "counted symbols");

    let table = match huffman(&freq) {
        Some(tree) => tree.code_table(),
        None => CodeTable::default(),
    };
    debug!(codes = table.len(), "assigned codes");

    let encoder = Encoder::new(table).with_policy(opts.symbol_policy);
    let encoded = encoder.encode(content)?;

    Ok(Prepared {
        header: encoder.header(),
        encoded,
        input_bytes: content.len() as u64,
        distinct_symbols: freq.len(),
    })
}

impl Prepared {
    fn store<W: Write>(self, mut storage: StorageWriter<W>) -> Result<Report> {
        let Self {
            header,
            encoded,
            input_bytes,
            distinct_symbols,
        } = self;
        let header_len = header.len();
        let encoded_bits = encoded.bits.len() as u64;

        storage.set_header(header);
        storage.set_symbol_count(encoded.symbols);
        storage.insert(&encoded.bits);
        storage.close()?;
        debug!(header_len, encoded_bits, "wrote container");

        Ok(Report {
            input_bytes,
            output_bytes: header_len as u64 + encoded_bits.div_ceil(8),
            symbols: encoded.symbols,
            distinct_symbols,
            encoded_bits,
        })
    }
}

/// Decompresses the file at `input` into a new file at `output`.
pub fn decompress(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    opts: &Options,
) -> Result<Report> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let storage = StorageReader::open(input)?;
    let (content, report) = decode_storage(storage, opts)?;

    let mut out = fs::File::create(output).map_err(|e| Error::file_open(output, e))?;
    out.write_all(&content)?;
    out.flush()?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes_out = report.output_bytes,
        "decompressed"
    );

    Ok(report)
}

/// Decompresses a container read from `input`.
pub fn decompress_from<R: Read>(input: R, opts: &Options) -> Result<(Vec<u8>, Report)> {
    decode_storage(StorageReader::from_reader(input)?, opts)
}

fn decode_storage(storage: StorageReader, opts: &Options) -> Result<(Vec<u8>, Report)> {
    let mut storage = storage.with_chunk_bits(opts.chunk_bits);

    let decoder = Decoder::from_header(storage.header())?;
    debug!(header_len = storage.header().len(), "rebuilt decoding tree");

    let mut bits = Bits::with_capacity(storage.bit_len());
    while storage.extract(&mut bits) {}

    let content = decoder.decode(&bits)?;
    let expected = storage.symbol_count();
    if content.len() as u64 != expected {
        return Err(Error::LengthMismatch {
            expected,
            actual: content.len() as u64,
        });
    }

    let report = Report {
        input_bytes: storage.header().len() as u64 + (bits.len() as u64).div_ceil(8),
        output_bytes: content.len() as u64,
        symbols: expected,
        distinct_symbols: decoder.root().code_table().len(),
        encoded_bits: bits.len() as u64,
    };

    Ok((content, report))
}
