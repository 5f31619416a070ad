use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Debug, Error)]
pub enum Error {
    /// The input or output path could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read or write failed after the handle was opened.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// A content byte has no entry in the code table.
    #[error("symbol {symbol:#04x} at offset {offset} has no code")]
    UnknownSymbol { symbol: u8, offset: usize },

    /// The stored header does not describe a consistent prefix-free code.
    #[error("corrupt header at byte {offset}: {reason}")]
    CorruptHeader { offset: usize, reason: &'static str },

    /// The content contains the header's field delimiter.
    #[error("content contains the reserved delimiter byte 0x1e at offset {offset}")]
    DelimiterCollision { offset: usize },

    /// The packed bits do not follow a path through the decoding tree.
    #[error("corrupt bitstream at bit {bit}: {reason}")]
    CorruptStream { bit: usize, reason: &'static str },

    /// Decoding produced a different number of symbols than was stored.
    #[error("decoded {actual} symbols, header records {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("malformed container metadata: {0}")]
    Container(#[from] rmp_serde::decode::Error),

    #[error("cannot write container metadata: {0}")]
    ContainerWrite(#[from] rmp_serde::encode::Error),

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),
}

impl Error {
    pub(crate) fn file_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }
}
