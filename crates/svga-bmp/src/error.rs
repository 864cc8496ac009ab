use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BmpError>;

#[derive(Debug, Error)]
pub enum BmpError {
    #[error("failed to open bitmap {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported bit depth {found} (this decoder expects {expected})")]
    UnsupportedBitDepth { expected: u16, found: u16 },

    #[error("compressed bitmaps are not supported (compression {0})")]
    Compressed(u32),

    #[error("bitmap width {width} exceeds viewport width {max}")]
    WidthExceedsViewport { width: i32, max: u32 },

    #[error("invalid bitmap width {0}")]
    InvalidWidth(i32),

    #[error("palette declares {0} colours (at most 256 supported)")]
    PaletteTooLarge(u32),

    #[error("palette truncated (expected {entries} entries)")]
    ShortPalette { entries: usize },

    #[error("pixel data truncated at stored row {row}")]
    ShortRow { row: u32 },
}

/// Coarse failure classes callers usually branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnsupportedFormat,
    IoFailure,
    InvalidGeometry,
}

impl BmpError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            BmpError::UnsupportedBitDepth { .. }
            | BmpError::Compressed(_)
            | BmpError::PaletteTooLarge(_) => DecodeErrorKind::UnsupportedFormat,
            BmpError::Open { .. }
            | BmpError::Io(_)
            | BmpError::ShortPalette { .. }
            | BmpError::ShortRow { .. } => DecodeErrorKind::IoFailure,
            BmpError::WidthExceedsViewport { .. } | BmpError::InvalidWidth(_) => {
                DecodeErrorKind::InvalidGeometry
            }
        }
    }
}
