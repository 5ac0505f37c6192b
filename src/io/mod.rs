// Purpose - persisted note assets

pub mod cache;
pub mod wav;

use std::{fmt, io};

pub use cache::SampleCache;

/// Errors that can occur when reading or writing cached notes
#[derive(Debug)]
pub enum CacheError {
    /// Filesystem failure (permissions, disk full, ...)
    Io(io::Error),
    /// The WAV encoder or decoder rejected the data
    Wav(hound::Error),
    /// A cached file exists but is not mono 16-bit PCM at the cache rate
    UnexpectedFormat {
        channels: u16,
        bits_per_sample: u16,
        sample_rate: u32,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(err) => write!(f, "Sample cache I/O error: {}", err),
            CacheError::Wav(err) => write!(f, "Sample cache WAV error: {}", err),
            CacheError::UnexpectedFormat {
                channels,
                bits_per_sample,
                sample_rate,
            } => write!(
                f,
                "Cached sample has {} channel(s), {} bits, {} Hz (expected mono 16-bit)",
                channels, bits_per_sample, sample_rate
            ),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io(err) => Some(err),
            CacheError::Wav(err) => Some(err),
            CacheError::UnexpectedFormat { .. } => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::Io(err)
    }
}

impl From<hound::Error> for CacheError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(err) => CacheError::Io(err),
            other => CacheError::Wav(other),
        }
    }
}

/// Fresh scratch directory for a test.
#[cfg(test)]
pub(crate) fn test_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("pluck_dsp-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
