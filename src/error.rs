use std::io;
use thiserror::Error;

/// Everything that can go wrong reading, writing or transforming an `Image`
#[derive(Debug, Error)]
pub enum ImageError {
  /// The file extension is not one of the known `Format`s
  #[error("unsupported format: {0}")]
  UnsupportedFormat(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  /// Decode or encode failure reported by the codec
  #[error("codec error: {0}")]
  Codec(#[from] image::ImageError),

  #[error("dimension mismatch: expected {expected} samples, got {actual}")]
  DimensionMismatch {
    expected: usize,
    actual: usize,
  },

  #[error("color conversion needs 3 channels, buffer has {0}")]
  ChannelCount(usize),

  #[error("invalid settings: {0}")]
  Settings(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ImageError>;
