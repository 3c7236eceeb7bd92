use std::path::is_separator;

use crate::error::{ImageError, Result};

/// The file formats images can be read from and written to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
  /// 8 bit standard range JPEG
  Jpeg,
  /// 8 bit standard range PNG
  Png,
  /// Radiance RGBE, extended range
  Hdr,
}

impl Format {
  /// Match an already lower-cased extension
  pub fn from_extension(ext: &str) -> Result<Format> {
    match ext {
      "jpg" | "jpeg" => Ok(Format::Jpeg),
      "png" => Ok(Format::Png),
      "hdr" => Ok(Format::Hdr),
      other => Err(ImageError::UnsupportedFormat(other.to_string())),
    }
  }

  pub fn from_path(path: &str) -> Result<Format> {
    let (_, _, ext) = filenamesplit(path);
    Format::from_extension(&ext)
  }

  /// Whether decoded samples are scene referred and may go above 1.0
  pub fn is_hdr(&self) -> bool {
    match self {
      Format::Hdr => true,
      Format::Jpeg | Format::Png => false,
    }
  }
}

/// Split a filename into (directory, name, extension).
///
/// The directory keeps its trailing separator and is empty for a bare filename.
/// The extension is whatever follows the last dot, lower-cased, and the name is
/// everything before that dot, so "archive.tar.gz" gives ("", "archive.tar", "gz").
/// A filename without any dot is all extension: "README" gives ("", "", "readme").
pub fn filenamesplit(filename: &str) -> (String, String, String) {
  let (dir, file) = match filename.rfind(is_separator) {
    Some(pos) => filename.split_at(pos + 1),
    None => ("", filename),
  };

  let (name, ext) = match file.rfind('.') {
    Some(pos) => (&file[..pos], &file[pos+1..]),
    None => ("", file),
  };

  (dir.to_string(), name.to_string(), ext.to_lowercase())
}
