extern crate serde_yaml;

use crate::error::Result;

/// Knobs for reading, writing and thumbnailing images. Keys missing from a
/// YAML document keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Longest side of generated thumbnails
  pub thumbnail_size: usize,
  /// Shape and value of the flat image returned for missing files
  pub placeholder_width: usize,
  pub placeholder_height: usize,
  pub placeholder_value: f32,
  pub jpeg_quality: u8,
  /// Log the sample range of every written image
  pub log_stats: bool,
  /// Directory, next to the source image, that holds cached thumbnails
  pub thumbnail_dir: String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      thumbnail_size: 800,
      placeholder_width: 800,
      placeholder_height: 600,
      placeholder_value: 0.5,
      jpeg_quality: 90,
      log_stats: false,
      thumbnail_dir: "thumbnails".to_string(),
    }
  }
}

impl Settings {
  pub fn from_yaml(yaml: &str) -> Result<Settings> {
    Ok(serde_yaml::from_str(yaml)?)
  }

  pub fn to_yaml(&self) -> Result<String> {
    Ok(serde_yaml::to_string(self)?)
  }
}
