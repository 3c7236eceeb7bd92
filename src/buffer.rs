extern crate rayon;
use self::rayon::prelude::*;

use crate::error::{ImageError, Result};

/// Floating point pixel samples laid out row by row with interleaved channels,
/// so the sample for (`row`, `col`, `c`) lives at `(row*width + col)*channels + c`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelBuffer {
  pub height: usize,
  pub width: usize,
  pub channels: usize,
  pub data: Vec<f32>,
}

impl PixelBuffer {
  pub fn new(height: usize, width: usize, channels: usize) -> PixelBuffer {
    PixelBuffer::filled(height, width, channels, 0.0)
  }

  pub fn filled(height: usize, width: usize, channels: usize, value: f32) -> PixelBuffer {
    PixelBuffer {
      height,
      width,
      channels,
      data: vec![value; height*width*channels],
    }
  }

  pub fn from_vec(height: usize, width: usize, channels: usize, data: Vec<f32>) -> Result<PixelBuffer> {
    let expected = height*width*channels;
    if data.len() != expected {
      return Err(ImageError::DimensionMismatch{expected, actual: data.len()})
    }
    Ok(PixelBuffer { height, width, channels, data })
  }

  /// (height, width, channels), the same order the buffer is indexed in
  pub fn shape(&self) -> (usize, usize, usize) {
    (self.height, self.width, self.channels)
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
    self.data[(row*self.width + col)*self.channels + channel]
  }

  /// Smallest and largest finite sample, None when there is no finite sample
  pub fn min_max(&self) -> Option<(f32, f32)> {
    self.data.par_iter()
      .cloned()
      .filter(|v| v.is_finite())
      .fold(|| None, |acc: Option<(f32, f32)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
      })
      .reduce(|| None, |a, b| match (a, b) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, None) => a,
        (None, b) => b,
      })
  }

  pub fn mutate_lines<F>(&mut self, closure: &F)
    where F : Fn(&mut [f32], usize)+Sync {

    let stride = self.width*self.channels;
    if stride == 0 {
      return
    }
    self.data.par_chunks_mut(stride).enumerate().for_each(|(row, line)| {
      closure(line, row);
    });
  }

  pub fn mutate_lines_copying<F>(&self, closure: &F) -> PixelBuffer
    where F : Fn(&mut [f32], usize)+Sync {

    let mut buf = self.clone();
    buf.mutate_lines(closure);
    buf
  }

  /// Pixels reduced or expanded to three channels: gray is replicated and
  /// anything past the third channel (alpha) is dropped
  pub fn rgb_samples(&self) -> Vec<f32> {
    let mut out = Vec::with_capacity(self.height*self.width*3);
    if self.channels == 0 {
      out.resize(self.height*self.width*3, 0.0);
      return out
    }
    for pix in self.data.chunks_exact(self.channels) {
      match self.channels {
        1 | 2 => out.extend_from_slice(&[pix[0], pix[0], pix[0]]),
        _ => out.extend_from_slice(&pix[..3]),
      }
    }
    out
  }

  /// Helper function to allow human readable creation of `PixelBuffer` instances
  pub fn from_rgb_str_vec(data: Vec<&str>) -> PixelBuffer {
    let width = data.first().expect("Invalid data for rgb helper function").len();
    let height = data.len();
    let channels = 3;

    let mut pixel_data: Vec<f32> = Vec::with_capacity(width * height * channels);
    for row in data {
      for col in row.chars() {
        let (r, g, b) = match col {
            'R' => (1.0, 0.0, 0.0),
            'G' => (0.0, 1.0, 0.0),
            'B' => (0.0, 0.0, 1.0),
            'O' => (1.0, 1.0, 1.0),
            ' ' => (0.0, 0.0, 0.0),
            c @ _ => panic!(
              "Invalid color '{}' sent to rgb expected any of 'RGBO '", c),
        };

        pixel_data.push(r);
        pixel_data.push(g);
        pixel_data.push(b);
      }
    }

    PixelBuffer {
      height,
      width,
      channels,
      data: pixel_data,
    }
  }
}
