extern crate rayon;
use self::rayon::prelude::*;

use image::codecs::hdr::{HdrDecoder, HdrEncoder};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgb};

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::buffer::PixelBuffer;
use crate::color_conversions::{input8bit, output8bit};
use crate::colorspace::ColorSpace;
use crate::error::{ImageError, Result};
use crate::format::{filenamesplit, Format};
use crate::hasher::{ContentHasher, Fingerprint};
use crate::scaling::{calculate_scaling, scale_down_buffer};
use crate::settings::Settings;

/// Pixel data together with the color space it is expressed in and whether it
/// is scene referred HDR (samples may exceed 1.0) or display referred.
///
/// Operations never modify an `Image` in place, they hand back a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
  pub buffer: PixelBuffer,
  pub colorspace: ColorSpace,
  pub hdr: bool,
}

impl Image {
  /// Wrap a buffer as standard range sRGB
  pub fn new(buffer: PixelBuffer) -> Image {
    Image::from_parts(buffer, ColorSpace::SRgb, false)
  }

  pub fn from_parts(buffer: PixelBuffer, colorspace: ColorSpace, hdr: bool) -> Image {
    Image {
      buffer,
      colorspace,
      hdr,
    }
  }

  /// Flat gray stand-in used whenever a requested file does not exist
  pub fn placeholder(settings: &Settings) -> Image {
    let buffer = PixelBuffer::filled(
      settings.placeholder_height,
      settings.placeholder_width,
      3,
      settings.placeholder_value,
    );
    Image::new(buffer)
  }

  pub fn height(&self) -> usize { self.buffer.height }
  pub fn width(&self) -> usize { self.buffer.width }
  pub fn channels(&self) -> usize { self.buffer.channels }

  pub fn shape(&self) -> (usize, usize, usize) {
    self.buffer.shape()
  }

  pub fn min_max(&self) -> Option<(f32, f32)> {
    self.buffer.min_max()
  }

  pub fn fingerprint(&self) -> Fingerprint {
    let mut hasher = ContentHasher::new();
    hasher.from_serialize(self);
    hasher.result()
  }

  pub fn read<P: AsRef<Path>>(path: P) -> Result<Image> {
    Image::read_with(path, &Settings::default())
  }

  /// Decode a file, choosing the format from its extension. A file that does
  /// not exist is not an error and gives back the placeholder image instead.
  pub fn read_with<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<Image> {
    let path = path.as_ref();
    if !path.exists() {
      log::warn!("{} does not exist, using a placeholder image", path.display());
      return Ok(Image::placeholder(settings))
    }
    let format = Format::from_path(&path.to_string_lossy())?;

    do_timing!("read()", {
      let buffer = decode(path, format)?;
      log::debug!("Read {} as {}x{} {:?}", path.display(), buffer.width, buffer.height, format);
      Ok(Image::from_parts(buffer, ColorSpace::SRgb, format.is_hdr()))
    })
  }

  /// The 8 bit RGB samples `write` puts on disk. HDR images whose maximum
  /// goes above 1.0 are divided by it first, everything else is taken as
  /// already being in [0,1].
  pub fn encoded_samples(&self) -> Vec<u8> {
    // Only channels that end up on disk count towards the maximum
    let rgb = self.buffer.rgb_samples();
    let max = if self.hdr {
      rgb.par_iter().cloned().filter(|v| v.is_finite()).reduce(|| 1.0, f32::max)
    } else {
      1.0
    };

    rgb.par_iter().map(|v| output8bit(v / max)).collect()
  }

  pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    self.write_with(path, &Settings::default())
  }

  /// Encode to the format named by the extension of `path` as 8 bit samples.
  /// Codec and filesystem failures are returned as they come.
  pub fn write_with<P: AsRef<Path>>(&self, path: P, settings: &Settings) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(&path.to_string_lossy())?;

    do_timing!("write()", {
      let samples = self.encoded_samples();
      encode_8bit(path, format, self.width(), self.height(), &samples, settings.jpeg_quality)?;
    });

    if settings.log_stats {
      if let Some((min, max)) = self.min_max() {
        log::info!("Image written to {} with min/max values: {}, {}", path.display(), min, max);
      }
    }
    Ok(())
  }

  /// Reduced copy whose longer side is `maxsize`. Images already small enough
  /// come back as an independent copy, nothing is ever enlarged.
  pub fn build_thumbnail(&self, maxsize: usize) -> Image {
    match calculate_scaling(self.height(), self.width(), maxsize) {
      Some((nheight, nwidth)) => do_timing!("build_thumbnail()", {
        Image::from_parts(
          scale_down_buffer(&self.buffer, nheight, nwidth),
          self.colorspace,
          self.hdr,
        )
      }),
      None => self.clone(),
    }
  }

  pub fn thumbnail_with(&self, settings: &Settings) -> Image {
    self.build_thumbnail(settings.thumbnail_size)
  }

  pub fn read_thumbnail<P: AsRef<Path>>(path: P) -> Result<Image> {
    Image::read_thumbnail_with(path, &Settings::default())
  }

  /// Thumbnail of the image at `path`, going through the on-disk cache at
  /// `<dir>/<thumbnail_dir>/_<name>.<ext>`. A cache miss reads the full image,
  /// reduces it and stores the result for next time.
  pub fn read_thumbnail_with<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<Image> {
    let path = path.as_ref();
    let (dir, name, ext) = filenamesplit(&path.to_string_lossy());
    let cachedir = Path::new(&dir).join(&settings.thumbnail_dir);
    let cached = cachedir.join(format!("_{}.{}", name, ext));

    if cached.exists() {
      log::debug!("Using cached thumbnail {}", cached.display());
      return Image::read_with(&cached, settings)
    }
    if !path.exists() {
      return Image::read_with(path, settings)
    }

    let format = Format::from_extension(&ext)?;
    let thumb = Image::read_with(path, settings)?.thumbnail_with(settings);
    fs::create_dir_all(&cachedir)?;
    match format {
      // Keep the float samples so a cached HDR thumbnail reads back like a fresh one
      Format::Hdr => encode_hdr(&cached, thumb.width(), thumb.height(), &thumb.buffer.rgb_samples())?,
      Format::Jpeg | Format::Png => thumb.write_with(&cached, settings)?,
    }
    log::debug!("Stored thumbnail {}", cached.display());
    Ok(thumb)
  }

  /// Copy of the image with its pixels re-expressed in another color space
  pub fn to_colorspace(&self, target: ColorSpace) -> Result<Image> {
    if self.channels() != 3 {
      return Err(ImageError::ChannelCount(self.channels()))
    }
    if target == self.colorspace {
      return Ok(self.clone())
    }

    let from = self.colorspace;
    let buffer = self.buffer.mutate_lines_copying(&(|line: &mut [f32], _| {
      for pix in line.chunks_exact_mut(3) {
        let (a, b, c) = from.convert(target, (pix[0], pix[1], pix[2]));
        pix[0] = a;
        pix[1] = b;
        pix[2] = c;
      }
    }));

    Ok(Image::from_parts(buffer, target, self.hdr))
  }
}

impl fmt::Display for Image {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    writeln!(f, "-------------------    Image   -------------------------------")?;
    writeln!(f, " size: {} x {} x {}", self.width(), self.height(), self.channels())?;
    writeln!(f, " colourspace: {}", self.colorspace)?;
    writeln!(f, " hdr: {}", self.hdr)?;
    write!(f, "-------------------  Image End -------------------------------")
  }
}

fn decode(path: &Path, format: Format) -> Result<PixelBuffer> {
  match format {
    // The generic path tone maps HDR to 8 bits, read the RGBE floats directly
    Format::Hdr => {
      let decoder = HdrDecoder::new(BufReader::new(File::open(path)?))?;
      let meta = decoder.metadata();
      let (width, height) = (meta.width as usize, meta.height as usize);
      let pixels = decoder.read_image_hdr()?;
      let data = pixels.iter().flat_map(|p| p.0.iter().cloned()).collect();
      PixelBuffer::from_vec(height, width, 3, data)
    },
    Format::Jpeg | Format::Png => {
      let img = image::open(path)?.into_rgb32f();
      let (width, height) = (img.width() as usize, img.height() as usize);
      PixelBuffer::from_vec(height, width, 3, img.into_raw())
    },
  }
}

fn encode_8bit(path: &Path, format: Format, width: usize, height: usize, samples: &[u8], quality: u8) -> Result<()> {
  match format {
    Format::Jpeg => {
      let mut writer = BufWriter::new(File::create(path)?);
      let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
      encoder.encode(samples, width as u32, height as u32, ColorType::Rgb8)?;
      writer.flush()?;
    },
    Format::Png => {
      let mut writer = BufWriter::new(File::create(path)?);
      PngEncoder::new(&mut writer).write_image(samples, width as u32, height as u32, ColorType::Rgb8)?;
      writer.flush()?;
    },
    Format::Hdr => {
      let floats: Vec<f32> = samples.iter().map(|v| input8bit(*v)).collect();
      encode_hdr(path, width, height, &floats)?;
    },
  }
  Ok(())
}

fn encode_hdr(path: &Path, width: usize, height: usize, rgb: &[f32]) -> Result<()> {
  let pixels: Vec<Rgb<f32>> = rgb.chunks_exact(3).map(|p| Rgb([p[0], p[1], p[2]])).collect();
  let mut writer = BufWriter::new(File::create(path)?);
  HdrEncoder::new(&mut writer).encode(&pixels, width, height)?;
  writer.flush()?;
  Ok(())
}
