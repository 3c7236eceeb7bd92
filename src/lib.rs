//! Color space tagged floating point images for HDR editing: reading and
//! writing files, HDR aware normalization on output, thumbnails and color
//! space conversion.

#[macro_use] extern crate serde_derive;
#[macro_use] extern crate lazy_static;
extern crate image;

macro_rules! do_timing {
  ($name:expr, $body:expr) => {
    {
      let from_time = Instant::now();
      let ret = {
        $body
      };
      let duration = from_time.elapsed();
      log::info!("timing: {:>7} ms for |{}", duration.as_millis(), $name);
      ret
    }
  }
}

mod buffer;
mod color_conversions;
mod colorspace;
mod error;
mod format;
mod hasher;
mod hdrimage;
mod scaling;
mod settings;

pub use self::buffer::PixelBuffer;
pub use self::color_conversions::*;
pub use self::colorspace::ColorSpace;
pub use self::error::{ImageError, Result};
pub use self::format::{filenamesplit, Format};
pub use self::hasher::{to_hex, ContentHasher, Fingerprint};
pub use self::hdrimage::Image;
pub use self::scaling::{calculate_scaling, scale_down_buffer};
pub use self::settings::Settings;
