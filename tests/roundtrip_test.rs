use uhdr::{Image, ImageError, PixelBuffer, ColorSpace, Settings, output8bit};
use image::{ImageBuffer, DynamicImage};

use image::codecs::hdr::HdrEncoder;
use image::Rgb;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

fn gradient(height: usize, width: usize, max: f32) -> PixelBuffer {
  let mut buf = PixelBuffer::new(height, width, 3);
  buf.mutate_lines(&(|line: &mut [f32], row| {
    for (col, pix) in line.chunks_exact_mut(3).enumerate() {
      pix[0] = max * (col as f32) / ((width - 1) as f32);
      pix[1] = max * (row as f32) / ((height - 1) as f32);
      pix[2] = max * 0.5;
    }
  }));
  buf
}

fn path_str(dir: &Path, name: &str) -> String {
  dir.join(name).to_string_lossy().into_owned()
}

#[test]
fn missing_file_gives_placeholder() {
  let img = Image::read("/nonexistent/path.jpg").unwrap();
  assert_eq!(img.shape(), (600, 800, 3));
  assert!(img.buffer.data.iter().all(|&v| v == 0.5));
  assert_eq!(img.colorspace, ColorSpace::SRgb);
  assert!(!img.hdr);
}

#[test]
fn missing_file_ignores_extension() {
  let img = Image::read("/nonexistent/path.xyz").unwrap();
  assert_eq!(img.shape(), (600, 800, 3));
}

#[test]
fn placeholder_follows_settings() {
  let settings = Settings {
    placeholder_width: 40,
    placeholder_height: 30,
    placeholder_value: 0.25,
    ..Settings::default()
  };
  let img = Image::read_with("/nonexistent/path.hdr", &settings).unwrap();
  assert_eq!(img.shape(), (30, 40, 3));
  assert!(img.buffer.data.iter().all(|&v| v == 0.25));
}

#[test]
fn unknown_extension_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("notes.txt");
  fs::write(&file, b"not an image").unwrap();
  match Image::read(&file) {
    Err(ImageError::UnsupportedFormat(ext)) => assert_eq!(ext, "txt"),
    other => panic!("expected unsupported format, got {:?}", other),
  }

  let img = Image::new(PixelBuffer::filled(4, 4, 3, 0.5));
  match img.write(dir.path().join("out.bmp")) {
    Err(ImageError::UnsupportedFormat(ext)) => assert_eq!(ext, "bmp"),
    other => panic!("expected unsupported format, got {:?}", other),
  }
}

#[test]
fn unwritable_path_is_io_failure() {
  let img = Image::new(PixelBuffer::filled(4, 4, 3, 0.5));
  match img.write("/nonexistent/dir/out.png") {
    Err(ImageError::Io(_)) => {},
    other => panic!("expected an I/O error, got {:?}", other),
  }
}

#[test]
fn jpg_roundtrip_keeps_shape() {
  let dir = tempfile::tempdir().unwrap();
  let file = path_str(dir.path(), "shape.jpg");
  let img = Image::new(gradient(37, 53, 1.0));
  img.write(&file).unwrap();

  let back = Image::read(&file).unwrap();
  assert_eq!(back.shape(), (37, 53, 3));
  assert_eq!(back.colorspace, ColorSpace::SRgb);
  assert!(!back.hdr);
}

#[test]
fn single_channel_is_written_as_rgb() {
  let dir = tempfile::tempdir().unwrap();
  let file = path_str(dir.path(), "gray.png");
  let buf = PixelBuffer::from_vec(2, 3, 1, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]).unwrap();
  Image::new(buf).write(&file).unwrap();

  let back = Image::read(&file).unwrap();
  assert_eq!(back.shape(), (2, 3, 3));
  assert_eq!(output8bit(back.buffer.get(1, 2, 1)), 255);
}

#[test]
fn hdr_roundtrip_keeps_shape_and_flag() {
  let dir = tempfile::tempdir().unwrap();
  let file = path_str(dir.path(), "scene.hdr");
  let img = Image::from_parts(gradient(20, 30, 6.0), ColorSpace::SRgb, true);
  img.write(&file).unwrap();

  let back = Image::read(&file).unwrap();
  assert_eq!(back.shape(), (20, 30, 3));
  assert!(back.hdr);
  // Normalized on the way out so nothing goes above 1.0 anymore
  let (_, max) = back.min_max().unwrap();
  assert!(max <= 1.0 + 1e-2, "max was {}", max);
}

fn write_raw_hdr(path: &Path, width: usize, height: usize, pixels: &[Rgb<f32>]) {
  let out = BufWriter::new(File::create(path).unwrap());
  HdrEncoder::new(out).encode(pixels, width, height).unwrap();
}

#[test]
fn hdr_file_keeps_values_above_one() {
  let dir = tempfile::tempdir().unwrap();
  let file = dir.path().join("bright.hdr");
  write_raw_hdr(&file, 2, 1, &[Rgb([4.0, 4.0, 4.0]), Rgb([0.75, 0.75, 0.75])]);

  let img = Image::read(&file).unwrap();
  assert_eq!(img.shape(), (1, 2, 3));
  assert!(img.hdr);
  let (_, max) = img.min_max().unwrap();
  assert!(max > 1.0, "max was {}", max);
  for c in 0..3 {
    assert!((img.buffer.get(0, 0, c) - 4.0).abs() < 1e-2, "got {}", img.buffer.get(0, 0, c));
    assert!((img.buffer.get(0, 1, c) - 0.75).abs() < 1e-2, "got {}", img.buffer.get(0, 1, c));
  }
}

#[test]
fn hdr_normalization_on_disk() {
  let dir = tempfile::tempdir().unwrap();
  let file = path_str(dir.path(), "normalized.png");
  let values = [0.0f32, 0.5, 1.0, 2.0, 3.0, 4.0];
  let mut data = Vec::new();
  for v in values.iter() {
    data.extend_from_slice(&[*v, *v, *v]);
  }
  let img = Image::from_parts(PixelBuffer::from_vec(1, 6, 3, data).unwrap(), ColorSpace::SRgb, true);
  img.write(&file).unwrap();

  let raw = image::open(&file).unwrap().into_rgb8();
  for (v, pix) in values.iter().zip(raw.pixels()) {
    let expected = (v / 4.0 * 255.0).round() as u8;
    assert_eq!(pix.0, [expected, expected, expected]);
  }
  assert_eq!(raw.get_pixel(5, 0).0, [255, 255, 255]);
}

#[test]
fn hdr_writes_are_repeatable() {
  let dir = tempfile::tempdir().unwrap();
  let first = path_str(dir.path(), "first.jpg");
  let second = path_str(dir.path(), "second.jpg");
  let img = Image::from_parts(gradient(16, 24, 0.9), ColorSpace::SRgb, true);
  img.write(&first).unwrap();
  img.write(&second).unwrap();
  assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

// Every 8 bit value read from disk comes back out unchanged
#[test]
fn roundtrip_8bit_png() {
  let dir = tempfile::tempdir().unwrap();
  let source = path_str(dir.path(), "all_values.png");
  let target = path_str(dir.path(), "all_values_out.png");

  let mut image_data: Vec<u8> = Vec::with_capacity(16 * 16 * 3);
  for v in 0..=u8::MAX {
    image_data.push(v);
    image_data.push(u8::MAX - v);
    image_data.push(v / 2);
  }
  let raw = ImageBuffer::from_raw(16, 16, image_data.clone()).unwrap();
  DynamicImage::ImageRgb8(raw).save(&source).unwrap();

  let img = Image::read(&source).unwrap();
  img.write(&target).unwrap();
  let out = image::open(&target).unwrap().into_rgb8().into_raw();
  assert_eq!(out, image_data);
}

#[test]
fn logging_stats_does_not_change_output() {
  let dir = tempfile::tempdir().unwrap();
  let quiet = path_str(dir.path(), "quiet.png");
  let loud = path_str(dir.path(), "loud.png");
  let img = Image::from_parts(gradient(8, 8, 3.0), ColorSpace::SRgb, true);
  img.write(&quiet).unwrap();
  img.write_with(&loud, &Settings { log_stats: true, ..Settings::default() }).unwrap();
  assert_eq!(fs::read(&quiet).unwrap(), fs::read(&loud).unwrap());
}
