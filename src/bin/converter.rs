use std::env;
use std::time::Instant;

extern crate uhdr;
use uhdr::{Image, Settings};

fn usage() {
  println!("converter <file> [outfile] [maxsize]");
  std::process::exit(1);
}

fn error(err: &str) {
  println!("ERROR: {}", err);
  std::process::exit(2);
}

fn main() {
  let args: Vec<_> = env::args().collect();
  if args.len() < 2 {
    usage();
  }
  let file = &args[1];
  let filejpg = format!("{}.jpg",file);
  let outfile = if args.len() > 2 {
    &args[2]
  } else {
    &filejpg
  };
  let maxsize = if args.len() > 3 {
    match args[3].parse::<usize>() {
      Ok(val) => Some(val),
      Err(e) => {error(&format!("Invalid maxsize \"{}\": {}", args[3], e));unreachable!()},
    }
  } else {
    None
  };
  let settings = Settings::default();
  println!("Loading file \"{}\" and saving it as \"{}\"", file, outfile);

  let from_time = Instant::now();
  let image = match Image::read_with(file, &settings) {
    Ok(val) => val,
    Err(e) => {error(&e.to_string());unreachable!()},
  };
  let duration = from_time.elapsed();
  println!("Decoded in {} ms", duration.as_millis());
  println!("{}", image);
  if let Some((min, max)) = image.min_max() {
    println!("Sample range is {} to {}", min, max);
  }

  let image = match maxsize {
    Some(maxsize) => {
      let thumb = image.build_thumbnail(maxsize);
      println!("Reduced to {}x{}", thumb.width(), thumb.height());
      thumb
    },
    None => image,
  };

  if let Err(e) = image.write_with(outfile, &settings) {
    error(&format!("Error: {}", e));
  }
  println!("Fingerprint {}", uhdr::to_hex(&image.fingerprint()));
}
