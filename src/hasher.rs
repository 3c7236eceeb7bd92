extern crate blake3;

extern crate bincode;
extern crate serde;
use self::serde::Serialize;

use std::io::Write;
use std::fmt;
use std::fmt::Debug;

type HashType = self::blake3::Hasher;
const HASHSIZE: usize = 32;
pub type Fingerprint = [u8;HASHSIZE];

/// Hashes anything serializable through its bincode representation
#[derive(Clone)]
pub struct ContentHasher {
  hash: HashType,
}

impl ContentHasher {
  pub fn new() -> ContentHasher {
    ContentHasher {
      hash: HashType::new(),
    }
  }

  pub fn result(&self) -> Fingerprint {
    *self.hash.finalize().as_bytes()
  }

  pub fn from_serialize<T>(&mut self, obj: &T) where T: Serialize {
    // Writing into the hasher never fails and our types have no maps
    self::bincode::serialize_into(self, obj).expect("bincode into a hasher can't fail");
  }
}

impl Default for ContentHasher {
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for ContentHasher {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "ContentHasher {{ {:?} }}", self.result())
  }
}

impl Write for ContentHasher {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.hash.update(buf);
    Ok(buf.len())
  }
  fn flush(&mut self) -> std::io::Result<()> {Ok(())}
}

/// Render a fingerprint as lowercase hex for logs and filenames
pub fn to_hex(hash: &Fingerprint) -> String {
  hash.iter().map(|b| format!("{:02x}", b)).collect()
}
