type Matrix33 = [[f32;3];3];

lazy_static! {
  /// Linear sRGB to XYZ, D65 reference white
  pub static ref SRGB_D65_33: Matrix33 = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
  ];
  pub static ref SRGB_D65_XYZ_WHITE: (f32,f32,f32) = (0.95047, 1.000, 1.08883);
  pub static ref XYZ_D65_33: Matrix33 = invert(&SRGB_D65_33);
}

fn cross(a: &[f32;3], b: &[f32;3]) -> [f32;3] {
  [
    a[1]*b[2] - a[2]*b[1],
    a[2]*b[0] - a[0]*b[2],
    a[0]*b[1] - a[1]*b[0],
  ]
}

// The columns of the inverse are the cross products of pairs of rows over the determinant
fn invert(m: &Matrix33) -> Matrix33 {
  let cols = [cross(&m[1], &m[2]), cross(&m[2], &m[0]), cross(&m[0], &m[1])];
  let det: f32 = m[0].iter().zip(cols[0].iter()).map(|(a, b)| a * b).sum();

  let mut out = [[0.0; 3]; 3];
  for (row, line) in out.iter_mut().enumerate() {
    for (col, v) in line.iter_mut().enumerate() {
      *v = cols[col][row] / det;
    }
  }
  out
}

#[inline(always)]
fn apply_matrix(m: &Matrix33, a: f32, b: f32, c: f32) -> (f32, f32, f32) {
  let dot = |row: &[f32;3]| row[0]*a + row[1]*b + row[2]*c;
  (dot(&m[0]), dot(&m[1]), dot(&m[2]))
}

/// A curve sampled at evenly spaced points over [0,1] and linearly interpolated
/// between them. Inputs outside that range are computed exactly.
struct CurveTable {
  steps: f32,
  samples: Vec<f32>,
  curve: fn(f32) -> f32,
}

impl CurveTable {
  fn with_bits(bits: u32, curve: fn(f32) -> f32) -> CurveTable {
    let steps = (1usize << bits) - 1;
    // One extra sample so interpolating at exactly 1.0 stays in bounds
    let samples = (0..steps+2).map(|i| curve(i as f32 / steps as f32)).collect();
    CurveTable { steps: steps as f32, samples, curve }
  }

  fn eval(&self, v: f32) -> f32 {
    if !(0.0..=1.0).contains(&v) {
      return (self.curve)(v)
    }
    let pos = v * self.steps;
    let idx = pos as usize;
    let frac = pos - idx as f32;
    let (lo, hi) = (self.samples[idx], self.samples[idx+1]);
    lo + (hi - lo) * frac
  }
}

const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

fn lab_f(t: f32) -> f32 {
  if t > LAB_EPSILON { t.cbrt() } else { (LAB_KAPPA*t + 16.0) / 116.0 }
}

fn lab_f_inverse(f: f32) -> f32 {
  let cube = f * f * f;
  if cube > LAB_EPSILON { cube } else { (116.0*f - 16.0) / LAB_KAPPA }
}

fn srgb_decode(v: f32) -> f32 {
  if v < 0.04045 { v / 12.92 } else { ((v + 0.055) / 1.055).powf(2.4) }
}

fn srgb_encode(v: f32) -> f32 {
  if v < 0.0031308 { v * 12.92 } else { 1.055 * v.powf(1.0 / 2.4) - 0.055 }
}

lazy_static! {
  static ref LAB_F_TABLE: CurveTable = CurveTable::with_bits(13, lab_f);
  static ref SRGB_DECODE_TABLE: CurveTable = CurveTable::with_bits(13, srgb_decode);
  static ref SRGB_ENCODE_TABLE: CurveTable = CurveTable::with_bits(13, srgb_encode);
}

/// Remove sRGB gamma from a value
#[inline(always)]
pub fn expand_srgb_gamma(v: f32) -> f32 {
  SRGB_DECODE_TABLE.eval(v)
}

/// Apply sRGB gamma to a value
#[inline(always)]
pub fn apply_srgb_gamma(v: f32) -> f32 {
  SRGB_ENCODE_TABLE.eval(v)
}

#[inline(always)]
pub fn linear_rgb_to_xyz(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
  apply_matrix(&SRGB_D65_33, r, g, b)
}

#[inline(always)]
pub fn xyz_to_linear_rgb(x: f32, y: f32, z: f32) -> (f32, f32, f32) {
  apply_matrix(&XYZ_D65_33, x, y, z)
}

/// XYZ to CIE Lab with L in 0..100 against the D65 white point
pub fn xyz_to_lab(x: f32, y: f32, z: f32) -> (f32, f32, f32) {
  let (xw, yw, zw) = *SRGB_D65_XYZ_WHITE;
  let fx = LAB_F_TABLE.eval(x / xw);
  let fy = LAB_F_TABLE.eval(y / yw);
  let fz = LAB_F_TABLE.eval(z / zw);

  (116.0*fy - 16.0, 500.0*(fx - fy), 200.0*(fy - fz))
}

pub fn lab_to_xyz(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
  let fy = (l + 16.0) / 116.0;
  let fx = fy + a / 500.0;
  let fz = fy - b / 200.0;

  // Lightness has its own linear segment cut at L = 8
  let yr = if l > LAB_KAPPA*LAB_EPSILON { fy*fy*fy } else { l / LAB_KAPPA };

  let (xw, yw, zw) = *SRGB_D65_XYZ_WHITE;
  (lab_f_inverse(fx)*xw, yr*yw, lab_f_inverse(fz)*zw)
}

/// Lab to cylindrical Lch, hue in degrees within [0, 360)
#[inline(always)]
pub fn lab_to_lch(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
  let c = a.hypot(b);
  let mut h = b.atan2(a).to_degrees();
  if h < 0.0 {
    h += 360.0;
  }
  if h >= 360.0 {
    h -= 360.0;
  }
  (l, c, h)
}

#[inline(always)]
pub fn lch_to_lab(l: f32, c: f32, h: f32) -> (f32, f32, f32) {
  let (sin, cos) = h.to_radians().sin_cos();
  (l, c * cos, c * sin)
}

#[inline(always)]
pub fn input8bit(v: u8) -> f32 {
  (v as f32) / 255.0
}

/// Quantize a display referred value to 8 bits, clipping anything outside [0,1]
#[inline(always)]
pub fn output8bit(v: f32) -> u8 {
  num_traits::clamp((v * 255.0).round(), 0.0, 255.0) as u8
}
