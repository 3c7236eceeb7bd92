use std::fmt;

use crate::color_conversions::*;

/// How the three channels of a pixel are to be interpreted
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
  /// Gamma encoded sRGB, the interpretation of everything read from disk
  SRgb,
  /// sRGB primaries without the transfer curve
  LinearSRgb,
  /// CIE 1931 XYZ relative to D65
  Xyz,
  /// CIE Lab, L in 0..100
  Lab,
  /// Cylindrical Lab: lightness, chroma and hue in degrees
  Lch,
}

impl Default for ColorSpace {
  fn default() -> Self {
    ColorSpace::SRgb
  }
}

impl ColorSpace {
  pub fn name(&self) -> &'static str {
    match self {
      ColorSpace::SRgb       => "sRGB",
      ColorSpace::LinearSRgb => "linear sRGB",
      ColorSpace::Xyz        => "XYZ",
      ColorSpace::Lab        => "Lab",
      ColorSpace::Lch        => "Lch",
    }
  }

  /// Convert a single pixel in this space to XYZ
  #[inline(always)]
  pub fn to_xyz(&self, p: (f32, f32, f32)) -> (f32, f32, f32) {
    match self {
      ColorSpace::SRgb => linear_rgb_to_xyz(
        expand_srgb_gamma(p.0), expand_srgb_gamma(p.1), expand_srgb_gamma(p.2)),
      ColorSpace::LinearSRgb => linear_rgb_to_xyz(p.0, p.1, p.2),
      ColorSpace::Xyz => p,
      ColorSpace::Lab => lab_to_xyz(p.0, p.1, p.2),
      ColorSpace::Lch => {
        let (l, a, b) = lch_to_lab(p.0, p.1, p.2);
        lab_to_xyz(l, a, b)
      },
    }
  }

  /// Convert a single XYZ pixel into this space
  #[inline(always)]
  pub fn from_xyz(&self, p: (f32, f32, f32)) -> (f32, f32, f32) {
    match self {
      ColorSpace::SRgb => {
        let (r, g, b) = xyz_to_linear_rgb(p.0, p.1, p.2);
        (apply_srgb_gamma(r), apply_srgb_gamma(g), apply_srgb_gamma(b))
      },
      ColorSpace::LinearSRgb => xyz_to_linear_rgb(p.0, p.1, p.2),
      ColorSpace::Xyz => p,
      ColorSpace::Lab => xyz_to_lab(p.0, p.1, p.2),
      ColorSpace::Lch => {
        let (l, a, b) = xyz_to_lab(p.0, p.1, p.2);
        lab_to_lch(l, a, b)
      },
    }
  }

  #[inline(always)]
  pub fn convert(&self, to: ColorSpace, p: (f32, f32, f32)) -> (f32, f32, f32) {
    match (*self, to) {
      (from, to) if from == to => p,
      // Skip the XYZ detour when only the curve or the polar form changes
      (ColorSpace::SRgb, ColorSpace::LinearSRgb) =>
        (expand_srgb_gamma(p.0), expand_srgb_gamma(p.1), expand_srgb_gamma(p.2)),
      (ColorSpace::LinearSRgb, ColorSpace::SRgb) =>
        (apply_srgb_gamma(p.0), apply_srgb_gamma(p.1), apply_srgb_gamma(p.2)),
      (ColorSpace::Lab, ColorSpace::Lch) => lab_to_lch(p.0, p.1, p.2),
      (ColorSpace::Lch, ColorSpace::Lab) => lch_to_lab(p.0, p.1, p.2),
      (from, to) => to.from_xyz(from.to_xyz(p)),
    }
  }
}

impl fmt::Display for ColorSpace {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn srgb_is_the_default() {
    assert_eq!(ColorSpace::default(), ColorSpace::SRgb);
    assert_eq!(ColorSpace::default().to_string(), "sRGB");
  }

  #[test]
  fn same_space_is_identity() {
    let p = (0.3, 0.6, 0.9);
    assert_eq!(ColorSpace::Lch.convert(ColorSpace::Lch, p), p);
  }

  #[test]
  fn srgb_red_in_lch() {
    let (l, c, h) = ColorSpace::SRgb.convert(ColorSpace::Lch, (1.0, 0.0, 0.0));
    // Reference values for pure sRGB red under D65
    assert!((l - 53.24).abs() < 0.1, "L was {}", l);
    assert!((c - 104.55).abs() < 0.2, "C was {}", c);
    assert!((h - 40.0).abs() < 0.2, "h was {}", h);
  }

  #[test]
  fn lch_back_to_srgb() {
    let spaces = [
      ColorSpace::LinearSRgb,
      ColorSpace::Xyz,
      ColorSpace::Lab,
      ColorSpace::Lch,
    ];
    let p = (0.8, 0.4, 0.1);
    for space in spaces.iter() {
      let there = ColorSpace::SRgb.convert(*space, p);
      let back = space.convert(ColorSpace::SRgb, there);
      assert!((back.0 - p.0).abs() < 1e-3, "{} gave {:?}", space, back);
      assert!((back.1 - p.1).abs() < 1e-3, "{} gave {:?}", space, back);
      assert!((back.2 - p.2).abs() < 1e-3, "{} gave {:?}", space, back);
    }
  }
}
