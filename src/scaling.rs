extern crate rayon;
use self::rayon::prelude::*;

use crate::buffer::*;

/// Size a (height, width) image should be reduced to so that its longer side
/// is at most `maxsize`. Returns None when no reduction is needed.
pub fn calculate_scaling(height: usize, width: usize, maxsize: usize) -> Option<(usize, usize)> {
  let longest = height.max(width);
  if longest == 0 || longest <= maxsize {
    return None
  }

  // Do the calculations manually to avoid off-by-one errors from floating point rounding
  let scale = |side: usize| ((side * maxsize) / longest).max(1);
  if height >= width {
    Some((maxsize.max(1), scale(width)))
  } else {
    Some((scale(height), maxsize.max(1)))
  }
}

// Source span covered by output index `idx` when every output sample covers
// `skip` input samples: first and one-past-last input index plus the
// fractional coverage of those two edge samples
fn calc_skips(idx: usize, idxmax: usize, skip: f32) -> (usize, usize, f32, f32) {
  let from = (idx as f32)*skip;
  let fromback = from.floor();
  let to = ((idx+1) as f32)*skip;
  let toforward = (idxmax as f32).min(to.ceil()).max(fromback + 1.0);

  let fromfactor = 1.0 - (from - fromback);
  let tofactor = 1.0 - (toforward - to).max(0.0);

  (fromback as usize, toforward as usize, fromfactor, tofactor)
}

#[inline(always)]
fn edge_factor(pos: usize, from: usize, to: usize, fromfactor: f32, tofactor: f32) -> f32 {
  let mut factor = 1.0;
  if pos == from {
    factor *= fromfactor;
  }
  if pos + 1 == to {
    factor *= tofactor;
  }
  factor
}

/// Area averaging reduction: every output sample is the coverage weighted mean
/// of the input samples its footprint overlaps, for any number of channels
pub fn scale_down_buffer(buf: &PixelBuffer, nheight: usize, nwidth: usize) -> PixelBuffer {
  log::debug!("Scaling buffer from {}x{} to {}x{}", buf.width, buf.height, nwidth, nheight);
  let channels = buf.channels;
  let mut out = PixelBuffer::new(nheight, nwidth, channels);
  if buf.is_empty() || out.is_empty() {
    return out
  }

  let rowskip = (buf.height as f32) / (nheight as f32);
  let colskip = (buf.width as f32) / (nwidth as f32);

  out.data.par_chunks_exact_mut(nwidth*channels).enumerate().for_each(|(row, line)| {
    let (fromrow, torow, topfactor, bottomfactor) = calc_skips(row, buf.height, rowskip);
    let mut sums = vec![0.0f32; channels];
    for col in 0..nwidth {
      let (fromcol, tocol, leftfactor, rightfactor) = calc_skips(col, buf.width, colskip);
      for s in sums.iter_mut() {
        *s = 0.0;
      }
      let mut count = 0.0f32;
      for y in fromrow..torow {
        let yfactor = edge_factor(y, fromrow, torow, topfactor, bottomfactor);
        let srcline = &buf.data[y*buf.width*channels..(y+1)*buf.width*channels];
        for x in fromcol..tocol {
          let factor = yfactor * edge_factor(x, fromcol, tocol, leftfactor, rightfactor);
          let pix = &srcline[x*channels..(x+1)*channels];
          for c in 0..channels {
            sums[c] += pix[c] * factor;
          }
          count += factor;
        }
      }

      if count > 0.0 {
        for c in 0..channels {
          line[col*channels+c] = sums[c] / count;
        }
      }
    }
  });

  out
}
