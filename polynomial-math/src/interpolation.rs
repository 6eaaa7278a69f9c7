use smallvec::SmallVec;

use super::*;

/// An interpolated value, along with the last correction applied to it,
/// which serves as an estimate of its error.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Interpolated {
  pub y: f64,
  pub dy: f64,
}

/// Evaluate, at `x`, the polynomial through the `n` sample points starting at index `offset`
/// of `xs` and `ys` (Neville's algorithm).
///
/// The tableau is walked starting from the sample nearest to `x`.
///
/// Fails with `Error::InvalidArgument` if `x` is NaN or the window doesn't fit in the samples,
/// and with `Error::Unsolvable` if two sample abscissas in the window coincide.
pub fn interpolate(
  xs: &[f64],
  ys: &[f64],
  n: usize,
  offset: usize,
  x: f64,
) -> Result<Interpolated, Error> {
  check_input(x, "interpolation input must be a number")?;
  if n == 0 {
    return Err(Error::InvalidArgument {
      reason: "cannot interpolate from zero samples",
    });
  }
  let end = match offset.checked_add(n) {
    Some(end) if end <= xs.len() && end <= ys.len() => end,
    _ => {
      return Err(Error::InvalidArgument {
        reason: "interpolation window extends past the samples",
      })
    }
  };
  let xs = &xs[offset..end];
  let ys = &ys[offset..end];

  let mut c: SmallVec<[f64; 8]> = ys.iter().copied().collect();
  let mut d = c.clone();

  let mut nearest = 0;
  let mut nearest_distance = (x - xs[0]).abs();
  for (index, &sample) in xs.iter().enumerate().skip(1) {
    let distance = (x - sample).abs();
    if distance < nearest_distance {
      nearest = index;
      nearest_distance = distance;
    }
  }

  let mut y = ys[nearest];
  let mut dy = 0.0;
  // `position` is the tableau row the next correction comes from
  let mut position = nearest;
  for m in 1..n {
    for i in 0..n - m {
      let below = xs[i] - x;
      let above = xs[i + m] - x;
      let denominator = below - above;
      if denominator == 0.0 {
        return Err(Error::Unsolvable {
          reason: "two interpolation samples share an abscissa",
        });
      }
      let ratio = (c[i + 1] - d[i]) / denominator;
      d[i] = above * ratio;
      c[i] = below * ratio;
    }
    dy = if 2 * position < n - m {
      c[position]
    } else {
      position -= 1;
      d[position]
    };
    y += dy;
  }

  Ok(Interpolated { y, dy })
}
