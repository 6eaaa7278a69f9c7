use arrayvec::ArrayVec;
use smallvec::{smallvec, SmallVec};
use std::f64::consts::{LN_10, LN_2};
use tracing::{debug, trace};

use super::*;
use crate::bounds::ERROR_FACTOR;

impl Polynomial {
  /// Find a root in `[min, max]` by bisection, using the default tolerance and accuracy.
  pub fn bisection(&self, min: f64, max: f64) -> Result<Option<f64>, Error> {
    let settings = Settings::default();
    self.bisection_with(
      min,
      max,
      settings.bisection_tolerance,
      settings.bisection_accuracy,
    )
  }

  /// Find a root in `[min, max]` by bisection.
  ///
  /// An endpoint whose value has magnitude <= `tolerance` is returned immediately.
  /// Otherwise, the endpoints must bracket a root (their values must not have the same sign);
  /// if they don't, this returns Ok(None). The number of halvings is fixed in advance from the
  /// bracket width, enough to pin the root down to `accuracy` decimal digits, but a midpoint
  /// whose value is within `tolerance` ends the search early.
  ///
  /// Fails with `Error::InvalidArgument` if either endpoint is NaN or the bracket is infinite.
  pub fn bisection_with(
    &self,
    min: f64,
    max: f64,
    tolerance: f64,
    accuracy: u32,
  ) -> Result<Option<f64>, Error> {
    check_input(min, "bisection bounds must be numbers")?;
    check_input(max, "bisection bounds must be numbers")?;
    let (mut min, mut max) = (min, max);
    let mut min_value = self.evaluate_unchecked(min);
    let max_value = self.evaluate_unchecked(max);

    if min_value.abs() <= tolerance {
      return Ok(Some(min));
    }
    if max_value.abs() <= tolerance {
      return Ok(Some(max));
    }
    // written this way so that NaN values also count as "no bracket"
    if !(min_value * max_value <= 0.0) {
      debug!(min, max, min_value, max_value, "bisection bounds don't bracket a root");
      return Ok(None);
    }

    let iterations = (((max - min).ln() + LN_10 * accuracy as f64) / LN_2).ceil();
    if iterations.is_infinite() {
      return Err(Error::InvalidArgument {
        reason: "bisection bounds must be finite",
      });
    }
    if !(iterations > 0.0) {
      return Ok(None);
    }

    let mut result = None;
    for _ in 0..iterations as u64 {
      let middle = 0.5 * (min + max);
      result = Some(middle);
      let value = self.evaluate_unchecked(middle);
      if value.abs() <= tolerance {
        break;
      }
      if value * min_value < 0.0 {
        max = middle;
      } else {
        min = middle;
        min_value = value;
      }
    }
    Ok(result)
  }

  /// The root of a linear polynomial.
  ///
  /// Empty if the polynomial isn't exactly degree 1 or its leading coefficient is 0.
  pub fn linear_root(&self) -> Roots {
    let mut results = Roots::new();
    if self.degree() == Some(1) {
      let coefficients = self.coefficients();
      if coefficients[1] != 0.0 {
        results.push(-coefficients[0] / coefficients[1]);
      }
    }
    results
  }

  /// The real roots of a quadratic polynomial.
  ///
  /// A double root is reported once. Complex roots are not reported.
  pub fn quadratic_roots(&self) -> Roots {
    let mut results = Roots::new();
    if self.degree() == Some(2) {
      let coefficients = self.coefficients();
      let a = coefficients[2];
      let b = coefficients[1] / a;
      let c = coefficients[0] / a;
      let discriminant = b * b - 4.0 * c;

      if discriminant > 0.0 {
        let e = discriminant.sqrt();
        results.push(0.5 * (-b + e));
        results.push(0.5 * (-b - e));
      } else if discriminant == 0.0 {
        results.push(0.5 * -b);
      }
    }
    results
  }

  /// The real roots of a cubic polynomial, from the depressed cubic.
  ///
  /// The discriminant is treated as 0 if it is within `zero_error_estimate()`. In that case,
  /// two values are reported: the single root and the double root (once).
  pub fn cubic_roots(&self) -> Roots {
    let mut results = Roots::new();
    if self.degree() != Some(3) {
      return results;
    }
    let coefficients = self.coefficients();
    let c3 = coefficients[3];
    let c2 = coefficients[2] / c3;
    let c1 = coefficients[1] / c3;
    let c0 = coefficients[0] / c3;

    // substituting x = t - c2/3 gives t^3 + a t + b
    let a = (3.0 * c1 - c2 * c2) / 3.0;
    let b = (2.0 * c2 * c2 * c2 - 9.0 * c1 * c2 + 27.0 * c0) / 27.0;
    let offset = c2 / 3.0;
    let half_b = b / 2.0;
    let mut discriminant = b * b / 4.0 + a * a * a / 27.0;

    let zero_epsilon = self.zero_error_estimate(None);
    if discriminant.abs() <= zero_epsilon {
      debug!(discriminant, zero_epsilon, "treating cubic discriminant as zero");
      discriminant = 0.0;
    }

    if discriminant > 0.0 {
      let e = discriminant.sqrt();
      let root = (-half_b + e).cbrt() + (-half_b - e).cbrt();
      results.push(root - offset);
    } else if discriminant < 0.0 {
      let distance = (-a / 3.0).sqrt();
      let angle = (-discriminant).sqrt().atan2(-half_b) / 3.0;
      let (sin, cos) = angle.sin_cos();
      let sqrt3 = 3f64.sqrt();

      results.push(2.0 * distance * cos - offset);
      results.push(-distance * (cos + sqrt3 * sin) - offset);
      results.push(-distance * (cos - sqrt3 * sin) - offset);
    } else {
      let t = -half_b.cbrt();
      results.push(2.0 * t - offset);
      results.push(-t - offset);
    }
    results
  }

  pub fn quartic_roots(&self) -> Result<Roots, Error> {
    self.quartic_roots_with(&Settings::default())
  }

  /// The real roots of a quartic polynomial.
  ///
  /// The roots of the derivative split the real line into intervals on which the quartic is
  /// monotonic. Each interval whose ends have opposite signs contains exactly one root, which
  /// is refined with `newton_secant_bisection`. The outermost intervals are open-ended,
  /// so they are closed off using `bounds()`.
  ///
  /// A critical point where the quartic is indistinguishable from 0 is a multiple root;
  /// it is reported twice, regardless of its actual multiplicity.
  pub fn quartic_roots_with(&self, settings: &Settings) -> Result<Roots, Error> {
    let mut results = Roots::new();
    if self.degree() != Some(4) {
      return Ok(results);
    }

    let mut coefficients = self.coefficients().to_vec();
    let leading = coefficients[4];
    for coefficient in coefficients.iter_mut() {
      *coefficient /= leading;
    }
    // a root at exactly 0 is common, and rounding error shouldn't hide it
    if coefficients[0].abs() < 10.0 * ERROR_FACTOR * coefficients[3].abs() {
      coefficients[0] = 0.0;
    }
    let quartic = Polynomial::from_coefficients(coefficients);

    let bounds = self.bounds();
    // both sides of the bound collapsed: no nonzero real roots, and 0 isn't a root either
    if bounds.max_abs() == 0.0 && quartic.coefficients()[0] != 0.0 {
      debug!("quartic bounds exclude every real root");
      return Ok(results);
    }

    let derivative = quartic.derivative();
    let mut critical_points: ArrayVec<f64, 3> =
      derivative.roots_with(settings)?.into_iter().collect();
    critical_points.sort_by(f64::total_cmp);

    let zero_epsilon = self.zero_error_estimate(Some(bounds.max_abs()));
    let critical_values: ArrayVec<f64, 3> = critical_points
      .iter()
      .map(|&x| {
        let value = quartic.evaluate_unchecked(x);
        if value.abs() < zero_epsilon {
          0.0
        } else {
          value
        }
      })
      .collect();

    let step = (0.1 * (bounds.max_x - bounds.min_x) / 4.0).max(ERROR_FACTOR);
    let mut seeds: ArrayVec<(f64, [f64; 2]), 4> = ArrayVec::new();

    if let (Some(&first), Some(&last)) = (critical_points.first(), critical_points.last()) {
      let last_index = critical_points.len() - 1;
      let mut index = 0;

      let first_value = critical_values[0];
      if first_value != 0.0 {
        let outside = first - step;
        if sign(first_value) != sign(quartic.evaluate_unchecked(outside) - first_value) {
          seeds.push((outside, [bounds.min_x, first]));
        }
      } else {
        results.push(first);
        results.push(first);
        index += 1;
      }

      while index < last_index {
        let next_value = critical_values[index + 1];
        if next_value == 0.0 {
          results.push(critical_points[index + 1]);
          results.push(critical_points[index + 1]);
          index += 1;
        } else if sign(critical_values[index]) != sign(next_value) {
          let interval = [critical_points[index], critical_points[index + 1]];
          seeds.push((0.5 * (interval[0] + interval[1]), interval));
        }
        index += 1;
      }

      let last_value = critical_values[last_index];
      if last_value != 0.0 {
        let outside = last + step;
        if sign(last_value) != sign(quartic.evaluate_unchecked(outside) - last_value) {
          seeds.push((outside, [last, bounds.max_x]));
        }
      }
    }

    trace!(?critical_points, seeds = seeds.len(), "isolated quartic roots");
    for (seed, bracket) in seeds {
      results.push(newton_secant_bisection(
        seed,
        |x| quartic.evaluate_unchecked(x),
        |x| derivative.evaluate_unchecked(x),
        settings.refinement_iterations,
        Some(bracket),
      )?);
    }
    Ok(results)
  }

  pub fn roots(&self) -> Result<Roots, Error> {
    self.roots_with(&Settings::default())
  }

  /// The real roots, for polynomials of degree up to 4.
  ///
  /// Negligible leading coefficients are dropped first (see `simplify`); the polynomial
  /// itself is not modified. Constant polynomials, and polynomials of degree above 4,
  /// have no roots reported; use `roots_in_interval` for the latter.
  pub fn roots_with(&self, settings: &Settings) -> Result<Roots, Error> {
    let mut simplified = self.clone();
    simplified.simplify_within(settings.simplify_tolerance);
    Ok(match simplified.degree() {
      Some(1) => simplified.linear_root(),
      Some(2) => simplified.quadratic_roots(),
      Some(3) => simplified.cubic_roots(),
      Some(4) => simplified.quartic_roots_with(settings)?,
      _ => Roots::new(),
    })
  }

  pub fn roots_in_interval(&self, min: f64, max: f64) -> Result<Roots, Error> {
    self.roots_in_interval_with(min, max, &Settings::default())
  }

  /// The roots within `[min, max]`, for polynomials of any degree.
  ///
  /// The roots of the derivative (found recursively) split the interval into pieces on which
  /// the polynomial is monotonic, and each piece is searched with `bisection`. A root where
  /// the polynomial touches 0 without crossing it can be missed.
  ///
  /// Fails with `Error::InvalidArgument` for constant polynomials.
  pub fn roots_in_interval_with(
    &self,
    min: f64,
    max: f64,
    settings: &Settings,
  ) -> Result<Roots, Error> {
    let bisect = |min: f64, max: f64| {
      self.bisection_with(
        min,
        max,
        settings.bisection_tolerance,
        settings.bisection_accuracy,
      )
    };

    let mut roots = Roots::new();
    match self.degree() {
      None | Some(0) => {
        return Err(Error::InvalidArgument {
          reason: "a constant polynomial has no isolated roots",
        })
      }
      Some(1) => roots.extend(bisect(min, max)?),
      Some(_) => {
        let derivative_roots = self
          .derivative()
          .roots_in_interval_with(min, max, settings)?;
        let mut boundaries: SmallVec<[f64; 8]> = smallvec![min];
        boundaries.extend(derivative_roots);
        boundaries.push(max);
        for piece in boundaries.windows(2) {
          roots.extend(bisect(piece[0], piece[1])?);
        }
      }
    }
    Ok(roots)
  }
}
