//! Closed-form estimates of where a polynomial's roots can be.
//!
//! None of these iterate; each is a single pass over the coefficients.

use serde::{Deserialize, Serialize};

use super::*;

/// Relative error assumed for a single floating-point operation when deciding
/// whether a computed value is indistinguishable from zero.
pub(crate) const ERROR_FACTOR: f64 = 1e-15;

/// An interval `[min_x, max_x]`.
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct RealBounds {
  pub min_x: f64,
  pub max_x: f64,
}

impl RealBounds {
  pub fn contains(&self, x: f64) -> bool {
    self.min_x <= x && x <= self.max_x
  }

  pub fn max_abs(&self) -> f64 {
    self.min_x.abs().max(self.max_x.abs())
  }
}

/// One bound for the negative roots and one for the positive roots.
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SidedBounds {
  pub negative_x: f64,
  pub positive_x: f64,
}

/// Root counts implied by Descartes' rule of signs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct DescartesCounts {
  /// Upper bound on the number of positive real roots (counted with multiplicity).
  pub positive: usize,
  /// Upper bound on the number of negative real roots (counted with multiplicity).
  pub negative: usize,
  /// Multiplicity of the root at exactly 0.
  pub zero: usize,
  /// Lower bound on the number of non-real roots.
  pub min_complex: usize,
}

impl Polynomial {
  /// Fujiwara's bound on the real roots.
  ///
  /// Every positive root is <= `positive_x` and every negative root is >= `negative_x`.
  /// A side with no possible roots (judging by the coefficient signs) gets a bound of 0.
  pub fn bounds_upper_real_fujiwara(&self) -> SidedBounds {
    let coefficients = self.coefficients();
    let degree = match self.degree() {
      Some(degree) if degree > 0 => degree,
      _ => {
        return SidedBounds {
          negative_x: 0.0,
          positive_x: 0.0,
        }
      }
    };
    let leading = coefficients[degree];

    let mut positive_max = 0.0f64;
    let mut negative_max = 0.0f64;
    for (power, &coefficient) in coefficients[..degree].iter().enumerate() {
      let normalized = coefficient / leading;
      // Fujiwara's refinement halves the constant term
      let halved = if power == 0 { normalized / 2.0 } else { normalized };
      let magnitude = halved.abs().powf(1.0 / (degree - power) as f64);
      if normalized < 0.0 {
        positive_max = positive_max.max(magnitude);
      }
      // substituting x -> -x flips the sign of every term whose parity differs from the leading term's
      let could_give_negative_root = if degree % 2 == power % 2 {
        normalized < 0.0
      } else {
        normalized > 0.0
      };
      if could_give_negative_root {
        negative_max = negative_max.max(magnitude);
      }
    }

    SidedBounds {
      negative_x: -2.0 * negative_max,
      positive_x: 2.0 * positive_max,
    }
  }

  /// The reciprocals of the Fujiwara bounds of the reversed polynomial.
  ///
  /// No nonzero root has smaller magnitude than these (on the respective side).
  pub fn bounds_lower_real_fujiwara(&self) -> SidedBounds {
    let mut reversed = self.coefficients().to_vec();
    reversed.reverse();
    let upper = Polynomial::from_coefficients(reversed).bounds_upper_real_fujiwara();
    SidedBounds {
      negative_x: 1.0 / upper.negative_x,
      positive_x: 1.0 / upper.positive_x,
    }
  }

  /// An interval containing every real root.
  ///
  /// When one side of the Fujiwara bound collapses to 0, meaning there are no roots on
  /// that side, it is replaced with the lower bound of the other side.
  /// If the result is inverted, every root is excluded and the interval collapses to 0.
  pub fn bounds(&self) -> RealBounds {
    let upper = self.bounds_upper_real_fujiwara();
    let mut result = RealBounds {
      min_x: upper.negative_x,
      max_x: upper.positive_x,
    };

    if upper.negative_x == 0.0 && upper.positive_x == 0.0 {
      return result;
    }

    if upper.negative_x == 0.0 {
      result.min_x = self.bounds_lower_real_fujiwara().positive_x;
    } else if upper.positive_x == 0.0 {
      result.max_x = self.bounds_lower_real_fujiwara().negative_x;
    }

    if result.min_x > result.max_x {
      result.min_x = 0.0;
      result.max_x = 0.0;
    }

    result
  }

  /// Rouché's bound: every root, real or complex, has magnitude at most this.
  ///
  /// Returns NaN for a polynomial with no coefficients.
  pub fn bound_upper_abs_rouche(&self) -> f64 {
    let coefficients = self.coefficients();
    let (leading, lower) = match coefficients.split_last() {
      Some(split) => split,
      None => return std::f64::NAN,
    };
    let largest = lower
      .iter()
      .fold(0.0f64, |largest, coefficient| largest.max(coefficient.abs()));
    1.0 + largest / leading.abs()
  }

  /// Rouché's bound: every root, real or complex, has magnitude at least this.
  ///
  /// Returns NaN for a polynomial with no coefficients.
  pub fn bound_lower_abs_rouche(&self) -> f64 {
    let coefficients = self.coefficients();
    let (constant, higher) = match coefficients.split_first() {
      Some(split) => split,
      None => return std::f64::NAN,
    };
    let largest = higher
      .iter()
      .fold(0.0f64, |largest, coefficient| largest.max(coefficient.abs()));
    constant.abs() / (constant.abs() + largest)
  }

  /// Laguerre's bound on the roots, assuming that every root is real.
  ///
  /// # Precondition
  ///
  /// The result is only meaningful if the polynomial has no complex roots.
  /// This is not checked; calling it on a polynomial with complex roots
  /// silently returns a meaningless (possibly NaN) interval.
  ///
  /// Fails with `Error::InvalidArgument` for polynomials of degree < 2.
  pub fn bounds_real_laguerre(&self) -> Result<RealBounds, Error> {
    let degree = match self.degree() {
      Some(degree) if degree >= 2 => degree,
      _ => {
        return Err(Error::InvalidArgument {
          reason: "Laguerre bounds require a polynomial of degree at least 2",
        })
      }
    };
    let a = self.coefficients();
    let n = degree as f64;
    let leading = a[degree];
    let mean = -a[degree - 1] / (n * leading);
    let under_sqrt =
      a[degree - 1] * a[degree - 1] - 2.0 * n / (n - 1.0) * leading * a[degree - 2];
    let spread = ((n - 1.0) / (n * leading) * under_sqrt.sqrt()).abs();
    Ok(RealBounds {
      min_x: mean - spread,
      max_x: mean + spread,
    })
  }

  /// A tolerance below which a value of this polynomial is indistinguishable from zero.
  ///
  /// The tolerance scales with the largest term of the polynomial (relative to the leading
  /// coefficient) at inputs of magnitude `max_abs_x`. If `max_abs_x` isn't given, the
  /// largest magnitude in `bounds()` is used.
  pub fn zero_error_estimate(&self, max_abs_x: Option<f64>) -> f64 {
    let max_abs_x = max_abs_x.unwrap_or_else(|| self.bounds().max_abs());

    if max_abs_x < 0.001 {
      return 2.0 * self.evaluate_unchecked(ERROR_FACTOR).abs();
    }

    let leading = match self.leading_coefficient() {
      Some(leading) => leading,
      None => return 0.0,
    };
    let largest_term = self
      .coefficients()
      .iter()
      .enumerate()
      .fold(0.0f64, |largest, (power, coefficient)| {
        largest.max((coefficient / leading * max_abs_x.powi(power as i32)).abs())
      });
    10.0 * ERROR_FACTOR * largest_term
  }

  /// Count sign changes in the coefficients (Descartes' rule of signs).
  ///
  /// Negative roots are counted from the sign changes of p(-x), computed by flipping
  /// the signs of the odd-power coefficients as they're scanned.
  ///
  /// `min_complex` is the degree minus both sign-change counts and minus the multiplicity
  /// of the root at 0, since zero roots show up in neither count.
  pub fn descartes(&self) -> DescartesCounts {
    let mut positive = 0;
    let mut negative = 0;
    let mut previous: Option<(bool, bool)> = None;
    for (power, &coefficient) in self.coefficients().iter().enumerate().rev() {
      if coefficient == 0.0 || coefficient.is_nan() {
        continue;
      }
      let is_positive = coefficient > 0.0;
      let is_positive_when_negated = is_positive != (power % 2 == 1);
      if let Some((previous_positive, previous_positive_when_negated)) = previous {
        if previous_positive != is_positive {
          positive += 1;
        }
        if previous_positive_when_negated != is_positive_when_negated {
          negative += 1;
        }
      }
      previous = Some((is_positive, is_positive_when_negated));
    }

    let zero = self
      .coefficients()
      .iter()
      .take_while(|&&coefficient| coefficient == 0.0)
      .count();
    let degree = self.degree().unwrap_or(0);
    DescartesCounts {
      positive,
      negative,
      zero,
      min_complex: degree.saturating_sub(positive + negative + zero),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::polynomial_testing::from_roots;

  #[test]
  fn fujiwara_bounds_contain_the_roots() {
    let polynomial = from_roots(&[5.0, 6.0, 7.0, 8.0]);
    let upper = polynomial.bounds_upper_real_fujiwara();
    assert_eq!(upper.negative_x, 0.0);
    assert_eq!(upper.positive_x, 52.0);

    let bounds = polynomial.bounds();
    assert!(bounds.min_x > 0.0 && bounds.min_x <= 5.0, "{:?}", bounds);
    assert!(bounds.contains(8.0), "{:?}", bounds);

    let polynomial = from_roots(&[-3.0, -1.0, 2.0]);
    let bounds = polynomial.bounds();
    for &root in &[-3.0, -1.0, 2.0] {
      assert!(bounds.contains(root), "{:?}", bounds);
    }
  }

  #[test]
  fn lower_fujiwara_bound_excludes_small_roots() {
    let polynomial = from_roots(&[5.0, 6.0, 7.0, 8.0]);
    let lower = polynomial.bounds_lower_real_fujiwara();
    assert!(lower.positive_x > 0.0 && lower.positive_x <= 5.0);
  }

  #[test]
  fn bounds_of_rootless_polynomial_collapse() {
    let bounds = Polynomial::new(vec![1.0, 0.0, 1.0]).bounds();
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.max_x, 0.0);
  }

  #[test]
  fn test_rouche() {
    let polynomial = from_roots(&[5.0, 6.0]);
    assert_eq!(polynomial.bound_upper_abs_rouche(), 31.0);
    assert_eq!(polynomial.bound_lower_abs_rouche(), 30.0 / 41.0);
    // x^2 + 4 has roots +-2i
    let polynomial = Polynomial::new(vec![1.0, 0.0, 4.0]);
    assert!(polynomial.bound_upper_abs_rouche() >= 2.0);
    assert!(polynomial.bound_lower_abs_rouche() <= 2.0);
    assert!(Polynomial::default().bound_upper_abs_rouche().is_nan());
  }

  #[test]
  fn laguerre_bounds_are_tight_for_quadratics() {
    let bounds = from_roots(&[5.0, 6.0]).bounds_real_laguerre().unwrap();
    assert!((bounds.min_x - 5.0).abs() < 1e-12);
    assert!((bounds.max_x - 6.0).abs() < 1e-12);

    let bounds = from_roots(&[-2.0, 1.0, 3.0, 4.0]).bounds_real_laguerre().unwrap();
    for &root in &[-2.0, 1.0, 3.0, 4.0] {
      assert!(bounds.contains(root), "{:?}", bounds);
    }

    assert!(matches!(
      Polynomial::new(vec![1.0, 2.0]).bounds_real_laguerre(),
      Err(Error::InvalidArgument { .. })
    ));
  }

  #[test]
  fn zero_error_estimate_scales_with_coefficients() {
    let small = from_roots(&[5.0, 6.0, 7.0]);
    let mut large = small.clone();
    large.divide_scalar(1e-6);
    let estimate = small.zero_error_estimate(None);
    assert!(estimate > 0.0 && estimate < 1e-9, "{}", estimate);
    // scaling the whole polynomial doesn't change the relative term sizes
    assert!((large.zero_error_estimate(None) - estimate).abs() < 1e-20);
    assert!(small.zero_error_estimate(Some(100.0)) > estimate);
  }

  #[test]
  fn zero_error_estimate_near_origin() {
    // both bounds collapse to 0, so the estimate falls back to a tiny evaluation
    let polynomial = Polynomial::new(vec![1.0, 0.0, 1e-20]);
    assert_eq!(
      polynomial.zero_error_estimate(None),
      2.0 * polynomial.evaluate_unchecked(ERROR_FACTOR).abs()
    );
  }

  #[test]
  fn test_descartes() {
    let counts = from_roots(&[5.0, 6.0]).descartes();
    assert_eq!(
      counts,
      DescartesCounts {
        positive: 2,
        negative: 0,
        zero: 0,
        min_complex: 0
      }
    );

    let counts = Polynomial::new(vec![1.0, 0.0, 1.0]).descartes();
    assert_eq!((counts.positive, counts.negative, counts.min_complex), (0, 0, 2));

    let counts = from_roots(&[-3.0, -1.0, 2.0]).descartes();
    assert_eq!((counts.positive, counts.negative, counts.min_complex), (1, 2, 0));

    // x^3 - x = x(x - 1)(x + 1)
    let counts = Polynomial::new(vec![1.0, 0.0, -1.0, 0.0]).descartes();
    assert_eq!(
      (counts.positive, counts.negative, counts.zero, counts.min_complex),
      (1, 1, 1, 0)
    );

    // x^2 (x^2 + 1): the double root at 0 isn't counted as complex
    let counts = Polynomial::new(vec![1.0, 0.0, 1.0, 0.0, 0.0]).descartes();
    assert_eq!(
      (counts.positive, counts.negative, counts.zero, counts.min_complex),
      (0, 0, 2, 2)
    );
  }
}
