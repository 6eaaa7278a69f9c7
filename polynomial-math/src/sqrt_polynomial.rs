use serde::{Deserialize, Serialize};
use std::fmt;

use super::*;

/// The square root of a polynomial, as an integrand.
///
/// Integrating this is how arc lengths of polynomial curves are computed,
/// e.g. sqrt(x'(t)^2 + y'(t)^2).
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SqrtPolynomial {
  polynomial: Polynomial,
  zero_threshold: f64,
}

impl SqrtPolynomial {
  pub fn new(polynomial: Polynomial) -> SqrtPolynomial {
    SqrtPolynomial::with_settings(polynomial, &Settings::default())
  }

  pub fn with_settings(polynomial: Polynomial, settings: &Settings) -> SqrtPolynomial {
    SqrtPolynomial {
      polynomial,
      zero_threshold: settings.sqrt_zero_threshold,
    }
  }

  pub fn polynomial(&self) -> &Polynomial {
    &self.polynomial
  }

  /// Evaluate the square root of the polynomial.
  ///
  /// Values with magnitude below the zero threshold are treated as exactly 0, so rounding
  /// error near a root of the polynomial doesn't produce a domain violation.
  ///
  /// Fails with `Error::DomainViolation` if the polynomial is (meaningfully) negative at `input`,
  /// and with `Error::InvalidArgument` if `input` is NaN.
  pub fn evaluate(&self, input: f64) -> Result<f64, Error> {
    let mut value = self.polynomial.evaluate(input)?;
    if value.abs() < self.zero_threshold {
      value = 0.0;
    }
    if value < 0.0 {
      return Err(Error::DomainViolation { input, value });
    }
    Ok(value.sqrt())
  }
}

impl Integrand for SqrtPolynomial {
  fn evaluate(&self, input: f64) -> Result<f64, Error> {
    SqrtPolynomial::evaluate(self, input)
  }
}

impl fmt::Display for SqrtPolynomial {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    write!(formatter, "sqrt({})", self.polynomial)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_evaluate() {
    let root = SqrtPolynomial::new(Polynomial::new(vec![1.0, 0.0, 0.0]));
    assert_eq!(root.evaluate(-3.0).unwrap(), 3.0);

    // tiny negative values are rounding error
    let root = SqrtPolynomial::new(Polynomial::new(vec![-1e-9]));
    assert_eq!(root.evaluate(0.0).unwrap(), 0.0);

    let root = SqrtPolynomial::new(Polynomial::new(vec![1.0, -1.0]));
    assert_eq!(
      root.evaluate(0.5),
      Err(Error::DomainViolation {
        input: 0.5,
        value: -0.5
      })
    );
  }

  #[test]
  fn parabola_arc_length() {
    // the curve (t, t^2) has speed sqrt(1 + 4t^2)
    let speed = SqrtPolynomial::new(Polynomial::new(vec![4.0, 0.0, 1.0]));
    let expected = (2.0 * 5f64.sqrt() + 2f64.asinh()) / 4.0;
    let settings = Settings::default();
    assert!((romberg(&speed, 0.0, 1.0, &settings).unwrap() - expected).abs() < 1e-5);
    assert!((simpson(&speed, 0.0, 1.0, &settings).unwrap() - expected).abs() < 1e-5);
  }

  #[test]
  fn integrating_across_a_negative_region_fails() {
    let root = SqrtPolynomial::new(Polynomial::new(vec![1.0, 0.0]));
    assert!(matches!(
      simpson(&root, -1.0, 1.0, &Settings::default()),
      Err(Error::DomainViolation { .. })
    ));
  }

  #[test]
  fn test_display() {
    let root = SqrtPolynomial::new(Polynomial::new(vec![4.0, 0.0, 1.0]));
    assert_eq!(root.to_string(), "sqrt(4t^2 + 1)");
  }
}
