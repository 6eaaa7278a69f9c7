use serde::{Deserialize, Serialize};
use std::cmp::max;
use std::fmt;

use super::*;

/// A polynomial with real coefficients.
///
/// `coefficients[i]` is the coefficient of x^i. Trailing (highest-power) zero coefficients
/// are allowed, and nothing removes them implicitly; use `simplify` when the degree matters.
///
/// `add`, `multiply` and `derivative` return new polynomials. `divide_scalar`, `simplify`,
/// `remove_zeros` and `monic` modify the polynomial in place and return it for chaining.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize, Debug)]
pub struct Polynomial {
  coefficients: Vec<f64>,
}

impl Polynomial {
  /// Build a polynomial from its coefficients, highest power first.
  ///
  /// `Polynomial::new(vec![1.0, -3.0, 2.0])` is x^2 - 3x + 2.
  pub fn new(highest_power_first: impl IntoIterator<Item = f64>) -> Polynomial {
    let mut coefficients: Vec<f64> = highest_power_first.into_iter().collect();
    coefficients.reverse();
    Polynomial { coefficients }
  }

  /// Build a polynomial from its coefficients, lowest power first.
  pub fn from_coefficients(coefficients: Vec<f64>) -> Polynomial {
    Polynomial { coefficients }
  }

  /// The coefficients, lowest power first.
  pub fn coefficients(&self) -> &[f64] {
    &self.coefficients
  }

  pub fn into_coefficients(self) -> Vec<f64> {
    self.coefficients
  }

  /// The number of coefficients minus one, or None if there are no coefficients at all.
  ///
  /// Zero leading coefficients still count toward the degree.
  pub fn degree(&self) -> Option<usize> {
    self.coefficients.len().checked_sub(1)
  }

  pub fn leading_coefficient(&self) -> Option<f64> {
    self.coefficients.last().copied()
  }

  /// Evaluate the polynomial using Horner's method.
  ///
  /// Fails with `Error::InvalidArgument` if the input is NaN.
  pub fn evaluate(&self, input: f64) -> Result<f64, Error> {
    check_input(input, "polynomial input must be a number")?;
    Ok(self.evaluate_unchecked(input))
  }

  /// Same as evaluate(), but without checking the input.
  pub fn evaluate_unchecked(&self, input: f64) -> f64 {
    self
      .coefficients
      .iter()
      .rev()
      .fold(0.0, |result, coefficient| result * input + coefficient)
  }

  #[allow(clippy::should_implement_trait)]
  pub fn add(&self, other: &Polynomial) -> Polynomial {
    let length = max(self.coefficients.len(), other.coefficients.len());
    let coefficients = (0..length)
      .map(|power| {
        self.coefficients.get(power).copied().unwrap_or(0.0)
          + other.coefficients.get(power).copied().unwrap_or(0.0)
      })
      .collect();
    Polynomial { coefficients }
  }

  pub fn multiply(&self, other: &Polynomial) -> Polynomial {
    let (first_degree, second_degree) = match (self.degree(), other.degree()) {
      (Some(first), Some(second)) => (first, second),
      _ => return Polynomial::default(),
    };
    let mut coefficients = vec![0.0; first_degree + second_degree + 1];
    for (first_power, first_coefficient) in self.coefficients.iter().enumerate() {
      for (second_power, second_coefficient) in other.coefficients.iter().enumerate() {
        coefficients[first_power + second_power] += first_coefficient * second_coefficient;
      }
    }
    Polynomial { coefficients }
  }

  /// Divide every coefficient by `divisor`.
  ///
  /// Dividing by zero is not checked; the coefficients become infinite or NaN.
  pub fn divide_scalar(&mut self, divisor: f64) -> &mut Polynomial {
    for coefficient in self.coefficients.iter_mut() {
      *coefficient /= divisor;
    }
    self
  }

  /// Drop leading coefficients whose magnitude is at most `Settings::default().simplify_tolerance`.
  pub fn simplify(&mut self) -> &mut Polynomial {
    self.simplify_within(Settings::default().simplify_tolerance)
  }

  /// Drop leading coefficients whose magnitude is at most `tolerance`.
  pub fn simplify_within(&mut self, tolerance: f64) -> &mut Polynomial {
    while let Some(&leading) = self.coefficients.last() {
      if leading.abs() > tolerance {
        break;
      }
      self.coefficients.pop();
    }
    self
  }

  pub fn remove_zeros(&mut self) -> &mut Polynomial {
    self.remove_zeros_within(Settings::default().remove_zeros_tolerance)
  }

  /// Set to exactly 0 every coefficient that is negligible relative to the largest one.
  ///
  /// "Negligible" means smaller in magnitude than `10 * tolerance * (largest magnitude)`.
  /// The leading coefficient is never changed.
  pub fn remove_zeros_within(&mut self, tolerance: f64) -> &mut Polynomial {
    let largest = self
      .coefficients
      .iter()
      .fold(0.0f64, |largest, coefficient| largest.max(coefficient.abs()));
    let error = 10.0 * tolerance * largest;
    if let Some((_, lower)) = self.coefficients.split_last_mut() {
      for coefficient in lower {
        if coefficient.abs() < error {
          *coefficient = 0.0;
        }
      }
    }
    self
  }

  /// Scale the polynomial so that its leading coefficient is 1.
  pub fn monic(&mut self) -> &mut Polynomial {
    if let Some(leading) = self.leading_coefficient() {
      if leading != 1.0 {
        self.divide_scalar(leading);
      }
    }
    self
  }

  pub fn derivative(&self) -> Polynomial {
    let coefficients = self
      .coefficients
      .iter()
      .enumerate()
      .skip(1)
      .map(|(power, coefficient)| power as f64 * coefficient)
      .collect();
    Polynomial { coefficients }
  }

  /// Render the polynomial using `symbol` as the variable name.
  pub fn display_with<'a>(&'a self, symbol: &'a str) -> DisplayPolynomial<'a> {
    DisplayPolynomial {
      polynomial: self,
      symbol,
    }
  }
}

pub struct DisplayPolynomial<'a> {
  polynomial: &'a Polynomial,
  symbol: &'a str,
}

impl<'a> fmt::Display for DisplayPolynomial<'a> {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    let mut wrote_any = false;
    for (power, &coefficient) in self.polynomial.coefficients.iter().enumerate().rev() {
      if coefficient == 0.0 {
        continue;
      }
      if wrote_any {
        formatter.write_str(if coefficient < 0.0 { " - " } else { " + " })?;
      } else if coefficient < 0.0 {
        formatter.write_str("-")?;
      }
      let magnitude = coefficient.abs();
      if magnitude != 1.0 || power == 0 {
        write!(formatter, "{}", magnitude)?;
      }
      match power {
        0 => (),
        1 => formatter.write_str(self.symbol)?,
        _ => write!(formatter, "{}^{}", self.symbol, power)?,
      }
      wrote_any = true;
    }
    if !wrote_any {
      formatter.write_str("0")?;
    }
    Ok(())
  }
}

impl fmt::Display for Polynomial {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    fmt::Display::fmt(&self.display_with("t"), formatter)
  }
}
