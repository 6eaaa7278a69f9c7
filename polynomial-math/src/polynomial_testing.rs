use crate::polynomial::Polynomial;
use num::{BigRational, ToPrimitive, Zero};
use proptest::prelude::*;

/// The monic polynomial with exactly these roots.
pub(crate) fn from_roots(roots: &[f64]) -> Polynomial {
  roots.iter().fold(Polynomial::new(vec![1.0]), |product, root| {
    product.multiply(&Polynomial::new(vec![1.0, -root]))
  })
}

/// Panics unless `found` and `expected` are the same multiset, up to `tolerance`.
pub(crate) fn assert_roots_near(found: &[f64], expected: &[f64], tolerance: f64) {
  let mut found = found.to_vec();
  let mut expected = expected.to_vec();
  found.sort_by(f64::total_cmp);
  expected.sort_by(f64::total_cmp);
  assert_eq!(
    found.len(),
    expected.len(),
    "found roots {:?}, expected {:?}",
    found,
    expected
  );
  for (found_root, expected_root) in found.iter().zip(&expected) {
    assert!(
      (found_root - expected_root).abs() <= tolerance,
      "found roots {:?}, expected {:?}",
      found,
      expected
    );
  }
}

fn to_big_rational(value: f64) -> BigRational {
  BigRational::from_float(value).unwrap_or_else(BigRational::zero)
}

impl Polynomial {
  pub(crate) fn naive_perfect_evaluate(&self, input: f64) -> BigRational {
    let input = to_big_rational(input);
    let mut result = BigRational::zero();
    for (exponent, coefficient) in self.coefficients().iter().enumerate() {
      let mut term = to_big_rational(*coefficient);
      for _ in 0..exponent {
        term *= &input;
      }
      result += term;
    }
    result
  }

  /// The sum of the magnitudes of the terms at `input`; floating-point evaluation error
  /// is proportional to this.
  pub(crate) fn term_magnitude(&self, input: f64) -> f64 {
    self
      .coefficients()
      .iter()
      .enumerate()
      .map(|(exponent, coefficient)| (coefficient * input.powi(exponent as i32)).abs())
      .sum()
  }
}

pub(crate) fn naive_perfect_to_f64(value: &BigRational) -> f64 {
  value.to_f64().unwrap_or(std::f64::NAN)
}

pub(crate) fn arbitrary_polynomial(max_degree: usize) -> BoxedStrategy<Polynomial> {
  prop::collection::vec(-100.0f64..100.0, 0..=max_degree + 1)
    .prop_map(Polynomial::from_coefficients)
    .boxed()
}

/// Distinct, well-separated real roots, with a nonzero scale factor for the polynomial.
pub(crate) fn separated_roots(count: usize) -> BoxedStrategy<(Vec<f64>, f64)> {
  (
    prop::collection::btree_set(-8i32..8, count),
    prop_oneof![-4.0f64..-0.5, 0.5f64..4.0],
  )
    .prop_map(|(grid, scale)| {
      let roots = grid
        .into_iter()
        .map(|position| position as f64 * 0.75 + 0.3)
        .collect();
      (roots, scale)
    })
    .boxed()
}
