use serde::{Deserialize, Serialize};

/// Tolerances and iteration budgets used by the root finders and integrators.
///
/// Every method that depends on one of these has a `_with` variant taking a `&Settings`;
/// the plain variants use `Settings::default()`.
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Settings {
  /// Leading coefficients with magnitude <= this are dropped before solving.
  pub simplify_tolerance: f64,
  pub remove_zeros_tolerance: f64,
  /// A bisection midpoint whose value has magnitude <= this is accepted as a root.
  pub bisection_tolerance: f64,
  /// Number of decimal digits of input precision bisection aims for.
  pub bisection_accuracy: u32,
  /// Iteration budget for refining each isolated quartic root.
  pub refinement_iterations: usize,
  pub simpson_tolerance: f64,
  pub romberg_tolerance: f64,
  pub max_quadrature_stages: u32,
  /// Square-rooted polynomial values with magnitude below this are treated as 0.
  pub sqrt_zero_threshold: f64,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      simplify_tolerance: 1e-12,
      remove_zeros_tolerance: 1e-15,
      bisection_tolerance: 1e-6,
      bisection_accuracy: 15,
      refinement_iterations: 32,
      simpson_tolerance: 1e-7,
      romberg_tolerance: 1e-6,
      max_quadrature_stages: 20,
      sqrt_zero_threshold: 1e-6,
    }
  }
}
