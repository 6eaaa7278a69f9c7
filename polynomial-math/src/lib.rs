//! Real-coefficient polynomials in one variable.
//!
//! Besides evaluation and basic algebra, this crate finds real roots
//! (closed form up to degree 3, derivative-guided refinement for quartics,
//! and bisection on an arbitrary interval for any degree), estimates
//! intervals that must contain every real root, and integrates polynomials
//! numerically.

#[macro_use]
extern crate failure;
#[cfg(test)]
#[macro_use]
extern crate quickcheck;

use smallvec::SmallVec;
use std::cmp::Ordering;

#[derive(Clone, PartialEq, Debug, Fail)]
pub enum Error {
  #[fail(display = "invalid argument: {}", reason)]
  InvalidArgument { reason: &'static str },
  #[fail(display = "unsolvable: {}", reason)]
  Unsolvable { reason: &'static str },
  #[fail(
    display = "cannot take the square root of a negative value ({} at input {})",
    value, input
  )]
  DomainViolation { input: f64, value: f64 },
}

/// A collection of real roots, in no particular order.
///
/// Repeated roots are sometimes reported more than once; see the individual solvers.
pub type Roots = SmallVec<[f64; 4]>;

/// The sign of a value, where both zeros compare as `Equal`.
///
/// `f64::signum` can't be used for this: it reports +0.0 as positive, and the
/// root finders need an exact zero to be distinguishable from either side.
pub(crate) fn sign(value: f64) -> Option<Ordering> {
  value.partial_cmp(&0.0)
}

pub(crate) fn check_input(input: f64, reason: &'static str) -> Result<(), Error> {
  if input.is_nan() {
    return Err(Error::InvalidArgument { reason });
  }
  Ok(())
}

pub mod bounds;
pub mod interpolation;
pub mod newton_secant_bisection;
pub mod polynomial;
mod polynomial_impls;
pub mod quadrature;
pub mod roots;
pub mod settings;
pub mod sqrt_polynomial;

#[cfg(test)]
mod polynomial_testing;

pub use crate::bounds::{DescartesCounts, RealBounds, SidedBounds};
pub use crate::interpolation::{interpolate, Interpolated};
pub use crate::newton_secant_bisection::newton_secant_bisection;
pub use crate::polynomial::Polynomial;
pub use crate::quadrature::{romberg, simpson, Integrand, Trapezoid};
pub use crate::settings::Settings;
pub use crate::sqrt_polynomial::SqrtPolynomial;
