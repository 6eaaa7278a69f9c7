use tracing::{debug, trace};

use super::*;

/// A real function that can be integrated numerically.
pub trait Integrand {
  fn evaluate(&self, input: f64) -> Result<f64, Error>;
}

impl Integrand for Polynomial {
  fn evaluate(&self, input: f64) -> Result<f64, Error> {
    Polynomial::evaluate(self, input)
  }
}

/// Trapezoid-rule estimates of an integral over `[min, max]`, refined one stage at a time.
///
/// Stage 1 uses only the two endpoints. Each later stage adds the midpoints of all the
/// intervals from the previous stage, doubling the number of intervals, while reusing
/// the earlier samples through the previous estimate.
pub struct Trapezoid<'a, I: Integrand + ?Sized> {
  integrand: &'a I,
  min: f64,
  max: f64,
  stage: u32,
  estimate: f64,
}

impl<'a, I: Integrand + ?Sized> Trapezoid<'a, I> {
  pub fn new(integrand: &'a I, min: f64, max: f64) -> Result<Self, Error> {
    check_input(min, "integration bounds must be numbers")?;
    check_input(max, "integration bounds must be numbers")?;
    Ok(Trapezoid {
      integrand,
      min,
      max,
      stage: 0,
      estimate: 0.0,
    })
  }

  /// The number of stages computed so far.
  pub fn stage(&self) -> u32 {
    self.stage
  }

  pub fn estimate(&self) -> f64 {
    self.estimate
  }

  /// Compute the next stage, and return its estimate.
  pub fn refine(&mut self) -> Result<f64, Error> {
    let range = self.max - self.min;
    let stage = self.stage + 1;
    let estimate = if stage == 1 {
      0.5 * range * (self.integrand.evaluate(self.min)? + self.integrand.evaluate(self.max)?)
    } else {
      let intervals = 1u64
        .checked_shl(stage - 2)
        .ok_or(Error::InvalidArgument {
          reason: "too many trapezoid stages",
        })?;
      let delta = range / intervals as f64;
      let mut x = self.min + 0.5 * delta;
      let mut sum = 0.0;
      for _ in 0..intervals {
        sum += self.integrand.evaluate(x)?;
        x += delta;
      }
      0.5 * (self.estimate + range * sum / intervals as f64)
    };

    if estimate.is_nan() {
      return Err(Error::InvalidArgument {
        reason: "trapezoid estimate is not a number",
      });
    }
    trace!(stage, estimate, "trapezoid stage");
    self.stage = stage;
    self.estimate = estimate;
    Ok(estimate)
  }
}

/// Integrate with Simpson's rule, built from successive trapezoid stages.
///
/// Stops when two successive estimates agree to within `settings.simpson_tolerance`
/// (relative), or after `settings.max_quadrature_stages` stages.
pub fn simpson<I: Integrand + ?Sized>(
  integrand: &I,
  min: f64,
  max: f64,
  settings: &Settings,
) -> Result<f64, Error> {
  let mut trapezoid = Trapezoid::new(integrand, min, max)?;
  let mut previous_trapezoid = trapezoid.refine()?;
  let mut previous = 4.0 * previous_trapezoid / 3.0;
  let mut result = previous;

  for _ in 2..=settings.max_quadrature_stages {
    let current_trapezoid = trapezoid.refine()?;
    result = (4.0 * current_trapezoid - previous_trapezoid) / 3.0;
    if (result - previous).abs() < settings.simpson_tolerance * previous.abs() {
      return Ok(result);
    }
    previous = result;
    previous_trapezoid = current_trapezoid;
  }

  debug!(min, max, result, "simpson integration ran out of stages");
  Ok(result)
}

/// Number of trapezoid stages extrapolated together.
const ROMBERG_WINDOW: usize = 3;

/// Integrate with Romberg's method: trapezoid estimates, extrapolated to zero step size.
///
/// Stops when the extrapolation's error estimate is within `settings.romberg_tolerance`
/// of the result (relative), or after `settings.max_quadrature_stages` stages.
pub fn romberg<I: Integrand + ?Sized>(
  integrand: &I,
  min: f64,
  max: f64,
  settings: &Settings,
) -> Result<f64, Error> {
  let max_stages = settings.max_quadrature_stages as usize;
  if max_stages < ROMBERG_WINDOW {
    return Err(Error::InvalidArgument {
      reason: "romberg integration needs at least 3 stages",
    });
  }

  let mut trapezoid = Trapezoid::new(integrand, min, max)?;
  let mut estimates = Vec::with_capacity(max_stages);
  // relative squared step size of each stage
  let mut steps = Vec::with_capacity(max_stages);
  steps.push(1.0);
  let mut result = Interpolated { y: 0.0, dy: 0.0 };

  for stage in 1..=max_stages {
    estimates.push(trapezoid.refine()?);
    if stage >= ROMBERG_WINDOW {
      result = interpolate(&steps, &estimates, ROMBERG_WINDOW, stage - ROMBERG_WINDOW, 0.0)?;
      if result.dy.abs() <= settings.romberg_tolerance * result.y.abs() {
        return Ok(result.y);
      }
    }
    steps.push(0.25 * steps[stage - 1]);
  }

  debug!(min, max, result = result.y, error = result.dy, "romberg integration ran out of stages");
  Ok(result.y)
}

impl Polynomial {
  /// The trapezoid-rule estimate of the integral over `[min, max]` at the given stage (>= 1).
  pub fn trapezoid(&self, min: f64, max: f64, stage: u32) -> Result<f64, Error> {
    if stage == 0 {
      return Err(Error::InvalidArgument {
        reason: "trapezoid stages start at 1",
      });
    }
    let mut trapezoid = Trapezoid::new(self, min, max)?;
    for _ in 0..stage {
      trapezoid.refine()?;
    }
    Ok(trapezoid.estimate())
  }

  pub fn simpson(&self, min: f64, max: f64) -> Result<f64, Error> {
    simpson(self, min, max, &Settings::default())
  }

  pub fn simpson_with(&self, min: f64, max: f64, settings: &Settings) -> Result<f64, Error> {
    simpson(self, min, max, settings)
  }

  pub fn romberg(&self, min: f64, max: f64) -> Result<f64, Error> {
    romberg(self, min, max, &Settings::default())
  }

  pub fn romberg_with(&self, min: f64, max: f64, settings: &Settings) -> Result<f64, Error> {
    romberg(self, min, max, settings)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn square() -> Polynomial {
    Polynomial::new(vec![1.0, 0.0, 0.0])
  }

  #[test]
  fn trapezoid_stages_refine() {
    let square = square();
    assert_eq!(square.trapezoid(0.0, 1.0, 1).unwrap(), 0.5);
    assert_eq!(square.trapezoid(0.0, 1.0, 2).unwrap(), 0.375);
    assert_eq!(square.trapezoid(0.0, 1.0, 3).unwrap(), 0.34375);
    assert!((square.trapezoid(0.0, 1.0, 12).unwrap() - 1.0 / 3.0).abs() < 1e-6);
    assert!(matches!(
      square.trapezoid(0.0, 1.0, 0),
      Err(Error::InvalidArgument { .. })
    ));
  }

  #[test]
  fn trapezoid_accumulator_tracks_stage() {
    let line = Polynomial::new(vec![2.0, 1.0]);
    let mut trapezoid = Trapezoid::new(&line, -1.0, 2.0).unwrap();
    assert_eq!(trapezoid.stage(), 0);
    // exact for linear integrands at every stage
    for stage in 1..=4 {
      assert_eq!(trapezoid.refine().unwrap(), 6.0);
      assert_eq!(trapezoid.stage(), stage);
    }
  }

  #[test]
  fn test_simpson() {
    assert!((square().simpson(0.0, 1.0).unwrap() - 1.0 / 3.0).abs() < 1e-7);
    let cubic = Polynomial::new(vec![4.0, -3.0, 0.0, 2.0]);
    assert!((cubic.simpson(-1.0, 2.0).unwrap() - 12.0).abs() < 1e-6);
  }

  #[test]
  fn test_romberg() {
    assert!((square().romberg(0.0, 1.0).unwrap() - 1.0 / 3.0).abs() < 1e-6);
    let quartic = Polynomial::new(vec![5.0, 0.0, 0.0, 0.0, 0.0]);
    assert!((quartic.romberg(0.0, 2.0).unwrap() - 32.0).abs() < 1e-4);
    // negative integrals converge too
    assert!((quartic.romberg(0.0, -2.0).unwrap() + 32.0).abs() < 1e-4);
  }

  #[test]
  fn romberg_needs_a_full_window() {
    let settings = Settings {
      max_quadrature_stages: 2,
      ..Settings::default()
    };
    assert!(matches!(
      square().romberg_with(0.0, 1.0, &settings),
      Err(Error::InvalidArgument { .. })
    ));
  }

  #[test]
  fn nan_bounds_are_rejected() {
    assert!(matches!(
      square().simpson(std::f64::NAN, 1.0),
      Err(Error::InvalidArgument { .. })
    ));
  }
}
