use tracing::trace;

use super::*;

/// Corrections smaller than this, relative to the current estimate, end the iteration.
const MIN_RELATIVE_CORRECTION: f64 = 1e-14;
/// When the values at the bracket ends differ by more than this factor,
/// the secant step is unreliable, and we aim a bisection toward the smaller value instead.
const RATIO_LIMIT: f64 = 50.0;
const AIMED_BISECTION_OFFSET: f64 = 0.25;

struct Bracket {
  min: f64,
  max: f64,
  min_value: f64,
  max_value: f64,
}

fn correction_is_negligible(correction: f64, x: f64, previous_step: f64) -> bool {
  correction.abs() <= MIN_RELATIVE_CORRECTION * x.abs()
    // the step would exactly undo the previous one
    || previous_step == (x - correction) - x
}

/// Refine `x0` toward a root of `f`, given its derivative `df`.
///
/// Takes Newton steps, for at most `max_iterations` iterations. If a derivative is exactly 0,
/// the previous derivative is reused instead.
///
/// If `bracket` is given, `f` must not have the same sign at both of its ends.
/// Each iteration shrinks the bracket to the side that still contains a sign change,
/// and a Newton step that would leave the bracket is replaced with a secant step across it,
/// or with a bisection if the secant step is unreliable.
///
/// Fails with `Error::Unsolvable` if the bracket is invalid, or if the very first derivative is 0.
pub fn newton_secant_bisection(
  x0: f64,
  f: impl Fn(f64) -> f64,
  df: impl Fn(f64) -> f64,
  max_iterations: usize,
  bracket: Option<[f64; 2]>,
) -> Result<f64, Error> {
  let mut bracket = match bracket {
    Some([min, max]) => {
      if min > max {
        return Err(Error::Unsolvable {
          reason: "bracket minimum is greater than its maximum",
        });
      }
      let min_value = f(min);
      let max_value = f(max);
      if sign(min_value) == sign(max_value) {
        return Err(Error::Unsolvable {
          reason: "f has the same sign at both ends of the bracket",
        });
      }
      Some(Bracket {
        min,
        max,
        min_value,
        max_value,
      })
    }
    None => None,
  };

  let mut x = x0;
  let mut previous_derivative = 0.0;
  let mut previous_step = 0.0;

  for _ in 0..max_iterations {
    let mut derivative = df(x);
    if derivative == 0.0 {
      if previous_derivative == 0.0 {
        return Err(Error::Unsolvable {
          reason: "df(x) is zero",
        });
      }
      derivative = previous_derivative;
    }
    previous_derivative = derivative;

    let y = f(x);
    let mut correction = y / derivative;
    let mut x_new = x - correction;
    if correction_is_negligible(correction, x, previous_step) {
      break;
    }

    if let Some(bracket) = bracket.as_mut() {
      if sign(y) == sign(bracket.max_value) {
        bracket.max = x;
        bracket.max_value = y;
      } else if sign(y) == sign(bracket.min_value) {
        bracket.min = x;
        bracket.min_value = y;
      } else {
        x = x_new;
        break;
      }

      if x_new < bracket.min || x_new > bracket.max {
        if sign(bracket.min_value) == sign(bracket.max_value) {
          break;
        }

        let value_range = bracket.max_value - bracket.min_value;
        let width = bracket.max - bracket.min;
        let target = if value_range == 0.0 {
          trace!(x, "bisecting");
          bracket.min + width * 0.5
        } else if (value_range / bracket.min_value.min(bracket.max_value)).abs() > RATIO_LIMIT {
          let offset = if bracket.min_value.abs() < bracket.max_value.abs() {
            -AIMED_BISECTION_OFFSET
          } else {
            AIMED_BISECTION_OFFSET
          };
          trace!(x, offset, "aimed bisection");
          bracket.min + width * (0.5 + offset)
        } else {
          trace!(x, "secant step across bracket");
          bracket.min - bracket.min_value / value_range * width
        };
        correction = x - target;
        x_new = x - correction;

        if correction_is_negligible(correction, x, previous_step) {
          break;
        }
      }
    }

    previous_step = x - x_new;
    x = x_new;
  }

  Ok(x)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn converges_without_bracket() {
    let root = newton_secant_bisection(1.0, |x| x * x - 2.0, |x| 2.0 * x, 32, None).unwrap();
    assert!((root - 2f64.sqrt()).abs() < 1e-12);
  }

  #[test]
  fn falls_back_when_newton_leaves_bracket() {
    // from 0.1, the first Newton step lands near 10
    let root = newton_secant_bisection(
      0.1,
      |x| x * x - 2.0,
      |x| 2.0 * x,
      32,
      Some([0.0, 2.0]),
    )
    .unwrap();
    assert!((root - 2f64.sqrt()).abs() < 1e-10);
  }

  #[test]
  fn steep_bracket_uses_aimed_bisection() {
    let f = |x: f64| x.powi(9) - 1.0;
    let df = |x: f64| 9.0 * x.powi(8);
    let root = newton_secant_bisection(0.2, f, df, 64, Some([0.0, 3.0])).unwrap();
    assert!((root - 1.0).abs() < 1e-10);
  }

  #[test]
  fn zero_derivative_reuses_previous_one() {
    let root = newton_secant_bisection(
      5.0,
      |x| x - 1.0,
      |x| if x == 3.0 { 0.0 } else { 2.0 },
      32,
      None,
    )
    .unwrap();
    assert!((root - 1.0).abs() < 1e-6);
  }

  #[test]
  fn invalid_starts_are_unsolvable() {
    assert_eq!(
      newton_secant_bisection(0.0, |x| x * x - 1.0, |x| 2.0 * x, 32, None),
      Err(Error::Unsolvable {
        reason: "df(x) is zero"
      })
    );
    assert!(matches!(
      newton_secant_bisection(0.5, |x| x * x - 1.0, |x| 2.0 * x, 32, Some([2.0, 0.0])),
      Err(Error::Unsolvable { .. })
    ));
    assert!(matches!(
      newton_secant_bisection(0.5, |x| x * x - 1.0, |x| 2.0 * x, 32, Some([2.0, 3.0])),
      Err(Error::Unsolvable { .. })
    ));
  }
}
