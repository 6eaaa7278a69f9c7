use crate::polynomial::Polynomial;
use num::{One, Zero};
use std::ops::{Add, AddAssign, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

macro_rules! forward_binop {
  ($($Trait: ident, $method: ident, $implementation: expr;)*) => {
    $(
      impl<'a, 'b> $Trait<&'b Polynomial> for &'a Polynomial {
        type Output = Polynomial;

        #[inline]
        fn $method(self, rhs: &'b Polynomial) -> Polynomial {
          ($implementation)(self, rhs)
        }
      }

      impl<'b> $Trait<&'b Polynomial> for Polynomial {
        type Output = Polynomial;

        #[inline]
        fn $method(self, rhs: &'b Polynomial) -> Polynomial {
          ($implementation)(&self, rhs)
        }
      }

      impl<'a> $Trait<Polynomial> for &'a Polynomial {
        type Output = Polynomial;

        #[inline]
        fn $method(self, rhs: Polynomial) -> Polynomial {
          ($implementation)(self, &rhs)
        }
      }

      impl $Trait<Polynomial> for Polynomial {
        type Output = Polynomial;

        #[inline]
        fn $method(self, rhs: Polynomial) -> Polynomial {
          ($implementation)(&self, &rhs)
        }
      }
    )*
  }
}

forward_binop! {
  Add, add, |a: &Polynomial, b: &Polynomial| Polynomial::add(a, b);
  Sub, sub, |a: &Polynomial, b: &Polynomial| Polynomial::add(a, &-b);
  Mul, mul, |a: &Polynomial, b: &Polynomial| a.multiply(b);
}

impl<'a> AddAssign<&'a Polynomial> for Polynomial {
  #[inline]
  fn add_assign(&mut self, rhs: &'a Polynomial) {
    *self = Polynomial::add(self, rhs)
  }
}

impl<'a> SubAssign<&'a Polynomial> for Polynomial {
  #[inline]
  fn sub_assign(&mut self, rhs: &'a Polynomial) {
    *self = Polynomial::add(self, &-rhs)
  }
}

impl<'a> MulAssign<&'a Polynomial> for Polynomial {
  #[inline]
  fn mul_assign(&mut self, rhs: &'a Polynomial) {
    *self = self.multiply(rhs)
  }
}

impl DivAssign<f64> for Polynomial {
  #[inline]
  fn div_assign(&mut self, rhs: f64) {
    self.divide_scalar(rhs);
  }
}

impl<'a> Neg for &'a Polynomial {
  type Output = Polynomial;

  #[inline]
  fn neg(self) -> Polynomial {
    Polynomial::from_coefficients(self.coefficients().iter().map(|&a| -a).collect())
  }
}

impl Neg for Polynomial {
  type Output = Polynomial;

  #[inline]
  fn neg(self) -> Polynomial {
    -&self
  }
}

impl Zero for Polynomial {
  /// The polynomial with no coefficients, which evaluates to 0 everywhere.
  #[inline]
  fn zero() -> Self {
    Polynomial::default()
  }

  #[inline]
  fn is_zero(&self) -> bool {
    self.coefficients().iter().all(|&coefficient| coefficient == 0.0)
  }
}

impl One for Polynomial {
  #[inline]
  fn one() -> Self {
    Polynomial::from_coefficients(vec![1.0])
  }
}
