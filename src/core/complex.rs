/// A complex number with 64-bit floating-point components.
///
/// Every amplitude in a state vector and every gate-matrix entry is a
/// `Complex`. Values are immutable; all operations return a new number.
use crate::error::{QuantumError, QuantumResult};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline(always)]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self { re: 0.0, im: 0.0 }
    }

    #[inline(always)]
    pub const fn one() -> Self {
        Self { re: 1.0, im: 0.0 }
    }

    /// Imaginary unit i
    #[inline(always)]
    pub const fn i() -> Self {
        Self { re: 0.0, im: 1.0 }
    }

    /// Squared magnitude: |z|² = re² + im²
    #[inline(always)]
    pub fn norm_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Magnitude: |z| = sqrt(re² + im²)
    #[inline(always)]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Argument of z in (-π, π].
    #[inline(always)]
    pub fn phase(&self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Complex conjugate: z* = re - im·i
    #[inline(always)]
    pub fn conj(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// Euler's formula: r·e^(iθ) = r·cos(θ) + i·r·sin(θ)
    #[inline(always)]
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    /// Scale by a real scalar
    #[inline(always)]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }

    /// Division that refuses a divisor whose squared magnitude is exactly zero.
    pub fn checked_div(self, rhs: Self) -> QuantumResult<Self> {
        let denom = rhs.norm_sq();
        if denom == 0.0 {
            return Err(QuantumError::DivisionByZero);
        }
        Ok(Self {
            re: (self.re * rhs.re + self.im * rhs.im) / denom,
            im: (self.im * rhs.re - self.re * rhs.im) / denom,
        })
    }

    /// Check near-zero within epsilon
    #[inline(always)]
    pub fn is_zero(&self, epsilon: f64) -> bool {
        self.norm_sq() < epsilon * epsilon
    }
}

impl Add for Complex {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for Complex {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

/// (a + bi)(c + di) = (ac - bd) + (ad + bc)i
impl Mul for Complex {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl Neg for Complex {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        (self.re - other.re).abs() < 1e-10 && (self.im - other.im).abs() < 1e-10
    }
}

impl Default for Complex {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{:.6} + {:.6}i", self.re, self.im)
        } else {
            write!(f, "{:.6} - {:.6}i", self.re, self.im.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_add_sub() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, 4.0);
        assert_eq!(a + b, Complex::new(4.0, 6.0));
        assert_eq!(b - a, Complex::new(2.0, 2.0));
    }

    #[test]
    fn test_mul() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, 4.0);
        assert_eq!(a * b, Complex::new(-5.0, 10.0));
        assert_eq!(Complex::i() * Complex::i(), Complex::new(-1.0, 0.0));
    }

    #[test]
    fn test_checked_div() {
        // (-5 + 10i) / (3 + 4i) = 1 + 2i
        let q = Complex::new(-5.0, 10.0)
            .checked_div(Complex::new(3.0, 4.0))
            .unwrap();
        assert_eq!(q, Complex::new(1.0, 2.0));
    }

    #[test]
    fn test_div_by_zero() {
        let err = Complex::one().checked_div(Complex::zero()).unwrap_err();
        assert_eq!(err, QuantumError::DivisionByZero);
    }

    #[test]
    fn test_div_by_tiny_is_allowed() {
        // Only an exactly-zero divisor is rejected.
        assert!(Complex::one().checked_div(Complex::new(1e-200, 0.0)).is_ok());
    }

    #[test]
    fn test_conj_norm() {
        let z = Complex::new(3.0, -4.0);
        assert_eq!(z.conj(), Complex::new(3.0, 4.0));
        assert!((z.norm() - 5.0).abs() < 1e-10);
        assert!((z.norm_sq() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_phase() {
        assert!((Complex::i().phase() - FRAC_PI_2).abs() < 1e-12);
        assert!((Complex::new(-1.0, 0.0).phase() - PI).abs() < 1e-12);
        assert_eq!(Complex::zero().phase(), 0.0);
    }

    #[test]
    fn test_from_polar() {
        // e^(iπ) = -1
        let z = Complex::from_polar(1.0, PI);
        assert_eq!(z, Complex::new(-1.0, 0.0));
    }

    #[test]
    fn test_neg_scale() {
        let z = Complex::new(1.0, -2.0);
        assert_eq!(-z, Complex::new(-1.0, 2.0));
        assert_eq!(z.scale(2.0), Complex::new(2.0, -4.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Complex::new(0.5, -0.25).to_string(), "0.500000 - 0.250000i");
        assert_eq!(Complex::new(1.0, 0.0).to_string(), "1.000000 + 0.000000i");
    }

    #[test]
    fn test_is_zero() {
        assert!(Complex::zero().is_zero(1e-12));
        assert!(Complex::new(1e-8, -1e-8).is_zero(1e-6));
        assert!(!Complex::new(1e-3, 0.0).is_zero(1e-6));
    }
}
