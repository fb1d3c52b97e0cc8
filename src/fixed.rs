use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use num_traits::{Num, One, Zero};

use crate::FftSample;

macro_rules! fixed_point_type {
    ($(#[$meta:meta])* $name:ident, $raw:ty, $wide:ty, $frac:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name($raw);

        impl $name {
            /// Number of fractional bits
            pub const FRAC_BITS: u32 = $frac;
            /// Largest representable value, just below 1.0
            pub const MAX: Self = Self(<$raw>::MAX);
            /// Smallest representable value, -1.0
            pub const MIN: Self = Self(<$raw>::MIN);

            /// Creates a value from its raw integer representation.
            #[inline(always)]
            pub const fn from_bits(bits: $raw) -> Self {
                Self(bits)
            }

            /// Returns the raw integer representation.
            #[inline(always)]
            pub const fn to_bits(self) -> $raw {
                self.0
            }

            /// Converts an f64 to fixed point, rounding to nearest.
            ///
            /// Out of range values saturate to +/-(1 - 2^-FRAC_BITS), so the result can always be negated.
            pub fn from_f64(value: f64) -> Self {
                let limit = <$raw>::MAX as f64;
                let scaled = (value * (1u64 << $frac) as f64).round();
                Self(scaled.max(-limit).min(limit) as $raw)
            }

            pub fn to_f64(self) -> f64 {
                self.0 as f64 / (1u64 << $frac) as f64
            }

            #[inline(always)]
            fn saturate(wide: $wide) -> Self {
                Self(wide.max(<$raw>::MIN as $wide).min(<$raw>::MAX as $wide) as $raw)
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self(self.0.wrapping_add(rhs.0))
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0.wrapping_sub(rhs.0))
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                Self(self.0.wrapping_neg())
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                let product = self.0 as $wide * rhs.0 as $wide;
                Self::saturate((product + (1 << ($frac - 1))) >> $frac)
            }
        }

        impl Div for $name {
            type Output = Self;
            /// Saturates when the quotient is out of range. Dividing by zero saturates towards the sign
            /// of the dividend.
            #[inline]
            fn div(self, rhs: Self) -> Self {
                if rhs.0 == 0 {
                    return if self.0 < 0 { Self::MIN } else { Self::MAX };
                }
                Self::saturate(((self.0 as $wide) << $frac) / rhs.0 as $wide)
            }
        }

        impl Rem for $name {
            type Output = Self;
            /// The remainder of a division by zero is zero.
            #[inline]
            fn rem(self, rhs: Self) -> Self {
                if rhs.0 == 0 {
                    return Self(0);
                }
                Self(self.0.wrapping_rem(rhs.0))
            }
        }

        impl Zero for $name {
            #[inline(always)]
            fn zero() -> Self {
                Self(0)
            }
            #[inline(always)]
            fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }

        // 1.0 itself isn't representable, so "one" is the nearest value below it
        impl One for $name {
            #[inline(always)]
            fn one() -> Self {
                Self::MAX
            }
        }

        impl Num for $name {
            type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;

            fn from_str_radix(text: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
                <f64 as Num>::from_str_radix(text, radix).map(Self::from_f64)
            }
        }

        impl FftSample for $name {
            const FIXED_POINT: bool = true;

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                $name::from_f64(value)
            }
            #[inline(always)]
            fn to_f64(self) -> f64 {
                $name::to_f64(self)
            }
            #[inline(always)]
            fn div_radix(self, radix: usize) -> Self {
                Self((self.0 as $wide / radix as $wide) as $raw)
            }
            #[inline(always)]
            fn half(self) -> Self {
                Self(self.0 / 2)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.6}", self.to_f64())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.6} (raw: {})", self.to_f64(), self.0)
            }
        }
    };
}

fixed_point_type!(
    /// Signed 32-bit fixed point number with 31 fractional bits, covering [-1.0, 1.0).
    ///
    /// Addition and subtraction wrap on overflow. Multiplication rounds to nearest.
    Q31,
    i32,
    i64,
    31
);

fixed_point_type!(
    /// Signed 16-bit fixed point number with 15 fractional bits, covering [-1.0, 1.0).
    ///
    /// Addition and subtraction wrap on overflow. Multiplication rounds to nearest.
    Q15,
    i16,
    i32,
    15
);

#[cfg(test)]
mod unit_tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn test_from_f64_rounds_and_saturates() {
        assert_eq!(Q31::from_f64(0.5).to_bits(), 1 << 30);
        assert_eq!(Q15::from_f64(-0.25).to_bits(), -(1 << 13));
        assert_eq!(Q31::from_f64(1.0), Q31::MAX);
        assert_eq!(Q15::from_f64(-1.0).to_bits(), -i16::MAX);
        assert_eq!(Q15::from_f64(3.0), Q15::MAX);

        // one LSB is 2^-15; 1.6 LSB rounds up to 2
        assert_eq!(Q15::from_f64(1.6 / 32768.0).to_bits(), 2);
    }

    #[test]
    fn test_multiplication_with_rounding() {
        let half = Q31::from_bits(1 << 30);
        assert_eq!((half * half).to_bits(), 1 << 29);

        let a = Q15::from_f64(0.75);
        let b = Q15::from_f64(-0.5);
        assert_eq!(a * b, Q15::from_f64(-0.375));

        // -1 * -1 doesn't fit, so it saturates instead of wrapping
        assert_eq!(Q15::MIN * Q15::MIN, Q15::MAX);
    }

    #[test]
    fn test_add_sub_wrap() {
        let big = Q15::from_bits(i16::MAX);
        assert_eq!((big + Q15::from_bits(1)).to_bits(), i16::MIN);
        assert_eq!((Q31::MIN - Q31::from_bits(1)).to_bits(), i32::MAX);
        assert_eq!((-Q31::MIN).to_bits(), i32::MIN);
    }

    #[test]
    fn test_div_radix_truncates() {
        assert_eq!(Q31::from_bits(7).div_radix(4).to_bits(), 1);
        assert_eq!(Q31::from_bits(-7).div_radix(4).to_bits(), -1);
        assert_eq!(Q15::from_bits(9).div_radix(3).to_bits(), 3);
        assert_eq!(Q15::from_bits(-5).half().to_bits(), -2);
    }

    #[test]
    fn test_division() {
        let quarter = Q31::from_f64(0.25);
        let half = Q31::from_f64(0.5);
        assert_eq!(quarter / half, half);
        assert_eq!(Q15::from_f64(0.5) / Q15::from_f64(0.25), Q15::MAX);

        // no integer division by zero
        assert_eq!(half / Q31::zero(), Q31::MAX);
        assert_eq!(-half / Q31::zero(), Q31::MIN);
        assert_eq!(Q15::zero() / Q15::zero(), Q15::MAX);
        assert_eq!(half % Q31::zero(), Q31::zero());
        assert_eq!(Q15::from_bits(7) % Q15::from_bits(3), Q15::from_bits(1));
    }

    #[test]
    fn test_complex_arithmetic() {
        let a = Complex::new(Q31::from_f64(0.5), Q31::from_f64(0.25));
        let b = Complex::new(Q31::from_f64(0.25), Q31::from_f64(-0.5));

        // (0.5 + 0.25i)(0.25 - 0.5i) = 0.125 + 0.125 + (0.0625 - 0.25)i
        let product = a * b;
        assert_eq!(product.re, Q31::from_f64(0.25));
        assert_eq!(product.im, Q31::from_f64(-0.1875));

        let sum = a + b;
        assert_eq!(sum.re, Q31::from_f64(0.75));
        assert_eq!(sum.im, Q31::from_f64(-0.25));
    }

    #[test]
    fn test_from_str_radix() {
        assert_eq!(Q15::from_str_radix("0.5", 10).ok(), Some(Q15::from_bits(1 << 14)));
        assert!(Q31::from_str_radix("nope", 10).is_err());
    }

    #[test]
    fn test_formatting() {
        let value = Q15::from_bits(1 << 14);
        assert_eq!(format!("{}", value), "0.500000");
        assert_eq!(format!("{:?}", value), "0.500000 (raw: 16384)");
    }
}
