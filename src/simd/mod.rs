//! Vector kernels: the arithmetic that butterfly stages are written against.
//!
//! Every butterfly and stage loop in this crate is generic over a [`VectorKernel`]. Plain `Complex<T>` is
//! the one-lane kernel used by the scalar engines. [`Lanes4`] carries four independent complex values and
//! is used by the lane-parallel engine, either directly (portable) or replaced by an intrinsics-backed
//! kernel where one exists for the target.

use std::ops::{Add, Sub};

use num_complex::Complex;

use crate::twiddles;
use crate::{FftDirection, FftSample};

mod lane_parallel;

pub use self::lane_parallel::LaneParallel;

/// Number of independent sub-transforms a lane kernel computes at once.
pub const LANES: usize = 4;

/// Below this length, the lane-parallel layout isn't worth the extra radix-4 pass.
pub const SIMD_MIN_LEN: usize = 15;

pub trait VectorKernel<T: FftSample>:
    Copy + Add<Output = Self> + Sub<Output = Self> + Send + Sync + 'static
{
    /// How one vector is stored in memory.
    type Elem: Copy + Send + Sync + 'static;

    fn zero_elem() -> Self::Elem;

    fn load(elem: &Self::Elem) -> Self;

    fn store(self, elem: &mut Self::Elem);

    /// Multiplies every lane by a real factor.
    fn scale(self, factor: T) -> Self;

    /// Multiplies every lane by the same complex factor.
    fn mul_complex(self, factor: Complex<T>) -> Self;

    /// Multiplies every lane by -i for forward FFTs, or by +i for inverse FFTs.
    fn rotate_90(self, direction: FftDirection) -> Self;

    fn div_radix(self, radix: usize) -> Self;
}

impl<T: FftSample> VectorKernel<T> for Complex<T> {
    type Elem = Complex<T>;

    #[inline(always)]
    fn zero_elem() -> Self::Elem {
        Complex::new(T::zero(), T::zero())
    }
    #[inline(always)]
    fn load(elem: &Self::Elem) -> Self {
        *elem
    }
    #[inline(always)]
    fn store(self, elem: &mut Self::Elem) {
        *elem = self;
    }
    #[inline(always)]
    fn scale(self, factor: T) -> Self {
        self * factor
    }
    #[inline(always)]
    fn mul_complex(self, factor: Complex<T>) -> Self {
        self * factor
    }
    #[inline(always)]
    fn rotate_90(self, direction: FftDirection) -> Self {
        twiddles::rotate_90(self, direction)
    }
    #[inline(always)]
    fn div_radix(self, radix: usize) -> Self {
        Complex::new(self.re.div_radix(radix), self.im.div_radix(radix))
    }
}

/// Four complex values, one per lane, computed with plain scalar arithmetic.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Lanes4<T>(pub [Complex<T>; LANES]);

impl<T: FftSample> Lanes4<T> {
    #[inline(always)]
    fn map(self, mut f: impl FnMut(Complex<T>) -> Complex<T>) -> Self {
        Self(self.0.map(|value| f(value)))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, mut f: impl FnMut(Complex<T>, Complex<T>) -> Complex<T>) -> Self {
        let mut result = self.0;
        for (out, rhs) in result.iter_mut().zip(rhs.0) {
            *out = f(*out, rhs);
        }
        Self(result)
    }
}

impl<T: FftSample> Add for Lanes4<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl<T: FftSample> Sub for Lanes4<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl<T: FftSample> VectorKernel<T> for Lanes4<T> {
    type Elem = [Complex<T>; LANES];

    #[inline(always)]
    fn zero_elem() -> Self::Elem {
        [Complex::new(T::zero(), T::zero()); LANES]
    }
    #[inline(always)]
    fn load(elem: &Self::Elem) -> Self {
        Self(*elem)
    }
    #[inline(always)]
    fn store(self, elem: &mut Self::Elem) {
        *elem = self.0;
    }
    #[inline(always)]
    fn scale(self, factor: T) -> Self {
        self.map(|value| value * factor)
    }
    #[inline(always)]
    fn mul_complex(self, factor: Complex<T>) -> Self {
        self.map(|value| value * factor)
    }
    #[inline(always)]
    fn rotate_90(self, direction: FftDirection) -> Self {
        self.map(|value| twiddles::rotate_90(value, direction))
    }
    #[inline(always)]
    fn div_radix(self, radix: usize) -> Self {
        self.map(|value| value.div_radix(radix))
    }
}
