use std::fmt::Debug;
use std::ops::Neg;
use std::sync::Arc;

use num_traits::Num;

use crate::simd::{LaneParallel, Lanes4};
use crate::{Fft, FftError, TwiddleLayout};

/// Sample type that FFTs can be computed over. Implemented for `f32`, [`Q31`](crate::Q31) and [`Q15`](crate::Q15).
///
/// The arithmetic comes from `num_traits::Num`, so `Complex<T>` supports the usual operators. The extra
/// methods cover the few places where float and fixed point behave differently.
pub trait FftSample:
    Copy + Num + Neg<Output = Self> + PartialOrd + Default + Debug + Send + Sync + 'static
{
    /// If true, a scaled transform divides every stage's inputs by the stage radix.
    /// If false, it multiplies the finished output by 1/len.
    const FIXED_POINT: bool;

    /// Converts from f64, rounding to nearest. Fixed point types saturate.
    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;

    /// Divides by the radix of a butterfly stage.
    fn div_radix(self, radix: usize) -> Self;

    fn half(self) -> Self;

    /// Builds the lane-parallel engine for this sample type. The vector kernel is chosen at compile time.
    fn make_lane_parallel(
        len: usize,
        layout: TwiddleLayout,
    ) -> Result<Arc<dyn Fft<Self>>, FftError> {
        Ok(Arc::new(LaneParallel::<Self, Lanes4<Self>>::new(len, layout)?))
    }
}

impl FftSample for f32 {
    const FIXED_POINT: bool = false;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline(always)]
    fn div_radix(self, radix: usize) -> Self {
        self / radix as f32
    }
    #[inline(always)]
    fn half(self) -> Self {
        self * 0.5
    }

    #[cfg(all(target_arch = "aarch64", feature = "neon"))]
    fn make_lane_parallel(
        len: usize,
        layout: TwiddleLayout,
    ) -> Result<Arc<dyn Fft<Self>>, FftError> {
        use crate::neon::NeonLanes;
        Ok(Arc::new(LaneParallel::<f32, NeonLanes>::new(len, layout)?))
    }
}

// Prints an error raised by an in-place FFT algorithm's `process_with_scratch` method
#[cold]
#[inline(never)]
pub fn fft_error_inplace(
    expected_len: usize,
    actual_len: usize,
    expected_scratch: usize,
    actual_scratch: usize,
) {
    assert!(
        actual_len >= expected_len,
        "Provided FFT buffer was too small. Expected len = {}, got len = {}",
        expected_len,
        actual_len
    );
    assert_eq!(
        actual_len % expected_len,
        0,
        "Input FFT buffer must be a multiple of FFT length. Expected multiple of {}, got len = {}",
        expected_len,
        actual_len
    );
    assert!(
        actual_scratch >= expected_scratch,
        "Not enough scratch space was provided. Expected scratch len >= {}, got scratch len = {}",
        expected_scratch,
        actual_scratch
    );
}

// Prints an error raised by an FFT algorithm's `process_immutable_with_scratch` method
#[cold]
#[inline(never)]
pub fn fft_error_immut(
    expected_len: usize,
    actual_input: usize,
    actual_output: usize,
    expected_scratch: usize,
    actual_scratch: usize,
) {
    assert!(
        actual_input >= expected_len,
        "Provided FFT input buffer was too small. Expected len = {}, got len = {}",
        expected_len,
        actual_input
    );
    assert_eq!(
        actual_input % expected_len,
        0,
        "Input FFT buffer must be a multiple of FFT length. Expected multiple of {}, got len = {}",
        expected_len,
        actual_input
    );
    assert_eq!(
        actual_input,
        actual_output,
        "Output FFT buffer must have the same length as the input buffer. Input len = {}, output len = {}",
        actual_input,
        actual_output
    );
    assert!(
        actual_scratch >= expected_scratch,
        "Not enough scratch space was provided. Expected scratch len >= {}, got scratch len = {}",
        expected_scratch,
        actual_scratch
    );
}

// Prints an error raised by a real FFT's `forward` or `inverse` method
#[cold]
#[inline(never)]
pub fn fft_error_real(
    real_len: usize,
    actual_real: usize,
    complex_len: usize,
    actual_complex: usize,
    expected_scratch: usize,
    actual_scratch: usize,
) {
    assert_eq!(
        actual_real, real_len,
        "Real buffer has the wrong length. Expected len = {}, got len = {}",
        real_len, actual_real
    );
    assert_eq!(
        actual_complex, complex_len,
        "Complex buffer has the wrong length. Expected len = {}, got len = {}",
        complex_len, actual_complex
    );
    assert!(
        actual_scratch >= expected_scratch,
        "Not enough scratch space was provided. Expected scratch len >= {}, got scratch len = {}",
        expected_scratch,
        actual_scratch
    );
}
