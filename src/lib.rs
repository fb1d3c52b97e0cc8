//! mrfft is a mixed-radix FFT library aimed at embedded and mobile CPUs with SIMD units.
//!
//! Transforms are available in three sample representations: `f32`, [`Q31`] (32-bit fixed point)
//! and [`Q15`] (16-bit fixed point). Any length is supported: lengths built from 2, 4 and 8 run
//! on the fast radix-4 engine, lengths with factors of 3, 5 or anything else run on the generic
//! mixed-radix engine, and a leftover prime factor is computed with a direct DFT.
//!
//! ### Usage
//!
//! Allocate an [`FftConfig`] once, then reuse it for as many transforms as you like.
//! The direction and the scaling of each transform are chosen per call.
//!
//! ```
//! // Perform a forward FFT of size 1234
//! use mrfft::{Backend, Fft, FftConfig, FftDirection, num_complex::Complex};
//!
//! let fft = FftConfig::<f32>::new(1234, Backend::Simd).unwrap();
//!
//! let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 1234];
//! fft.process(&mut buffer, FftDirection::Forward, false);
//!
//! // ... and back again, normalized by 1/n
//! fft.process(&mut buffer, FftDirection::Inverse, true);
//! ```
//!
//! Real-valued signals can use [`RealFftConfig`], which computes a length-n real transform from a
//! length n/2 complex transform, producing the n/2 + 1 non-redundant bins.
//!
//! ```
//! use mrfft::{Backend, RealFftConfig, Q15, num_complex::Complex};
//! use mrfft::num_traits::Zero;
//!
//! let fft = RealFftConfig::<Q15>::new(64, Backend::Scalar).unwrap();
//!
//! let signal = vec![Q15::from_f64(0.25); 64];
//! let mut spectrum = vec![Complex::zero(); fft.complex_len()];
//! let mut scratch = vec![Complex::zero(); fft.get_scratch_len()];
//!
//! // scaled: every stage divides by its radix, so the result can't overflow
//! fft.forward(&signal, &mut spectrum, &mut scratch, true);
//! ```
//!
//! ### Normalization
//!
//! Every transform takes a `scaled` flag. With `scaled == false` the output is the plain DFT sum,
//! with `scaled == true` it is divided by the transform length. Float transforms apply a single
//! multiply at the end, fixed point transforms divide each stage's inputs by the stage radix so
//! that intermediate values stay within range.
//!
//! ### Backends
//!
//! [`Backend::Simd`] computes four interleaved sub-transforms of size n/4 in parallel lanes and
//! joins them with one radix-4 stage. That layout needs `n >= 15` and `n % 4 == 0`; any other
//! length silently gets the scalar engine, which [`FftConfig::backend`] reports. On AArch64 with
//! the `neon` feature, `f32` lanes use Neon intrinsics.

pub use num_complex;
pub use num_traits;

mod array_utils;
mod common;
mod config;
mod error;
#[macro_use]
mod fft_helper;
mod fixed;
mod twiddles;

pub mod algorithm;
pub mod factor;

mod simd;

#[cfg(all(target_arch = "aarch64", feature = "neon"))]
mod neon;

#[cfg(test)]
mod test_utils;

use num_complex::Complex;

pub use crate::common::FftSample;
pub use crate::config::{FftConfig, FftPlanner, RealFftConfig};
pub use crate::error::FftError;
pub use crate::fixed::{Q15, Q31};
pub use crate::twiddles::TwiddleLayout;

/// A trait that allows FFT algorithms to report their expected input/output size
pub trait Length {
    /// The FFT size that this algorithm can process
    fn len(&self) -> usize;
}

/// Represents a FFT direction, IE a forward FFT or an inverse FFT
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum FftDirection {
    Forward,
    Inverse,
}
impl FftDirection {
    /// Returns the opposite direction of `self`.
    ///
    ///  - If `self` is `FftDirection::Forward`, returns `FftDirection::Inverse`
    ///  - If `self` is `FftDirection::Inverse`, returns `FftDirection::Forward`
    #[inline]
    pub fn opposite_direction(&self) -> FftDirection {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }
}
impl std::fmt::Display for FftDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Forward => f.write_str("Forward"),
            Self::Inverse => f.write_str("Inverse"),
        }
    }
}

/// Which butterfly implementation a configuration is built for.
///
/// The choice is made once, when the configuration is allocated.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Backend {
    /// One transform at a time, one complex sample at a time.
    Scalar,
    /// Four lane-parallel sub-transforms joined by a radix-4 super-stage.
    Simd,
}
impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Simd => f.write_str("Simd"),
        }
    }
}

/// Trait for algorithms that compute FFTs.
///
/// This trait has a few methods for computing FFTs. Its most conveinent method is [`process(buffer, direction, scaled)`](crate::Fft::process).
/// It takes in a slice of `Complex<T>` and computes a FFT on that slice, in-place. It may copy the data over to internal scratch buffers
/// if that speeds up the computation, but the output will always end up in the same slice as the input.
///
/// If the provided buffer is longer than the FFT length, it will be treated as a batch of consecutive transforms.
pub trait Fft<T: FftSample>: Length + Sync + Send {
    /// Computes a FFT in-place.
    ///
    /// Convenience method that allocates a `Vec` with the required scratch space and calls `self.process_with_scratch`.
    /// If you want to re-use that allocation across multiple FFT computations, consider calling `process_with_scratch` instead.
    ///
    /// # Panics
    ///
    /// This method panics if `buffer.len() % self.len() > 0`, or if `buffer.len() < self.len()`
    fn process(&self, buffer: &mut [Complex<T>], direction: FftDirection, scaled: bool) {
        let mut scratch = vec![Complex::new(T::zero(), T::zero()); self.get_inplace_scratch_len()];
        self.process_with_scratch(buffer, &mut scratch, direction, scaled);
    }

    /// Divides `buffer` into chunks of size `self.len()`, and computes a FFT on each chunk.
    ///
    /// Uses the `scratch` buffer as scratch space, so the contents of `scratch` should be considered garbage
    /// after calling.
    ///
    /// # Panics
    ///
    /// This method panics if:
    /// - `buffer.len() % self.len() > 0`
    /// - `buffer.len() < self.len()`
    /// - `scratch.len() < self.get_inplace_scratch_len()`
    fn process_with_scratch(
        &self,
        buffer: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        direction: FftDirection,
        scaled: bool,
    );

    /// Divides `input` and `output` into chunks of size `self.len()`, and computes a FFT on each chunk
    /// while keeping `input` untouched.
    ///
    /// # Panics
    ///
    /// This method panics if:
    /// - `output.len() != input.len()`
    /// - `input.len() % self.len() > 0`
    /// - `input.len() < self.len()`
    /// - `scratch.len() < self.get_immutable_scratch_len()`
    fn process_immutable_with_scratch(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        direction: FftDirection,
        scaled: bool,
    );

    /// Returns the size of the scratch buffer required by `process_with_scratch`
    fn get_inplace_scratch_len(&self) -> usize;

    /// Returns the size of the scratch buffer required by `process_immutable_with_scratch`
    fn get_immutable_scratch_len(&self) -> usize;
}
