use std::collections::HashMap;
use std::sync::Arc;

use num_complex::Complex;

use crate::algorithm::butterflies::{direction_index, Butterfly8};
use crate::algorithm::real_to_complex::{forward_len8, inverse_len8, split_forward, split_inverse};
use crate::algorithm::{MixedRadix, Radix4};
use crate::array_utils::{into_complex, into_complex_mut};
use crate::common::fft_error_real;
use crate::factor::{factor, Algorithm};
use crate::simd::{LANES, SIMD_MIN_LEN};
use crate::twiddles::{real_super_twiddles, TwiddleLayout};
use crate::{Backend, Fft, FftDirection, FftError, FftSample, Length};

/// A complex FFT of one length, ready to be computed any number of times.
///
/// The engine is chosen once, here. With [`Backend::Simd`], lengths of at least 15 that are a multiple of 4 get
/// the lane-parallel engine. Everything else gets a scalar engine: [`Radix4`] if every factor is 2, 4 or 8, and
/// [`MixedRadix`] otherwise. [`backend()`](FftConfig::backend) reports which backend the configuration ended up with.
///
/// ~~~
/// use mrfft::{Backend, Fft, FftConfig, FftDirection, Q31};
/// use mrfft::num_complex::Complex;
/// use mrfft::num_traits::Zero;
///
/// let fft = FftConfig::<Q31>::new(12, Backend::Simd).unwrap();
/// // 12 is too short for the lane-parallel layout
/// assert_eq!(fft.backend(), Backend::Scalar);
///
/// let mut buffer = vec![Complex::<Q31>::zero(); 12];
/// fft.process(&mut buffer, FftDirection::Forward, true);
/// ~~~
pub struct FftConfig<T> {
    engine: Arc<dyn Fft<T>>,
    backend: Backend,
}

impl<T: FftSample> FftConfig<T> {
    /// Allocates a configuration for FFTs of size `len`.
    ///
    /// Returns `FftError::InvalidLength` if `len` is zero, `FftError::FactorizationOverflow` if `len` needs too many
    /// butterfly stages, and `FftError::AllocationFailure` if the twiddle tables can't be allocated.
    pub fn new(len: usize, backend: Backend) -> Result<Self, FftError> {
        Self::with_twiddle_layout(len, backend, TwiddleLayout::Natural)
    }

    /// Same as [`new`](FftConfig::new), with an explicit order for the stage twiddle tables.
    pub fn with_twiddle_layout(
        len: usize,
        backend: Backend,
        layout: TwiddleLayout,
    ) -> Result<Self, FftError> {
        if len == 0 {
            return Err(FftError::InvalidLength { len });
        }

        if backend == Backend::Simd {
            if len >= SIMD_MIN_LEN && len % LANES == 0 {
                let engine = T::make_lane_parallel(len, layout)?;
                tracing::debug!(
                    len,
                    backend = %Backend::Simd,
                    engine = "lane-parallel",
                    inner_len = len / LANES,
                    ?layout,
                    "allocated FFT configuration"
                );
                return Ok(Self {
                    engine,
                    backend: Backend::Simd,
                });
            }
            tracing::debug!(
                len,
                "SIMD layout needs a length >= {} that is a multiple of {}, falling back to scalar",
                SIMD_MIN_LEN,
                LANES
            );
        }

        let plan = factor(len, true)?;
        let radices: Vec<usize> = plan.radices().collect();
        let (engine, name) = match plan.algorithm() {
            Algorithm::Fast => (
                Arc::new(Radix4::from_plan(plan, layout)?) as Arc<dyn Fft<T>>,
                "radix4",
            ),
            Algorithm::Generic => (
                Arc::new(MixedRadix::from_plan(plan, layout)?) as Arc<dyn Fft<T>>,
                "mixed-radix",
            ),
        };
        tracing::debug!(
            len,
            backend = %Backend::Scalar,
            engine = name,
            ?radices,
            ?layout,
            "allocated FFT configuration"
        );

        Ok(Self {
            engine,
            backend: Backend::Scalar,
        })
    }

    /// The backend this configuration actually runs on.
    pub fn backend(&self) -> Backend {
        self.backend
    }
}

impl<T: FftSample> Fft<T> for FftConfig<T> {
    fn process_with_scratch(
        &self,
        buffer: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        direction: FftDirection,
        scaled: bool,
    ) {
        self.engine
            .process_with_scratch(buffer, scratch, direction, scaled)
    }
    fn process_immutable_with_scratch(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        direction: FftDirection,
        scaled: bool,
    ) {
        self.engine
            .process_immutable_with_scratch(input, output, scratch, direction, scaled)
    }
    fn get_inplace_scratch_len(&self) -> usize {
        self.engine.get_inplace_scratch_len()
    }
    fn get_immutable_scratch_len(&self) -> usize {
        self.engine.get_immutable_scratch_len()
    }
}
impl<T: FftSample> Length for FftConfig<T> {
    fn len(&self) -> usize {
        self.engine.len()
    }
}

/// A real-to-complex FFT of length `n`, computed through a complex FFT of length `n/2`.
///
/// The forward transform turns `n` real samples into the `n/2 + 1` non-redundant bins of the spectrum. The first
/// and last bins are real. The inverse transform turns those bins back into `n` real samples, ignoring the imaginary
/// parts of the first and last bins.
pub struct RealFftConfig<T> {
    inner: FftConfig<T>,
    super_twiddles: Box<[Complex<T>]>,
    radix8: Option<[Butterfly8<T>; 2]>,
    len: usize,
}

impl<T: FftSample> RealFftConfig<T> {
    /// Allocates a configuration for real FFTs of size `len`.
    ///
    /// Returns `FftError::InvalidLength` unless `len` is even and at least 2.
    pub fn new(len: usize, backend: Backend) -> Result<Self, FftError> {
        if len < 2 || len % 2 != 0 {
            return Err(FftError::InvalidLength { len });
        }

        let half_len = len / 2;
        let inner = FftConfig::with_twiddle_layout(half_len, backend, TwiddleLayout::Transposed)?;
        let super_twiddles = real_super_twiddles(half_len)?;
        let radix8 = if len == 8 {
            Some([
                Butterfly8::new(FftDirection::Forward),
                Butterfly8::new(FftDirection::Inverse),
            ])
        } else {
            None
        };

        tracing::debug!(
            len,
            backend = %inner.backend(),
            direct_radix8 = radix8.is_some(),
            "allocated real FFT configuration"
        );

        Ok(Self {
            inner,
            super_twiddles,
            radix8,
            len,
        })
    }

    /// Number of bins in the spectrum: `len / 2 + 1`.
    pub fn complex_len(&self) -> usize {
        self.len / 2 + 1
    }

    pub fn backend(&self) -> Backend {
        self.inner.backend()
    }

    /// Size of the scratch buffer required by `forward` and `inverse`.
    pub fn get_scratch_len(&self) -> usize {
        self.len / 2 + self.inner.get_immutable_scratch_len()
    }

    fn check_buffers(&self, real_len: usize, complex_len: usize, scratch_len: usize) -> bool {
        let required_scratch = self.get_scratch_len();
        if real_len != self.len || complex_len != self.complex_len() || scratch_len < required_scratch
        {
            fft_error_real(
                self.len,
                real_len,
                self.complex_len(),
                complex_len,
                required_scratch,
                scratch_len,
            );
            return false;
        }
        true
    }

    /// Computes the spectrum of the real signal `input` into `output`.
    ///
    /// If `scaled` is set, the spectrum is divided by `len`.
    ///
    /// # Panics
    ///
    /// Panics if `input.len() != self.len()`, if `output.len() != self.complex_len()`, or if
    /// `scratch.len() < self.get_scratch_len()`.
    pub fn forward(
        &self,
        input: &[T],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        scaled: bool,
    ) {
        if !self.check_buffers(input.len(), output.len(), scratch.len()) {
            return;
        }

        if let Some(radix8) = &self.radix8 {
            let butterfly8 = &radix8[direction_index(FftDirection::Forward)];
            return forward_len8(butterfly8, input, output, scaled);
        }

        let half_len = self.len / 2;
        self.inner.process_immutable_with_scratch(
            into_complex(input),
            &mut output[..half_len],
            &mut scratch[half_len..],
            FftDirection::Forward,
            scaled,
        );
        split_forward(output, &self.super_twiddles, scaled);
    }

    /// Computes the real signal whose spectrum is `input` into `output`.
    ///
    /// If `scaled` is set, the signal is divided by `len`, so `inverse(forward(x), scaled = true)` returns `x`.
    ///
    /// # Panics
    ///
    /// Panics if `input.len() != self.complex_len()`, if `output.len() != self.len()`, or if
    /// `scratch.len() < self.get_scratch_len()`.
    pub fn inverse(
        &self,
        input: &[Complex<T>],
        output: &mut [T],
        scratch: &mut [Complex<T>],
        scaled: bool,
    ) {
        if !self.check_buffers(output.len(), input.len(), scratch.len()) {
            return;
        }

        if let Some(radix8) = &self.radix8 {
            let butterfly8 = &radix8[direction_index(FftDirection::Inverse)];
            return inverse_len8(butterfly8, input, output, scaled);
        }

        let (packed, scratch) = scratch.split_at_mut(self.len / 2);
        split_inverse(input, packed, &self.super_twiddles, scaled);
        self.inner.process_immutable_with_scratch(
            packed,
            into_complex_mut(output),
            scratch,
            FftDirection::Inverse,
            scaled,
        );
    }
}
impl<T> Length for RealFftConfig<T> {
    fn len(&self) -> usize {
        self.len
    }
}

/// Allocates and caches FFT configurations, keyed by length and requested backend.
///
/// ~~~
/// use mrfft::{Backend, FftError, FftPlanner};
///
/// let mut planner = FftPlanner::<f32>::new();
/// let fft = planner.plan_fft(1024, Backend::Simd).unwrap();
///
/// // the same configuration is handed out again
/// let again = planner.cached_fft(1024, Backend::Simd).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&fft, &again));
///
/// // but nothing was planned for this length yet
/// assert_eq!(planner.cached_fft(1000, Backend::Simd).err(), Some(FftError::NullConfig { len: 1000 }));
/// ~~~
pub struct FftPlanner<T> {
    complex_cache: HashMap<(usize, Backend), Arc<FftConfig<T>>>,
    real_cache: HashMap<(usize, Backend), Arc<RealFftConfig<T>>>,
}

impl<T: FftSample> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            complex_cache: HashMap::new(),
            real_cache: HashMap::new(),
        }
    }

    /// Returns a complex FFT configuration for `len`, allocating it if this planner hasn't already.
    pub fn plan_fft(&mut self, len: usize, backend: Backend) -> Result<Arc<FftConfig<T>>, FftError> {
        if let Some(fft) = self.complex_cache.get(&(len, backend)) {
            tracing::trace!(len, %backend, "reusing cached FFT configuration");
            return Ok(Arc::clone(fft));
        }

        let fft = Arc::new(FftConfig::new(len, backend)?);
        self.complex_cache.insert((len, backend), Arc::clone(&fft));
        Ok(fft)
    }

    /// Returns a real FFT configuration for `len`, allocating it if this planner hasn't already.
    pub fn plan_real_fft(
        &mut self,
        len: usize,
        backend: Backend,
    ) -> Result<Arc<RealFftConfig<T>>, FftError> {
        if let Some(fft) = self.real_cache.get(&(len, backend)) {
            tracing::trace!(len, %backend, "reusing cached real FFT configuration");
            return Ok(Arc::clone(fft));
        }

        let fft = Arc::new(RealFftConfig::new(len, backend)?);
        self.real_cache.insert((len, backend), Arc::clone(&fft));
        Ok(fft)
    }

    /// Looks up a complex configuration without allocating. Returns `FftError::NullConfig` if none was planned.
    pub fn cached_fft(&self, len: usize, backend: Backend) -> Result<Arc<FftConfig<T>>, FftError> {
        self.complex_cache
            .get(&(len, backend))
            .map(Arc::clone)
            .ok_or(FftError::NullConfig { len })
    }

    /// Looks up a real configuration without allocating. Returns `FftError::NullConfig` if none was planned.
    pub fn cached_real_fft(
        &self,
        len: usize,
        backend: Backend,
    ) -> Result<Arc<RealFftConfig<T>>, FftError> {
        self.real_cache
            .get(&(len, backend))
            .map(Arc::clone)
            .ok_or(FftError::NullConfig { len })
    }
}

impl<T: FftSample> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::{check_fft_algorithm, compare_vectors, dft, random_real_signal};

    #[test]
    fn test_zero_length() {
        assert_eq!(
            FftConfig::<f32>::new(0, Backend::Scalar).err(),
            Some(FftError::InvalidLength { len: 0 })
        );
        for &len in &[0, 1, 7, 15] {
            assert_eq!(
                RealFftConfig::<f32>::new(len, Backend::Scalar).err(),
                Some(FftError::InvalidLength { len })
            );
        }
    }

    #[test]
    fn test_backend_selection() {
        let cases = [
            (16, Backend::Simd, Backend::Simd),
            (60, Backend::Simd, Backend::Simd),
            (12, Backend::Simd, Backend::Scalar),
            (18, Backend::Simd, Backend::Scalar),
            (1024, Backend::Scalar, Backend::Scalar),
        ];
        for &(len, requested, expected) in &cases {
            let fft = FftConfig::<f32>::new(len, requested).unwrap();
            assert_eq!(fft.backend(), expected, "len = {}", len);
            check_fft_algorithm(&fft, len);
        }
    }

    #[test]
    fn test_scratch_lengths() {
        let fft = FftConfig::<f32>::new(100, Backend::Simd).unwrap();
        assert_eq!(fft.get_immutable_scratch_len(), 100);
        assert_eq!(fft.get_inplace_scratch_len(), 200);

        let fft = FftConfig::<f32>::new(7, Backend::Scalar).unwrap();
        assert_eq!(fft.get_immutable_scratch_len(), 7);
        assert_eq!(fft.get_inplace_scratch_len(), 14);
    }

    #[test]
    fn test_real_forward_matches_dft() {
        for &len in &[2, 4, 8, 10, 16, 30, 64, 120] {
            for backend in [Backend::Scalar, Backend::Simd] {
                let fft = RealFftConfig::<f32>::new(len, backend).unwrap();
                let signal = random_real_signal(len);

                let mut spectrum = vec![Complex::new(0.0, 0.0); fft.complex_len()];
                let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_scratch_len()];
                fft.forward(&signal, &mut spectrum, &mut scratch, false);

                let complex: Vec<Complex<f32>> =
                    signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
                let expected = dft(&complex, FftDirection::Forward);
                assert!(
                    compare_vectors(&spectrum, &expected[..fft.complex_len()]),
                    "len = {}, backend = {}",
                    len,
                    backend
                );
            }
        }
    }

    #[test]
    fn test_planner_cache() {
        let mut planner = FftPlanner::<f32>::new();
        assert_eq!(
            planner.cached_real_fft(64, Backend::Scalar).err(),
            Some(FftError::NullConfig { len: 64 })
        );

        let real = planner.plan_real_fft(64, Backend::Scalar).unwrap();
        let again = planner.plan_real_fft(64, Backend::Scalar).unwrap();
        assert!(Arc::ptr_eq(&real, &again));
        assert!(planner.cached_real_fft(64, Backend::Scalar).is_ok());

        // a different backend is a different configuration
        assert!(planner.cached_real_fft(64, Backend::Simd).is_err());
        assert_eq!(
            planner.plan_fft(0, Backend::Scalar).err(),
            Some(FftError::InvalidLength { len: 0 })
        );
    }

    #[test]
    #[should_panic(expected = "Complex buffer has the wrong length")]
    fn test_real_wrong_output_len() {
        let fft = RealFftConfig::<f32>::new(16, Backend::Scalar).unwrap();
        let signal = vec![0.0f32; 16];
        let mut spectrum = vec![Complex::new(0.0, 0.0); 8];
        let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_scratch_len()];
        fft.forward(&signal, &mut spectrum, &mut scratch, false);
    }
}
