use num_complex::Complex;

use super::butterflies::{direction_index, Butterflies, Butterfly2};
use super::stage::{normalize, radix_stage};
use crate::array_utils::PingPong;
use crate::factor::{factor, Algorithm, FactorPlan, StageLayout};
use crate::simd::VectorKernel;
use crate::twiddles::{TwiddleLayout, TwiddleTable};
use crate::{Fft, FftDirection, FftError, FftSample, Length};

/// FFT algorithm for lengths whose factors are all 2, 4 or 8
///
/// ~~~
/// // Computes a forward FFT of size 4096
/// use mrfft::algorithm::Radix4;
/// use mrfft::{Fft, FftDirection};
/// use mrfft::num_complex::Complex;
///
/// let mut buffer = vec![Complex{ re: 0.0f32, im: 0.0f32 }; 4096];
///
/// let fft = Radix4::new(4096).unwrap();
/// fft.process(&mut buffer, FftDirection::Forward, false);
/// ~~~
pub struct Radix4<T> {
    twiddles: TwiddleTable<T>,
    layouts: Box<[StageLayout]>,
    butterflies: [Butterflies<T>; 2],
    len: usize,
}

impl<T: FftSample> Radix4<T> {
    /// Preallocates the twiddle factors for a FFT of size `len`.
    ///
    /// Returns `FftError::InvalidLength` if `len` has a factor other than 2.
    pub fn new(len: usize) -> Result<Self, FftError> {
        Self::from_plan(factor(len, true)?, TwiddleLayout::Natural)
    }

    pub(crate) fn from_plan(plan: FactorPlan, layout: TwiddleLayout) -> Result<Self, FftError> {
        if plan.algorithm() != Algorithm::Fast {
            return Err(FftError::InvalidLength { len: plan.len() });
        }

        Ok(Self {
            twiddles: TwiddleTable::new(&plan, layout)?,
            layouts: plan.layouts().into_boxed_slice(),
            butterflies: Butterflies::both_directions(),
            len: plan.len(),
        })
    }

    /// Radices of the executed stages, in order.
    pub fn radices(&self) -> impl Iterator<Item = usize> + '_ {
        self.layouts.iter().map(|stage| stage.radix)
    }

    /// Computes one FFT of `self.len()` vectors from `input` into `output`, using `scratch` as the other half
    /// of the stage ping-pong. `input` may not alias either buffer.
    pub(crate) fn execute<V: VectorKernel<T>>(
        &self,
        input: &[V::Elem],
        output: &mut [V::Elem],
        scratch: &mut [V::Elem],
        direction: FftDirection,
        divide: bool,
    ) {
        // the smallest sizes keep their ping-pong buffer on the stack
        match self.len {
            4 => self.execute_sized::<V, 4>(input, output, direction, divide),
            8 => self.execute_sized::<V, 8>(input, output, direction, divide),
            16 => self.execute_sized::<V, 16>(input, output, direction, divide),
            _ => self.execute_stages::<V>(input, output, &mut scratch[..self.len], direction, divide),
        }
    }

    #[inline(always)]
    fn execute_sized<V: VectorKernel<T>, const N: usize>(
        &self,
        input: &[V::Elem],
        output: &mut [V::Elem],
        direction: FftDirection,
        divide: bool,
    ) {
        let mut scratch = [V::zero_elem(); N];
        self.execute_stages::<V>(input, output, &mut scratch, direction, divide);
    }

    fn execute_stages<V: VectorKernel<T>>(
        &self,
        input: &[V::Elem],
        output: &mut [V::Elem],
        scratch: &mut [V::Elem],
        direction: FftDirection,
        divide: bool,
    ) {
        let butterflies = &self.butterflies[direction_index(direction)];
        let mut arena = PingPong::new(output, scratch, self.layouts.len());

        for (i, stage) in self.layouts.iter().enumerate() {
            let (previous, dst) = arena.advance();
            let src = if i == 0 { input } else { previous };

            match stage.radix {
                2 => radix_stage::<T, V, 2>(
                    src,
                    dst,
                    stage,
                    &self.twiddles,
                    direction,
                    divide,
                    Butterfly2::perform::<T, V>,
                ),
                8 => radix_stage::<T, V, 8>(
                    src,
                    dst,
                    stage,
                    &self.twiddles,
                    direction,
                    divide,
                    |values| butterflies.butterfly8.perform(values),
                ),
                radix => {
                    debug_assert_eq!(radix, 4);
                    radix_stage::<T, V, 4>(
                        src,
                        dst,
                        stage,
                        &self.twiddles,
                        direction,
                        divide,
                        |values| butterflies.butterfly4.perform::<T, V>(values),
                    )
                }
            }
        }
    }

    fn perform_fft_immut(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        direction: FftDirection,
        scaled: bool,
    ) {
        self.execute::<Complex<T>>(input, output, scratch, direction, scaled && T::FIXED_POINT);
        if scaled && !T::FIXED_POINT {
            normalize(output, self.len);
        }
    }

    fn immutable_scratch_len(&self) -> usize {
        self.len
    }
}
boilerplate_fft!([T: FftSample], Radix4<T>);

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::check_fft_algorithm;

    #[test]
    fn test_radix4_with_length() {
        for pow in 1..12 {
            let len = 1 << pow;
            let fft: Radix4<f32> = Radix4::new(len).unwrap();
            check_fft_algorithm(&fft, len);
        }
    }

    #[test]
    fn test_radix4_stage_order() {
        let fft: Radix4<f32> = Radix4::new(128).unwrap();
        assert_eq!(fft.radices().collect::<Vec<_>>(), vec![8, 4, 4]);

        let fft: Radix4<f32> = Radix4::new(256).unwrap();
        assert_eq!(fft.radices().collect::<Vec<_>>(), vec![4, 4, 4, 4]);

        let fft: Radix4<f32> = Radix4::new(2).unwrap();
        assert_eq!(fft.radices().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_radix4_rejects_other_factors() {
        assert_eq!(
            Radix4::<f32>::new(12).err(),
            Some(FftError::InvalidLength { len: 12 })
        );
        assert_eq!(
            Radix4::<f32>::new(1).err(),
            Some(FftError::InvalidLength { len: 1 })
        );
    }
}
