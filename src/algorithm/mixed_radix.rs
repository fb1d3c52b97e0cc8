use num_complex::Complex;

use super::butterflies::{direction_index, Butterflies, Butterfly2, DftButterfly};
use super::stage::{dft_stage, normalize, radix_stage};
use crate::array_utils::PingPong;
use crate::factor::{factor, FactorPlan, StageLayout};
use crate::simd::VectorKernel;
use crate::twiddles::{TwiddleLayout, TwiddleTable};
use crate::{Fft, FftDirection, FftError, FftSample, Length};

/// Implementation of the mixed radix FFT algorithm, for any length
///
/// Factors of 2, 3, 4, 5 and 8 are computed with closed form butterflies. Whatever is left once those are
/// stripped out becomes a single stage computed with a direct DFT, so lengths with a large prime factor are
/// correct but slow.
///
/// ~~~
/// // Computes a forward FFT of size 1200
/// use mrfft::algorithm::MixedRadix;
/// use mrfft::{Fft, FftDirection, Q31};
/// use mrfft::num_complex::Complex;
/// use mrfft::num_traits::Zero;
///
/// let mut buffer: Vec<Complex<Q31>> = vec![Complex::zero(); 1200];
///
/// let fft = MixedRadix::new(1200).unwrap();
/// fft.process(&mut buffer, FftDirection::Forward, true);
/// ~~~
pub struct MixedRadix<T> {
    twiddles: TwiddleTable<T>,
    layouts: Box<[StageLayout]>,
    butterflies: [Butterflies<T>; 2],
    leftover: Option<[DftButterfly<T>; 2]>,
    len: usize,
}

impl<T: FftSample> MixedRadix<T> {
    pub fn new(len: usize) -> Result<Self, FftError> {
        Self::from_plan(factor(len, true)?, TwiddleLayout::Natural)
    }

    pub(crate) fn from_plan(plan: FactorPlan, layout: TwiddleLayout) -> Result<Self, FftError> {
        let layouts = plan.layouts().into_boxed_slice();

        // at most one stage can have a leftover radix: it's whatever remained after the small radices were stripped
        let leftover = match layouts.iter().find(|stage| !has_butterfly(stage.radix)) {
            Some(stage) => Some([
                DftButterfly::new(stage.radix, FftDirection::Forward)?,
                DftButterfly::new(stage.radix, FftDirection::Inverse)?,
            ]),
            None => None,
        };

        Ok(Self {
            twiddles: TwiddleTable::new(&plan, layout)?,
            layouts,
            butterflies: Butterflies::both_directions(),
            leftover,
            len: plan.len(),
        })
    }

    /// Radices of the executed stages, in order.
    pub fn radices(&self) -> impl Iterator<Item = usize> + '_ {
        self.layouts.iter().map(|stage| stage.radix)
    }

    pub(crate) fn execute<V: VectorKernel<T>>(
        &self,
        input: &[V::Elem],
        output: &mut [V::Elem],
        scratch: &mut [V::Elem],
        direction: FftDirection,
        divide: bool,
    ) {
        let butterflies = &self.butterflies[direction_index(direction)];
        let twiddles = &self.twiddles;
        let mut arena = PingPong::new(output, &mut scratch[..self.len], self.layouts.len());

        for (i, stage) in self.layouts.iter().enumerate() {
            let (previous, dst) = arena.advance();
            let src = if i == 0 { input } else { previous };

            macro_rules! closed_form {
                ($radix:literal, $butterfly:expr) => {
                    radix_stage::<T, V, $radix>(
                        src,
                        dst,
                        stage,
                        twiddles,
                        direction,
                        divide,
                        $butterfly,
                    )
                };
            }

            match (stage.radix, &self.leftover) {
                (1, _) => closed_form!(1, |_: &mut [V; 1]| {}),
                (2, _) => closed_form!(2, Butterfly2::perform::<T, V>),
                (3, _) => closed_form!(3, |values| butterflies.butterfly3.perform(values)),
                (4, _) => closed_form!(4, |values| butterflies.butterfly4.perform::<T, V>(values)),
                (5, _) => closed_form!(5, |values| butterflies.butterfly5.perform(values)),
                (8, _) => closed_form!(8, |values| butterflies.butterfly8.perform(values)),
                (_, Some(leftover)) => dft_stage::<T, V>(
                    src,
                    dst,
                    stage,
                    twiddles,
                    divide,
                    &leftover[direction_index(direction)],
                ),
                (radix, None) => {
                    debug_assert!(false, "no butterfly for radix {}", radix);
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
boilerplate_fft!([T: FftSample], MixedRadix<T>);

fn has_butterfly(radix: usize) -> bool {
    matches!(radix, 1 | 2 | 3 | 4 | 5 | 8)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::check_fft_algorithm;

    #[test]
    fn test_mixed_radix() {
        for len in 1..50 {
            let fft: MixedRadix<f32> = MixedRadix::new(len).unwrap();
            check_fft_algorithm(&fft, len);
        }
    }

    #[test]
    fn test_mixed_radix_larger() {
        for &len in &[60, 96, 120, 154, 625, 1000, 1024, 3 * 3 * 3 * 3 * 7] {
            let fft: MixedRadix<f32> = MixedRadix::new(len).unwrap();
            check_fft_algorithm(&fft, len);
        }
    }

    #[test]
    fn test_leftover_stage() {
        let fft: MixedRadix<f32> = MixedRadix::new(2 * 7 * 11).unwrap();
        assert_eq!(fft.radices().collect::<Vec<_>>(), vec![77, 2]);
        assert!(fft.leftover.is_some());

        let fft: MixedRadix<f32> = MixedRadix::new(24).unwrap();
        assert_eq!(fft.radices().collect::<Vec<_>>(), vec![8, 3]);
        assert!(fft.leftover.is_none());
    }
}
