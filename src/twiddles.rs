use num_complex::Complex;

use crate::array_utils::try_with_capacity;
use crate::factor::{FactorPlan, StageLayout};
use crate::{FftDirection, FftError, FftSample};

/// Computes `exp(-2*pi*i * index / fft_len)` for forward FFTs, or its conjugate for inverse FFTs.
///
/// The value is computed in f64 and then converted, which is the rounding quantization for fixed point types.
pub fn compute_twiddle<T: FftSample>(
    index: usize,
    fft_len: usize,
    direction: FftDirection,
) -> Complex<T> {
    let constant = -2f64 * std::f64::consts::PI / fft_len as f64;
    let twiddle = compute_rotation((index % fft_len) as f64 * constant);

    match direction {
        FftDirection::Forward => twiddle,
        FftDirection::Inverse => twiddle.conj(),
    }
}

/// Computes `exp(i * angle)`.
pub fn compute_rotation<T: FftSample>(angle: f64) -> Complex<T> {
    let (sin, cos) = angle.sin_cos();
    Complex {
        re: T::from_f64(cos),
        im: T::from_f64(sin),
    }
}

/// Multiplies by -i for forward FFTs, or by +i for inverse FFTs.
#[inline(always)]
pub fn rotate_90<T: FftSample>(value: Complex<T>, direction: FftDirection) -> Complex<T> {
    match direction {
        FftDirection::Forward => Complex {
            re: value.im,
            im: -value.re,
        },
        FftDirection::Inverse => Complex {
            re: -value.im,
            im: value.re,
        },
    }
}

/// Order of the twiddle factors within one stage's block.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum TwiddleLayout {
    /// All twiddles for butterfly input 1, then all for input 2, and so on.
    Natural,
    /// All twiddles for butterfly 0, then all for butterfly 1, and so on.
    Transposed,
}

/// The per-stage twiddle factors of a factor plan, packed into a single array.
///
/// Stage `(radix R, fstride S, mstride M)` stores `exp(-2*pi*i * S*q*m / len)` for `q` in `1..R` and `m` in
/// `0..M`. The first stage has no twiddles. Only forward twiddles are stored; inverse FFTs conjugate on the fly.
pub struct TwiddleTable<T> {
    twiddles: Box<[Complex<T>]>,
    layout: TwiddleLayout,
}

impl<T: FftSample> TwiddleTable<T> {
    pub fn new(plan: &FactorPlan, layout: TwiddleLayout) -> Result<Self, FftError> {
        let len = plan.len();
        let mut twiddles = try_with_capacity(plan.twiddle_len(), len)?;

        for stage in plan.layouts().iter().filter(|stage| stage.mstride > 1) {
            let twiddle = |q: usize, m: usize| {
                compute_twiddle(q * m * stage.fstride, len, FftDirection::Forward)
            };
            match layout {
                TwiddleLayout::Natural => {
                    for q in 1..stage.radix {
                        for m in 0..stage.mstride {
                            twiddles.push(twiddle(q, m));
                        }
                    }
                }
                TwiddleLayout::Transposed => {
                    for m in 0..stage.mstride {
                        for q in 1..stage.radix {
                            twiddles.push(twiddle(q, m));
                        }
                    }
                }
            }
        }

        Ok(Self {
            twiddles: twiddles.into_boxed_slice(),
            layout,
        })
    }

    /// Returns the twiddle for input `q` of butterfly `m` in the given stage.
    #[inline(always)]
    pub fn get(&self, stage: &StageLayout, q: usize, m: usize, direction: FftDirection) -> Complex<T> {
        let index = match self.layout {
            TwiddleLayout::Natural => stage.twiddle_offset + (q - 1) * stage.mstride + m,
            TwiddleLayout::Transposed => stage.twiddle_offset + m * (stage.radix - 1) + (q - 1),
        };
        let twiddle = self.twiddles[index];
        match direction {
            FftDirection::Forward => twiddle,
            FftDirection::Inverse => twiddle.conj(),
        }
    }
}

/// Twiddles for the real FFT split step: `exp(-i*pi*(k/half_len + 1/2))` for `k` in `1..=half_len/2`.
pub fn real_super_twiddles<T: FftSample>(half_len: usize) -> Result<Box<[Complex<T>]>, FftError> {
    let count = half_len / 2;
    let mut twiddles = try_with_capacity(count, half_len * 2)?;
    twiddles.extend((1..=count).map(|k| {
        compute_rotation(-std::f64::consts::PI * (k as f64 / half_len as f64 + 0.5))
    }));
    Ok(twiddles.into_boxed_slice())
}

/// Twiddles joining four interleaved sub-FFTs: `W_len^(lane * k)` for lanes 1..4 and `k` in `0..len/4`,
/// stored lane-major.
pub fn lane_super_twiddles<T: FftSample>(len: usize) -> Result<Box<[Complex<T>]>, FftError> {
    let quarter = len / 4;
    let mut twiddles = try_with_capacity(3 * quarter, len)?;
    for lane in 1..4 {
        twiddles.extend((0..quarter).map(|k| compute_twiddle(lane * k, len, FftDirection::Forward)));
    }
    Ok(twiddles.into_boxed_slice())
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::factor::factor;
    use crate::test_utils::compare_vectors;
    use crate::Q31;
    use std::f32;

    #[test]
    fn test_compute_twiddle() {
        let constant = -2f32 * f32::consts::PI;

        for len in 1..10 {
            let actual: Vec<Complex<f32>> = (0..len)
                .map(|i| compute_twiddle(i, len, FftDirection::Forward))
                .collect();
            let expected: Vec<Complex<f32>> = (0..len)
                .map(|i| Complex::from_polar(1f32, constant * i as f32 / len as f32))
                .collect();

            assert!(compare_vectors(&actual, &expected), "len = {}", len)
        }

        //for each len, verify that each element in the inverse is the conjugate of the non-inverse
        for len in 1..10 {
            for i in 0..len {
                let forward: Complex<f32> = compute_twiddle(i, len, FftDirection::Forward);
                let inverse: Complex<f32> = compute_twiddle(i, len, FftDirection::Inverse);
                assert_eq!(forward, inverse.conj(), "len = {}, i = {}", len, i);
            }
        }
    }

    #[test]
    fn test_quantized_twiddle() {
        let twiddle: Complex<Q31> = compute_twiddle(1, 8, FftDirection::Forward);
        let expected = (0.5f64.sqrt() * 2f64.powi(31)).round() as i32;
        assert_eq!(twiddle.re.to_bits(), expected);
        assert_eq!(twiddle.im.to_bits(), -expected);

        // cos(0) saturates just below 1.0
        let one: Complex<Q31> = compute_twiddle(0, 8, FftDirection::Forward);
        assert_eq!(one.re, Q31::MAX);
    }

    #[test]
    fn test_rotate_90() {
        let value = Complex::new(1.0f32, 2.0);
        assert_eq!(rotate_90(value, FftDirection::Forward), value * Complex::new(0.0, -1.0));
        assert_eq!(rotate_90(value, FftDirection::Inverse), value * Complex::new(0.0, 1.0));
    }

    #[test]
    fn test_table_layouts_agree() {
        for &len in &[16, 60, 96, 120, 1000] {
            let plan = factor(len, true).unwrap();
            let natural: TwiddleTable<f32> = TwiddleTable::new(&plan, TwiddleLayout::Natural).unwrap();
            let transposed: TwiddleTable<f32> =
                TwiddleTable::new(&plan, TwiddleLayout::Transposed).unwrap();
            assert_eq!(natural.twiddles.len(), plan.twiddle_len());
            assert_eq!(transposed.twiddles.len(), plan.twiddle_len());

            for stage in plan.layouts().iter().filter(|stage| stage.mstride > 1) {
                for q in 1..stage.radix {
                    for m in 0..stage.mstride {
                        let expected: Complex<f32> =
                            compute_twiddle(q * m * stage.fstride, len, FftDirection::Forward);
                        let a = natural.get(stage, q, m, FftDirection::Forward);
                        let b = transposed.get(stage, q, m, FftDirection::Inverse);
                        assert_eq!(a, expected, "len = {}, q = {}, m = {}", len, q, m);
                        assert_eq!(b, expected.conj(), "len = {}, q = {}, m = {}", len, q, m);
                    }
                }
            }
        }
    }

    #[test]
    fn test_real_super_twiddles() {
        let twiddles: Box<[Complex<f32>]> = real_super_twiddles(8).unwrap();
        assert_eq!(twiddles.len(), 4);
        for (i, twiddle) in twiddles.iter().enumerate() {
            let k = i + 1;
            let expected: Complex<f32> = compute_twiddle(k, 16, FftDirection::Forward);
            let expected = rotate_90(expected, FftDirection::Forward);
            assert!(compare_vectors(&[*twiddle], &[expected]), "k = {}", k);
        }
    }
}
