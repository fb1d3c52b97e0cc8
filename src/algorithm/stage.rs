use num_complex::Complex;

use super::butterflies::DftButterfly;
use crate::factor::StageLayout;
use crate::simd::VectorKernel;
use crate::twiddles::TwiddleTable;
use crate::{FftDirection, FftSample};

/// Runs one out-of-place butterfly stage with a compile-time radix.
///
/// The stage is made of `fstride` groups of `mstride` butterflies. Butterfly `(f, m)` reads its inputs from
/// `src[f*mstride + m + q*fstride*mstride]`, multiplies input `q` by `W_len^(q*m*fstride)`, and writes output `s`
/// to `dst[f*radix*mstride + m + s*mstride]`. The first stage has `mstride == 1`, so it never touches the twiddles.
///
/// If `divide` is set, every input is divided by the radix before anything else. Fixed point transforms use
/// this to stay in range.
#[inline(always)]
pub fn radix_stage<T: FftSample, V: VectorKernel<T>, const R: usize>(
    src: &[V::Elem],
    dst: &mut [V::Elem],
    stage: &StageLayout,
    twiddles: &TwiddleTable<T>,
    direction: FftDirection,
    divide: bool,
    butterfly: impl Fn(&mut [V; R]),
) {
    debug_assert_eq!(stage.radix, R);
    let mstride = stage.mstride;
    let input_stride = stage.fstride * mstride;

    for f in 0..stage.fstride {
        let input_base = f * mstride;
        let output_base = f * R * mstride;

        for m in 0..mstride {
            let mut values: [V; R] =
                core::array::from_fn(|q| V::load(&src[input_base + m + q * input_stride]));

            if divide {
                for value in values.iter_mut() {
                    *value = value.div_radix(R);
                }
            }
            if m > 0 {
                for (q, value) in values.iter_mut().enumerate().skip(1) {
                    *value = value.mul_complex(twiddles.get(stage, q, m, direction));
                }
            }

            butterfly(&mut values);

            for (s, value) in values.iter().enumerate() {
                value.store(&mut dst[output_base + m + s * mstride]);
            }
        }
    }
}

/// Same as [`radix_stage`], for a leftover radix computed by a direct DFT.
///
/// The inputs are reloaded for every output instead of being buffered, so the stage needs no memory of its own.
pub fn dft_stage<T: FftSample, V: VectorKernel<T>>(
    src: &[V::Elem],
    dst: &mut [V::Elem],
    stage: &StageLayout,
    twiddles: &TwiddleTable<T>,
    divide: bool,
    butterfly: &DftButterfly<T>,
) {
    let radix = stage.radix;
    debug_assert_eq!(butterfly.radix(), radix);
    let direction = butterfly.direction();
    let mstride = stage.mstride;
    let input_stride = stage.fstride * mstride;

    for f in 0..stage.fstride {
        let input_base = f * mstride;
        let output_base = f * radix * mstride;

        for m in 0..mstride {
            let input = |q: usize| {
                let mut value = V::load(&src[input_base + m + q * input_stride]);
                if divide {
                    value = value.div_radix(radix);
                }
                if m > 0 && q > 0 {
                    value = value.mul_complex(twiddles.get(stage, q, m, direction));
                }
                value
            };

            butterfly.perform(input, |s, value: V| {
                value.store(&mut dst[output_base + m + s * mstride])
            });
        }
    }
}

/// Multiplies every sample by `1/len`. Float transforms normalize this way instead of dividing every stage.
pub fn normalize<T: FftSample>(buffer: &mut [Complex<T>], len: usize) {
    let factor = T::from_f64(1.0 / len as f64);
    for value in buffer.iter_mut() {
        *value = *value * factor;
    }
}
