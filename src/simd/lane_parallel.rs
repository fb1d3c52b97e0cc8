use std::marker::PhantomData;

use num_complex::Complex;

use super::{VectorKernel, LANES, SIMD_MIN_LEN};
use crate::algorithm::butterflies::{direction_index, Butterfly4};
use crate::algorithm::stage::normalize;
use crate::algorithm::StageProgram;
use crate::array_utils::{into_lane_groups, into_lane_groups_mut};
use crate::twiddles::{lane_super_twiddles, TwiddleLayout};
use crate::{Fft, FftDirection, FftError, FftSample, Length};

/// Computes a FFT of size `len` as four interleaved sub-FFTs of size `len / 4`, one per vector lane.
///
/// Lane `l` transforms the samples `x[4j + l]`. Loading four consecutive samples therefore loads one sample of
/// every sub-FFT, and the whole stage program runs on vectors without any shuffling. A final scalar radix-4
/// stage joins the four sub-spectra:
///
/// `X[k + s*len/4] = sum over l of Y_l[k] * W_len^(l*k) * W_4^(l*s)`
pub struct LaneParallel<T, V> {
    inner: StageProgram<T>,
    super_twiddles: Box<[Complex<T>]>,
    butterfly4: [Butterfly4; 2],
    len: usize,
    _kernel: PhantomData<V>,
}

impl<T: FftSample, V: VectorKernel<T, Elem = [Complex<T>; LANES]>> LaneParallel<T, V> {
    /// Returns `FftError::InvalidLength` unless `len >= 15` and `len` is a multiple of 4.
    pub fn new(len: usize, layout: TwiddleLayout) -> Result<Self, FftError> {
        if len < SIMD_MIN_LEN || len % LANES != 0 {
            return Err(FftError::InvalidLength { len });
        }

        Ok(Self {
            inner: StageProgram::new(len / LANES, layout)?,
            super_twiddles: lane_super_twiddles(len)?,
            butterfly4: [
                Butterfly4::new(FftDirection::Forward),
                Butterfly4::new(FftDirection::Inverse),
            ],
            len,
            _kernel: PhantomData,
        })
    }

    fn perform_fft_immut(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
        direction: FftDirection,
        scaled: bool,
    ) {
        let divide = scaled && T::FIXED_POINT;
        let scratch = &mut scratch[..self.len];

        // the sub-FFTs finish in scratch, and use the output as their other ping-pong buffer
        self.inner.execute::<V>(
            into_lane_groups(input),
            into_lane_groups_mut(scratch),
            into_lane_groups_mut(output),
            direction,
            divide,
        );

        let quarter = self.len / LANES;
        let butterfly4 = &self.butterfly4[direction_index(direction)];
        for (k, group) in into_lane_groups(scratch).iter().enumerate() {
            let mut values = *group;
            if divide {
                for value in values.iter_mut() {
                    *value = value.div_radix(LANES);
                }
            }
            if k > 0 {
                for (lane, value) in values.iter_mut().enumerate().skip(1) {
                    let twiddle = self.super_twiddles[(lane - 1) * quarter + k];
                    *value = *value
                        * match direction {
                            FftDirection::Forward => twiddle,
                            FftDirection::Inverse => twiddle.conj(),
                        };
                }
            }

            butterfly4.perform::<T, Complex<T>>(&mut values);

            for (s, value) in values.iter().enumerate() {
                output[k + s * quarter] = *value;
            }
        }

        if scaled && !T::FIXED_POINT {
            normalize(output, self.len);
        }
    }

    fn immutable_scratch_len(&self) -> usize {
        self.len
    }
}
boilerplate_fft!(
    [T: FftSample, V: VectorKernel<T, Elem = [Complex<T>; LANES]>],
    LaneParallel<T, V>
);
