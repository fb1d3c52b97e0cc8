use core::arch::aarch64::*;
use std::ops::{Add, Sub};

use num_complex::Complex;

use crate::simd::{VectorKernel, LANES};
use crate::FftDirection;

/// Four complex f32 values, deinterleaved: `val[0]` holds the four real parts and `val[1]` the four imaginary parts.
///
/// `vld2q_f32` deinterleaves while loading and `vst2q_f32` reinterleaves while storing, so the butterflies never
/// need to shuffle the real and imaginary parts.
#[derive(Copy, Clone)]
pub struct NeonLanes(float32x4x2_t);

// Neon is part of the aarch64 baseline, so these intrinsics are always available.
impl VectorKernel<f32> for NeonLanes {
    type Elem = [Complex<f32>; LANES];

    #[inline(always)]
    fn zero_elem() -> Self::Elem {
        [Complex::new(0.0, 0.0); LANES]
    }

    #[inline(always)]
    fn load(elem: &Self::Elem) -> Self {
        // SAFETY: an array of 4 Complex<f32> is 8 contiguous f32s
        unsafe { Self(vld2q_f32(elem.as_ptr() as *const f32)) }
    }

    #[inline(always)]
    fn store(self, elem: &mut Self::Elem) {
        // SAFETY: see load
        unsafe { vst2q_f32(elem.as_mut_ptr() as *mut f32, self.0) }
    }

    #[inline(always)]
    fn scale(self, factor: f32) -> Self {
        unsafe {
            Self(float32x4x2_t(
                vmulq_n_f32(self.0 .0, factor),
                vmulq_n_f32(self.0 .1, factor),
            ))
        }
    }

    #[inline(always)]
    fn mul_complex(self, factor: Complex<f32>) -> Self {
        let float32x4x2_t(re, im) = self.0;
        unsafe {
            // (re + i*im) * (fr + i*fi) = (re*fr - im*fi) + i*(re*fi + im*fr)
            let out_re = vmlsq_n_f32(vmulq_n_f32(re, factor.re), im, factor.im);
            let out_im = vmlaq_n_f32(vmulq_n_f32(re, factor.im), im, factor.re);
            Self(float32x4x2_t(out_re, out_im))
        }
    }

    #[inline(always)]
    fn rotate_90(self, direction: FftDirection) -> Self {
        let float32x4x2_t(re, im) = self.0;
        unsafe {
            match direction {
                FftDirection::Forward => Self(float32x4x2_t(im, vnegq_f32(re))),
                FftDirection::Inverse => Self(float32x4x2_t(vnegq_f32(im), re)),
            }
        }
    }

    #[inline(always)]
    fn div_radix(self, radix: usize) -> Self {
        self.scale(1.0 / radix as f32)
    }
}

impl Add for NeonLanes {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe {
            Self(float32x4x2_t(
                vaddq_f32(self.0 .0, rhs.0 .0),
                vaddq_f32(self.0 .1, rhs.0 .1),
            ))
        }
    }
}

impl Sub for NeonLanes {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe {
            Self(float32x4x2_t(
                vsubq_f32(self.0 .0, rhs.0 .0),
                vsubq_f32(self.0 .1, rhs.0 .1),
            ))
        }
    }
}
