//! Individual FFT engines.
//!
//! Most users should go through [`FftConfig`](crate::FftConfig), which picks an engine for a length and
//! backend. The engines here can also be built directly when the choice is already known.

pub(crate) mod butterflies;
mod mixed_radix;
mod radix4;
pub(crate) mod real_to_complex;
pub(crate) mod stage;

pub use self::mixed_radix::MixedRadix;
pub use self::radix4::Radix4;

use crate::factor::{factor, Algorithm};
use crate::simd::VectorKernel;
use crate::twiddles::TwiddleLayout;
use crate::{FftDirection, FftError, FftSample};

/// A stage program that can run on any vector kernel: the fast engine if every radix is 2, 4 or 8, and the
/// generic engine otherwise.
pub(crate) enum StageProgram<T> {
    Fast(Radix4<T>),
    Generic(MixedRadix<T>),
}

impl<T: FftSample> StageProgram<T> {
    pub fn new(len: usize, layout: TwiddleLayout) -> Result<Self, FftError> {
        let plan = factor(len, true)?;
        Ok(match plan.algorithm() {
            Algorithm::Fast => Self::Fast(Radix4::from_plan(plan, layout)?),
            Algorithm::Generic => Self::Generic(MixedRadix::from_plan(plan, layout)?),
        })
    }

    #[inline]
    pub fn execute<V: VectorKernel<T>>(
        &self,
        input: &[V::Elem],
        output: &mut [V::Elem],
        scratch: &mut [V::Elem],
        direction: FftDirection,
        divide: bool,
    ) {
        match self {
            Self::Fast(fft) => fft.execute::<V>(input, output, scratch, direction, divide),
            Self::Generic(fft) => fft.execute::<V>(input, output, scratch, direction, divide),
        }
    }
}
