use num_complex::Complex;

use crate::array_utils::try_with_capacity;
use crate::simd::VectorKernel;
use crate::twiddles;
use crate::{FftDirection, FftError, FftSample};

// Every butterfly operates on an array of vectors, so the same code runs one complex value at a time
// in the scalar engines and four lanes at a time in the lane-parallel engine.

pub struct Butterfly2;
impl Butterfly2 {
    #[inline(always)]
    pub fn perform<T: FftSample, V: VectorKernel<T>>(values: &mut [V; 2]) {
        let temp = values[0] + values[1];
        values[1] = values[0] - values[1];
        values[0] = temp;
    }
}

pub struct Butterfly3<T> {
    pub twiddle: Complex<T>,
}
impl<T: FftSample> Butterfly3<T> {
    pub fn new(direction: FftDirection) -> Self {
        Self {
            twiddle: twiddles::compute_twiddle(1, 3, direction),
        }
    }

    #[inline(always)]
    pub fn perform<V: VectorKernel<T>>(&self, values: &mut [V; 3]) {
        let xp = values[1] + values[2];
        let xn = values[1] - values[2];
        let sum = values[0] + xp;

        let temp_a = values[0] + xp.scale(self.twiddle.re);
        let temp_b = xn
            .scale(self.twiddle.im)
            .rotate_90(FftDirection::Inverse);

        values[0] = sum;
        values[1] = temp_a + temp_b;
        values[2] = temp_a - temp_b;
    }
}

pub struct Butterfly4 {
    direction: FftDirection,
}
impl Butterfly4 {
    pub fn new(direction: FftDirection) -> Self {
        Self { direction }
    }

    #[inline(always)]
    pub fn perform<T: FftSample, V: VectorKernel<T>>(&self, values: &mut [V; 4]) {
        //we're going to hardcode a step of mixed radix
        //aka we're going to do the six step algorithm

        // step 1: transpose, which we're skipping because we're just going to perform non-contiguous FFTs
        let mut scratch0 = [values[0], values[2]];
        let mut scratch1 = [values[1], values[3]];

        // step 2: column FFTs
        Butterfly2::perform::<T, V>(&mut scratch0);
        Butterfly2::perform::<T, V>(&mut scratch1);

        // step 3: apply twiddle factors (only one in this case, and it's either 0 + i or 0 - i)
        scratch1[1] = scratch1[1].rotate_90(self.direction);

        // step 4: transpose, which we're skipping because we're the previous FFTs were non-contiguous

        // step 5: row FFTs
        let mut row0 = [scratch0[0], scratch1[0]];
        let mut row1 = [scratch0[1], scratch1[1]];
        Butterfly2::perform::<T, V>(&mut row0);
        Butterfly2::perform::<T, V>(&mut row1);

        // step 6: transpose by swapping index 1 and 2
        *values = [row0[0], row1[0], row0[1], row1[1]];
    }
}

pub struct Butterfly5<T> {
    twiddle1: Complex<T>,
    twiddle2: Complex<T>,
}
impl<T: FftSample> Butterfly5<T> {
    pub fn new(direction: FftDirection) -> Self {
        Self {
            twiddle1: twiddles::compute_twiddle(1, 5, direction),
            twiddle2: twiddles::compute_twiddle(2, 5, direction),
        }
    }

    #[inline(always)]
    pub fn perform<V: VectorKernel<T>>(&self, values: &mut [V; 5]) {
        // Outputs 1 and 4 share the same real part and have opposite imaginary parts, same for 2 and 3:
        // X1 = x0 + tw1.re*(x1+x4) + tw2.re*(x2+x3) + i*(tw1.im*(x1-x4) + tw2.im*(x2-x3))
        // X2 = x0 + tw2.re*(x1+x4) + tw1.re*(x2+x3) + i*(tw2.im*(x1-x4) - tw1.im*(x2-x3))
        let x0 = values[0];
        let x14p = values[1] + values[4];
        let x14n = values[1] - values[4];
        let x23p = values[2] + values[3];
        let x23n = values[2] - values[3];

        let sum = x0 + x14p + x23p;

        let a1 = x0 + x14p.scale(self.twiddle1.re) + x23p.scale(self.twiddle2.re);
        let b1 = (x14n.scale(self.twiddle1.im) + x23n.scale(self.twiddle2.im))
            .rotate_90(FftDirection::Inverse);

        let a2 = x0 + x14p.scale(self.twiddle2.re) + x23p.scale(self.twiddle1.re);
        let b2 = (x14n.scale(self.twiddle2.im) - x23n.scale(self.twiddle1.im))
            .rotate_90(FftDirection::Inverse);

        *values = [sum, a1 + b1, a2 + b2, a2 - b2, a1 - b1];
    }
}

pub struct Butterfly8<T> {
    root2: T,
    butterfly4: Butterfly4,
    direction: FftDirection,
}
impl<T: FftSample> Butterfly8<T> {
    pub fn new(direction: FftDirection) -> Self {
        Self {
            root2: T::from_f64(0.5f64.sqrt()),
            butterfly4: Butterfly4::new(direction),
            direction,
        }
    }

    #[inline(always)]
    pub fn perform<V: VectorKernel<T>>(&self, values: &mut [V; 8]) {
        // step 1: transpose the input into the scratch
        let mut scratch0 = [values[0], values[2], values[4], values[6]];
        let mut scratch1 = [values[1], values[3], values[5], values[7]];

        // step 2: column FFTs
        self.butterfly4.perform::<T, V>(&mut scratch0);
        self.butterfly4.perform::<T, V>(&mut scratch1);

        // step 3: apply twiddle factors
        // W8^1 = (1 - i)/sqrt(2) and W8^3 = (-1 - i)/sqrt(2) for forward FFTs, conjugated for inverse
        scratch1[1] = (scratch1[1].rotate_90(self.direction) + scratch1[1]).scale(self.root2);
        scratch1[2] = scratch1[2].rotate_90(self.direction);
        scratch1[3] = (scratch1[3].rotate_90(self.direction) - scratch1[3]).scale(self.root2);

        // step 4: transpose -- skipped because we're going to do the next FFTs non-contiguously

        // step 5: row FFTs
        for i in 0..4 {
            let mut row = [scratch0[i], scratch1[i]];
            Butterfly2::perform::<T, V>(&mut row);
            values[i] = row[0];
            values[i + 4] = row[1];
        }
    }
}

/// Direct DFT for a radix that has no closed form butterfly.
///
/// Output `s` is the sum of `values[p] * W_radix^(p*s)`. The root table is indexed by `(p * s) % radix`,
/// so it only holds `radix` entries.
pub struct DftButterfly<T> {
    roots: Box<[Complex<T>]>,
    direction: FftDirection,
}
impl<T: FftSample> DftButterfly<T> {
    pub fn new(radix: usize, direction: FftDirection) -> Result<Self, FftError> {
        let mut roots = try_with_capacity(radix, radix)?;
        roots.extend((0..radix).map(|i| twiddles::compute_twiddle(i, radix, direction)));
        Ok(Self {
            roots: roots.into_boxed_slice(),
            direction,
        })
    }

    pub fn radix(&self) -> usize {
        self.roots.len()
    }

    pub fn direction(&self) -> FftDirection {
        self.direction
    }

    /// Passes output `s` to `output`, for every `s` in `0..radix`.
    ///
    /// `input(q)` is called once per output, so it must keep returning the same value for the same `q`.
    #[inline]
    pub fn perform<V: VectorKernel<T>>(
        &self,
        input: impl Fn(usize) -> V,
        mut output: impl FnMut(usize, V),
    ) {
        let radix = self.roots.len();
        for s in 0..radix {
            let mut sum = input(0);
            let mut root_index = 0;
            for q in 1..radix {
                root_index += s;
                if root_index >= radix {
                    root_index -= radix;
                }
                sum = sum + input(q).mul_complex(self.roots[root_index]);
            }
            output(s, sum);
        }
    }
}

/// The closed form butterflies for one direction.
pub struct Butterflies<T> {
    pub butterfly3: Butterfly3<T>,
    pub butterfly4: Butterfly4,
    pub butterfly5: Butterfly5<T>,
    pub butterfly8: Butterfly8<T>,
}
impl<T: FftSample> Butterflies<T> {
    pub fn new(direction: FftDirection) -> Self {
        Self {
            butterfly3: Butterfly3::new(direction),
            butterfly4: Butterfly4::new(direction),
            butterfly5: Butterfly5::new(direction),
            butterfly8: Butterfly8::new(direction),
        }
    }

    /// Builds the forward and inverse sets, indexable with [`direction_index`].
    pub fn both_directions() -> [Self; 2] {
        [Self::new(FftDirection::Forward), Self::new(FftDirection::Inverse)]
    }
}

#[inline(always)]
pub fn direction_index(direction: FftDirection) -> usize {
    match direction {
        FftDirection::Forward => 0,
        FftDirection::Inverse => 1,
    }
}
