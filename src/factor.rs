//! Splits a transform length into the ordered list of butterfly stages that computes it.
//!
//! Radices are stripped from the length in the priority order 4, 2, 5, 3. Whatever can't be divided
//! by any of those becomes one final "leftover" radix, computed by a direct DFT. The stages execute in
//! the reverse of the order they were stripped in, so the first executed stage is the last radix found.

use crate::FftError;

/// A plan never holds more stages than this. 3^21 already exceeds 2^32.
pub const MAX_STAGES: usize = 21;

/// Which engine a plan can run on.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Algorithm {
    /// Every radix is 2, 4 or 8.
    Fast,
    /// At least one radix is 3, 5, or a leftover factor.
    Generic,
}

/// One stripped factor: the radix, and the length still left to factor after it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Stage {
    pub radix: usize,
    pub remaining: usize,
}

/// Shape of one executed butterfly stage.
///
/// A stage computes `fstride` groups of `mstride` radix-`radix` butterflies, so
/// `fstride * radix * mstride` is always the transform length.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct StageLayout {
    pub radix: usize,
    pub fstride: usize,
    pub mstride: usize,
    /// Where this stage's block starts in the twiddle table. Unused by the first stage.
    pub twiddle_offset: usize,
}

impl StageLayout {
    /// Number of twiddle factors this stage reads. The first stage (mstride == 1) needs none.
    pub fn twiddle_count(&self) -> usize {
        if self.mstride > 1 {
            (self.radix - 1) * self.mstride
        } else {
            0
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FactorPlan {
    len: usize,
    stages: Vec<Stage>,
    initial_stride: usize,
    algorithm: Algorithm,
}

impl FactorPlan {
    /// The length that was factored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Stripped factors, in the order they were stripped.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// `fstride` of the first executed stage.
    pub fn initial_stride(&self) -> usize {
        self.initial_stride
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Iterates over the radices in execution order.
    pub fn radices(&self) -> impl Iterator<Item = usize> + '_ {
        self.stages.iter().rev().map(|stage| stage.radix)
    }

    /// Computes the layout of every stage, in execution order.
    pub fn layouts(&self) -> Vec<StageLayout> {
        let mut layouts = Vec::with_capacity(self.stages.len());
        let mut mstride = 1;
        let mut twiddle_offset = 0;
        for radix in self.radices() {
            let layout = StageLayout {
                radix,
                fstride: self.len / (radix * mstride),
                mstride,
                twiddle_offset,
            };
            twiddle_offset += layout.twiddle_count();
            mstride *= radix;
            layouts.push(layout);
        }
        layouts
    }

    /// Total number of twiddle factors needed by all stages.
    pub fn twiddle_len(&self) -> usize {
        self.layouts().iter().map(StageLayout::twiddle_count).sum()
    }
}

/// Factors `len` into butterfly stages.
///
/// When `fuse_radix8` is set, a remainder of exactly 8 becomes a single radix-8 stage instead of a
/// radix-4 and a radix-2 stage. Remainders of 24 and 40 are split as 3 * 8 and 5 * 8 for the same reason.
///
/// Returns `FftError::InvalidLength` for a length of zero, and `FftError::FactorizationOverflow` if more
/// than [`MAX_STAGES`] stages would be needed.
pub fn factor(len: usize, fuse_radix8: bool) -> Result<FactorPlan, FftError> {
    if len == 0 {
        return Err(FftError::InvalidLength { len });
    }

    let mut stages = Vec::new();
    let mut algorithm = Algorithm::Fast;
    let mut remaining = len;

    loop {
        let radix = match remaining {
            8 if fuse_radix8 => 8,
            24 if fuse_radix8 => 3,
            40 if fuse_radix8 => 5,
            _ if remaining % 4 == 0 => 4,
            _ if remaining % 2 == 0 => 2,
            _ if remaining % 5 == 0 => 5,
            _ if remaining % 3 == 0 => 3,
            _ => remaining,
        };
        if !matches!(radix, 2 | 4 | 8) {
            algorithm = Algorithm::Generic;
        }

        remaining /= radix;
        stages.push(Stage { radix, remaining });

        if remaining <= 1 {
            break;
        }
    }

    if stages.len() > MAX_STAGES {
        return Err(FftError::FactorizationOverflow {
            len,
            stages: stages.len(),
        });
    }

    // the loop always pushes at least one stage
    let last_radix = stages.last().map_or(len, |stage| stage.radix);

    Ok(FactorPlan {
        len,
        initial_stride: len / last_radix,
        stages,
        algorithm,
    })
}
