use crate::array_utils;
use crate::common::{fft_error_immut, fft_error_inplace};

// Validates the buffers, then runs `chunk_fn` on every FFT-sized chunk. If validation fails, panics with an
// error message describing which buffer was wrong.
#[inline(always)]
pub fn fft_helper_inplace<T>(
    buffer: &mut [T],
    scratch: &mut [T],
    chunk_size: usize,
    required_scratch: usize,
    chunk_fn: impl FnMut(&mut [T], &mut [T]),
) {
    if chunk_size == 0 {
        return;
    }

    let result =
        array_utils::validate_and_iter(buffer, scratch, chunk_size, required_scratch, chunk_fn);

    if result.is_err() {
        // the panic lives in a cold function to keep this one small
        fft_error_inplace(chunk_size, buffer.len(), required_scratch, scratch.len());
    }
}

// Same as fft_helper_inplace, for an input that must stay untouched and a separate output
#[inline(always)]
pub fn fft_helper_immut<T>(
    input: &[T],
    output: &mut [T],
    scratch: &mut [T],
    chunk_size: usize,
    required_scratch: usize,
    chunk_fn: impl FnMut(&[T], &mut [T], &mut [T]),
) {
    if chunk_size == 0 {
        return;
    }

    let result = array_utils::validate_and_zip(
        input,
        output,
        scratch,
        chunk_size,
        required_scratch,
        chunk_fn,
    );

    if result.is_err() {
        fft_error_immut(
            chunk_size,
            input.len(),
            output.len(),
            required_scratch,
            scratch.len(),
        );
    }
}

// Implements `Fft` and `Length` for an engine that has:
// - a `len` field
// - `fn immutable_scratch_len(&self) -> usize`
// - `fn perform_fft_immut(&self, input, output, scratch, direction, scaled)`, computing one FFT of exactly `len`
//
// The in-place path copies each chunk to the front of the scratch buffer and runs the immutable path from there,
// so it needs `len` more scratch than the immutable path.
macro_rules! boilerplate_fft {
    ([$($generics:tt)*], $self_ty:ty) => {
        impl<$($generics)*> Fft<T> for $self_ty {
            fn process_with_scratch(
                &self,
                buffer: &mut [Complex<T>],
                scratch: &mut [Complex<T>],
                direction: FftDirection,
                scaled: bool,
            ) {
                let len = self.len;
                crate::fft_helper::fft_helper_inplace(
                    buffer,
                    scratch,
                    len,
                    self.get_inplace_scratch_len(),
                    |chunk, scratch| {
                        let (copy, scratch) = scratch.split_at_mut(len);
                        copy.copy_from_slice(chunk);
                        self.perform_fft_immut(copy, chunk, scratch, direction, scaled);
                    },
                );
            }
            fn process_immutable_with_scratch(
                &self,
                input: &[Complex<T>],
                output: &mut [Complex<T>],
                scratch: &mut [Complex<T>],
                direction: FftDirection,
                scaled: bool,
            ) {
                crate::fft_helper::fft_helper_immut(
                    input,
                    output,
                    scratch,
                    self.len,
                    self.get_immutable_scratch_len(),
                    |input, output, scratch| {
                        self.perform_fft_immut(input, output, scratch, direction, scaled)
                    },
                );
            }
            #[inline(always)]
            fn get_inplace_scratch_len(&self) -> usize {
                self.len + self.immutable_scratch_len()
            }
            #[inline(always)]
            fn get_immutable_scratch_len(&self) -> usize {
                self.immutable_scratch_len()
            }
        }
        impl<$($generics)*> Length for $self_ty {
            #[inline(always)]
            fn len(&self) -> usize {
                self.len
            }
        }
    };
}
