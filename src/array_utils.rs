use num_complex::Complex;

use crate::FftError;

/// Allocates an empty Vec that can hold `capacity` elements without reallocating.
/// `len` is the FFT length the allocation is for, used for error reporting.
pub fn try_with_capacity<T>(capacity: usize, len: usize) -> Result<Vec<T>, FftError> {
    let mut result = Vec::new();
    result
        .try_reserve_exact(capacity)
        .map_err(|_| FftError::AllocationFailure { len })?;
    Ok(result)
}

/// Two equally sized buffers that butterfly stages alternate between.
///
/// Slot 0 is the caller's output, slot 1 is scratch. The starting slot is chosen from the stage count,
/// so that the last stage always writes to the output.
pub struct PingPong<'a, T> {
    slots: [&'a mut [T]; 2],
    current: usize,
}

impl<'a, T> PingPong<'a, T> {
    pub fn new(output: &'a mut [T], scratch: &'a mut [T], stage_count: usize) -> Self {
        debug_assert_eq!(output.len(), scratch.len());
        Self {
            slots: [output, scratch],
            current: stage_count % 2,
        }
    }

    /// Returns the (source, destination) pair for the next stage.
    ///
    /// The source is the previous stage's destination. For the first stage it holds garbage, since that stage
    /// reads from the caller's input instead.
    #[inline(always)]
    pub fn advance(&mut self) -> (&[T], &mut [T]) {
        self.current ^= 1;
        let [output, scratch] = &mut self.slots;
        if self.current == 0 {
            (&**scratch, &mut **output)
        } else {
            (&**output, &mut **scratch)
        }
    }
}

/// Views a buffer of interleaved real samples as complex samples.
pub fn into_complex<T>(buffer: &[T]) -> &[Complex<T>] {
    debug_assert_eq!(buffer.len() % 2, 0);
    // SAFETY: Complex<T> is repr(C) with two T fields, so it has the layout and alignment of [T; 2]
    unsafe { std::slice::from_raw_parts(buffer.as_ptr() as *const Complex<T>, buffer.len() / 2) }
}

/// Views a buffer of interleaved real samples as complex samples.
pub fn into_complex_mut<T>(buffer: &mut [T]) -> &mut [Complex<T>] {
    debug_assert_eq!(buffer.len() % 2, 0);
    // SAFETY: see into_complex
    unsafe {
        std::slice::from_raw_parts_mut(buffer.as_mut_ptr() as *mut Complex<T>, buffer.len() / 2)
    }
}

/// Views a complex buffer as groups of four consecutive samples.
pub fn into_lane_groups<T>(buffer: &[Complex<T>]) -> &[[Complex<T>; 4]] {
    debug_assert_eq!(buffer.len() % 4, 0);
    // SAFETY: arrays have the alignment of their element type, and no padding between elements
    unsafe {
        std::slice::from_raw_parts(buffer.as_ptr() as *const [Complex<T>; 4], buffer.len() / 4)
    }
}

/// Views a complex buffer as groups of four consecutive samples.
pub fn into_lane_groups_mut<T>(buffer: &mut [Complex<T>]) -> &mut [[Complex<T>; 4]] {
    debug_assert_eq!(buffer.len() % 4, 0);
    // SAFETY: see into_lane_groups
    unsafe {
        std::slice::from_raw_parts_mut(
            buffer.as_mut_ptr() as *mut [Complex<T>; 4],
            buffer.len() / 4,
        )
    }
}

// Loop over exact chunks of the provided buffer. Very similar in semantics to ChunksExactMut, but generates smaller code and requires no modulo operations
// Returns Ok() if every element ended up in a chunk, Err() if there was a remainder
pub fn validate_and_iter<T>(
    mut buffer: &mut [T],
    scratch: &mut [T],
    chunk_size: usize,
    required_scratch: usize,
    mut chunk_fn: impl FnMut(&mut [T], &mut [T]),
) -> Result<(), ()> {
    if scratch.len() < required_scratch {
        return Err(());
    }
    let scratch = &mut scratch[..required_scratch];

    while buffer.len() >= chunk_size {
        let (head, tail) = buffer.split_at_mut(chunk_size);
        buffer = tail;

        chunk_fn(head, scratch);
    }

    // We have a remainder if there's data still in the buffer -- in which case we want to indicate to the caller that there was an unwanted remainder
    if buffer.is_empty() {
        Ok(())
    } else {
        Err(())
    }
}

// Loop over exact zipped chunks of the 2 provided buffers. Very similar in semantics to ChunksExactMut.zip(ChunksExactMut), but generates smaller code and requires no modulo operations
// Returns Ok() if every element of both buffers ended up in a chunk, Err() if there was a remainder
pub fn validate_and_zip<T>(
    mut input: &[T],
    mut output: &mut [T],
    scratch: &mut [T],
    chunk_size: usize,
    required_scratch: usize,
    mut chunk_fn: impl FnMut(&[T], &mut [T], &mut [T]),
) -> Result<(), ()> {
    if scratch.len() < required_scratch || input.len() != output.len() {
        return Err(());
    }
    let scratch = &mut scratch[..required_scratch];

    while input.len() >= chunk_size {
        let (input_head, input_tail) = input.split_at(chunk_size);
        let (output_head, output_tail) = output.split_at_mut(chunk_size);
        input = input_tail;
        output = output_tail;

        chunk_fn(input_head, output_head, scratch);
    }

    if input.is_empty() {
        Ok(())
    } else {
        Err(())
    }
}
