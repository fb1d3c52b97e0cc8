use num_complex::Complex;
use num_traits::Zero;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Fft, FftDirection, FftSample};

/// The seed for the random number generator used to generate
/// random signals. It's defined here so that we have deterministic
/// tests
const RNG_SEED: [u8; 32] = [
    1, 9, 1, 0, 1, 1, 4, 3, 1, 4, 9, 8, 4, 1, 4, 8, 2, 8, 1, 2, 2, 2, 6, 1, 9, 1, 0, 1, 1, 4, 3, 1,
];

pub fn random_signal(length: usize) -> Vec<Complex<f32>> {
    let mut rng = StdRng::from_seed(RNG_SEED);
    (0..length)
        .map(|_| Complex {
            re: rng.gen_range(-10.0..10.0),
            im: rng.gen_range(-10.0..10.0),
        })
        .collect()
}

pub fn random_real_signal(length: usize) -> Vec<f32> {
    let mut rng = StdRng::from_seed(RNG_SEED);
    (0..length).map(|_| rng.gen_range(-10.0..10.0)).collect()
}

/// Random samples with both components in `[-amplitude, amplitude)`.
pub fn random_fixed_signal<T: FftSample>(length: usize, amplitude: f64) -> Vec<Complex<T>> {
    let mut rng = StdRng::from_seed(RNG_SEED);
    (0..length)
        .map(|_| Complex {
            re: T::from_f64(rng.gen_range(-amplitude..amplitude)),
            im: T::from_f64(rng.gen_range(-amplitude..amplitude)),
        })
        .collect()
}

pub fn to_f64_vec<T: FftSample>(values: &[Complex<T>]) -> Vec<Complex<f64>> {
    values
        .iter()
        .map(|value| Complex::new(value.re.to_f64(), value.im.to_f64()))
        .collect()
}

/// Returns true if the RMS difference between the vectors is tiny compared to their RMS magnitude.
pub fn compare_vectors(vec1: &[Complex<f32>], vec2: &[Complex<f32>]) -> bool {
    assert_eq!(vec1.len(), vec2.len());
    if vec1.is_empty() {
        return true;
    }
    let rms = |values: &mut dyn Iterator<Item = f64>| {
        (values.sum::<f64>() / vec1.len() as f64).sqrt()
    };

    let error = rms(&mut vec1
        .iter()
        .zip(vec2.iter())
        .map(|(&a, &b)| (a - b).norm_sqr() as f64));
    let magnitude = rms(&mut vec1.iter().map(|a| a.norm_sqr() as f64))
        .max(rms(&mut vec2.iter().map(|b| b.norm_sqr() as f64)));

    error <= 1e-4 * magnitude + 1e-6
}

/// Signal to noise ratio of `actual`, in decibels, treating `reference` as the signal.
pub fn snr_db(reference: &[Complex<f64>], actual: &[Complex<f64>]) -> f64 {
    assert_eq!(reference.len(), actual.len());
    let signal: f64 = reference.iter().map(|x| x.norm_sqr()).sum();
    let noise: f64 = reference
        .iter()
        .zip(actual.iter())
        .map(|(x, y)| (x - y).norm_sqr())
        .sum();
    if noise == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (signal / noise).log10()
}

pub fn dft_f64(input: &[Complex<f64>], direction: FftDirection) -> Vec<Complex<f64>> {
    let len = input.len();
    let sign = match direction {
        FftDirection::Forward => -1.0,
        FftDirection::Inverse => 1.0,
    };
    (0..len)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(j, x)| {
                    let angle = sign * 2.0 * std::f64::consts::PI * ((j * k) % len) as f64 / len as f64;
                    x * Complex::from_polar(1.0, angle)
                })
                .sum()
        })
        .collect()
}

/// Naive unscaled DFT, computed in f64.
pub fn dft<T: FftSample>(input: &[Complex<T>], direction: FftDirection) -> Vec<Complex<T>> {
    dft_f64(&to_f64_vec(input), direction)
        .into_iter()
        .map(|value| Complex::new(T::from_f64(value.re), T::from_f64(value.im)))
        .collect()
}

/// Checks every processing method of `fft` against the naive DFT, in both directions, scaled and unscaled,
/// on a batch of three transforms.
pub fn check_fft_algorithm(fft: &dyn Fft<f32>, len: usize) {
    assert_eq!(fft.len(), len, "Algorithm reported incorrect size");

    let n = 3;
    let input = random_signal(len * n);

    for direction in [FftDirection::Forward, FftDirection::Inverse] {
        let unscaled: Vec<Complex<f32>> = input
            .chunks(len)
            .flat_map(|chunk| dft(chunk, direction))
            .collect();

        for scaled in [false, true] {
            let expected: Vec<Complex<f32>> = if scaled {
                unscaled.iter().map(|x| x / len as f32).collect()
            } else {
                unscaled.clone()
            };

            let mut buffer = input.clone();
            let mut scratch = vec![Zero::zero(); fft.get_inplace_scratch_len()];
            fft.process_with_scratch(&mut buffer, &mut scratch, direction, scaled);
            assert!(
                compare_vectors(&expected, &buffer),
                "process_with_scratch() failed, length = {}, direction = {}, scaled = {}",
                len,
                direction,
                scaled
            );

            // scratch that starts out dirty must not leak into the result
            let mut output = vec![Zero::zero(); len * n];
            let mut scratch = vec![Complex::new(99.0, -99.0); fft.get_immutable_scratch_len()];
            fft.process_immutable_with_scratch(&input, &mut output, &mut scratch, direction, scaled);
            assert!(
                compare_vectors(&expected, &output),
                "process_immutable_with_scratch() failed, length = {}, direction = {}, scaled = {}",
                len,
                direction,
                scaled
            );

            let mut buffer = input.clone();
            fft.process(&mut buffer, direction, scaled);
            assert!(
                compare_vectors(&expected, &buffer),
                "process() failed, length = {}, direction = {}, scaled = {}",
                len,
                direction,
                scaled
            );
        }
    }
}
