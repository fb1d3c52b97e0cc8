//! Real FFTs of length `n` computed through a complex FFT of length `n/2`.
//!
//! The forward direction reads the real signal as `n/2` complex samples `z[j] = x[2j] + i*x[2j+1]`, transforms
//! them, and then splits the packed spectrum `Z` into the spectra of the even and odd samples:
//!
//! `X[k] = (Z[k] + conj(Z[M-k]))/2 + W_n^k * (Z[k] - conj(Z[M-k]))/(2i)`
//!
//! The inverse direction runs the same steps backwards.

use num_complex::Complex;

use super::butterflies::Butterfly8;
use crate::FftSample;

#[inline(always)]
fn halve<T: FftSample>(value: Complex<T>) -> Complex<T> {
    Complex::new(value.re.half(), value.im.half())
}

/// Turns the packed spectrum in `buffer[..M]` into the `M + 1` bins of the real spectrum, in place.
///
/// `twiddles[k - 1]` must be `exp(-i*pi*(k/M + 1/2))` for `k` in `1..=M/2`. If `scaled` is set, the result is
/// additionally divided by 2, which completes the normalization of a scaled `M`-point inner transform.
pub fn split_forward<T: FftSample>(buffer: &mut [Complex<T>], twiddles: &[Complex<T>], scaled: bool) {
    let half_len = buffer.len() - 1;
    debug_assert_eq!(twiddles.len(), half_len / 2);

    let z0 = buffer[0];
    let (dc, nyquist) = if scaled {
        let (re, im) = (z0.re.half(), z0.im.half());
        (re + im, re - im)
    } else {
        (z0.re + z0.im, z0.re - z0.im)
    };
    buffer[0] = Complex::new(dc, T::zero());
    buffer[half_len] = Complex::new(nyquist, T::zero());

    for (k, twiddle) in (1..=half_len / 2).zip(twiddles.iter()) {
        // halving first keeps fixed point values from overflowing
        let a = halve(buffer[k]);
        let b = halve(buffer[half_len - k].conj());

        let mut sum = a + b;
        let mut diff_twiddled = (a - b) * *twiddle;

        // the scaled result is in range but the unhalved sum isn't, so each term is halved on its own
        if scaled {
            sum = halve(sum);
            diff_twiddled = halve(diff_twiddled);
        }

        buffer[k] = sum + diff_twiddled;
        buffer[half_len - k] = (sum - diff_twiddled).conj();
    }
}

/// Packs the `M + 1` bins of a real spectrum into the `M` complex values that an inverse `M`-point FFT turns
/// back into the interleaved real signal.
///
/// The imaginary parts of the first and last bins are ignored. If `scaled` is set, `packed` receives exactly the
/// packed spectrum and the inner inverse transform must be scaled too. Otherwise `packed` receives twice the packed
/// spectrum, so an unscaled inner transform produces the plain `n`-point inverse DFT.
pub fn split_inverse<T: FftSample>(
    input: &[Complex<T>],
    packed: &mut [Complex<T>],
    twiddles: &[Complex<T>],
    scaled: bool,
) {
    let half_len = packed.len();
    debug_assert_eq!(input.len(), half_len + 1);
    debug_assert_eq!(twiddles.len(), half_len / 2);

    let (first, last) = (input[0].re, input[half_len].re);
    packed[0] = if scaled {
        let (first, last) = (first.half(), last.half());
        Complex::new(first + last, first - last)
    } else {
        Complex::new(first + last, first - last)
    };

    for (k, twiddle) in (1..=half_len / 2).zip(twiddles.iter()) {
        let mut a = input[k];
        let mut b = input[half_len - k].conj();
        if scaled {
            a = halve(a);
            b = halve(b);
        }

        let even = a + b;
        let odd = (a - b) * twiddle.conj();

        packed[k] = even + odd;
        packed[half_len - k] = (even - odd).conj();
    }
}

/// Forward real FFT of length 8 with a single radix-8 butterfly, writing the 5 non-redundant bins.
pub fn forward_len8<T: FftSample>(
    butterfly8: &Butterfly8<T>,
    input: &[T],
    output: &mut [Complex<T>],
    scaled: bool,
) {
    let mut values: [Complex<T>; 8] = core::array::from_fn(|i| {
        let value = Complex::new(input[i], T::zero());
        if scaled && T::FIXED_POINT {
            Complex::new(value.re.div_radix(8), value.im)
        } else {
            value
        }
    });

    butterfly8.perform(&mut values);

    for (out, value) in output.iter_mut().zip(values.iter()) {
        *out = *value;
    }
    if scaled && !T::FIXED_POINT {
        super::stage::normalize(output, 8);
    }
}

/// Inverse of [`forward_len8`]. The missing bins are rebuilt from conjugate symmetry.
pub fn inverse_len8<T: FftSample>(
    butterfly8: &Butterfly8<T>,
    input: &[Complex<T>],
    output: &mut [T],
    scaled: bool,
) {
    let mut values: [Complex<T>; 8] = core::array::from_fn(|k| match k {
        0 | 4 => Complex::new(input[k].re, T::zero()),
        1..=3 => input[k],
        _ => input[8 - k].conj(),
    });
    if scaled && T::FIXED_POINT {
        for value in values.iter_mut() {
            *value = Complex::new(value.re.div_radix(8), value.im.div_radix(8));
        }
    }

    butterfly8.perform(&mut values);

    let factor = T::from_f64(0.125);
    for (out, value) in output.iter_mut().zip(values.iter()) {
        *out = if scaled && !T::FIXED_POINT {
            value.re * factor
        } else {
            value.re
        };
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::test_utils::{compare_vectors, dft, dft_f64, random_real_signal, to_f64_vec};
    use crate::twiddles::real_super_twiddles;
    use crate::{FftDirection, Q15, Q31};

    fn packed_spectrum(signal: &[f32]) -> Vec<Complex<f32>> {
        let packed: Vec<Complex<f32>> = signal
            .chunks_exact(2)
            .map(|pair| Complex::new(pair[0], pair[1]))
            .collect();
        dft(&packed, FftDirection::Forward)
    }

    fn real_spectrum(signal: &[f32]) -> Vec<Complex<f32>> {
        let complex: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        let mut spectrum = dft(&complex, FftDirection::Forward);
        spectrum.truncate(signal.len() / 2 + 1);
        spectrum
    }

    #[test]
    fn test_split_forward() {
        for &len in &[2, 4, 6, 10, 16, 30] {
            let signal = random_real_signal(len);
            let twiddles = real_super_twiddles::<f32>(len / 2).unwrap();

            let mut buffer = packed_spectrum(&signal);
            buffer.push(Complex::new(0.0, 0.0));
            split_forward(&mut buffer, &twiddles, false);

            assert!(compare_vectors(&buffer, &real_spectrum(&signal)), "len = {}", len);
        }
    }

    // A full scale square wave puts about 2/pi in bin 1. Twice that doesn't fit in fixed point.
    fn check_split_forward_full_scale<T: FftSample>(tolerance: f64) {
        for &len in &[16, 64, 256] {
            let half_len = len / 2;
            let signal: Vec<f64> = (0..len)
                .map(|j| {
                    let phase = 2.0 * std::f64::consts::PI * j as f64 / len as f64;
                    if phase.cos() >= 0.0 {
                        0.99
                    } else {
                        -0.99
                    }
                })
                .collect();

            // what a scaled half length transform leaves in the buffer
            let packed: Vec<Complex<f64>> = signal
                .chunks_exact(2)
                .map(|pair| Complex::new(pair[0], pair[1]))
                .collect();
            let mut buffer: Vec<Complex<T>> = dft_f64(&packed, FftDirection::Forward)
                .iter()
                .map(|z| z / half_len as f64)
                .map(|z| Complex::new(T::from_f64(z.re), T::from_f64(z.im)))
                .collect();
            buffer.push(Complex::new(T::zero(), T::zero()));

            let twiddles = real_super_twiddles::<T>(half_len).unwrap();
            split_forward(&mut buffer, &twiddles, true);

            let complex: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
            let expected = dft_f64(&complex, FftDirection::Forward);
            for (k, actual) in to_f64_vec(&buffer).iter().enumerate() {
                let expected = expected[k] / len as f64;
                assert!(
                    (actual - expected).norm() < tolerance,
                    "len = {}, bin {}: {} != {}",
                    len,
                    k,
                    actual,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_split_forward_full_scale() {
        check_split_forward_full_scale::<Q15>(1e-3);
        check_split_forward_full_scale::<Q31>(1e-6);
    }

    #[test]
    fn test_split_inverse() {
        for &len in &[2, 4, 6, 10, 16, 30] {
            let half_len = len / 2;
            let signal = random_real_signal(len);
            let twiddles = real_super_twiddles::<f32>(half_len).unwrap();
            let spectrum = real_spectrum(&signal);

            // unscaled packing yields twice the packed spectrum
            let expected = packed_spectrum(&signal);
            for (scaled, factor) in [(false, 2.0), (true, 1.0)] {
                let mut packed = vec![Complex::new(0.0, 0.0); half_len];
                split_inverse(&spectrum, &mut packed, &twiddles, scaled);

                let expected: Vec<Complex<f32>> = expected.iter().map(|z| *z * factor).collect();
                assert!(compare_vectors(&packed, &expected), "len = {}", len);
            }
        }
    }

    #[test]
    fn test_len8() {
        let forward = Butterfly8::new(FftDirection::Forward);
        let inverse = Butterfly8::new(FftDirection::Inverse);

        let signal = random_real_signal(8);
        let mut spectrum = vec![Complex::new(0.0f32, 0.0); 5];
        forward_len8(&forward, &signal, &mut spectrum, false);
        assert!(compare_vectors(&spectrum, &real_spectrum(&signal)));

        let mut output = vec![0.0f32; 8];
        inverse_len8(&inverse, &spectrum, &mut output, true);
        let output: Vec<Complex<f32>> = output.iter().map(|&x| Complex::new(x, 0.0)).collect();
        let signal: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        assert!(compare_vectors(&output, &signal));
    }
}
