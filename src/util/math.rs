use crate::util::MathError;
use num::Num;
use num_traits::NumCast;
use rustfft::num_complex::Complex as FFTComplex;
use rustfft::num_traits::Zero;
use rustfft::FFTplanner;

/// Circular autocorrelation of a real-valued sequence.
///
/// Computed through the frequency domain: forward FFT, power spectrum,
/// inverse FFT, and a 1/N rescale to undo the unnormalized transforms.
/// Lag k of the result is `sum_j x[j] * x[(j + k) mod N]`. For a
/// bipolar maximum-length sequence this is 2^n - 1 at zero lag and -1
/// everywhere else, which is the property that makes MLS stimuli useful
/// for impulse-response measurement.
///
/// # Arguments
///
/// * `input` - Real-valued samples; any numeric type castable to `f64`.
pub fn circular_autocorrelation<T>(
    input: &[T],
) -> Result<Vec<f64>, MathError>
where
    T: Clone + Num + NumCast,
{
    if input.is_empty() {
        return Err(MathError::EmptyBufferError);
    }
    let len = input.len();
    let mut time: Vec<FFTComplex<f64>> = Vec::with_capacity(len);
    for samp in input {
        let re = samp.to_f64().ok_or(MathError::ConvertError)?;
        time.push(FFTComplex::new(re, 0.0));
    }

    let mut freq: Vec<FFTComplex<f64>> = vec![FFTComplex::zero(); len];
    let mut planner = FFTplanner::new(false);
    planner.plan_fft(len).process(&mut time[..], &mut freq[..]);

    let mut power: Vec<FFTComplex<f64>> =
        freq.iter().map(|x| *x * x.conj()).collect();
    let mut out: Vec<FFTComplex<f64>> = vec![FFTComplex::zero(); len];
    let mut planner = FFTplanner::new(true);
    planner.plan_fft(len).process(&mut power[..], &mut out[..]);

    Ok(out.iter().map(|x| x.re / len as f64).collect())
}
