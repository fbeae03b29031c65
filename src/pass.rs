//! Band, low and high-pass filtering by Fourier synthesis
//!
//! Rebuilds a time series from the least-squares coefficients of a
//! frequency sub-band. The amplitude response is normalized by the summed
//! spectral window at the band center, so a pure sinusoid inside the band
//! passes with unit gain.

use rayon::prelude::*;
use snafu::{ensure, ResultExt, Snafu};
use tracing::debug;

use crate::arr;
use crate::fourier::{self, SweepError, PI2_MICRO};
use crate::window;

#[derive(Debug, Snafu)]
pub enum FilterError {
    #[snafu(display("window normalization failed"))]
    WindowSum { source: SweepError },

    #[snafu(display("coefficient sweep over the band failed"))]
    BandSweep { source: SweepError },

    #[snafu(display("result array has length {got}, expected {expected}"))]
    ResultLength { expected: usize, got: usize },
}

/// Band-pass `flux` to `[f1, f2]` (microhertz), writing the filtered series
/// to `result`.
///
/// `low`, `high`, `rate` describe the full sampling grid: the window
/// normalization integrates over that grid while the coefficient sweep and
/// synthesis run on the band alone. The mean is removed before the sweep
/// and restored in the result, so the filtered series keeps the DC level of
/// the input; `flux` itself is left untouched.
pub fn bandpass(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    f1: f64,
    f2: f64,
    low: f64,
    high: f64,
    rate: f64,
    result: &mut [f64],
) -> Result<(), FilterError> {
    ensure!(
        result.len() == time.len(),
        ResultLengthSnafu {
            expected: time.len(),
            got: result.len(),
        }
    );

    // Window normalization at the band center.
    let fwin = (f1 + f2) / 2.0;
    let sumwin =
        window::windowsum(fwin, low, high, rate, time, weight).context(WindowSumSnafu)?;
    debug!(fwin, sumwin, "window normalization");

    // Band grid.
    let m = arr::getstep(f1, f2, rate);
    let mut freq = vec![0.0; m];
    arr::linspace(&mut freq, f1, rate);

    // Coefficients of the mean-subtracted series over the band.
    let mean = arr::mean(flux);
    let mut detrended = flux.to_vec();
    arr::sca_add(&mut detrended, -mean);

    let mut power = vec![0.0; m];
    let mut alpha = vec![0.0; m];
    let mut beta = vec![0.0; m];
    fourier::fourier_coeffs(
        time,
        &detrended,
        weight,
        &freq,
        &mut power,
        &mut alpha,
        &mut beta,
    )
    .context(BandSweepSnafu)?;

    // Inverse synthesis, parallel over samples.
    result
        .par_iter_mut()
        .zip(time.par_iter())
        .for_each(|(r, &t)| {
            let mut sumfilt = 0.0;
            for j in 0..m {
                let (sn, cn) = (freq[j] * PI2_MICRO * t).sin_cos();
                sumfilt += alpha[j] * sn + beta[j] * cn;
            }
            *r = sumfilt / sumwin + mean;
        });

    Ok(())
}

/// Low-pass with cutoff `fhigh`: a band-pass whose band starts one grid
/// step above zero, where the normal equations are singular.
pub fn lowpass(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    fhigh: f64,
    low: f64,
    high: f64,
    rate: f64,
    result: &mut [f64],
) -> Result<(), FilterError> {
    bandpass(time, flux, weight, rate, fhigh, low, high, rate, result)
}

/// High-pass with cutoff `flow`: the complement of the low-pass.
pub fn highpass(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    flow: f64,
    low: f64,
    high: f64,
    rate: f64,
    result: &mut [f64],
) -> Result<(), FilterError> {
    lowpass(time, flux, weight, flow, low, high, rate, result)?;
    for (r, &f) in result.iter_mut().zip(flux) {
        *r = f - *r;
    }
    Ok(())
}
