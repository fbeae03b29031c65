//! Spectral window of a sampling pattern
//!
//! The window function characterizes leakage and aliasing: it is the power
//! spectrum obtained when pure sine and cosine tones at a reference
//! frequency are sampled at the observed times and fitted like data. Both
//! reference signals are synthesized once and pushed through a
//! four-coefficient solver that shares the `cc`, `sc`, `ss` sums between
//! the two fits, so the cost per grid point stays one sin/cos pair per
//! sample.

use rayon::prelude::*;
use snafu::ensure;

use crate::arr;
use crate::fourier::{LengthMismatchSnafu, SweepError, PI2_MICRO};

// Fits both reference signals at `omega` in one pass over the series.
// Returns [alpha_sin, beta_sin, alpha_cos, beta_cos].
fn window_alpbet(time: &[f64], datsin: &[f64], datcos: &[f64], omega: f64) -> [f64; 4] {
    let mut ssin = 0.0;
    let mut csin = 0.0;
    let mut scos = 0.0;
    let mut ccos = 0.0;
    let mut cc = 0.0;
    let mut sc = 0.0;

    for i in 0..time.len() {
        let (sn, cn) = (omega * time[i]).sin_cos();
        ssin += datsin[i] * sn;
        csin += datsin[i] * cn;
        scos += datcos[i] * sn;
        ccos += datcos[i] * cn;
        cc += cn * cn;
        sc += sn * cn;
    }

    let ss = time.len() as f64 - cc;
    let d = ss * cc - sc * sc;
    [
        (ssin * cc - csin * sc) / d,
        (csin * ss - ssin * sc) / d,
        (scos * cc - ccos * sc) / d,
        (ccos * ss - scos * sc) / d,
    ]
}

fn window_alpbet_weighted(
    time: &[f64],
    datsin: &[f64],
    datcos: &[f64],
    weight: &[f64],
    omega: f64,
    wsum: f64,
) -> [f64; 4] {
    let mut ssin = 0.0;
    let mut csin = 0.0;
    let mut scos = 0.0;
    let mut ccos = 0.0;
    let mut cc = 0.0;
    let mut sc = 0.0;

    for i in 0..time.len() {
        let (sn, cn) = (omega * time[i]).sin_cos();
        let w = weight[i];
        ssin += w * datsin[i] * sn;
        csin += w * datsin[i] * cn;
        scos += w * datcos[i] * sn;
        ccos += w * datcos[i] * cn;
        cc += w * cn * cn;
        sc += w * sn * cn;
    }

    let ss = wsum - cc;
    let d = ss * cc - sc * sc;
    [
        (ssin * cc - csin * sc) / d,
        (csin * ss - ssin * sc) / d,
        (scos * cc - ccos * sc) / d,
        (ccos * ss - scos * sc) / d,
    ]
}

/// Power of the window function centered at `f0` (microhertz), evaluated on
/// the grid `freq` into `window`.
///
/// `window[i] = (P_sin(freq[i]) + P_cos(freq[i])) / 2` for the two
/// reference tones at `f0` sampled at the observed times. Parallel and
/// weighted treatment mirrors the power-spectrum sweep.
pub fn windowfunction(
    time: &[f64],
    weight: Option<&[f64]>,
    freq: &[f64],
    f0: f64,
    window: &mut [f64],
) -> Result<(), SweepError> {
    ensure!(
        window.len() == freq.len(),
        LengthMismatchSnafu {
            what: "window",
            expected: freq.len(),
            got: window.len(),
        }
    );
    if let Some(w) = weight {
        ensure!(
            w.len() == time.len(),
            LengthMismatchSnafu {
                what: "weight",
                expected: time.len(),
                got: w.len(),
            }
        );
    }

    // Reference tones sampled at the observed times, built once.
    let omega0 = f0 * PI2_MICRO;
    let datsin: Vec<f64> = time.iter().map(|&t| (omega0 * t).sin()).collect();
    let datcos: Vec<f64> = time.iter().map(|&t| (omega0 * t).cos()).collect();
    let wsum = weight.map(arr::sum);

    window
        .par_iter_mut()
        .zip(freq.par_iter())
        .for_each(|(win, &nu)| {
            let omega = nu * PI2_MICRO;
            let [asin, bsin, acos, bcos] = match (weight, wsum) {
                (Some(w), Some(ws)) => {
                    window_alpbet_weighted(time, &datsin, &datcos, w, omega, ws)
                }
                _ => window_alpbet(time, &datsin, &datcos, omega),
            };
            *win = 0.5 * ((asin * asin + bsin * bsin) + (acos * acos + bcos * bcos));
        });
    Ok(())
}

/// Sum of the window centered at `f0` over a fresh grid of
/// `getstep(low, high, rate)` points starting at `low`.
///
/// Owns its grid and window scratch for the duration of the call; the
/// pass-band filters use the result to normalize their amplitude response.
pub fn windowsum(
    f0: f64,
    low: f64,
    high: f64,
    rate: f64,
    time: &[f64],
    weight: Option<&[f64]>,
) -> Result<f64, SweepError> {
    let m = arr::getstep(low, high, rate);
    let mut freq = vec![0.0; m];
    arr::linspace(&mut freq, low, rate);
    let mut window = vec![0.0; m];
    windowfunction(time, weight, &freq, f0, &mut window)?;
    Ok(arr::sum(&window))
}
