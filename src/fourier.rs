//! Least-squares Fourier transform of unevenly sampled time series
//!
//! Fits `alpha*sin(omega*t) + beta*cos(omega*t)` at each test frequency by
//! the closed-form solution of the normal equations and reports the power
//! `alpha^2 + beta^2`. The sweep over the frequency grid is data-parallel;
//! the peak finder reduces per-worker maxima and refines the winning bin
//! with a golden-section search.
//!
//! **Coefficient formulas** (per angular frequency `omega`):
//!
//! ```text
//! s  = sum f_i sin(omega t_i)        cc = sum cos^2(omega t_i)
//! c  = sum f_i cos(omega t_i)        sc = sum sin(omega t_i) cos(omega t_i)
//! ss = wsum - cc                     d  = ss*cc - sc^2
//! alpha = (s*cc - c*sc) / d          beta = (c*ss - s*sc) / d
//! ```
//!
//! `ss` comes from `cc` through `sin^2 + cos^2 = 1`, so the loop costs one
//! sin/cos pair per sample. This is the inner loop of every other module.

use rayon::prelude::*;
use snafu::{ensure, ResultExt, Snafu};
use tracing::debug;

use crate::arr;
use crate::minimize::{golden_min, MinimizeError};

/// Conversion from cyclic frequency in microhertz to angular frequency in
/// radians per second: `2 * pi * 1e-6`.
pub const PI2_MICRO: f64 = 6.283185307179586476925286766559e-6;

/// Bracket tolerance of the sub-grid peak refinement, in rad/s.
const REFINE_EPS: f64 = 1e-9;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SweepError {
    /// Input and output arrays must agree with the series and grid lengths
    #[snafu(display("{what} array has length {got}, expected {expected}"))]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// The refinement bracket spans one grid step on each side
    #[snafu(display("frequency grid has {got} points, the peak search needs at least 2"))]
    GridTooShort { got: usize },

    /// The golden-section refinement did not converge
    #[snafu(display("refinement of the spectral peak failed"))]
    Refine { source: MinimizeError },
}

/// Location and coefficients of the strongest peak in a power spectrum.
#[derive(Debug, Clone, Copy)]
pub struct Peak {
    /// Cyclic frequency of the refined maximum, in microhertz
    pub freq: f64,
    /// Power at the refined maximum
    pub power: f64,
    /// Sine amplitude at the refined maximum
    pub alpha: f64,
    /// Cosine amplitude at the refined maximum
    pub beta: f64,
}

/// Least-squares sine and cosine amplitudes of `flux` at angular frequency
/// `omega`.
///
/// Degenerate sampling at `omega` (for instance `omega == 0`) makes the
/// determinant vanish and the result non-finite; callers see that in the
/// power and move on. Physically sensible inputs do not hit this.
pub fn alpbet(time: &[f64], flux: &[f64], omega: f64) -> (f64, f64) {
    let mut s = 0.0;
    let mut c = 0.0;
    let mut cc = 0.0;
    let mut sc = 0.0;

    for (&t, &f) in time.iter().zip(flux) {
        let (sn, cn) = (omega * t).sin_cos();
        s += f * sn;
        c += f * cn;
        cc += cn * cn;
        sc += sn * cn;
    }

    let ss = time.len() as f64 - cc;
    let d = ss * cc - sc * sc;
    ((s * cc - c * sc) / d, (c * ss - s * sc) / d)
}

/// Weighted form of [`alpbet`]: every sum carries the statistical weight of
/// its sample and `ss = wsum - cc`. The weight sum is passed in because the
/// sweep computes it once for the whole grid.
pub fn alpbet_weighted(
    time: &[f64],
    flux: &[f64],
    weight: &[f64],
    omega: f64,
    wsum: f64,
) -> (f64, f64) {
    let mut s = 0.0;
    let mut c = 0.0;
    let mut cc = 0.0;
    let mut sc = 0.0;

    for i in 0..time.len() {
        let (sn, cn) = (omega * time[i]).sin_cos();
        let w = weight[i];
        s += w * flux[i] * sn;
        c += w * flux[i] * cn;
        cc += w * cn * cn;
        sc += w * sn * cn;
    }

    let ss = wsum - cc;
    let d = ss * cc - sc * sc;
    ((s * cc - c * sc) / d, (c * ss - s * sc) / d)
}

// Validates series lengths and returns the weight sum so the parallel
// region never recomputes it.
fn check_series(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
) -> Result<f64, SweepError> {
    ensure!(
        flux.len() == time.len(),
        LengthMismatchSnafu {
            what: "flux",
            expected: time.len(),
            got: flux.len(),
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
        Ok(arr::sum(w))
    } else {
        Ok(time.len() as f64)
    }
}

// The weighted and unweighted paths differ only in the accumulation terms;
// the sweep, the peak finder and the filters all go through this closure.
fn make_solver<'a>(
    time: &'a [f64],
    flux: &'a [f64],
    weight: Option<&'a [f64]>,
    wsum: f64,
) -> impl Fn(f64) -> (f64, f64) + Sync + 'a {
    move |omega| match weight {
        Some(w) => alpbet_weighted(time, flux, w, omega, wsum),
        None => alpbet(time, flux, omega),
    }
}

/// Power spectrum of the series on the cyclic frequency grid `freq`
/// (microhertz), one output slot per grid point.
///
/// Parallel across the grid; every slot is written by exactly one worker
/// and depends only on the inputs and its own frequency, so the output is
/// deterministic.
pub fn fourier(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    freq: &[f64],
    power: &mut [f64],
) -> Result<(), SweepError> {
    let wsum = check_series(time, flux, weight)?;
    ensure!(
        power.len() == freq.len(),
        LengthMismatchSnafu {
            what: "power",
            expected: freq.len(),
            got: power.len(),
        }
    );

    let solve = make_solver(time, flux, weight, wsum);
    power
        .par_iter_mut()
        .zip(freq.par_iter())
        .for_each(|(p, &nu)| {
            let (a, b) = solve(nu * PI2_MICRO);
            *p = a * a + b * b;
        });
    Ok(())
}

/// Like [`fourier`], but also stores the sine and cosine amplitudes per
/// grid point. The filter synthesis feeds on these.
pub fn fourier_coeffs(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    freq: &[f64],
    power: &mut [f64],
    alpha: &mut [f64],
    beta: &mut [f64],
) -> Result<(), SweepError> {
    let wsum = check_series(time, flux, weight)?;
    for (what, len) in [("power", power.len()), ("alpha", alpha.len()), ("beta", beta.len())] {
        ensure!(
            len == freq.len(),
            LengthMismatchSnafu {
                what,
                expected: freq.len(),
                got: len,
            }
        );
    }

    let solve = make_solver(time, flux, weight, wsum);
    power
        .par_iter_mut()
        .zip(alpha.par_iter_mut())
        .zip(beta.par_iter_mut())
        .zip(freq.par_iter())
        .for_each(|(((p, a), b), &nu)| {
            let (al, be) = solve(nu * PI2_MICRO);
            *p = al * al + be * be;
            *a = al;
            *b = be;
        });
    Ok(())
}

/// Global maximum of the power spectrum on `freq`, refined below the grid
/// step.
///
/// Workers keep local maxima over their chunk of the grid and merge them in
/// an ordered reduction; ties go to the lower grid index, which has no
/// user-visible effect because the golden-section refinement re-enters from
/// the same bracket. The bracket spans one grid step on each side of the
/// winning bin, so the grid should be wider than the region of interest.
pub fn fourier_max(
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    freq: &[f64],
) -> Result<Peak, SweepError> {
    ensure!(freq.len() >= 2, GridTooShortSnafu { got: freq.len() });
    let wsum = check_series(time, flux, weight)?;
    let solve = make_solver(time, flux, weight, wsum);

    let (_, omega_max) = freq
        .par_iter()
        .map(|&nu| {
            let omega = nu * PI2_MICRO;
            let (a, b) = solve(omega);
            (a * a + b * b, omega)
        })
        .reduce(
            || (f64::NEG_INFINITY, 0.0),
            |best, cand| if cand.0 > best.0 { cand } else { best },
        );

    // Refine within one grid step on each side of the winning bin.
    let domega = PI2_MICRO * (freq[1] - freq[0]);
    let (omega_refined, _) = golden_min(
        |omega| {
            let (a, b) = solve(omega);
            -(a * a + b * b)
        },
        omega_max - domega,
        omega_max + domega,
        REFINE_EPS,
    )
    .context(RefineSnafu)?;

    let (alpha, beta) = solve(omega_refined);
    debug!(
        coarse = omega_max / PI2_MICRO,
        refined = omega_refined / PI2_MICRO,
        "peak refined"
    );

    Ok(Peak {
        freq: omega_refined / PI2_MICRO,
        power: alpha * alpha + beta * beta,
        alpha,
        beta,
    })
}
