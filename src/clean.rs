//! Iterative extraction of the strongest sinusoids (CLEAN)
//!
//! Locate the highest peak of the least-squares spectrum, subtract that
//! sinusoid from the time series, repeat. Subtraction happens in the time
//! domain, so every iteration fits the residual of the previous ones and
//! overlapping peaks untangle without renormalizing the spectrum.

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::fourier::{self, SweepError, PI2_MICRO};

/// One extracted sinusoid, in order of removal.
#[derive(Debug, Clone, Copy)]
pub struct CleanComponent {
    /// Cyclic frequency in microhertz
    pub freq: f64,
    /// Power at the refined peak
    pub power: f64,
    /// Sine amplitude
    pub alpha: f64,
    /// Cosine amplitude
    pub beta: f64,
}

#[derive(Debug, Snafu)]
pub enum CleanError {
    #[snafu(display("peak search failed in CLEAN iteration {iteration}"))]
    PeakSearch {
        iteration: usize,
        source: SweepError,
    },
}

/// Remove the `iterations` strongest sinusoids from `flux` in place.
///
/// Each iteration scans the full grid, refines the peak below the grid step
/// and subtracts `alpha*sin(omega*t) + beta*cos(omega*t)` from the working
/// series. `flux` holds the residual afterwards; any mean the caller
/// subtracted beforehand is the caller's to restore.
pub fn clean(
    time: &[f64],
    flux: &mut [f64],
    weight: Option<&[f64]>,
    freq: &[f64],
    iterations: usize,
) -> Result<Vec<CleanComponent>, CleanError> {
    let mut components = Vec::with_capacity(iterations);

    for iteration in 0..iterations {
        let peak = fourier::fourier_max(time, flux, weight, freq)
            .context(PeakSearchSnafu { iteration })?;

        debug!(
            iteration,
            freq = peak.freq,
            power = peak.power,
            alpha = peak.alpha,
            beta = peak.beta,
            "subtracting component"
        );

        // The next iteration sees the residual.
        let omega = peak.freq * PI2_MICRO;
        for (f, &t) in flux.iter_mut().zip(time) {
            let (sn, cn) = (omega * t).sin_cos();
            *f -= peak.alpha * sn + peak.beta * cn;
        }

        components.push(CleanComponent {
            freq: peak.freq,
            power: peak.power,
            alpha: peak.alpha,
            beta: peak.beta,
        });
    }

    Ok(components)
}
