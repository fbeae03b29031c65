//! Least-squares time series analysis for unevenly sampled data
//!
//! Computes power spectra, spectral windows, CLEAN sinusoid extraction and
//! Fourier-synthesis filters for photometric time series with arbitrary
//! sampling. There is no FFT here: the sampling is irregular, so every test
//! frequency is fitted directly by the closed-form least-squares solution
//! for a sine and cosine amplitude pair.
//!
//! **Conventions**: times in seconds, cyclic frequencies in microhertz.
//! The angular frequency of a grid point is `freq * PI2_MICRO`.
//!
//! **Module organization**:
//! - `arr` - array primitives (grids, mean, median)
//! - `fourier` - coefficient solver, parallel sweep, peak finder
//! - `window` - spectral window of a sampling pattern
//! - `clean` - iterative extraction of the strongest sinusoids
//! - `pass` - band/low/high-pass filtering by inverse synthesis
//! - `minimize` - golden-section search used for sub-grid peak refinement
//! - `fileio`, `cli` - column files and the shared driver surface

pub mod arr;
pub mod clean;
pub mod cli;
pub mod fileio;
pub mod fourier;
pub mod minimize;
pub mod pass;
pub mod tracing_init;
pub mod window;

pub use clean::{clean, CleanComponent};
pub use fourier::{alpbet, alpbet_weighted, fourier_coeffs, fourier_max, Peak, PI2_MICRO};
pub use minimize::golden_min;
pub use pass::{bandpass, highpass, lowpass};
pub use window::{windowfunction, windowsum};
