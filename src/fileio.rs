//! Reading and writing of column-oriented series files
//!
//! Whitespace-separated ASCII, two columns (`time flux`) or three when a
//! per-point weight is carried. Values are written in the fixed-width
//! exponent format of the existing datasets (`1.234567890e+03`), which
//! differs from Rust's default `{:e}` rendering.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use snafu::{ensure, ResultExt, Snafu};

use crate::clean::CleanComponent;

/// Time unit of an input file; the core always works in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Days,
    Megaseconds,
}

impl TimeUnit {
    /// Scale factor from this unit to seconds.
    pub fn to_seconds(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Days => 86400.0,
            TimeUnit::Megaseconds => 1e6,
        }
    }

    /// Human-readable name used in the console narrative.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Days => "days",
            TimeUnit::Megaseconds => "megaseconds",
        }
    }
}

#[derive(Debug, Snafu)]
pub enum FileError {
    #[snafu(display("could not open file: {}", path.display()))]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("could not write file: {}", path.display()))]
    WriteData {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{}: found {n} usable samples, need at least 2", path.display()))]
    TooShort { path: PathBuf, n: usize },

    #[snafu(display("{}: weight {value} on line {line}; weights must be finite and non-negative", path.display()))]
    BadWeight {
        path: PathBuf,
        line: usize,
        value: f64,
    },

    #[snafu(display("{}: weights sum to zero", path.display()))]
    ZeroWeights { path: PathBuf },
}

/// A time series as read from disk, times already converted to seconds.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    /// Per-point statistical weights; empty unless the file carries them
    pub weight: Vec<f64>,
}

impl TimeSeries {
    /// The weight column, if one was read.
    pub fn weights(&self) -> Option<&[f64]> {
        if self.weight.is_empty() {
            None
        } else {
            Some(&self.weight)
        }
    }
}

/// Read two or three columns from `path`, converting times to seconds.
///
/// Reading stops at the first line that does not hold the expected number
/// of floats; a trailing newline is optional. With `use_weight` the third
/// column is validated at this boundary: finite, non-negative, positive
/// sum.
pub fn read_series(path: &Path, use_weight: bool, unit: TimeUnit) -> Result<TimeSeries, FileError> {
    let text = fs::read_to_string(path).context(OpenSnafu { path })?;
    let scale = unit.to_seconds();
    let mut series = TimeSeries::default();

    for (lineno, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace().map(str::parse::<f64>);
        let (t, f) = match (fields.next(), fields.next()) {
            (Some(Ok(t)), Some(Ok(f))) => (t, f),
            _ => break,
        };
        if use_weight {
            let w = match fields.next() {
                Some(Ok(w)) => w,
                _ => break,
            };
            ensure!(
                w.is_finite() && w >= 0.0,
                BadWeightSnafu {
                    path,
                    line: lineno + 1,
                    value: w,
                }
            );
            series.weight.push(w);
        }
        series.time.push(t * scale);
        series.flux.push(f);
    }

    ensure!(
        series.time.len() >= 2,
        TooShortSnafu {
            path,
            n: series.time.len(),
        }
    );
    if use_weight {
        ensure!(series.weight.iter().sum::<f64>() > 0.0, ZeroWeightsSnafu { path });
    }
    Ok(series)
}

// C-style `%*.*e`: fixed decimals, lowercase `e`, signed two-digit exponent,
// right-aligned in `width`.
fn format_exp(x: f64, width: usize, precision: usize) -> String {
    if !x.is_finite() {
        return format!("{x:>width$}");
    }
    let plain = format!("{x:.precision$e}");
    let (mantissa, exp) = match plain.split_once('e') {
        Some(pair) => pair,
        None => (plain.as_str(), "0"),
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    format!("{:>width$}", format!("{mantissa}e{exp:+03}"))
}

/// Write a spectrum or window function: `%15.9e %18.9e` per line.
pub fn write_spectrum(path: &Path, freq: &[f64], power: &[f64]) -> Result<(), FileError> {
    let file = fs::File::create(path).context(OpenSnafu { path })?;
    let mut out = BufWriter::new(file);
    for (&x, &y) in freq.iter().zip(power) {
        writeln!(out, "{} {}", format_exp(x, 15, 9), format_exp(y, 18, 9))
            .context(WriteDataSnafu { path })?;
    }
    out.flush().context(WriteDataSnafu { path })
}

/// Write a time series, converting times back to `unit`; three columns when
/// a weight column is carried, preserving the original weights.
pub fn write_series(
    path: &Path,
    time: &[f64],
    flux: &[f64],
    weight: Option<&[f64]>,
    unit: TimeUnit,
) -> Result<(), FileError> {
    let file = fs::File::create(path).context(OpenSnafu { path })?;
    let mut out = BufWriter::new(file);
    let scale = unit.to_seconds();
    for i in 0..time.len() {
        let t = format_exp(time[i] / scale, 15, 9);
        let f = format_exp(flux[i], 18, 9);
        match weight {
            Some(w) => writeln!(out, "{t} {f} {}", format_exp(w[i], 18, 9)),
            None => writeln!(out, "{t} {f}"),
        }
        .context(WriteDataSnafu { path })?;
    }
    out.flush().context(WriteDataSnafu { path })
}

/// Write the CLEAN component table: a header block, then one
/// `%6d %15.6f %12.6f %12.6f %12.6f` row per extracted sinusoid.
pub fn write_cleanlog(path: &Path, components: &[CleanComponent]) -> Result<(), FileError> {
    let file = fs::File::create(path).context(OpenSnafu { path })?;
    let mut out = BufWriter::new(file);
    writeln!(out, "# Sinusoids extracted by CLEAN, strongest residual first")
        .context(WriteDataSnafu { path })?;
    writeln!(out, "# iterations = {}", components.len()).context(WriteDataSnafu { path })?;
    writeln!(out, "#  iter  freq (microHz)        power        alpha         beta")
        .context(WriteDataSnafu { path })?;
    for (i, comp) in components.iter().enumerate() {
        writeln!(
            out,
            "{:6} {:15.6} {:12.6} {:12.6} {:12.6}",
            i + 1,
            comp.freq,
            comp.power,
            comp.alpha,
            comp.beta
        )
        .context(WriteDataSnafu { path })?;
    }
    out.flush().context(WriteDataSnafu { path })
}
