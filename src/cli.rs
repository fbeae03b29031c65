//! Shared command-line surface of the driver binaries
//!
//! All three tools take the same sampling, unit and preprocessing options;
//! the binaries add their mode flags on top. Parsing is strict: argument
//! errors print usage to stderr and the process exits with status 1. The
//! console narrative (progress lines, Nyquist info) also lives here so the
//! tools report identically.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser};
use snafu::{ensure, Snafu};

use crate::arr;
use crate::fileio::{self, FileError, TimeSeries, TimeUnit};

/// Time unit accepted on the command line; `-tsec`, `-tday` and `-tms` all
/// parse as the short option with an attached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitArg {
    /// Seconds
    Sec,
    /// Days
    Day,
    /// Megaseconds
    Ms,
}

// An unknown unit warns and falls back to seconds instead of failing.
fn parse_unit(text: &str) -> Result<UnitArg, std::convert::Infallible> {
    Ok(match text {
        "sec" => UnitArg::Sec,
        "day" => UnitArg::Day,
        "ms" => UnitArg::Ms,
        _ => {
            eprintln!("Error: Wrong unit. Assuming seconds.");
            UnitArg::Sec
        }
    })
}

impl From<UnitArg> for TimeUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Sec => TimeUnit::Seconds,
            UnitArg::Day => TimeUnit::Days,
            UnitArg::Ms => TimeUnit::Megaseconds,
        }
    }
}

/// Frequency sampling request, in microhertz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampling {
    /// 5 microhertz up to the Nyquist frequency, four-times oversampled
    Auto,
    Manual { low: f64, high: f64, rate: f64 },
}

/// Sampling resolved against the data.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub low: f64,
    pub high: f64,
    pub rate: f64,
    /// Whether the bounds came from automatic sampling
    pub auto: bool,
}

#[derive(Debug, Snafu)]
pub enum ArgsError {
    #[snafu(display("no or wrong sampling provided"))]
    BadSampling,

    #[snafu(display("sampling rate must be positive and below the frequency range"))]
    BadRate,

    #[snafu(display("expected exactly one input and one output file"))]
    BadFiles,

    #[snafu(display("cannot autosample in fast mode"))]
    AutoInFastMode,

    #[snafu(display("cannot autosample in window mode"))]
    AutoInWindowMode,

    #[snafu(display("unknown filter chosen"))]
    BadFilter,
}

/// Options shared by `powerspec`, `fclean` and `filter`.
#[derive(Debug, Args)]
pub struct CommonOpts {
    /// Quiet mode: no progress output on the console
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Weighted analysis; the input must carry a third column of weights
    #[arg(short = 'w')]
    pub weights: bool,

    /// Unit of the time column (sec, day or ms), converted to seconds on
    /// input
    #[arg(short = 't', value_parser = parse_unit, default_value = "sec")]
    pub unit: UnitArg,

    /// Do not subtract the mean (for artificial data where the mean is 0)
    #[arg(long)]
    pub noprep: bool,

    /// Skip the Nyquist calculation for lower runtime; implies quiet
    #[arg(long)]
    pub fast: bool,

    /// Sampling: `auto`, or LOW HIGH RATE in microhertz
    #[arg(short = 'f', num_args = 1..=5, required = true, value_name = "SAMPLING")]
    pub sampling: Vec<String>,

    /// Input file: whitespace-separated time and data columns
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Sampling request and file names extracted from [`CommonOpts`].
#[derive(Debug)]
pub struct ResolvedArgs {
    pub sampling: Sampling,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl CommonOpts {
    /// Effective quiet flag; fast mode goes quiet on its own.
    pub fn effective_quiet(&self) -> bool {
        self.quiet || self.fast
    }

    /// The time unit as the core understands it.
    pub fn time_unit(&self) -> TimeUnit {
        TimeUnit::from(self.unit)
    }

    /// Validate the sampling request and untangle the file names.
    ///
    /// `-f auto input output` makes the greedy value list swallow the
    /// trailing positionals; anything beyond the sampling values is handed
    /// back here before validation.
    pub fn finalize(&mut self) -> Result<ResolvedArgs, ArgsError> {
        let expected = if self.sampling.first().map(String::as_str) == Some("auto") {
            1
        } else {
            3
        };
        ensure!(self.sampling.len() >= expected, BadSamplingSnafu);

        let mut files: Vec<PathBuf> = self
            .sampling
            .split_off(expected)
            .into_iter()
            .map(PathBuf::from)
            .collect();
        if let Some(path) = self.input.take() {
            files.push(path);
        }
        if let Some(path) = self.output.take() {
            files.push(path);
        }
        ensure!(files.len() == 2, BadFilesSnafu);
        let output = files.pop().unwrap_or_default();
        let input = files.pop().unwrap_or_default();

        let sampling = if expected == 1 {
            ensure!(!self.fast, AutoInFastModeSnafu);
            Sampling::Auto
        } else {
            let mut values = [0.0; 3];
            for (value, text) in values.iter_mut().zip(&self.sampling) {
                *value = text.parse().map_err(|_| ArgsError::BadSampling)?;
            }
            let [low, high, rate] = values;
            ensure!(rate > 0.0 && low < high && rate < high - low, BadRateSnafu);
            Sampling::Manual { low, high, rate }
        };

        Ok(ResolvedArgs {
            sampling,
            input,
            output,
        })
    }
}

/// Parse the command line; on error, print usage to stderr and exit 1.
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(opts) => opts,
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    }
}

/// Print an error and its source chain to stderr, then exit 1.
pub fn exit_with(err: &dyn Error) -> ! {
    eprint!("ERROR: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprint!(": {cause}");
        source = cause.source();
    }
    eprintln!();
    process::exit(1);
}

/// Read the input series, narrating like the original tools.
pub fn load_series(opts: &CommonOpts, input: &PathBuf) -> Result<TimeSeries, FileError> {
    let quiet = opts.effective_quiet();
    if !quiet {
        println!(" - Reading input");
    }
    let series = fileio::read_series(input, opts.weights, opts.time_unit())?;
    if !quiet {
        if opts.weights {
            println!(" -- INFO: Using weights");
        }
        println!(" -- INFO: Unit is {}", opts.time_unit().name());
    }
    Ok(series)
}

/// Nyquist frequency and the suggested four-times-oversampled rate, both in
/// microhertz.
pub fn suggest_sampling(series: &TimeSeries) -> (f64, f64) {
    let mut dt = vec![0.0; series.time.len() - 1];
    arr::diff(&series.time, &mut dt);
    let nyquist = 1.0 / (2.0 * arr::median(&dt)) * 1e6;
    let minsamp = 1.0e6 / (4.0 * (series.time[series.time.len() - 1] - series.time[0]));
    (nyquist, minsamp)
}

/// Resolve the sampling request against the data, printing the Nyquist
/// diagnostics unless the tool runs quiet, fast or in window mode.
pub fn resolve_grid(
    opts: &CommonOpts,
    sampling: Sampling,
    series: &TimeSeries,
    window_mode: bool,
) -> Result<Grid, ArgsError> {
    let quiet = opts.effective_quiet();

    if !opts.fast && !window_mode {
        let (nyquist, minsamp) = suggest_sampling(series);
        if !quiet {
            println!(" -- INFO: Length of time series = {}", series.time.len());
            println!(" -- INFO: Nyquist frequency = {nyquist:.2} microHz");
            println!(" -- INFO: Suggested minimum sampling = {minsamp:.3} microHz");
        }
        if sampling == Sampling::Auto {
            return Ok(Grid {
                low: 5.0,
                high: nyquist,
                rate: minsamp,
                auto: true,
            });
        }
    } else if sampling == Sampling::Auto {
        // Neither fast nor window mode computes the Nyquist frequency, so
        // automatic bounds do not exist there.
        ensure!(!opts.fast, AutoInFastModeSnafu);
        return AutoInWindowModeSnafu.fail();
    }

    match sampling {
        Sampling::Manual { low, high, rate } => Ok(Grid {
            low,
            high,
            rate,
            auto: false,
        }),
        Sampling::Auto => BadSamplingSnafu.fail(),
    }
}

/// Materialize the frequency grid of a resolved sampling.
pub fn build_grid(grid: &Grid) -> Vec<f64> {
    let m = arr::getstep(grid.low, grid.high, grid.rate);
    let mut freq = vec![0.0; m];
    arr::linspace(&mut freq, grid.low, grid.rate);
    freq
}

/// Subtract the mean unless `--noprep`; returns the value subtracted.
pub fn prep_mean(flux: &mut [f64], noprep: bool, quiet: bool) -> f64 {
    if noprep {
        if !quiet {
            println!(" - Time series used *without* mean subtraction!");
        }
        0.0
    } else {
        if !quiet {
            println!(" - Subtracting the mean from time series");
        }
        let mean = arr::mean(flux);
        arr::sca_add(flux, -mean);
        mean
    }
}

/// Narrate the sweep bounds the way the original tools do.
pub fn print_sampling_info(grid: &Grid, points: usize) {
    if grid.auto {
        println!(" -- NB: Using automatic sampling!");
        println!(
            " -- INFO: Auto-sampling (in microHz): {:.2} to {:.2} in steps of {:.4}",
            grid.low, grid.high, grid.rate
        );
    } else {
        println!(
            " -- INFO: Sampling (in microHz): {:.2} to {:.2} in steps of {:.4}",
            grid.low, grid.high, grid.rate
        );
    }
    println!(" -- INFO: Number of sampling frequencies = {points}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonOpts,
    }

    #[test]
    fn manual_sampling_with_positional_files() {
        let mut cli = TestCli::try_parse_from([
            "tsa", "-w", "-tday", "-f", "1000", "5000", "0.1", "in.txt", "out.txt",
        ])
        .expect("well-formed arguments");
        let args = cli.common.finalize().expect("valid sampling");

        assert!(cli.common.weights);
        assert_eq!(cli.common.time_unit(), TimeUnit::Days);
        assert_eq!(
            args.sampling,
            Sampling::Manual {
                low: 1000.0,
                high: 5000.0,
                rate: 0.1
            }
        );
        assert_eq!(args.input, PathBuf::from("in.txt"));
        assert_eq!(args.output, PathBuf::from("out.txt"));
    }

    #[test]
    fn auto_sampling_reclaims_the_swallowed_file_names() {
        // The greedy `-f` list takes `auto in.txt out.txt`.
        let mut cli = TestCli::try_parse_from(["tsa", "-f", "auto", "in.txt", "out.txt"])
            .expect("well-formed arguments");
        let args = cli.common.finalize().expect("valid sampling");

        assert_eq!(args.sampling, Sampling::Auto);
        assert_eq!(args.input, PathBuf::from("in.txt"));
        assert_eq!(args.output, PathBuf::from("out.txt"));
    }

    #[test]
    fn attached_unit_value_parses() {
        let cli = TestCli::try_parse_from(["tsa", "-tms", "-f", "auto", "a", "b"])
            .expect("attached unit value");
        assert_eq!(cli.common.time_unit(), TimeUnit::Megaseconds);
    }

    #[test]
    fn unknown_unit_falls_back_to_seconds() {
        let cli = TestCli::try_parse_from(["tsa", "-tfortnight", "-f", "auto", "a", "b"])
            .expect("unknown unit is tolerated");
        assert_eq!(cli.common.time_unit(), TimeUnit::Seconds);
    }

    #[test]
    fn degenerate_sampling_is_rejected() {
        for bad in [
            vec!["tsa", "-f", "5000", "1000", "1", "a", "b"],   // low > high
            vec!["tsa", "-f", "1000", "5000", "0", "a", "b"],   // rate = 0
            vec!["tsa", "-f", "1000", "1001", "5", "a", "b"],   // rate > range
            vec!["tsa", "-f", "1000", "5000", "x", "a", "b"],   // not a number
        ] {
            let mut cli = TestCli::try_parse_from(bad).expect("parses as strings");
            assert!(cli.common.finalize().is_err());
        }
    }

    #[test]
    fn fast_mode_refuses_auto_sampling() {
        let mut cli = TestCli::try_parse_from(["tsa", "--fast", "-f", "auto", "a", "b"])
            .expect("well-formed arguments");
        assert!(matches!(
            cli.common.finalize(),
            Err(ArgsError::AutoInFastMode)
        ));
    }

    #[test]
    fn missing_output_file_is_an_error() {
        let mut cli =
            TestCli::try_parse_from(["tsa", "-f", "auto", "in.txt"]).expect("parses as strings");
        assert!(matches!(cli.common.finalize(), Err(ArgsError::BadFiles)));
    }
}
