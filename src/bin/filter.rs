//! Band, low or high-pass filtering of an unevenly sampled time series.
//!
//! ```text
//! filter [-q] [-w] [-t{sec|day|ms}] [--noprep] [--fast]
//!        {--band F1 F2 | --low F | --high F}
//!        -f {auto | LOW HIGH RATE} input output
//! ```
//!
//! The filtered series is written with times converted back to the input
//! unit, carrying the weight column when `-w` is given.
//!
//! Multi-threaded through rayon; set RAYON_NUM_THREADS to control the
//! number of workers.

use std::error::Error;

use clap::{ArgGroup, Parser};

use rustytsa::cli::{self, CommonOpts};
use rustytsa::{fileio, pass, tracing_init};

#[derive(Debug, Parser)]
#[command(
    name = "filter",
    about = "Band, low or high-pass filter by Fourier synthesis",
    group(ArgGroup::new("mode").required(true).args(["band", "low", "high"]))
)]
struct Opts {
    /// Bandpass between F1 and F2 (microhertz)
    #[arg(long, num_args = 2, value_names = ["F1", "F2"])]
    band: Vec<f64>,

    /// Lowpass up to F (microhertz)
    #[arg(long, value_name = "F")]
    low: Option<f64>,

    /// Highpass from F (microhertz)
    #[arg(long, value_name = "F")]
    high: Option<f64>,

    #[command(flatten)]
    common: CommonOpts,
}

enum Mode {
    Band(f64, f64),
    Low(f64),
    High(f64),
}

impl Opts {
    fn mode(&self) -> Option<Mode> {
        if self.band.len() == 2 {
            Some(Mode::Band(self.band[0], self.band[1]))
        } else if let Some(f) = self.low {
            Some(Mode::Low(f))
        } else {
            self.high.map(Mode::High)
        }
    }
}

fn main() {
    tracing_init::init_tracing();
    let opts = cli::parse_or_exit::<Opts>();
    if let Err(err) = run(opts) {
        cli::exit_with(err.as_ref());
    }
}

fn run(mut opts: Opts) -> Result<(), Box<dyn Error>> {
    let args = opts.common.finalize()?;
    let quiet = opts.common.effective_quiet();
    if opts.common.fast {
        println!(" * Fast-mode activated. Going (almost) quiet * ");
    }

    if !opts.common.quiet || opts.common.fast {
        if opts.common.weights {
            println!(
                "\nFiltering the time series \"{}\" using weights ...",
                args.input.display()
            );
        } else {
            println!(
                "\nFiltering the time series \"{}\" without weights ...",
                args.input.display()
            );
        }
    }

    let series = cli::load_series(&opts.common, &args.input)?;
    let grid = cli::resolve_grid(&opts.common, args.sampling, &series, false)?;

    let mut result = vec![0.0; series.time.len()];
    match opts.mode() {
        Some(Mode::Band(f1, f2)) => {
            if !quiet {
                println!(" - Calculating bandpass filter between {f1:.2} and {f2:.2} microHz");
            }
            pass::bandpass(
                &series.time,
                &series.flux,
                series.weights(),
                f1,
                f2,
                grid.low,
                grid.high,
                grid.rate,
                &mut result,
            )?;
        }
        Some(Mode::Low(f)) => {
            if !quiet {
                println!(" - Calculating lowpass filter up to {f:.2} microHz");
            }
            pass::lowpass(
                &series.time,
                &series.flux,
                series.weights(),
                f,
                grid.low,
                grid.high,
                grid.rate,
                &mut result,
            )?;
        }
        Some(Mode::High(f)) => {
            if !quiet {
                println!(" - Calculating highpass filter from {f:.2} microHz");
            }
            pass::highpass(
                &series.time,
                &series.flux,
                series.weights(),
                f,
                grid.low,
                grid.high,
                grid.rate,
                &mut result,
            )?;
        }
        None => return Err(Box::new(cli::ArgsError::BadFilter)),
    }

    if !quiet {
        println!(" - Saving to file \"{}\"", args.output.display());
    }
    fileio::write_series(
        &args.output,
        &series.time,
        &result,
        series.weights(),
        opts.common.time_unit(),
    )?;

    if !opts.common.quiet || opts.common.fast {
        println!("Done!\n");
    }
    Ok(())
}
