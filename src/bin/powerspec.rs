//! Power spectrum of an unevenly sampled time series.
//!
//! ```text
//! powerspec [-q] [-w] [-t{sec|day|ms}] [--noprep] [--fast] [--window F0]
//!           -f {auto | LOW HIGH RATE} input output
//! ```
//!
//! With `--window F0` the tool computes the spectral window at `F0`
//! (microhertz) instead of the power spectrum of the data: only the times
//! (and weights) of the input are used, the mean is never touched, and the
//! Nyquist block is skipped the same way `--fast` skips it.
//!
//! Multi-threaded through rayon; set RAYON_NUM_THREADS to control the
//! number of workers.

use std::error::Error;

use clap::Parser;

use rustytsa::cli::{self, CommonOpts};
use rustytsa::{fileio, fourier, tracing_init, window};

#[derive(Debug, Parser)]
#[command(name = "powerspec", about = "Power spectrum of an unevenly sampled time series")]
struct Opts {
    /// Compute the spectral window at this frequency (microhertz) instead
    /// of the power spectrum of the data
    #[arg(long, value_name = "F0")]
    window: Option<f64>,

    #[command(flatten)]
    common: CommonOpts,
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
        match opts.window {
            Some(f0) => println!(
                "\nCalculating the window function at {:.1} microHz of \"{}\" ...",
                f0,
                args.input.display()
            ),
            None if opts.common.weights => println!(
                "\nCalculating the weighted power spectrum of \"{}\" ...",
                args.input.display()
            ),
            None => println!(
                "\nCalculating the power spectrum of \"{}\" ...",
                args.input.display()
            ),
        }
    }

    let series = cli::load_series(&opts.common, &args.input)?;
    let window_mode = opts.window.is_some();
    let grid = cli::resolve_grid(&opts.common, args.sampling, &series, window_mode)?;
    let freq = cli::build_grid(&grid);
    let mut power = vec![0.0; freq.len()];

    if let Some(f0) = opts.window {
        if !quiet {
            println!(" - Calculating window function");
            println!(" -- INFO: Number of sampling frequencies = {}", freq.len());
        }
        window::windowfunction(&series.time, series.weights(), &freq, f0, &mut power)?;
    } else {
        let mut flux = series.flux.clone();
        cli::prep_mean(&mut flux, opts.common.noprep, quiet);
        if !quiet {
            println!(" - Calculating fourier transform");
            cli::print_sampling_info(&grid, freq.len());
        }
        fourier::fourier(&series.time, &flux, series.weights(), &freq, &mut power)?;
    }

    if !quiet {
        println!(" - Saving to file \"{}\"", args.output.display());
    }
    fileio::write_spectrum(&args.output, &freq, &power)?;

    if !opts.common.quiet || opts.common.fast {
        println!("Done!\n");
    }
    Ok(())
}
