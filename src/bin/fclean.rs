//! Frequency CLEAN of an unevenly sampled time series.
//!
//! ```text
//! fclean [-q] [-w] [-t{sec|day|ms}] [--noprep] [--fast] -n K
//!        -f {auto | LOW HIGH RATE} input output
//! ```
//!
//! Extracts the `K` strongest sinusoids one at a time, subtracting each in
//! the time domain before searching for the next. The residual series goes
//! to `output` (mean restored, times in the input unit); the component
//! table goes to `output.cleanlog`.
//!
//! Multi-threaded through rayon; set RAYON_NUM_THREADS to control the
//! number of workers.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use rustytsa::cli::{self, CommonOpts};
use rustytsa::{arr, clean, fileio, tracing_init};

#[derive(Debug, Parser)]
#[command(name = "fclean", about = "Iterative sinusoid extraction (CLEAN)")]
struct Opts {
    /// Number of sinusoids to extract
    #[arg(short = 'n', value_name = "K")]
    components: usize,

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
        if opts.common.weights {
            println!(
                "\nCLEANing the time series \"{}\" using weights ...",
                args.input.display()
            );
        } else {
            println!("\nCLEANing the time series \"{}\" ...", args.input.display());
        }
    }

    let series = cli::load_series(&opts.common, &args.input)?;
    let grid = cli::resolve_grid(&opts.common, args.sampling, &series, false)?;
    let freq = cli::build_grid(&grid);

    let mut flux = series.flux.clone();
    let mean = cli::prep_mean(&mut flux, opts.common.noprep, quiet);
    if !quiet {
        cli::print_sampling_info(&grid, freq.len());
        println!(" - CLEANing {} components", opts.components);
    }

    let components = clean::clean(
        &series.time,
        &mut flux,
        series.weights(),
        &freq,
        opts.components,
    )?;
    if !quiet {
        for (i, comp) in components.iter().enumerate() {
            println!(
                " -- {:3}: f = {:.6} microHz, power = {:.6}",
                i + 1,
                comp.freq,
                comp.power
            );
        }
    }

    // The residual keeps the level of the input series.
    arr::sca_add(&mut flux, mean);

    if !quiet {
        println!(" - Saving to file \"{}\"", args.output.display());
    }
    fileio::write_series(
        &args.output,
        &series.time,
        &flux,
        series.weights(),
        opts.common.time_unit(),
    )?;

    let mut logname = args.output.clone().into_os_string();
    logname.push(".cleanlog");
    fileio::write_cleanlog(&PathBuf::from(logname), &components)?;

    if !opts.common.quiet || opts.common.fast {
        println!("Done!\n");
    }
    Ok(())
}
