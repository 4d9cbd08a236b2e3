//! This module is in charge of outputting the final selection tallies to the
//! standard output and various files

use crate::{
    config::Configuration,
    cutflow::CutFlow,
    numeric::{floats, Float},
    selword::SelectionBit,
};

use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use std::{
    fs::File,
    io::{Error, ErrorKind, Result, Write},
    time::Duration,
};

/// Number of significant digits in file output
const SIG_DIGITS: usize = (floats::DIGITS - 1) as usize;

/// Output the selection tallies to the console and to disk
#[allow(clippy::cast_lossless)]
pub fn dump_results(
    cfg: &Configuration,
    tally: &CutFlow,
    elapsed_time: Duration,
) -> Result<()> {
    // Print the cut flow on stdout
    {
        let stdout = ::std::io::stdout();
        let mut stdout = stdout.lock();
        write_tally(&mut stdout, tally)?;
    }

    // Compute a timestamp of when the run ended
    let current_time = OffsetDateTime::now_utc();
    let timestamp = current_time
        .format(&Rfc2822)
        .map_err(|err| Error::new(ErrorKind::Other, err))?;

    // Write the full selection report to a file
    {
        // Prepare to write the report into a file
        let mut report_file = File::create("selection.report")?;
        let report_file = &mut report_file;

        // Write a timestamp of when the run ended
        writeln_report(report_file, &timestamp[..])?;

        // Echo the configuration that produced these tallies
        writeln_report(report_file, "---------------------------------------------")?;
        writeln_report(report_file, ("Number of events", cfg.num_events))?;
        writeln_report(report_file, ("Generator seed", cfg.seed))?;
        let mode = if cfg.production {
            "production"
        } else {
            "synchronization"
        };
        writeln_report(report_file, ("Accept decision", mode))?;
        writeln_report(report_file, ("Muon pt threshold   (GeV)", cfg.cuts.muon_min_pt))?;
        writeln_report(report_file, ("Tau pt threshold    (GeV)", cfg.cuts.tau_min_pt))?;
        writeln_report(report_file, ("Tight muon isolation", cfg.cuts.muon_tight_iso))?;
        writeln_report(report_file, ("Loose muon isolation", cfg.cuts.muon_loose_iso))?;
        writeln_report(report_file, ("Pair separation floor", cfg.cuts.pair_min_delta_r))?;

        // Write the cut flow itself
        writeln_report(report_file, "---------------------------------------------")?;
        write_tally(report_file, tally)?;

        // Write program performance stats
        let elapsed_secs =
            (elapsed_time.as_secs() as Float) + 1e-9 * (elapsed_time.subsec_nanos() as Float);
        writeln_report(report_file, "---------------------------------------------")?;
        writeln_report(report_file, ("Elapsed time (s)", elapsed_secs))?;
        let secs_per_ev = elapsed_secs / (cfg.num_events as Float);
        writeln_report(report_file, ("Elapsed time per event (s)", secs_per_ev))?;
    }

    // ...and we're done
    Ok(())
}

/// Write the cut-by-cut tally of a completed run
fn write_tally(writer: &mut impl Write, tally: &CutFlow) -> Result<()> {
    writeln_report(writer, ("Events processed", tally.seen()))?;
    writeln_report(writer, ("... without a candidate pair", tally.no_candidate()))?;
    writeln_report(writer, ("... with another pair flavour", tally.wrong_flavour()))?;
    for bit in SelectionBit::ALL {
        let label = format!("Passing {}", bit.label());
        writeln_report(writer, (&label[..], tally.bit_count(bit)))?;
    }
    writeln_report(writer, ("Accepted events", tally.accepted()))?;
    writeln_report(writer, ("Selection efficiency", tally.efficiency()))
}

/// Text output facility that mimicks the selection report styling
fn writeln_report(writer: &mut impl Write, data: impl WriteReport) -> Result<()> {
    write!(writer, " ")?;
    data.write(writer)?;
    writeln!(writer)
}

/// Trait implemented by things which can be printed in the report style
trait WriteReport: Sized {
    /// Write down `self` to the output using the report styling
    fn write<W: Write>(self, writer: &mut W) -> Result<()>;
}

impl WriteReport for &str {
    // Strings work in the usual way
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteReport for usize {
    // Integers work in the usual way too
    // FIXME: Collapse the integer impls once Rust has specialization
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteReport for u64 {
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteReport for Float {
    // The original framework used %g for floats, this is a close approximation
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write_engineering(writer, self, SIG_DIGITS)
    }
}

impl<T: WriteReport> WriteReport for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{:<31}: ", self.0)?;
        self.1.write(writer)
    }
}

/// Write a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this method switches
/// between naive and scientific notation for floating-point numbers when the
/// number being printed becomes so small that printing leading zeroes could end
/// up larger than the scientific notation, or so large that we would be forced
/// to print more significant digits than requested.
///
fn write_engineering(writer: &mut impl Write, x: Float, sig_digits: usize) -> Result<()> {
    let mut precision = sig_digits - 1;
    if x == 0. {
        // Zero is special because you can't take its log
        write!(writer, "0")
    } else {
        // Otherwise, use log to evaluate order of magnitude
        let log_x = x.abs().log10();
        if log_x >= -3. && log_x <= (sig_digits as Float) {
            // Print using naive notation
            //
            // Since Rust's precision controls number of digits after the
            // decimal point, we must adjust it depending on magnitude in order
            // to operate at a constant number of significant digits.
            precision = (precision as isize - log_x.trunc() as isize) as usize;

            // Numbers smaller than 1 must get one extra digit since the leading
            // zero does not count as a significant digit.
            if log_x < 0. {
                precision += 1
            }

            // People don't normally expect trailing zeros or decimal point in
            // naive notation, but be careful with integer numbers...
            let str_with_zeros = format!("{:.1$}", x, precision);
            if str_with_zeros.contains('.') {
                write!(
                    writer,
                    "{}",
                    str_with_zeros.trim_end_matches('0').trim_end_matches('.')
                )
            } else {
                write!(writer, "{}", str_with_zeros)
            }
        } else {
            // Print using scientific notation
            write!(writer, "{:.1$e}", x, precision)
        }
    }
}
