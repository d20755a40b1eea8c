//! # mobi_periodical
//!
//! Command-line front end: load an issue description, then either compile it
//! into a `.mobi` with kindlegen or write the kindlegen input files to a
//! directory for inspection.
//!
//! ## Usage
//!
//! ```sh
//! mobi_periodical build -i issue.yaml -o issue.mobi
//! mobi_periodical render -i issue.yaml -d ./out
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use clap::Parser;
use mobi_periodical::utils::ensure_writable_dir;
use mobi_periodical::{Kindlegen, generate_mobi, render_to_dir};
use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

#[instrument]
fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Build { issue, output, kindlegen } => {
            let issue = issue.load()?;
            let compiler = Kindlegen::new(kindlegen);

            let mut out = BufWriter::new(File::create(&output)?);
            match generate_mobi(issue, &compiler, &mut out) {
                Ok(bytes) => info!(path = %output.display(), bytes, "Wrote MOBI"),
                Err(e) => {
                    error!(path = %output.display(), error = %e, "MOBI generation failed");
                    drop(out);
                    // A failed run leaves no output file behind.
                    let _ = fs::remove_file(&output);
                    return Err(e.into());
                }
            }
        }
        Command::Render { issue, dir } => {
            if let Err(e) = ensure_writable_dir(&dir) {
                error!(
                    path = %dir.display(),
                    error = %e,
                    "Render directory is not writable (fix perms or choose a different path)"
                );
                return Err(e.into());
            }
            let issue = issue.load()?;
            let prepared = render_to_dir(issue, &dir)?;
            info!(
                path = %dir.display(),
                unique_id = %prepared.unique_id,
                articles = prepared.articles().count(),
                "Rendered kindlegen input files"
            );
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
