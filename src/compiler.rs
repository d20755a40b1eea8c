//! External e-book compiler invocation.
//!
//! The packaging step talks to the compiler through the [`Compiler`] trait
//! so the orchestrator can be exercised without kindlegen installed:
//! - [`Compiler`]: compile a populated scratch directory into one output file
//! - [`Kindlegen`]: runs the `kindlegen` binary as a subprocess
//!
//! There is no timeout and no retry. Callers that need bounded latency must
//! supervise the process themselves.

use crate::error::PeriodicalError;
use crate::utils::truncate_for_log;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Turns a populated scratch directory into a packaged e-book file.
pub trait Compiler {
    /// Compile `manifest` (a file name inside `dir`) into `output` (also
    /// inside `dir`).
    ///
    /// A successful return does not by itself prove `output` exists; the
    /// caller still has to open it.
    fn compile(&self, dir: &Path, manifest: &str, output: &str) -> Result<(), PeriodicalError>;
}

/// Amazon's `kindlegen` command-line compiler.
///
/// Invoked as `<binary> <manifest> -o <output>` with the scratch directory as
/// working directory. Standard output and standard error are both captured
/// and included in the error when the process exits unsuccessfully.
#[derive(Debug, Clone)]
pub struct Kindlegen {
    /// Binary name or path. Resolved through `PATH` when not absolute.
    pub binary: PathBuf,
}

impl Kindlegen {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for Kindlegen {
    fn default() -> Self {
        Self::new("kindlegen")
    }
}

impl Compiler for Kindlegen {
    #[instrument(level = "info", skip_all, fields(binary = %self.binary.display(), dir = %dir.display()))]
    fn compile(&self, dir: &Path, manifest: &str, output: &str) -> Result<(), PeriodicalError> {
        let t0 = Instant::now();
        let result = Command::new(&self.binary)
            .arg(manifest)
            .arg("-o")
            .arg(output)
            .current_dir(dir)
            .output()
            .map_err(|source| PeriodicalError::CompilerSpawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        let dt = t0.elapsed();

        let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&result.stderr));

        if !result.status.success() {
            error!(
                status = %result.status,
                elapsed_ms = dt.as_millis(),
                output = %truncate_for_log(&combined, 500),
                "kindlegen failed"
            );
            return Err(PeriodicalError::CompilerFailed {
                status: result.status,
                output: combined,
            });
        }

        debug!(output = %truncate_for_log(&combined, 500), "kindlegen output");
        info!(elapsed_ms = dt.as_millis(), "kindlegen finished");
        Ok(())
    }
}
