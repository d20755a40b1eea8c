//! Error type for periodical generation.
//!
//! Every failure is fatal to the generation call that hit it. Variants map
//! onto the stage that failed so callers (and logs) can tell a broken
//! scratch directory apart from a compiler rejecting the issue.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure while laying out, rendering, compiling or streaming an issue.
#[derive(Error, Debug)]
pub enum PeriodicalError {
    /// The scratch directory or one of its files could not be created.
    #[error("failed to create {}: {source}", path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a rendered document or article body failed.
    #[error("failed to generate {document}: {source}")]
    Render {
        document: String,
        #[source]
        source: io::Error,
    },

    /// The placeholder cover could not be encoded.
    #[error("failed to create blank cover image: {0}")]
    Cover(String),

    /// The supplied cover stream could not be copied into the scratch directory.
    #[error("failed to copy cover image: {0}")]
    CoverCopy(#[source] io::Error),

    /// The compiler binary could not be started.
    #[error("failed to run {binary}: {source}")]
    CompilerSpawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    /// The compiler ran but exited unsuccessfully.
    #[error("kindlegen returned an error: {status}, {output}")]
    CompilerFailed { status: ExitStatus, output: String },

    /// The compiled output was missing, unreadable, or could not be copied out.
    #[error("failed to retrieve generated MOBI from {}: {source}", path.display())]
    Retrieve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<image::ImageError> for PeriodicalError {
    fn from(err: image::ImageError) -> Self {
        PeriodicalError::Cover(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_names_document() {
        let err = PeriodicalError::Render {
            document: "content.opf".to_string(),
            source: io::Error::other("disk full"),
        };
        assert_eq!(err.to_string(), "failed to generate content.opf: disk full");
    }

    #[test]
    fn test_setup_error_includes_path() {
        let err = PeriodicalError::Setup {
            path: PathBuf::from("/tmp/scratch/content.opf"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("failed to create /tmp/scratch/content.opf"));
    }
}
