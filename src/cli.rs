//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also be provided through an environment variable.

use clap::{Args, Parser, Subcommand};
use mobi_periodical::Issue;
use mobi_periodical::utils::local_date;
use std::error::Error;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Command-line arguments for the periodical builder.
///
/// # Examples
///
/// ```sh
/// # Build a .mobi with kindlegen from PATH
/// mobi_periodical build -i issue.yaml -o issue.mobi
///
/// # Use a specific kindlegen and cover
/// mobi_periodical build -i issue.yaml -o issue.mobi --cover cover.gif --kindlegen /opt/kindlegen
///
/// # Only write the kindlegen input files, for inspection
/// mobi_periodical render -i issue.json -d ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile an issue into a .mobi file
    Build {
        #[command(flatten)]
        issue: IssueArgs,

        /// Destination .mobi file
        #[arg(short, long, env = "PERIODICAL_OUTPUT")]
        output: PathBuf,

        /// kindlegen binary name or path
        #[arg(long, env = "KINDLEGEN", default_value = "kindlegen")]
        kindlegen: PathBuf,
    },
    /// Write the kindlegen input files to a directory without compiling
    Render {
        #[command(flatten)]
        issue: IssueArgs,

        /// Directory to write into (created if missing)
        #[arg(short, long, env = "PERIODICAL_DIR")]
        dir: PathBuf,
    },
}

/// Options shared by every subcommand that loads an issue.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issue description file (YAML, or JSON when the extension is .json)
    #[arg(short, long, env = "PERIODICAL_ISSUE")]
    pub issue: PathBuf,

    /// Cover image (GIF). A blank cover is generated when omitted
    #[arg(short, long, env = "PERIODICAL_COVER")]
    pub cover: Option<PathBuf>,

    /// Override the issue date (defaults to today when the file has none)
    #[arg(long, env = "PERIODICAL_DATE")]
    pub date: Option<String>,
}

impl IssueArgs {
    /// Read the issue file and apply the cover and date options to it.
    ///
    /// The date falls back to today's local date when neither `--date` nor
    /// the file supplies one.
    #[instrument(level = "info", skip_all, fields(issue = %self.issue.display()))]
    pub fn load(&self) -> Result<Issue, Box<dyn Error>> {
        let raw = fs::read_to_string(&self.issue)?;
        let mut issue = parse_issue(&self.issue, &raw)?;

        if let Some(date) = &self.date {
            issue.date = date.clone();
        } else if issue.date.is_empty() {
            issue.date = local_date();
            debug!(date = %issue.date, "Issue has no date; using today");
        }

        if let Some(cover) = &self.cover {
            let file = File::open(cover)?;
            issue.cover_image = Some(Box::new(BufReader::new(file)));
            debug!(cover = %cover.display(), "Using supplied cover");
        }

        info!(
            sections = issue.sections.len(),
            articles = issue.article_count(),
            "Loaded issue"
        );
        Ok(issue)
    }
}

/// Parse an issue description, choosing JSON or YAML by file extension.
pub fn parse_issue(path: &Path, raw: &str) -> Result<Issue, Box<dyn Error>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let issue = if is_json {
        serde_json::from_str(raw)?
    } else {
        serde_yaml::from_str(raw)?
    };
    Ok(issue)
}
