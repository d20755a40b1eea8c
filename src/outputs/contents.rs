//! Human-readable table of contents (`contents.html`).
//!
//! Unlike the OPF and NCX documents this one carries no XML declaration.

use super::escape;
use crate::models::PreparedIssue;
use std::io::{self, Write};
use tracing::instrument;

/// Write the table of contents: one heading per section, followed by a list
/// of links to its articles.
#[instrument(level = "debug", skip_all)]
pub fn write_contents<W: Write>(issue: &PreparedIssue, wr: &mut W) -> io::Result<()> {
    wr.write_all(
        br#"<html>
  <head>
    <meta content="text/html; charset=utf-8" http-equiv="Content-Type"/>
    <title>Table of Contents</title>
  </head>
  <body>
    <h1>Contents</h1>
"#,
    )?;

    for section in &issue.sections {
        write!(wr, "\n    <h4>{}</h4>\n    <ul>\n", escape(&section.title))?;
        for article in &section.articles {
            write!(
                wr,
                "\n      <li>\n        <a href=\"{}\">{}</a>\n      </li>\n",
                escape(&article.href),
                escape(&article.title)
            )?;
        }
        wr.write_all(b"\n    </ul>\n")?;
    }

    wr.write_all(b"\n  </body>\n</html>\n")?;
    Ok(())
}
