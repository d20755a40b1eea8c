//! OPF package manifest (`content.opf`).
//!
//! The manifest is kindlegen's entry point: it names every file in the
//! scratch directory and fixes the reading order. Articles are identified by
//! their play order, which the spine then references.

use super::{XML_HEADER, escape};
use crate::models::PreparedIssue;
use std::io::{self, Write};
use tracing::instrument;

/// Write the OPF package document for a prepared issue.
///
/// The output starts with the XML declaration. Blank lines around each
/// manifest and spine entry are part of the document kindlegen is known to
/// accept and are kept as-is.
#[instrument(level = "debug", skip_all, fields(unique_id = %issue.unique_id))]
pub fn write_opf<W: Write>(issue: &PreparedIssue, wr: &mut W) -> io::Result<()> {
    wr.write_all(XML_HEADER.as_bytes())?;
    write!(
        wr,
        r#"<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="{uid}">
  <metadata>
    <meta content="cover-image" name="cover"/>
    <dc-metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
      <dc:title>{title}</dc:title>
      <dc:language>en-us</dc:language>
      <dc:creator>{creator}</dc:creator>
      <dc:publisher>{publisher}</dc:publisher>
      <dc:subject>{subject}</dc:subject>
      <dc:date>{date}</dc:date>
      <dc:description>{description}</dc:description>
    </dc-metadata>
    <x-metadata>
      <output content-type="application/x-mobipocket-subscription-magazine" encoding="utf-8"/>
    </x-metadata>
  </metadata>
  <manifest>
    <item href="cover-image.gif" media-type="image/gif" id="cover-image"/>
    <item href="contents.html" media-type="application/xhtml+xml" id="contents"/>
    <item href="nav-contents.ncx" media-type="application/x-dtbncx+xml" id="nav-contents"/>
"#,
        uid = escape(&issue.unique_id),
        title = escape(&issue.title),
        creator = escape(&issue.creator),
        publisher = escape(&issue.publisher),
        subject = escape(&issue.subject),
        date = escape(&issue.date),
        description = escape(&issue.description),
    )?;

    for section in &issue.sections {
        wr.write_all(b"\n")?;
        for article in &section.articles {
            write!(
                wr,
                "\n    <item href=\"{}\" media-type=\"application/xhtml+xml\" id=\"{}\"/>\n",
                escape(&article.href),
                article.play_order
            )?;
        }
        wr.write_all(b"\n")?;
    }

    wr.write_all(
        b"\n  </manifest>\n  <spine toc=\"nav-contents\">\n    <itemref idref=\"contents\"/>\n",
    )?;

    for section in &issue.sections {
        wr.write_all(b"\n")?;
        for article in &section.articles {
            write!(wr, "\n        <itemref idref=\"{}\"/>\n", article.play_order)?;
        }
        wr.write_all(b"\n")?;
    }

    wr.write_all(
        br#"
  </spine>
  <guide>
    <reference href="contents.html" type="toc" title="Table of Contents"/>
  </guide>
</package>
"#,
    )?;
    Ok(())
}
