//! NCX navigation map (`nav-contents.ncx`).
//!
//! The map is a three-level outline: a single `periodical` entry for the
//! table of contents, one `section` entry per section, and one `article`
//! entry per article. Every entry carries its play order; section entries
//! point at the file of their first article.
//!
//! # Structure
//!
//! ```text
//! navMap
//! └── navPoint class="periodical" playOrder=0 → contents.html
//!     ├── navPoint class="section" id=section-0 playOrder=0 → 000000.html
//!     │   ├── navPoint class="article" id=0 playOrder=0 → 000000.html
//!     │   └── navPoint class="article" id=1 playOrder=1 → 000001.html
//!     └── navPoint class="section" id=section-1 playOrder=2 → 000002.html
//!         └── ...
//! ```

use super::{XML_HEADER, escape};
use crate::models::{PreparedArticle, PreparedIssue, PreparedSection};
use std::io::{self, Write};
use tracing::instrument;

const NCX_HEAD: &str = r#"<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns:mbp="http://mobipocket.com/ns/mbp" xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" xml:lang="en-US">
  <head>
    <meta content="Template" name="dtb:uid"/>
    <meta content="2" name="dtb:depth"/>
    <meta content="0" name="dtb:totalPageCount"/>
    <meta content="0" name="dtb:maxPageNumber"/>
  </head>
  <docTitle>
    <text>ncx:Title</text>
  </docTitle>
  <docAuthor>
    <text>ncs:Author</text>
  </docAuthor>
  <navMap>
    <navPoint playOrder="0" class="periodical" id="periodical">
      <mbp:meta-img src="masthead.gif" name="mastheadImage"/>
      <navLabel>
        <text>Table of Contents</text>
      </navLabel>
      <content src="contents.html"/>
"#;

const NCX_TAIL: &str = "\n    </navPoint>\n  </navMap>\n</ncx>\n";

/// Write the navigation map for a prepared issue, XML declaration first.
#[instrument(level = "debug", skip_all)]
pub fn write_ncx<W: Write>(issue: &PreparedIssue, wr: &mut W) -> io::Result<()> {
    wr.write_all(XML_HEADER.as_bytes())?;
    wr.write_all(NCX_HEAD.as_bytes())?;
    for section in &issue.sections {
        write_section_point(section, wr)?;
    }
    wr.write_all(NCX_TAIL.as_bytes())
}

fn write_section_point<W: Write>(section: &PreparedSection, wr: &mut W) -> io::Result<()> {
    write!(
        wr,
        r#"
      <navPoint playOrder="{}" class="section" id="{}">
        <navLabel>
          <text>{}</text>
        </navLabel>
        <content src="{}"/>
"#,
        section.play_order,
        escape(&section.section_id),
        escape(&section.title),
        escape(&section.href)
    )?;
    for article in &section.articles {
        write_article_point(article, wr)?;
    }
    wr.write_all(b"\n      </navPoint>\n")
}

fn write_article_point<W: Write>(article: &PreparedArticle, wr: &mut W) -> io::Result<()> {
    let title = escape(&article.title);
    write!(
        wr,
        r#"
        <navPoint playOrder="{order}" class="article" id="{order}">
          <navLabel>
            <text>{title}</text>
          </navLabel>
          <content src="{href}"/>
          <mbp:meta name="description">{title}</mbp:meta>
          <mbp:meta name="author">{author}</mbp:meta>
        </navPoint>
"#,
        order = article.play_order,
        title = title,
        href = escape(&article.href),
        author = escape(&article.author),
    )
}
