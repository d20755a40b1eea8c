//! Document renderers for the kindlegen input file set.
//!
//! Each submodule writes one kind of file from a [`PreparedIssue`]:
//!
//! # Submodules
//!
//! - [`opf`]: package manifest, metadata, spine and guide (`content.opf`)
//! - [`contents`]: human-readable table of contents (`contents.html`)
//! - [`ncx`]: navigation map with play orders (`nav-contents.ncx`)
//! - [`article`]: article bodies, one file per article (`000000.html`, ...)
//!
//! Renderers are pure functions of the prepared issue: rendering the same
//! issue twice yields byte-identical output. They fail only when the
//! underlying writer does.
//!
//! # Output Structure
//!
//! ```text
//! scratch_dir/
//! ├── content.opf
//! ├── contents.html
//! ├── nav-contents.ncx
//! ├── cover-image.gif
//! ├── 000000.html
//! └── 000001.html ...
//! ```
//!
//! [`PreparedIssue`]: crate::models::PreparedIssue

pub mod article;
pub mod contents;
pub mod ncx;
pub mod opf;

use std::borrow::Cow;

/// Declaration line that precedes the OPF and NCX documents.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Escape a display string for use in element text or a quoted attribute.
///
/// Quotes and `+` become numeric character references (`&#39;`, `&#34;`,
/// `&#43;`), never named entities, so the result is valid in both the HTML
/// and the XML documents. NUL is replaced with U+FFFD.
pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['\0', '&', '<', '>', '\'', '"', '+']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            '+' => out.push_str("&#43;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
