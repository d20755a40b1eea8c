//! Article body files (`000000.html`, `000001.html`, ...).

use crate::models::PreparedArticle;
use std::io::{self, Write};

/// Write an article's content exactly as supplied.
///
/// The body is trusted to already be well-formed markup; nothing is escaped
/// or wrapped.
pub fn write_article<W: Write>(article: &PreparedArticle, wr: &mut W) -> io::Result<()> {
    wr.write_all(article.content.as_bytes())
}
