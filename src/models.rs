//! Data models for a periodical issue and its laid-out representation.
//!
//! This module defines two parallel trees:
//! - [`Issue`] / [`Section`] / [`Article`]: author-supplied input, usually
//!   deserialized from a YAML or JSON issue file
//! - [`PreparedIssue`] / [`PreparedSection`] / [`PreparedArticle`]: the same
//!   tree after [`crate::layout::prepare`] has assigned identifiers, play
//!   orders and file names
//!
//! The input tree is consumed by layout; renderers only ever see the
//! prepared tree, so a half-numbered issue cannot reach a document writer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// An issue of a periodical, as supplied by the caller.
///
/// All display fields are opaque strings and default to empty when absent
/// from an issue file. Section order is significant: it determines play
/// order and therefore reading order on the device.
///
/// # Cover Image
///
/// `cover_image` is any readable `Send` byte stream, expected to hold a GIF. It
/// cannot come from an issue file; the CLI fills it from `--cover`. When it
/// is `None`, layout synthesizes a blank cover.
#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Issue {
    /// Identifier for the `unique-identifier` package attribute. Generated when empty.
    pub unique_id: String,
    pub title: String,
    pub creator: String,
    pub publisher: String,
    pub subject: String,
    pub description: String,
    /// Publication date, rendered verbatim into `dc:date`.
    pub date: String,
    #[serde(skip)]
    pub cover_image: Option<Box<dyn Read + Send>>,
    pub sections: Vec<Section>,
}

impl fmt::Debug for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Issue")
            .field("unique_id", &self.unique_id)
            .field("title", &self.title)
            .field("creator", &self.creator)
            .field("publisher", &self.publisher)
            .field("subject", &self.subject)
            .field("description", &self.description)
            .field("date", &self.date)
            .field("cover_image", &self.cover_image.is_some())
            .field("sections", &self.sections)
            .finish()
    }
}

impl Issue {
    /// Total number of articles across all sections.
    pub fn article_count(&self) -> usize {
        self.sections.iter().map(|s| s.articles.len()).sum()
    }
}

/// A named grouping of articles within an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub articles: Vec<Article>,
}

/// A single content item.
///
/// `content` is a raw markup body written verbatim to the article's file;
/// it is never escaped or validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub content: String,
}

/// An issue after layout: every identifier and file name is fixed.
///
/// `unique_id` is guaranteed non-empty and `cover_image` is always present
/// (either the caller's stream or a generated blank cover).
pub struct PreparedIssue {
    pub unique_id: String,
    pub title: String,
    pub creator: String,
    pub publisher: String,
    pub subject: String,
    pub description: String,
    pub date: String,
    pub cover_image: Box<dyn Read + Send>,
    pub sections: Vec<PreparedSection>,
}

impl fmt::Debug for PreparedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedIssue")
            .field("unique_id", &self.unique_id)
            .field("title", &self.title)
            .field("date", &self.date)
            .field("sections", &self.sections)
            .finish_non_exhaustive()
    }
}

impl PreparedIssue {
    /// All articles in play order.
    pub fn articles(&self) -> impl Iterator<Item = &PreparedArticle> {
        self.sections.iter().flat_map(|s| s.articles.iter())
    }
}

/// A section with its layout metadata.
///
/// A section shares its play order and href with its first article, so the
/// section's navigation target is that article's file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSection {
    pub title: String,
    pub articles: Vec<PreparedArticle>,
    /// `section-{index}`, where index is the zero-based position among siblings.
    pub section_id: String,
    pub play_order: usize,
    pub href: String,
}

/// An article with its layout metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedArticle {
    pub title: String,
    pub author: String,
    pub content: String,
    pub play_order: usize,
    /// File name of the article body inside the scratch directory.
    pub href: String,
}
