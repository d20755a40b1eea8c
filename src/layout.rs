//! Identifier and file-name assignment for an issue.
//!
//! Layout walks the section/article tree once, in declaration order, and
//! fixes everything the renderers cross-reference:
//!
//! | Entity  | Field        | Value                                   |
//! |---------|--------------|-----------------------------------------|
//! | Section | `section_id` | `section-{i}` (zero-based sibling index) |
//! | Section | `play_order` | running counter                         |
//! | Article | `play_order` | running counter + offset in section     |
//! | both    | `href`       | `pad(play_order) + ".html"`             |
//!
//! The counter advances by the number of articles in each section, so a
//! section and its first article share a play order and an href. The
//! navigation map relies on this: a section entry points at the file of its
//! first article.

use crate::cover::blank_cover;
use crate::error::PeriodicalError;
use crate::models::{
    Article, Issue, PreparedArticle, PreparedIssue, PreparedSection, Section,
};
use rand::{Rng, rng};
use std::io::Cursor;
use tracing::{debug, info, instrument};

/// Lay out an issue, consuming it.
///
/// Fills in a random `unique_id` when the issue has none and a blank cover
/// when no cover stream was supplied. Everything else is a pure function of
/// section and article order.
///
/// # Errors
///
/// Only fails if the placeholder cover cannot be encoded.
#[instrument(level = "info", skip_all, fields(sections = issue.sections.len()))]
pub fn prepare(issue: Issue) -> Result<PreparedIssue, PeriodicalError> {
    let unique_id = if issue.unique_id.is_empty() {
        let id = generate_unique_id();
        debug!(%id, "Generated unique id");
        id
    } else {
        issue.unique_id
    };

    let cover_image = match issue.cover_image {
        Some(cover) => cover,
        None => {
            debug!("No cover supplied; using blank cover");
            Box::new(Cursor::new(blank_cover()?))
        }
    };

    let mut play_order = 0;
    let mut sections = Vec::with_capacity(issue.sections.len());
    for (index, section) in issue.sections.into_iter().enumerate() {
        let article_count = section.articles.len();
        sections.push(prepare_section(section, index, play_order));
        play_order += article_count;
    }

    info!(%unique_id, articles = play_order, "Laid out issue");

    Ok(PreparedIssue {
        unique_id,
        title: issue.title,
        creator: issue.creator,
        publisher: issue.publisher,
        subject: issue.subject,
        description: issue.description,
        date: issue.date,
        cover_image,
        sections,
    })
}

/// Lay out one section whose first article takes `play_order`.
pub fn prepare_section(section: Section, index: usize, play_order: usize) -> PreparedSection {
    let articles = section
        .articles
        .into_iter()
        .enumerate()
        .map(|(offset, article)| prepare_article(article, play_order + offset))
        .collect();

    PreparedSection {
        title: section.title,
        articles,
        section_id: format!("section-{}", index),
        play_order,
        href: href(play_order),
    }
}

pub fn prepare_article(article: Article, play_order: usize) -> PreparedArticle {
    PreparedArticle {
        title: article.title,
        author: article.author,
        content: article.content,
        play_order,
        href: href(play_order),
    }
}

/// Decimal digits of `number`, left-padded with `0` to at least six digits.
///
/// Wider numbers are never truncated.
///
/// # Examples
///
/// ```
/// use mobi_periodical::layout::pad;
/// assert_eq!(pad(12), "000012");
/// assert_eq!(pad(1234567), "1234567");
/// ```
pub fn pad(number: usize) -> String {
    format!("{:06}", number)
}

/// File name for the document at `play_order`.
pub fn href(play_order: usize) -> String {
    pad(play_order) + ".html"
}

fn generate_unique_id() -> String {
    rng().random_range(0..=i64::MAX).to_string()
}
