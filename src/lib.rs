//! # mobi_periodical
//!
//! Assemble a periodical issue into a Kindle `.mobi` file using Amazon's
//! `kindlegen` compiler.
//!
//! ## Features
//!
//! - Deterministic numbering of sections and articles (play order, file
//!   names, section ids)
//! - OPF manifest, XHTML table of contents and NCX navigation map that all
//!   reference the same identifiers
//! - Blank placeholder cover when none is supplied
//! - Scratch directory that is always removed, whichever stage fails
//!
//! ## Usage
//!
//! ```no_run
//! use mobi_periodical::{Article, Issue, Kindlegen, Section, generate_mobi};
//!
//! let issue = Issue {
//!     title: "Evening Edition".to_string(),
//!     sections: vec![Section {
//!         title: "World".to_string(),
//!         articles: vec![Article {
//!             title: "Headline".to_string(),
//!             author: "Staff".to_string(),
//!             content: "<html><body><p>Story</p></body></html>".to_string(),
//!         }],
//!     }],
//!     ..Default::default()
//! };
//! let mut out = std::fs::File::create("evening.mobi")?;
//! generate_mobi(issue, &Kindlegen::default(), &mut out)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! Data flows one way:
//! 1. **Layout** ([`layout::prepare`]): consume the [`Issue`], assign ids and hrefs
//! 2. **Rendering** ([`outputs`]): write manifest, contents, nav and article files
//! 3. **Compiling** ([`compiler`]): run kindlegen in the scratch directory
//! 4. **Streaming** ([`package`]): copy the result to the caller's writer

pub mod compiler;
pub mod cover;
pub mod error;
pub mod layout;
pub mod models;
pub mod outputs;
pub mod package;
pub mod utils;

pub use compiler::{Compiler, Kindlegen};
pub use error::PeriodicalError;
pub use models::{Article, Issue, PreparedArticle, PreparedIssue, PreparedSection, Section};
pub use package::{generate_mobi, render_to_dir};
