//! Packaging orchestration: issue in, `.mobi` bytes out.
//!
//! [`generate_mobi`] drives one generation run through its stages:
//!
//! 1. **Initializing**: lay out the issue and create a uniquely named scratch
//!    directory
//! 2. **Populating**: render the OPF, contents and NCX documents, write every
//!    article body, and copy the cover image
//! 3. **Compiling**: run the [`Compiler`] against `content.opf`
//! 4. **Streaming**: copy `content.mobi` into the caller's sink
//!
//! The scratch directory is held by a [`TempDir`] guard, so it is removed on
//! every exit path, including each early `?` return. Nothing is retried and
//! no partial output is handed back: on error the sink may hold a prefix of
//! the file and must be discarded.

use crate::compiler::Compiler;
use crate::error::PeriodicalError;
use crate::layout::prepare;
use crate::models::{Issue, PreparedIssue};
use crate::outputs::{article::write_article, contents::write_contents, ncx::write_ncx, opf::write_opf};
use crate::utils::scratch_prefix;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

pub const OPF_FILENAME: &str = "content.opf";
pub const CONTENTS_FILENAME: &str = "contents.html";
pub const NAV_FILENAME: &str = "nav-contents.ncx";
pub const COVER_FILENAME: &str = "cover-image.gif";
pub const MOBI_FILENAME: &str = "content.mobi";

/// Generate a `.mobi` periodical for `issue` and write it to `out`.
///
/// Returns the number of bytes streamed to `out`.
///
/// # Errors
///
/// Any stage failure is returned as the matching [`PeriodicalError`]
/// variant. The scratch directory has already been removed by the time the
/// error reaches the caller.
#[instrument(level = "info", skip_all, fields(title = %issue.title))]
pub fn generate_mobi<C, W>(issue: Issue, compiler: &C, out: &mut W) -> Result<u64, PeriodicalError>
where
    C: Compiler + ?Sized,
    W: Write + ?Sized,
{
    let mut issue = prepare(issue)?;

    let scratch = create_scratch_dir(&issue.unique_id)?;
    info!(dir = %scratch.path().display(), "Created scratch directory");

    let files = populate(scratch.path(), &mut issue)?;
    info!(files = files.len(), "Populated scratch directory");

    compiler.compile(scratch.path(), OPF_FILENAME, MOBI_FILENAME)?;

    let bytes = stream_output(&scratch.path().join(MOBI_FILENAME), out)?;
    info!(bytes, "Streamed generated MOBI");

    let dir = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!(dir = %dir.display(), error = %e, "Failed to remove scratch directory");
    }
    Ok(bytes)
}

/// Lay out `issue` and write its kindlegen input files into `dir` without
/// compiling.
///
/// `dir` is created if missing and is left in place. Returns the prepared
/// issue (its cover stream has been consumed) for reporting.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub fn render_to_dir(issue: Issue, dir: &Path) -> Result<PreparedIssue, PeriodicalError> {
    let mut issue = prepare(issue)?;
    fs::create_dir_all(dir).map_err(|source| PeriodicalError::Setup {
        path: dir.to_path_buf(),
        source,
    })?;
    let files = populate(dir, &mut issue)?;
    info!(files = files.len(), unique_id = %issue.unique_id, "Rendered issue");
    Ok(issue)
}

/// Write the full kindlegen input set for a prepared issue into `dir`.
///
/// Returns the names of the files written, in write order: manifest,
/// contents, navigation map, one file per article, then the cover.
pub fn populate(dir: &Path, issue: &mut PreparedIssue) -> Result<Vec<String>, PeriodicalError> {
    let doc: &PreparedIssue = issue;
    let mut written = Vec::with_capacity(doc.articles().count() + 4);

    write_document(dir, OPF_FILENAME, |wr| write_opf(doc, wr))?;
    written.push(OPF_FILENAME.to_string());
    write_document(dir, CONTENTS_FILENAME, |wr| write_contents(doc, wr))?;
    written.push(CONTENTS_FILENAME.to_string());
    write_document(dir, NAV_FILENAME, |wr| write_ncx(doc, wr))?;
    written.push(NAV_FILENAME.to_string());

    for article in doc.articles() {
        write_document(dir, &article.href, |wr| write_article(article, wr))?;
        written.push(article.href.clone());
    }

    write_cover(dir, &mut issue.cover_image)?;
    written.push(COVER_FILENAME.to_string());

    Ok(written)
}

fn create_scratch_dir(unique_id: &str) -> Result<TempDir, PeriodicalError> {
    tempfile::Builder::new()
        .prefix(&scratch_prefix(unique_id))
        .tempdir()
        .map_err(|source| PeriodicalError::Setup {
            path: std::env::temp_dir(),
            source,
        })
}

fn create_file(path: &Path) -> Result<BufWriter<File>, PeriodicalError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| PeriodicalError::Setup {
            path: path.to_path_buf(),
            source,
        })
}

fn write_document<F>(dir: &Path, name: &str, render: F) -> Result<(), PeriodicalError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let path = dir.join(name);
    let mut wr = create_file(&path)?;
    render(&mut wr)
        .and_then(|()| wr.flush())
        .map_err(|source| PeriodicalError::Render {
            document: name.to_string(),
            source,
        })?;
    debug!(file = name, "Wrote document");
    Ok(())
}

fn write_cover(dir: &Path, cover: &mut dyn Read) -> Result<(), PeriodicalError> {
    let mut wr = create_file(&dir.join(COVER_FILENAME))?;
    let bytes = io::copy(cover, &mut wr).map_err(PeriodicalError::CoverCopy)?;
    wr.flush().map_err(PeriodicalError::CoverCopy)?;
    debug!(bytes, "Wrote cover image");
    Ok(())
}

fn stream_output<W: Write + ?Sized>(path: &Path, out: &mut W) -> Result<u64, PeriodicalError> {
    let retrieve = |source| PeriodicalError::Retrieve {
        path: path.to_path_buf(),
        source,
    };
    let mut mobi = File::open(path).map_err(retrieve)?;
    let bytes = io::copy(&mut mobi, out).map_err(retrieve)?;
    out.flush().map_err(retrieve)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::test_support::sample_issue;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::process::ExitStatus;

    /// Stands in for kindlegen: records the scratch dir and optionally writes
    /// a fake MOBI.
    struct FakeCompiler {
        output: Option<&'static [u8]>,
        fail: bool,
        seen_dir: RefCell<Option<PathBuf>>,
        seen_files: RefCell<BTreeSet<String>>,
    }

    impl FakeCompiler {
        fn producing(output: &'static [u8]) -> Self {
            Self {
                output: Some(output),
                fail: false,
                seen_dir: RefCell::new(None),
                seen_files: RefCell::new(BTreeSet::new()),
            }
        }

        fn silent() -> Self {
            Self { output: None, ..Self::producing(b"") }
        }

        fn failing() -> Self {
            Self { fail: true, ..Self::producing(b"") }
        }

        fn scratch_dir(&self) -> PathBuf {
            self.seen_dir.borrow().clone().expect("compiler was not invoked")
        }
    }

    impl Compiler for FakeCompiler {
        fn compile(&self, dir: &Path, manifest: &str, output: &str) -> Result<(), PeriodicalError> {
            assert_eq!(manifest, OPF_FILENAME);
            assert_eq!(output, MOBI_FILENAME);
            *self.seen_dir.borrow_mut() = Some(dir.to_path_buf());
            for entry in fs::read_dir(dir).unwrap() {
                let name = entry.unwrap().file_name().to_string_lossy().into_owned();
                self.seen_files.borrow_mut().insert(name);
            }
            if self.fail {
                return Err(PeriodicalError::CompilerFailed {
                    status: failed_status(),
                    output: "Error(prcgen): bad manifest".to_string(),
                });
            }
            if let Some(bytes) = self.output {
                fs::write(dir.join(output), bytes).unwrap();
            }
            Ok(())
        }
    }

    #[cfg(unix)]
    fn failed_status() -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(1 << 8)
    }

    #[cfg(windows)]
    fn failed_status() -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(1)
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("cover stream broke"))
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn issue_with_content() -> Issue {
        let mut issue = sample_issue();
        let mut n = 0;
        for section in &mut issue.sections {
            for article in &mut section.articles {
                n += 1;
                article.content = format!("<body>Content {}</body>", n);
            }
        }
        issue.cover_image = Some(Box::new(Cursor::new(b"GIF89a-cover".to_vec())));
        issue
    }

    #[test]
    fn test_populate_writes_full_file_set() {
        let tmp = tempfile::tempdir().unwrap();
        let mut issue = prepare(issue_with_content()).unwrap();
        let written = populate(tmp.path(), &mut issue).unwrap();

        assert_eq!(
            written,
            [
                "content.opf",
                "contents.html",
                "nav-contents.ncx",
                "000000.html",
                "000001.html",
                "000002.html",
                "000003.html",
                "cover-image.gif",
            ]
        );
        let on_disk: BTreeSet<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(on_disk.len(), 8);
        assert_eq!(on_disk.iter().filter(|f| *f != COVER_FILENAME).count(), 7);
    }

    #[test]
    fn test_populate_writes_article_bodies_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let mut issue = prepare(issue_with_content()).unwrap();
        populate(tmp.path(), &mut issue).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("000000.html")).unwrap(),
            "<body>Content 1</body>"
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join("000003.html")).unwrap(),
            "<body>Content 4</body>"
        );
        assert_eq!(fs::read(tmp.path().join(COVER_FILENAME)).unwrap(), b"GIF89a-cover");
    }

    #[test]
    fn test_populate_documents_match_renderers() {
        let tmp = tempfile::tempdir().unwrap();
        let mut issue = prepare(sample_issue()).unwrap();
        populate(tmp.path(), &mut issue).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join(OPF_FILENAME)).unwrap(),
            include_str!("../fixtures/content.opf")
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join(NAV_FILENAME)).unwrap(),
            include_str!("../fixtures/nav-contents.ncx")
        );
    }

    #[test]
    fn test_generate_mobi_streams_compiler_output() {
        let compiler = FakeCompiler::producing(b"BOOKMOBI-fake");
        let mut out = Vec::new();
        let bytes = generate_mobi(issue_with_content(), &compiler, &mut out).unwrap();

        assert_eq!(bytes, 13);
        assert_eq!(out, b"BOOKMOBI-fake");
        assert!(compiler.seen_files.borrow().contains(OPF_FILENAME));
        assert!(compiler.seen_files.borrow().contains(COVER_FILENAME));
        assert_eq!(compiler.seen_files.borrow().len(), 8);
        assert!(!compiler.scratch_dir().exists());
    }

    #[test]
    fn test_scratch_dir_is_named_after_issue() {
        let compiler = FakeCompiler::producing(b"x");
        generate_mobi(issue_with_content(), &compiler, &mut Vec::new()).unwrap();
        let name = compiler.scratch_dir().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("mobi_periodical_TestID_"));
    }

    #[test]
    fn test_generate_mobi_synthesizes_missing_cover() {
        let compiler = FakeCompiler::producing(b"x");
        let mut issue = issue_with_content();
        issue.cover_image = None;
        generate_mobi(issue, &compiler, &mut Vec::new()).unwrap();
        assert!(compiler.seen_files.borrow().contains(COVER_FILENAME));
    }

    #[test]
    fn test_compiler_failure_cleans_up() {
        let compiler = FakeCompiler::failing();
        let mut out = Vec::new();
        let err = generate_mobi(issue_with_content(), &compiler, &mut out).unwrap_err();

        assert!(matches!(err, PeriodicalError::CompilerFailed { .. }));
        assert!(err.to_string().contains("bad manifest"));
        assert!(out.is_empty());
        assert!(!compiler.scratch_dir().exists());
    }

    #[test]
    fn test_missing_output_is_retrieve_error() {
        let compiler = FakeCompiler::silent();
        let err = generate_mobi(issue_with_content(), &compiler, &mut Vec::new()).unwrap_err();

        match err {
            PeriodicalError::Retrieve { path, .. } => assert!(path.ends_with(MOBI_FILENAME)),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!compiler.scratch_dir().exists());
    }

    #[test]
    fn test_broken_sink_is_retrieve_error() {
        let compiler = FakeCompiler::producing(b"BOOKMOBI");
        let err = generate_mobi(issue_with_content(), &compiler, &mut BrokenSink).unwrap_err();
        assert!(matches!(err, PeriodicalError::Retrieve { .. }));
        assert!(!compiler.scratch_dir().exists());
    }

    #[test]
    fn test_broken_cover_stream_aborts_before_compiling() {
        let compiler = FakeCompiler::producing(b"x");
        let mut issue = issue_with_content();
        issue.cover_image = Some(Box::new(BrokenReader));
        let err = generate_mobi(issue, &compiler, &mut Vec::new()).unwrap_err();

        assert!(matches!(err, PeriodicalError::CoverCopy(_)));
        assert!(compiler.seen_dir.borrow().is_none());
    }

    #[test]
    fn test_render_to_dir_leaves_files_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out");
        let issue = render_to_dir(issue_with_content(), &target).unwrap();

        assert_eq!(issue.unique_id, "TestID");
        assert!(target.join(OPF_FILENAME).is_file());
        assert!(target.join("000002.html").is_file());
        assert!(target.join(COVER_FILENAME).is_file());
    }
}
