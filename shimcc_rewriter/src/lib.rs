//! [Prologue](prologue) + [Rewriter](rewriter) -> one translation unit for the downstream compiler

pub mod error;
pub mod prologue;
pub mod rewriter;

pub use error::ShimError;
pub use prologue::Prologue;
pub use rewriter::Pipeline;

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// Rewrites a single source file, CRLF and CR line endings are read as LF
pub fn rewrite(source: &str) -> String {
    Pipeline::standard().rewrite(&normalize_newlines(source))
}

fn normalize_newlines(source: &str) -> Cow<str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Writes `prologue` followed by every rewritten file in `files` to `out`.
///
/// Files are processed strictly one after the other: each is read, rewritten and written before
/// the next one is opened. The first unreadable file stops the run, so everything written
/// before it stays in `out`.
pub fn emit<W: Write>(
    out: &mut W,
    prologue: Option<&Prologue>,
    files: &[PathBuf],
) -> Result<(), ShimError> {
    if let Some(prologue) = prologue {
        out.write_all(prologue.render().as_bytes())?;
    }

    for path in files {
        let source = read_source(path)?;
        log::debug!("rewriting {} ({} bytes)", path.display(), source.len());

        out.write_all(rewrite(&source).as_bytes())?;
    }
    out.flush()?;

    Ok(())
}

fn read_source(path: &Path) -> Result<String, ShimError> {
    fs::read_to_string(path).map_err(|source| ShimError::Read { path: path.into(), source })
}
