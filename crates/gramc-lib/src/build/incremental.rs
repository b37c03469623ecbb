//! Make-style up-to-date check.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::pipeline::{BuildError, DependencyLister};
use crate::source::GrammarFile;

/// Whether `file` has to be compiled again.
///
/// True when an output is missing, or when the grammar or any file it reads
/// is strictly newer than the oldest output. Inputs that no longer exist are
/// ignored.
pub fn needs_build<L>(file: &GrammarFile, lister: &L) -> Result<bool, BuildError>
where
    L: DependencyLister + ?Sized,
{
    let outputs = lister.generated_files(file)?;
    let mut oldest: Option<SystemTime> = None;
    for output in &outputs {
        match modified(output)? {
            Some(time) => oldest = Some(oldest.map_or(time, |o| o.min(time))),
            None => {
                tracing::debug!(grammar = %file, missing = %output.display(), "output missing");
                return Ok(true);
            }
        }
    }
    let Some(oldest) = oldest else {
        return Ok(true);
    };

    let grammar_time = modified(file.path())?.ok_or_else(|| BuildError::Timestamp {
        path: file.path().to_path_buf(),
        source: io::Error::from(io::ErrorKind::NotFound),
    })?;
    if grammar_time > oldest {
        return Ok(true);
    }

    for input in lister.dependency_files(file)? {
        if let Some(time) = modified(&input)?
            && time > oldest
        {
            tracing::debug!(grammar = %file, input = %input.display(), "input changed");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Modification time, `None` when the file does not exist.
fn modified(path: &Path) -> Result<Option<SystemTime>, BuildError> {
    let timestamp = |source| BuildError::Timestamp {
        path: path.to_path_buf(),
        source,
    };
    match fs::metadata(path) {
        Ok(meta) => meta.modified().map(Some).map_err(timestamp),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(timestamp(e)),
    }
}
