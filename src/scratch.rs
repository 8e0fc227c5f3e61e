//! Scratch directory housekeeping.
//!
//! The frame source writes into a scratch directory that outlives the run,
//! so a later run without a frame source can reuse the frames. Before a fresh
//! extraction, stale frames are cleared so that a shorter new sequence is
//! not extended by leftovers from a longer old one.

use std::fs;
use std::path::Path;

use crate::enumerate::FramePattern;
use crate::error::StripError;

/// Create `directory` and any missing parents.
pub fn ensure_dir<P: AsRef<Path>>(directory: P) -> Result<(), StripError> {
    fs::create_dir_all(directory.as_ref())?;
    Ok(())
}

/// Delete every file in `directory` whose name matches `pattern`.
///
/// Files not produced by the pattern are left alone. Returns how many
/// frames were removed.
pub fn clear_frames<P: AsRef<Path>>(
    directory: P,
    pattern: &FramePattern,
) -> Result<usize, StripError> {
    let directory = directory.as_ref();
    let mut removed = 0;

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let is_frame = entry
            .file_name()
            .to_str()
            .and_then(|name| pattern.index_of(name))
            .is_some();
        if is_frame {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    if removed > 0 {
        log::debug!(
            "Cleared {removed} stale frame(s) from {}",
            directory.display()
        );
    }
    Ok(removed)
}
