//! Ledger persistence with file locking.
//!
//! Saves are atomic (temp file + rename). Loads are strict: a missing file is
//! `NotFound`, an unparsable one is `CorruptData`, and neither ever yields a
//! partially loaded ledger.

use crate::{Error, Ledger, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Save a ledger to a file with exclusive locking
///
/// Atomically writes the ledger by:
/// 1. Writing to a temp file in the destination directory
/// 2. Syncing to disk
/// 3. Renaming over the original
pub fn save_ledger(ledger: &Ledger, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        ledger.serialize_all(&mut writer)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!(
        "Saved ledger ({} goals, score {}) to {:?}",
        ledger.len(),
        ledger.score(),
        path
    );
    Ok(())
}

/// Load a ledger from a file with shared locking
pub fn load_ledger(path: &Path) -> Result<Ledger> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    let ledger = Ledger::parse(contents.as_bytes())?;
    tracing::debug!("Loaded ledger with {} goals from {:?}", ledger.len(), path);
    Ok(ledger)
}

/// Load the working ledger, starting fresh if it has never been saved
///
/// A corrupt file is still an error; it is never silently replaced.
pub fn load_or_default(path: &Path) -> Result<Ledger> {
    match load_ledger(path) {
        Err(Error::NotFound(_)) => {
            tracing::info!("No ledger file at {:?}, starting empty", path);
            Ok(Ledger::new())
        }
        other => other,
    }
}
