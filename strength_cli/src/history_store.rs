//! `WorkoutHistory` persistence with file locking.
//!
//! Mirrors the teacher's `UserMicrodoseState::{load,save,update}` pattern:
//! shared lock for reads, atomic temp-file-then-rename for writes. This
//! lives entirely in the CLI crate — the core engine never touches disk.

use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use strength_core::WorkoutHistory;
use tempfile::NamedTempFile;

/// Load workout history from a file with shared locking.
///
/// Returns an empty history if the file doesn't exist. If the file is
/// corrupted, logs a warning and returns an empty history rather than
/// failing the whole command.
pub fn load(path: &Path) -> strength_core::Result<WorkoutHistory> {
    if !path.exists() {
        tracing::info!("no history file found at {:?}, starting fresh", path);
        return Ok(WorkoutHistory::default());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("unable to open history file {:?}: {}. Using defaults.", path, e);
            return Ok(WorkoutHistory::default());
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("unable to lock history file {:?}: {}. Using defaults.", path, e);
        return Ok(WorkoutHistory::default());
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("failed to read history file {:?}: {}. Using defaults.", path, e);
        return Ok(WorkoutHistory::default());
    }
    file.unlock()?;

    match serde_json::from_str::<WorkoutHistory>(&contents) {
        Ok(history) => {
            tracing::debug!("loaded workout history from {:?}", path);
            Ok(history)
        }
        Err(e) => {
            tracing::warn!("failed to parse history file {:?}: {}. Using defaults.", path, e);
            Ok(WorkoutHistory::default())
        }
    }
}

/// Save workout history atomically: write to a temp file in the same
/// directory, sync, then rename over the original.
pub fn save(history: &WorkoutHistory, path: &Path) -> strength_core::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "history path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(history)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path)
        .map_err(|e| strength_core::Error::Io(e.error))?;

    tracing::debug!("saved workout history to {:?}", path);
    Ok(())
}

/// Load history, apply `f`, and save it back atomically.
///
/// The read-modify-write cycle is serialized process-wide with an
/// exclusive lock on a `.lock` sidecar next to `path`: locking the
/// target file itself wouldn't help here since `save` replaces it via
/// rename, which would silently drop the lock held on the old inode.
pub fn update<F>(path: &Path, f: F) -> strength_core::Result<WorkoutHistory>
where
    F: FnOnce(&mut WorkoutHistory) -> strength_core::Result<()>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_path = path.with_extension("json.lock");
    let lock_file = File::create(&lock_path)?;
    lock_file.lock_exclusive()?;

    let mut history = load(path)?;
    f(&mut history)?;
    save(&history, path)?;

    lock_file.unlock()?;
    Ok(history)
}
