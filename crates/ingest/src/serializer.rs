use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use rollcall_core::RosterDocument;
use tempfile::NamedTempFile;

use crate::error::ScrapeError;

/// Write `roster` as pretty-printed JSON, replacing `path` atomically.
///
/// The document goes to a temp file next to `path` and is renamed over it,
/// so a failed write leaves the previous file untouched. An existing file keeps
/// its permissions; a new one gets the usual `0644`.
pub fn write_roster(path: &Path, roster: &RosterDocument) -> Result<(), ScrapeError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ScrapeError::io(path, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, roster)
            .map_err(|e| ScrapeError::io(path, e.into()))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| ScrapeError::io(path, e))?;
    }
    if let Some(permissions) = target_permissions(path) {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| ScrapeError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| ScrapeError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| ScrapeError::io(path, e.error))?;

    tracing::info!(path = %path.display(), members = roster.len(), "roster written");
    Ok(())
}

/// Temp files are created owner-only; the renamed file should not be.
fn target_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(path) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

pub fn read_roster(path: &Path) -> Result<RosterDocument, ScrapeError> {
    let file = File::open(path).map_err(|e| ScrapeError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ScrapeError::io(path, e.into()))
}
