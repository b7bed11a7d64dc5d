use paintstats_common::{PaintStatsError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Output path for `suffix`: the input's `.json` extension is replaced by
/// `suffix`, or `suffix` is appended when the input has no such extension.
///
/// `paint-metrics.json` + `-deltas.html` → `paint-metrics-deltas.html`
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".json").unwrap_or(&name);
    input.with_file_name(format!("{stem}{suffix}"))
}

/// Write every `(path, contents)` pair, all or nothing.
///
/// Each document is first written to a temp file next to its destination; the
/// temp files are only renamed into place once all of them were written.
pub fn write_atomically(files: &[(PathBuf, String)]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| PaintStatsError::Io(format!("{}: {e}", dir.display())))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| PaintStatsError::Io(format!("{}: {e}", tmp.path().display())))?;
        debug!(path = %path.display(), bytes = contents.len(), "staged output");
        staged.push((tmp, path));
    }

    for (tmp, path) in staged {
        tmp.persist(path)
            .map_err(|e| PaintStatsError::Io(format!("{}: {}", path.display(), e.error)))?;
        info!(path = %path.display(), "wrote chart");
    }
    Ok(())
}
