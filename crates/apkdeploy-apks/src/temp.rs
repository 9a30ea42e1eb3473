//! Scoped scratch directories.

use std::path::Path;

const TEMP_PREFIX: &str = "apkdeploy-";

/// Run `f` with a fresh scratch directory that is removed afterwards.
///
/// The directory is removed whether `f` succeeds, fails or panics. When `f`
/// succeeds a removal failure is returned; when it fails its error wins and
/// the removal failure is only logged.
pub fn with_temp_directory<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce(&Path) -> Result<T, E>,
    E: From<std::io::Error>,
{
    let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
    let path = dir.path().to_path_buf();
    tracing::debug!(path = %path.display(), "Created scratch directory");

    let result = f(&path);

    match (result, dir.close()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(err), cleanup) => {
            if let Err(e) = cleanup {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove scratch directory"
                );
            }
            Err(err)
        }
    }
}
