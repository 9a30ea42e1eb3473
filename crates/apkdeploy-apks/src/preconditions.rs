//! Input path checks run before any device is contacted.

use crate::{ApksError, ApksResult};
use std::fs::File;
use std::path::Path;

/// Require `path` to be an existing directory.
pub fn check_directory_exists(path: &Path) -> ApksResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(invalid_input(path, "directory does not exist"))
    }
}

/// Require `path` to be a regular file the process can open.
pub fn check_file_exists_and_readable(path: &Path) -> ApksResult<()> {
    if !path.exists() {
        return Err(invalid_input(path, "file does not exist"));
    }
    if !path.is_file() {
        return Err(invalid_input(path, "not a regular file"));
    }
    File::open(path)
        .map(drop)
        .map_err(|e| invalid_input(path, &format!("file is not readable: {e}")))
}

/// Require `path` to be a file the process can execute.
pub fn check_file_exists_and_executable(path: &Path) -> ApksResult<()> {
    check_file_exists_and_readable(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = path.metadata()?.permissions().mode();
        if mode & 0o111 == 0 {
            return Err(invalid_input(path, "file is not executable"));
        }
    }
    Ok(())
}

fn invalid_input(path: &Path, reason: &str) -> ApksError {
    ApksError::InvalidInput {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
