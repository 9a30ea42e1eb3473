//! Reading APK sets from zip archives or extracted directories.

use crate::checksum::{compute_sha256, verify_sha256};
use crate::{ApkDescription, ApksError, ApksResult, BuildApksResult, TOC_FILE};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// An opened APK set.
pub enum ApkSetArchive {
    /// A `.apks` zip file.
    Zip(ZipArchive<File>),
    /// A directory holding an already-extracted APK set.
    Directory(PathBuf),
}

impl ApkSetArchive {
    /// Open an APK set file or directory.
    pub fn open<P: AsRef<Path>>(path: P) -> ApksResult<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self::Zip(ZipArchive::new(file)?))
    }

    /// Whether the APK set is an extracted directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// Whether `path` exists in the APK set.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        match self {
            Self::Zip(archive) => archive.file_names().any(|name| name == path),
            Self::Directory(root) => root.join(path).is_file(),
        }
    }

    /// Read and validate the table of contents.
    pub fn read_toc(&mut self) -> ApksResult<BuildApksResult> {
        let json = String::from_utf8(self.read(TOC_FILE)?)
            .map_err(|_| ApksError::InvalidApkSet(format!("{TOC_FILE} is not valid UTF-8")))?;
        let toc = BuildApksResult::from_json(&json)?;
        toc.validate(|path| self.contains(path))?;

        tracing::debug!(
            package = %toc.package_name,
            variants = toc.variants.len(),
            "Read APK set table of contents"
        );
        Ok(toc)
    }

    /// Make `apks` available as files, verifying checksums when present.
    ///
    /// Zip entries are written below `output_dir`, keeping their relative
    /// paths. A directory APK set is used in place unless `output_dir` is
    /// given, in which case the files are copied there.
    pub fn materialize(
        &mut self,
        apks: &[&ApkDescription],
        output_dir: Option<&Path>,
    ) -> ApksResult<Vec<PathBuf>> {
        let root = match (&*self, output_dir) {
            (Self::Directory(root), None) => {
                let root = root.clone();
                return apks
                    .iter()
                    .map(|apk| -> ApksResult<PathBuf> {
                        let path = root.join(&apk.path);
                        if let Some(expected) = &apk.checksum {
                            check_checksum(&apk.path, &fs::read(&path)?, expected)?;
                        }
                        Ok(path)
                    })
                    .collect();
            }
            (_, Some(dir)) => dir,
            (Self::Zip(_), None) => {
                return Err(ApksError::InvalidApkSet(
                    "an output directory is required to extract from an APK set file".to_string(),
                ));
            }
        };

        fs::create_dir_all(root)?;
        let mut extracted = Vec::with_capacity(apks.len());
        for apk in apks {
            let contents = self.read(&apk.path)?;
            if let Some(expected) = &apk.checksum {
                check_checksum(&apk.path, &contents, expected)?;
            }

            let output_path = root.join(&apk.path);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, &contents)?;
            tracing::debug!(path = %output_path.display(), "Extracted APK");
            extracted.push(output_path);
        }
        Ok(extracted)
    }

    fn read(&mut self, path: &str) -> ApksResult<Vec<u8>> {
        match self {
            Self::Zip(archive) => {
                let mut file = archive
                    .by_name(path)
                    .map_err(|_| ApksError::MissingFile(path.to_string()))?;
                let mut contents = Vec::new();
                file.read_to_end(&mut contents)?;
                Ok(contents)
            }
            Self::Directory(root) => {
                let full_path = root.join(path);
                if !full_path.is_file() {
                    return Err(ApksError::MissingFile(path.to_string()));
                }
                Ok(fs::read(full_path)?)
            }
        }
    }
}

fn check_checksum(path: &str, contents: &[u8], expected: &str) -> ApksResult<()> {
    if verify_sha256(contents, expected) {
        return Ok(());
    }
    Err(ApksError::ChecksumMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: format!("sha256:{}", compute_sha256(contents)),
    })
}
