//! Bundle creation utilities.
//!
//! The [`BundleBuilder`] provides a fluent API for laying out bundle entries
//! and writing them either as a zip archive or as an extracted directory.

use crate::{APEX_CONFIG_FILE, ApexImages, AppManifest, BundleError, BundleResult, MANIFEST_PATH};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for bundle archives.
///
/// # Example
///
/// ```no_run
/// use apkdeploy_bundle::{Abi, ApexImages, AppManifest, BundleBuilder};
///
/// BundleBuilder::new()
///     .add_manifest("base", &AppManifest::new("com.example.app"))?
///     .add_apex_config("base", &ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))?
///     .add_bytes("base", "root/manifest.json", b"{}".to_vec())
///     .add_file("base", "apex/x86.img", "out/x86.img")?
///     .write("my-app.aab")?;
/// # Ok::<(), apkdeploy_bundle::BundleError>(())
/// ```
#[derive(Debug, Default)]
pub struct BundleBuilder {
    files: Vec<BundleFile>,
}

/// A file to include in the bundle.
#[derive(Debug)]
struct BundleFile {
    /// Path within the bundle archive.
    archive_path: String,
    /// File contents.
    contents: Vec<u8>,
}

impl BundleBuilder {
    /// Create an empty bundle builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the application manifest of a module.
    pub fn add_manifest(self, module: &str, manifest: &AppManifest) -> BundleResult<Self> {
        let json = manifest.to_json()?;
        Ok(self.add_bytes(module, MANIFEST_PATH, json.into_bytes()))
    }

    /// Add the image targeting config of a module.
    pub fn add_apex_config(self, module: &str, config: &ApexImages) -> BundleResult<Self> {
        let json = config.to_json()?;
        Ok(self.add_bytes(module, APEX_CONFIG_FILE, json.into_bytes()))
    }

    /// Add a module file from disk.
    pub fn add_file<P: AsRef<Path>>(
        self,
        module: &str,
        path: &str,
        source_path: P,
    ) -> BundleResult<Self> {
        let source_path = source_path.as_ref();
        let contents = fs::read(source_path).map_err(|e| {
            BundleError::MissingFile(format!("{}: {}", source_path.display(), e))
        })?;
        Ok(self.add_bytes(module, path, contents))
    }

    /// Add a module file from bytes.
    #[must_use]
    pub fn add_bytes(mut self, module: &str, path: &str, contents: Vec<u8>) -> Self {
        self.files.push(BundleFile {
            archive_path: format!("{module}/{path}"),
            contents,
        });
        self
    }

    /// Add a file outside any module (e.g. under `BUNDLE-METADATA/`).
    #[must_use]
    pub fn add_metadata(mut self, archive_path: &str, contents: Vec<u8>) -> Self {
        self.files.push(BundleFile {
            archive_path: archive_path.to_string(),
            contents,
        });
        self
    }

    /// Write the bundle to a zip file.
    pub fn write<P: AsRef<Path>>(self, output_path: P) -> BundleResult<()> {
        let file = File::create(output_path.as_ref())?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for bundle_file in &self.files {
            zip.start_file(&bundle_file.archive_path, options)?;
            zip.write_all(&bundle_file.contents)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write the bundle as an extracted directory tree.
    pub fn write_directory<P: AsRef<Path>>(self, output_dir: P) -> BundleResult<()> {
        let output_dir = output_dir.as_ref();

        for bundle_file in &self.files {
            let target = output_dir.join(&bundle_file.archive_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &bundle_file.contents)?;
        }

        Ok(())
    }
}
