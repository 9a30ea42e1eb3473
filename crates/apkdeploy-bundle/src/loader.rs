//! Bundle loading utilities.
//!
//! The [`BundleLoader`] reads a bundle from a zip archive or from an already
//! extracted directory. Both forms go through the same module assembly and
//! the same validation.

use crate::validation::validate_bundle;
use crate::{
    APEX_CONFIG_FILE, ApexImages, AppManifest, Bundle, BundleError, BundleResult, MANIFEST_PATH,
    ModuleBuilder, RESERVED_DIRECTORIES,
};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Loader for app bundles.
///
/// # Example
///
/// ```no_run
/// use apkdeploy_bundle::BundleLoader;
///
/// let bundle = BundleLoader::open("extracted-bundle/")?;
/// println!("APEX bundle: {}", bundle.is_apex());
/// # Ok::<(), apkdeploy_bundle::BundleError>(())
/// ```
pub struct BundleLoader;

impl BundleLoader {
    /// Read and validate a bundle.
    ///
    /// A bundle that violates any packaging invariant is rejected with
    /// [`BundleError::Validation`].
    pub fn open<P: AsRef<Path>>(path: P) -> BundleResult<Bundle> {
        let bundle = Self::read(path)?;
        validate_bundle(&bundle)?;
        Ok(bundle)
    }

    /// Read a bundle without validating it.
    pub fn read<P: AsRef<Path>>(path: P) -> BundleResult<Bundle> {
        let path = path.as_ref();
        let mut source = EntrySource::open(path)?;
        tracing::debug!(path = %path.display(), "Reading bundle");
        assemble(&mut source)
    }
}

/// Where bundle entries come from.
enum EntrySource {
    Zip(ZipArchive<File>),
    Directory(PathBuf),
}

impl EntrySource {
    fn open(path: &Path) -> BundleResult<Self> {
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self::Zip(ZipArchive::new(file)?))
    }

    /// All file entries, sorted, with `/` separators.
    fn entry_names(&self) -> BundleResult<Vec<String>> {
        let mut names = match self {
            Self::Zip(archive) => archive
                .file_names()
                .filter(|name| !name.ends_with('/'))
                .map(String::from)
                .collect(),
            Self::Directory(root) => {
                let mut names = Vec::new();
                collect_files(root, "", &mut names)?;
                names
            }
        };
        names.sort();
        Ok(names)
    }

    fn read_string(&mut self, name: &str) -> BundleResult<String> {
        match self {
            Self::Zip(archive) => {
                let mut file = archive.by_name(name).map_err(|_| {
                    BundleError::MissingFile(format!("File not found in bundle: {name}"))
                })?;
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                Ok(contents)
            }
            Self::Directory(root) => Ok(fs::read_to_string(root.join(name))?),
        }
    }
}

fn collect_files(dir: &Path, prefix: &str, names: &mut Vec<String>) -> BundleResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            file_name
        } else {
            format!("{prefix}/{file_name}")
        };

        if entry.file_type()?.is_dir() {
            collect_files(&entry.path(), &relative, names)?;
        } else {
            names.push(relative);
        }
    }
    Ok(())
}

fn assemble(source: &mut EntrySource) -> BundleResult<Bundle> {
    let mut builders: BTreeMap<String, ModuleBuilder> = BTreeMap::new();
    let mut metadata_files = Vec::new();

    for name in source.entry_names()? {
        let Some((module_name, relative)) = name
            .split_once('/')
            .filter(|(top, _)| !RESERVED_DIRECTORIES.contains(top))
            .map(|(top, rest)| (top.to_string(), rest.to_string()))
        else {
            metadata_files.push(name);
            continue;
        };

        let builder = builders
            .remove(&module_name)
            .unwrap_or_else(|| ModuleBuilder::new(&module_name));

        let builder = match relative.as_str() {
            MANIFEST_PATH => {
                let manifest = AppManifest::from_json(&source.read_string(&name)?)?;
                builder.set_manifest(manifest)
            }
            APEX_CONFIG_FILE => {
                let config = ApexImages::from_json(&source.read_string(&name)?)?;
                builder.set_apex_config(config)
            }
            _ => builder.add_file(&relative),
        };
        builders.insert(module_name, builder);
    }

    let mut modules = Vec::with_capacity(builders.len());
    for (name, builder) in builders {
        let module = builder.build();
        if module.manifest().is_none() {
            return Err(BundleError::MissingFile(format!("{name}/{MANIFEST_PATH}")));
        }
        modules.push(module);
    }

    if modules.is_empty() {
        return Err(BundleError::InvalidBundle(
            "bundle contains no modules".to_string(),
        ));
    }

    Ok(Bundle::new(modules, metadata_files))
}
