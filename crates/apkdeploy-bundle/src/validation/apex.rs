//! Rules for APEX (system image) modules.
//!
//! An APEX module holds exactly the application manifest, the embedded APEX
//! manifest and the images its targeting config names. Every image under
//! `apex/` must be targeted by exactly one entry and every targeted image
//! must exist.

use super::{ValidationError, ValidationResult};
use crate::module::is_apex_image_path;
use crate::{APEX_MANIFEST_PATH, ApexImages, BundleModule, MANIFEST_PATH};
use std::collections::BTreeSet;

const REQUIRED_FILES: &[&str] = &[MANIFEST_PATH, APEX_MANIFEST_PATH];

fn targeted_paths(config: &ApexImages) -> BTreeSet<&str> {
    config.image_paths().collect()
}

pub(super) fn check_expected_files(module: &BundleModule) -> ValidationResult<()> {
    if module.apex_config().is_none() {
        return Ok(());
    }

    match REQUIRED_FILES.iter().find(|path| !module.has_file(path)) {
        Some(path) => Err(ValidationError::MissingExpectedFile {
            module: module.name().to_string(),
            path: (*path).to_string(),
        }),
        None => Ok(()),
    }
}

pub(super) fn check_no_unexpected_files(module: &BundleModule) -> ValidationResult<()> {
    let Some(config) = module.apex_config() else {
        return Ok(());
    };
    let targeted = targeted_paths(config);

    // Stray images under apex/ are reported by the coverage rule instead.
    let unexpected = module.files().iter().find(|path| {
        !REQUIRED_FILES.contains(&path.as_str())
            && !targeted.contains(path.as_str())
            && !is_apex_image_path(path)
    });

    match unexpected {
        Some(path) => Err(ValidationError::UnexpectedFile {
            module: module.name().to_string(),
            path: path.clone(),
        }),
        None => Ok(()),
    }
}

pub(super) fn check_targeted_images_present(module: &BundleModule) -> ValidationResult<()> {
    let Some(config) = module.apex_config() else {
        return Ok(());
    };

    let missing: Vec<String> = targeted_paths(config)
        .into_iter()
        .filter(|path| !module.has_file(path))
        .map(String::from)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingTargetedImages {
            module: module.name().to_string(),
            paths: missing,
        })
    }
}

pub(super) fn check_images_targeted(module: &BundleModule) -> ValidationResult<()> {
    let Some(config) = module.apex_config() else {
        return Ok(());
    };
    let targeted = targeted_paths(config);

    let untargeted: Vec<String> = module
        .files()
        .iter()
        .filter(|path| is_apex_image_path(path) && !targeted.contains(path.as_str()))
        .cloned()
        .collect();

    if untargeted.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UntargetedImages {
            module: module.name().to_string(),
            paths: untargeted,
        })
    }
}

pub(super) fn check_images_targeted_once(module: &BundleModule) -> ValidationResult<()> {
    let Some(config) = module.apex_config() else {
        return Ok(());
    };

    let mut seen = BTreeSet::new();
    match config.image_paths().find(|path| !seen.insert(*path)) {
        Some(path) => Err(ValidationError::DuplicateTargetedImage {
            module: module.name().to_string(),
            path: path.to_string(),
        }),
        None => Ok(()),
    }
}

pub(super) fn check_single_apex_module(modules: &[BundleModule]) -> ValidationResult<()> {
    let apex_modules = modules.iter().filter(|module| module.is_apex()).count();

    if apex_modules == 0 {
        return Ok(());
    }
    if apex_modules > 1 {
        return Err(ValidationError::MultipleApexModules {
            count: apex_modules,
        });
    }
    if modules.len() > 1 {
        return Err(ValidationError::ApexWithOtherModules {
            count: modules.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "apex/apex_tests.rs"]
mod apex_tests;
