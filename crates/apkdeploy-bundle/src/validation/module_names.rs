//! Rules over module names.

use super::{ValidationError, ValidationResult};
use crate::BundleModule;
use std::collections::HashSet;

pub(super) fn check_module_name(module: &BundleModule) -> ValidationResult<()> {
    let name = module.name();
    let invalid = |reason: &str| ValidationError::InvalidModuleName {
        module: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("name must not be empty"));
    };
    if !first.is_ascii_alphabetic() {
        return Err(invalid("name must start with a letter"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            "name may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

pub(super) fn check_unique_module_names(modules: &[BundleModule]) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    match modules.iter().find(|module| !seen.insert(module.name())) {
        Some(duplicate) => Err(ValidationError::DuplicateModuleName {
            module: duplicate.name().to_string(),
        }),
        None => Ok(()),
    }
}
