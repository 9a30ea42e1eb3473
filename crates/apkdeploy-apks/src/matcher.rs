//! Selection of the APKs that serve one device.
//!
//! Selection happens in two steps. First the best variant is chosen: the
//! highest `min_sdk` the device supports, split variants before standalone
//! ones, then the device's most preferred ABI. Then, for each requested
//! module of that variant, the master APK is combined with the configuration
//! splits matching the device:
//!
//! - ABI: the split for the most preferred device ABI that has one
//! - screen density: the smallest density at or above the device's, or the
//!   largest available when the device exceeds them all
//! - language: every split whose language is one of the device's
//!
//! Standalone APKs that carry targeting are filtered by the same rules, so a
//! standalone variant built per ABI yields only the APK for the device.

use crate::{
    ApkDescription, ApkKind, ApkSet, ApksError, ApksResult, BASE_MODULE_NAME, BuildApksResult,
    Variant,
};
use apkdeploy_device::DeviceSpec;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Matches the APKs of a table of contents against a device spec.
pub struct ApkMatcher<'a> {
    spec: &'a DeviceSpec,
    modules: Option<&'a BTreeSet<String>>,
}

impl<'a> ApkMatcher<'a> {
    /// Match every module of the selected variant.
    #[must_use]
    pub fn new(spec: &'a DeviceSpec) -> Self {
        Self {
            spec,
            modules: None,
        }
    }

    /// Restrict matching to `modules`; the base module is always included.
    ///
    /// The filter is ignored when the device receives a standalone APK.
    #[must_use]
    pub fn with_modules(mut self, modules: &'a BTreeSet<String>) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Pick the variant that best serves the device.
    pub fn select_variant<'t>(&self, toc: &'t BuildApksResult) -> ApksResult<&'t Variant> {
        // Reversed so that ties go to the variant listed first.
        toc.variants
            .iter()
            .rev()
            .filter(|variant| self.variant_matches(variant))
            .max_by_key(|variant| {
                (
                    variant.targeting.min_sdk,
                    !variant.is_standalone(),
                    Reverse(self.abi_rank(&variant.targeting.abis)),
                )
            })
            .ok_or_else(|| {
                ApksError::IncompatibleDevice(format!(
                    "no variant of '{}' supports a device with SDK {} and ABIs [{}]",
                    toc.package_name,
                    self.spec.sdk_version,
                    self.spec.supported_abis.join(", ")
                ))
            })
    }

    /// The APKs to install, base module first and master APKs before splits.
    pub fn matching_apks<'t>(
        &self,
        toc: &'t BuildApksResult,
    ) -> ApksResult<Vec<&'t ApkDescription>> {
        let variant = self.select_variant(toc)?;
        let standalone = variant.is_standalone();

        if standalone {
            if self.modules.is_some() {
                tracing::debug!(
                    variant = variant.variant_number,
                    "Ignoring module selection for standalone variant"
                );
            }
        } else if let Some(modules) = self.modules {
            if let Some(unknown) = modules.iter().find(|m| variant.apk_set(m).is_none()) {
                return Err(ApksError::UnknownModule(unknown.clone()));
            }
        }

        let base = variant.apk_set(BASE_MODULE_NAME);
        let others = variant
            .apk_sets
            .iter()
            .filter(|set| set.module_name != BASE_MODULE_NAME);

        let mut selected = Vec::new();
        for set in base.into_iter().chain(others) {
            if standalone || self.module_requested(&set.module_name) {
                selected.extend(self.select_from_set(set)?);
            }
        }

        tracing::debug!(
            variant = variant.variant_number,
            apks = selected.len(),
            "Matched APKs"
        );
        Ok(selected)
    }

    fn variant_matches(&self, variant: &Variant) -> bool {
        let targeting = &variant.targeting;
        targeting.min_sdk <= self.spec.sdk_version
            && (targeting.abis.is_empty()
                || targeting
                    .abis
                    .iter()
                    .any(|abi| self.spec.supported_abis.contains(abi)))
            && (variant.is_standalone() || !self.spec.requires_standalone())
    }

    /// Position of the most preferred device ABI in `abis`; lower is better.
    fn abi_rank(&self, abis: &[String]) -> usize {
        self.spec
            .supported_abis
            .iter()
            .position(|abi| abis.contains(abi))
            .unwrap_or(usize::MAX)
    }

    fn module_requested(&self, module: &str) -> bool {
        module == BASE_MODULE_NAME
            || self
                .modules
                .is_none_or(|modules| modules.contains(module))
    }

    fn select_from_set<'t>(&self, set: &'t ApkSet) -> ApksResult<Vec<&'t ApkDescription>> {
        let of_kind = |kind: ApkKind| -> Vec<&'t ApkDescription> {
            set.apks.iter().filter(|apk| apk.kind == kind).collect()
        };

        let standalones = of_kind(ApkKind::Standalone);
        let matching_standalones = self.filter_targeted(&standalones, &set.module_name)?;
        if !standalones.is_empty() && matching_standalones.is_empty() {
            return Err(ApksError::IncompatibleDevice(format!(
                "no standalone APK of module '{}' matches the device",
                set.module_name
            )));
        }

        let mut selected = of_kind(ApkKind::Master);
        selected.extend(matching_standalones);
        selected.extend(self.filter_targeted(&of_kind(ApkKind::Split), &set.module_name)?);
        Ok(selected)
    }

    /// Keep the APKs whose ABI, density and language targeting suit the device.
    fn filter_targeted<'t>(
        &self,
        apks: &[&'t ApkDescription],
        module: &str,
    ) -> ApksResult<Vec<&'t ApkDescription>> {
        let abi = self.best_abi(apks, module)?;
        let density = best_density(apks, self.spec.screen_density);
        let languages: BTreeSet<&str> = self.spec.languages().collect();

        Ok(apks
            .iter()
            .copied()
            .filter(|apk| {
                let targeting = &apk.targeting;
                targeting.abi.as_deref().is_none_or(|a| Some(a) == abi)
                    && targeting.screen_density.is_none_or(|d| Some(d) == density)
                    && targeting
                        .language
                        .as_deref()
                        .is_none_or(|language| languages.contains(language))
            })
            .collect())
    }

    fn best_abi<'t>(
        &self,
        apks: &[&'t ApkDescription],
        module: &str,
    ) -> ApksResult<Option<&'t str>> {
        let available: Vec<&str> = apks
            .iter()
            .filter_map(|apk| apk.targeting.abi.as_deref())
            .collect();
        if available.is_empty() {
            return Ok(None);
        }

        self.spec
            .supported_abis
            .iter()
            .find_map(|abi| available.iter().copied().find(|a| *a == abi.as_str()))
            .map(Some)
            .ok_or_else(|| {
                ApksError::IncompatibleDevice(format!(
                    "module '{module}' has native code for [{}] but the device supports [{}]",
                    available.join(", "),
                    self.spec.supported_abis.join(", ")
                ))
            })
    }
}

fn best_density(apks: &[&ApkDescription], device_density: u32) -> Option<u32> {
    let available: BTreeSet<u32> = apks
        .iter()
        .filter_map(|apk| apk.targeting.screen_density)
        .collect();

    available
        .range(device_density..)
        .next()
        .or_else(|| available.last())
        .copied()
}
