#![allow(non_snake_case)]

use super::*;
use crate::{Abi, AppManifest, ModuleBuilder};

const PKG_NAME: &str = "com.test.app";

fn apex_config() -> ApexImages {
    ApexImages::new().with_image("apex/x86.img", &[Abi::X86])
}

fn apex_module_builder() -> ModuleBuilder {
    ModuleBuilder::new("apexTestModule")
        .set_manifest(AppManifest::new(PKG_NAME))
        .set_apex_config(apex_config())
}

fn valid_apex_module() -> BundleModule {
    apex_module_builder()
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .build()
}

fn run_module_rules(module: &BundleModule) -> ValidationResult<()> {
    check_expected_files(module)?;
    check_no_unexpected_files(module)?;
    check_targeted_images_present(module)?;
    check_images_targeted(module)?;
    check_images_targeted_once(module)
}

#[test]
fn apex_rules___valid_apex_module___succeed() {
    assert!(run_module_rules(&valid_apex_module()).is_ok());
}

#[test]
fn apex_rules___non_apex_module___are_skipped() {
    let module = ModuleBuilder::new("base")
        .set_manifest(AppManifest::new(PKG_NAME))
        .add_file("dex/classes.dex")
        .add_file("apex/stray.img")
        .build();

    assert!(run_module_rules(&module).is_ok());
}

#[test]
fn check_no_unexpected_files___unexpected_file___fails() {
    let module = apex_module_builder()
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .add_file("root/unexpected.txt")
        .build();

    let err = run_module_rules(&module).unwrap_err();

    assert!(
        err.to_string()
            .contains("Unexpected file in APEX bundle: 'root/unexpected.txt'")
    );
}

#[test]
fn check_expected_files___missing_apex_manifest___fails() {
    let module = apex_module_builder().add_file("apex/x86.img").build();

    let err = run_module_rules(&module).unwrap_err();

    assert_eq!(
        err,
        ValidationError::MissingExpectedFile {
            module: "apexTestModule".to_string(),
            path: "root/manifest.json".to_string(),
        }
    );
    assert!(
        err.to_string()
            .contains("Missing expected file in APEX bundle")
    );
}

#[test]
fn check_expected_files___missing_app_manifest___fails() {
    let module = ModuleBuilder::new("apexTestModule")
        .set_apex_config(apex_config())
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .build();

    let err = check_expected_files(&module).unwrap_err();

    assert_eq!(
        err,
        ValidationError::MissingExpectedFile {
            module: "apexTestModule".to_string(),
            path: "manifest/AndroidManifest.json".to_string(),
        }
    );
}

#[test]
fn check_images_targeted___untargeted_image_file___fails() {
    let module = apex_module_builder()
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .add_file("apex/x86_64.img")
        .build();

    let err = run_module_rules(&module).unwrap_err();

    assert_eq!(
        err,
        ValidationError::UntargetedImages {
            module: "apexTestModule".to_string(),
            paths: vec!["apex/x86_64.img".to_string()],
        }
    );
    assert!(
        err.to_string()
            .contains("Found APEX image files that are not targeted")
    );
}

#[test]
fn check_targeted_images_present___missing_targeted_image___fails() {
    // No image files under apex/.
    let module = apex_module_builder().add_file("root/manifest.json").build();

    let err = run_module_rules(&module).unwrap_err();

    assert!(matches!(err, ValidationError::MissingTargetedImages { .. }));
    assert!(
        err.to_string()
            .contains("Targeted APEX image files are missing: apex/x86.img")
    );
}

#[test]
fn check_targeted_images_present___lists_every_missing_image() {
    let module = ModuleBuilder::new("apexTestModule")
        .set_manifest(AppManifest::new(PKG_NAME))
        .set_apex_config(
            ApexImages::new()
                .with_image("apex/x86.img", &[Abi::X86])
                .with_image("apex/x86_64.img", &[Abi::X86_64])
                .with_image("apex/arm64-v8a.img", &[Abi::Arm64V8a]),
        )
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .build();

    let err = check_targeted_images_present(&module).unwrap_err();

    assert_eq!(
        err,
        ValidationError::MissingTargetedImages {
            module: "apexTestModule".to_string(),
            paths: vec![
                "apex/arm64-v8a.img".to_string(),
                "apex/x86_64.img".to_string()
            ],
        }
    );
}

#[test]
fn check_images_targeted_once___image_targeted_twice___fails() {
    let module = ModuleBuilder::new("apexTestModule")
        .set_manifest(AppManifest::new(PKG_NAME))
        .set_apex_config(
            ApexImages::new()
                .with_image("apex/x86.img", &[Abi::X86])
                .with_image("apex/x86.img", &[Abi::X86_64]),
        )
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .build();

    let err = run_module_rules(&module).unwrap_err();

    assert_eq!(
        err,
        ValidationError::DuplicateTargetedImage {
            module: "apexTestModule".to_string(),
            path: "apex/x86.img".to_string(),
        }
    );
    assert!(err.to_string().contains("targeted more than once"));
}

#[test]
fn check_single_apex_module___single_apex_module___succeeds() {
    assert!(check_single_apex_module(&[valid_apex_module()]).is_ok());
}

#[test]
fn check_single_apex_module___no_apex_modules___succeeds() {
    let modules = vec![
        ModuleBuilder::new("base").build(),
        ModuleBuilder::new("feature").build(),
    ];

    assert!(check_single_apex_module(&modules).is_ok());
}

#[test]
fn check_single_apex_module___multiple_apex_modules___fails() {
    let modules = vec![valid_apex_module(), valid_apex_module()];

    let err = check_single_apex_module(&modules).unwrap_err();

    assert_eq!(err, ValidationError::MultipleApexModules { count: 2 });
    assert!(
        err.to_string()
            .contains("Multiple APEX modules are not allowed")
    );
}

#[test]
fn check_single_apex_module___apex_module_with_another___fails() {
    let another = ModuleBuilder::new("anotherModule")
        .set_manifest(AppManifest::new(PKG_NAME))
        .build();

    let err = check_single_apex_module(&[valid_apex_module(), another]).unwrap_err();

    assert_eq!(err, ValidationError::ApexWithOtherModules { count: 2 });
    assert!(
        err.to_string()
            .contains("APEX bundles must only contain one module")
    );
}
