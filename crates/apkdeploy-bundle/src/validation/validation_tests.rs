#![allow(non_snake_case)]

use super::*;
use crate::{Abi, ApexImages, AppManifest, ModuleBuilder};
use test_case::test_case;

fn valid_apex_module() -> BundleModule {
    ModuleBuilder::new("apexTestModule")
        .set_manifest(AppManifest::new("com.test.app"))
        .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
        .add_file("root/manifest.json")
        .add_file("apex/x86.img")
        .build()
}

#[test]
fn validate_module___valid_apex_module___succeeds() {
    assert!(validate_module(&valid_apex_module()).is_ok());
}

#[test]
fn validate_all_modules___single_apex_module___succeeds() {
    assert!(validate_all_modules(&[valid_apex_module()]).is_ok());
}

#[test]
fn validate_all_modules___same_apex_module_twice___reports_cardinality_first() {
    let module = valid_apex_module();

    let err = validate_all_modules(&[module.clone(), module]).unwrap_err();

    assert!(matches!(err, ValidationError::MultipleApexModules { .. }));
}

#[test]
fn validate_module___invalid_name___reported_before_apex_rules() {
    let module = ModuleBuilder::new("apex-module")
        .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
        .build();

    let err = validate_module(&module).unwrap_err();

    assert!(matches!(err, ValidationError::InvalidModuleName { .. }));
}

#[test]
fn validate_bundle___module_failure___stops_before_bundle_rules() {
    let broken = ModuleBuilder::new("base")
        .set_manifest(AppManifest::new("com.test.app"))
        .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
        .add_file("apex/x86.img")
        .build();
    let bundle = Bundle::new(vec![broken, valid_apex_module()], Vec::new());

    let err = validate_bundle(&bundle).unwrap_err();

    assert!(matches!(err, ValidationError::MissingExpectedFile { .. }));
}

#[test]
fn validate_bundle___ordinary_modules___succeed() {
    let bundle = Bundle::new(
        vec![
            ModuleBuilder::new("base")
                .set_manifest(AppManifest::new("com.test.app"))
                .add_file("dex/classes.dex")
                .build(),
            ModuleBuilder::new("feature")
                .set_manifest(AppManifest::new("com.test.app"))
                .add_file("assets/data.bin")
                .build(),
        ],
        Vec::new(),
    );

    assert!(validate_bundle(&bundle).is_ok());
}

#[test_case(
    ValidationError::UnexpectedFile { module: "m".into(), path: "x".into() },
    ValidationScope::Module("m".into())
    ; "unexpected file"
)]
#[test_case(
    ValidationError::UntargetedImages { module: "m".into(), paths: vec![] },
    ValidationScope::Module("m".into())
    ; "untargeted images"
)]
#[test_case(
    ValidationError::DuplicateTargetedImage { module: "m".into(), path: "apex/a.img".into() },
    ValidationScope::Module("m".into())
    ; "duplicate targeted image"
)]
#[test_case(
    ValidationError::DuplicateModuleName { module: "m".into() },
    ValidationScope::Module("m".into())
    ; "duplicate name"
)]
#[test_case(ValidationError::MultipleApexModules { count: 2 }, ValidationScope::Bundle ; "multiple apex")]
#[test_case(ValidationError::ApexWithOtherModules { count: 3 }, ValidationScope::Bundle ; "apex with others")]
fn ValidationError___scope___identifies_offender(error: ValidationError, expected: ValidationScope) {
    assert_eq!(error.scope(), expected);
}

#[test]
fn ValidationError___untargeted_images___joins_paths() {
    let err = ValidationError::UntargetedImages {
        module: "base".to_string(),
        paths: vec!["apex/a.img".to_string(), "apex/b.img".to_string()],
    };

    assert_eq!(
        err.to_string(),
        "Found APEX image files that are not targeted: apex/a.img, apex/b.img (module 'base')."
    );
}
