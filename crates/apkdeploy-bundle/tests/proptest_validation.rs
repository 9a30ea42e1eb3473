//! Property-based tests for APEX module validation
//!
//! A module of the APEX family validates iff its file set is exactly the two
//! required manifests plus the images its targeting config names.

use apkdeploy_bundle::validation::{validate_all_modules, validate_module};
use apkdeploy_bundle::{Abi, ApexImages, AppManifest, ModuleBuilder};
use proptest::prelude::*;

// Strategy: targeted image paths under apex/
fn arb_targeted_images() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z0-9]{1,8}", 1..5)
        .prop_map(|names| names.into_iter().map(|n| format!("apex/{n}.img")).collect())
}

// Strategy: files no rule accounts for (never collide with targeted images)
fn arb_extra_files() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            "[a-z]{1,5}".prop_map(|n| format!("apex/extra_{n}.img")),
            "[a-z]{1,5}".prop_map(|n| format!("root/{n}.txt")),
            "[a-z]{1,5}".prop_map(|n| format!("lib/{n}.so")),
        ],
        0..3,
    )
}

proptest! {
    /// Property: validation succeeds iff files == required ∪ targeted
    #[test]
    fn proptest_apex_module_valid_iff_exact_file_set(
        targeted in arb_targeted_images(),
        present_mask in prop::collection::vec(any::<bool>(), 5),
        extras in arb_extra_files(),
        has_manifest in any::<bool>(),
        has_apex_manifest in any::<bool>(),
    ) {
        let mut config = ApexImages::new();
        for path in &targeted {
            config = config.with_image(path, &[Abi::X86_64]);
        }

        let mut builder = ModuleBuilder::new("base").set_apex_config(config);
        if has_manifest {
            builder = builder.set_manifest(AppManifest::new("com.test.app"));
        }
        if has_apex_manifest {
            builder = builder.add_file("root/manifest.json");
        }
        let mut all_targeted_present = true;
        for (path, present) in targeted.iter().zip(present_mask.iter()) {
            if *present {
                builder = builder.add_file(path);
            } else {
                all_targeted_present = false;
            }
        }
        for extra in &extras {
            builder = builder.add_file(extra);
        }
        let module = builder.build();

        let expected_valid =
            has_manifest && has_apex_manifest && all_targeted_present && extras.is_empty();

        prop_assert_eq!(validate_module(&module).is_ok(), expected_valid);
    }

    /// Property: a lone APEX module never fails the bundle-wide rules
    #[test]
    fn proptest_single_apex_module_passes_bundle_rules(targeted in arb_targeted_images()) {
        let mut config = ApexImages::new();
        for path in &targeted {
            config = config.with_image(path, &[Abi::Arm64V8a]);
        }
        let module = ModuleBuilder::new("base").set_apex_config(config).build();

        prop_assert!(validate_all_modules(&[module]).is_ok());
    }

    /// Property: an APEX module alongside any other module fails the bundle rules
    #[test]
    fn proptest_apex_module_with_others_fails(others in 1usize..4) {
        let mut modules = vec![
            ModuleBuilder::new("base")
                .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
                .build(),
        ];
        for i in 0..others {
            modules.push(ModuleBuilder::new(&format!("feature{i}")).build());
        }

        prop_assert!(validate_all_modules(&modules).is_err());
    }
}
