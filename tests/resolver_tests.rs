//! Tests for release and product resolution
//!
//! These tests verify:
//! - Release answers normalise to the canonical name
//! - Added-forward and valid-backward boundaries with concrete catalog rows
//! - The parallel_products keyword bundle

use mpm_wizard::logic::resolver::{PARALLEL_PRODUCTS_KEYWORD, resolve_products};
use mpm_wizard::logic::selection::{select_products, select_release};
use mpm_wizard::{Platform, Release};

// =============================================================================
// Linux R2020a
// =============================================================================

#[test]
fn test_lowercase_release_normalises() {
    let release = select_release("r2020a", Platform::Linux, Release::LATEST).unwrap();
    assert_eq!(release, Release::R2020a);
    assert_eq!(release.to_string(), "R2020a");
}

#[test]
fn test_linux_r2020a_boundaries() {
    let products = resolve_products(Platform::Linux, Release::R2020a);

    // Added at exactly R2020a
    assert!(products.contains("Simulink_Compiler"));
    // Valid through R2024b, and R2020a <= R2024b
    assert!(products.contains("Filter_Design_HDL_Coder"));
    // Valid through R2018b only
    assert!(!products.contains("MATLAB_Distributed_Computing_Server"));
    // Renamed successor, added R2019a
    assert!(products.contains("MATLAB_Parallel_Server"));
}

#[test]
fn test_linux_r2019b_excludes_next_release_additions() {
    let products = resolve_products(Platform::Linux, Release::R2019b);
    assert!(!products.contains("Simulink_Compiler"));
    assert!(products.contains("LTE_HDL_Toolbox"));
    assert!(!resolve_products(Platform::Linux, Release::R2020a).contains("LTE_HDL_Toolbox"));
}

#[test]
fn test_retired_product_gone_after_key_release() {
    assert!(resolve_products(Platform::Linux, Release::R2024b).contains("Filter_Design_HDL_Coder"));
    assert!(!resolve_products(Platform::Linux, Release::R2025a).contains("Filter_Design_HDL_Coder"));
}

// =============================================================================
// Apple Silicon defaults
// =============================================================================

#[test]
fn test_mac_arm_empty_answers_select_everything() {
    let release = select_release("", Platform::MacOsArm, Release::LATEST).unwrap();
    assert_eq!(release, Release::R2025b);

    let products = select_products("", Platform::MacOsArm, release).unwrap();
    let expected: Vec<String> = resolve_products(Platform::MacOsArm, Release::R2025b)
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(products, expected);
    assert!(products.contains(&"MATLAB".to_string()));
    assert!(!products.contains(&"Filter_Design_HDL_Coder".to_string()));
}

#[test]
fn test_mac_arm_rejects_older_releases() {
    assert!(select_release("R2023a", Platform::MacOsArm, Release::LATEST).is_err());
    assert!(select_release("R2023a", Platform::MacOsIntel, Release::LATEST).is_ok());
}

// =============================================================================
// parallel_products keyword
// =============================================================================

#[test]
fn test_parallel_bundle_up_to_r2018b() {
    for release in [Release::R2017b, Release::R2018a, Release::R2018b] {
        let products = select_products(PARALLEL_PRODUCTS_KEYWORD, Platform::Linux, release).unwrap();
        assert_eq!(
            products,
            vec![
                "MATLAB",
                "Parallel_Computing_Toolbox",
                "MATLAB_Distributed_Computing_Server"
            ]
        );
    }
}

#[test]
fn test_parallel_bundle_after_r2018b() {
    for platform in [Platform::Windows, Platform::Linux, Platform::MacOsIntel] {
        let products = select_products(PARALLEL_PRODUCTS_KEYWORD, platform, Release::R2019a).unwrap();
        assert_eq!(
            products,
            vec!["MATLAB", "Parallel_Computing_Toolbox", "MATLAB_Parallel_Server"]
        );
    }
}
