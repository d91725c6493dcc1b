//! Product Set Resolver
//!
//! Turns a (platform, release) pair into the set of product names mpm will
//! accept for that release.
//!
//! # Resolution Rules
//!
//! | Table            | Row is included when |
//! |------------------|----------------------|
//! | added-forward    | `release >= row release` |
//! | valid-backward   | `release <= row release` |
//!
//! The result is the union of every included row. A release with no rows of
//! its own resolves through the rows that bracket it.

use std::collections::BTreeSet;

use crate::catalog::{added_forward, valid_backward};
use crate::types::{Platform, Release};

/// Input keyword that installs the parallel computing bundle.
pub const PARALLEL_PRODUCTS_KEYWORD: &str = "parallel_products";

/// Last release that still shipped MATLAB_Distributed_Computing_Server.
pub const PARALLEL_SERVER_RENAME: Release = Release::R2018b;

/// Resolved product names. Ordered so listings and comparisons are deterministic.
pub type ProductSet = BTreeSet<&'static str>;

/// Resolve every product valid for `release` on `platform`.
pub fn resolve_products(platform: Platform, release: Release) -> ProductSet {
    let mut products = ProductSet::new();

    for (added_at, names) in added_forward(platform) {
        if release >= *added_at {
            products.extend(names.iter().copied());
        }
    }

    for (valid_until, names) in valid_backward(platform) {
        if release <= *valid_until {
            products.extend(names.iter().copied());
        }
    }

    products
}

/// The fixed product list behind [`PARALLEL_PRODUCTS_KEYWORD`].
///
/// Does not consult the catalog: the server product is picked purely by release.
pub fn parallel_bundle(release: Release) -> Vec<String> {
    let server = if release <= PARALLEL_SERVER_RENAME {
        "MATLAB_Distributed_Computing_Server"
    } else {
        "MATLAB_Parallel_Server"
    };

    ["MATLAB", "Parallel_Computing_Toolbox", server]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
