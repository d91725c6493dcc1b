//! Logic modules: pure decisions behind each wizard question.
//!
//! # Modules
//!
//! - `resolver`: release/platform to product set resolution
//! - `selection`: validation of release, product, license and yes/no answers

pub mod resolver;
pub mod selection;
