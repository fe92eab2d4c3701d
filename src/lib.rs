//! cosigner - edit code signing settings in Xcode projects
//!
//! This crate reads a `project.pbxproj` document, locates a target and one of
//! its build configurations, writes the code signing parameters into them,
//! and saves the document back in place.

pub mod core;
pub mod ops;
pub mod pbxproj;
pub mod util;

/// Test utilities for cosigner unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides canned project documents and helpers to put them on disk.
#[cfg(test)]
pub mod test_support;

pub use core::{CosignError, Project, SigningParams};
pub use ops::{cosign, CosignOptions, CosignReport};
pub use util::context::GlobalContext;
