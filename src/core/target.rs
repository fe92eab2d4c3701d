//! Lightweight handles to targets and build configurations.
//!
//! Handles carry the object identifier, which is what makes them refer to the
//! exact object in the document rather than to a copy of it.

use std::fmt;

use serde::Serialize;

/// A build target (`PBXNativeTarget`, `PBXAggregateTarget`, `PBXLegacyTarget`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRef {
    /// Object identifier, also the key used in `TargetAttributes`.
    pub id: String,
    /// Target name as shown in Xcode.
    pub name: String,
    /// Object class, e.g. `PBXNativeTarget`.
    pub isa: String,
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// An `XCBuildConfiguration` belonging to some configuration list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationRef {
    pub id: String,
    pub name: String,
}

impl fmt::Display for ConfigurationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
