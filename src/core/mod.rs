//! Core data structures for cosigner.
//!
//! This module contains the foundational types used throughout cosigner:
//! - The project document and its object graph
//! - Target and configuration handles
//! - Build setting keys and signing parameters
//! - Errors

pub mod build_settings;
pub mod error;
pub mod platform;
pub mod project;
pub mod signing;
pub mod target;

pub use build_settings::SettingKey;
pub use error::CosignError;
pub use platform::Platform;
pub use project::{Project, ProjectFormat};
pub use signing::{FieldUpdate, SettingScope, SettingWrite, SigningField, SigningParams};
pub use target::{ConfigurationRef, TargetRef};
