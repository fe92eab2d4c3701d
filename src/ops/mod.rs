//! High-level operations.
//!
//! This module contains the implementation of cosigner commands.

pub mod apply;
pub mod config_edit;
pub mod cosign;
pub mod inspect;
pub mod locate;

pub use apply::apply;
pub use config_edit::{set_config_value, SetResult};
pub use cosign::{cosign, CosignOptions, CosignReport};
pub use inspect::{list_targets, signing_settings, SettingEntry, SigningSnapshot, TargetSummary};
pub use locate::{locate, resolve, Located};
