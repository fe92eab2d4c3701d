//! Codec for the ASCII property list format used by `project.pbxproj`.
//!
//! Documents are represented with the `plist` crate's value model, so the
//! same in-memory tree serves projects stored as ASCII, XML, or binary
//! property lists. Dictionaries keep insertion order while loaded; the
//! writer re-emits them in Xcode's canonical order.

mod annotate;
mod parser;
mod writer;

pub use annotate::Annotations;
pub use parser::{parse, ParseError};
pub use writer::{quote, to_string, Writer};
