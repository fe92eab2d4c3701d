//! Test utilities for cosigner unit tests.
//!
//! Provides canned project documents and helpers to load them or lay them
//! out on disk.

pub mod fixtures;

pub use fixtures::*;

use plist::Dictionary;

/// Look up a string value by a path of dictionary keys.
pub fn string_at<'a>(dict: &'a Dictionary, path: &[&str]) -> Option<&'a str> {
    let (last, parents) = path.split_last()?;
    let mut current = dict;
    for key in parents {
        current = current.get(*key)?.as_dictionary()?;
    }
    current.get(*last)?.as_string()
}

/// Keys of a dictionary, in stored order.
pub fn keys(dict: &Dictionary) -> Vec<&str> {
    dict.keys().map(String::as_str).collect()
}
