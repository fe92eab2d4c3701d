//! Edit `config.toml` files in place.
//!
//! Existing comments and formatting survive a `set`; only the touched value
//! changes.

use std::path::Path;

use anyhow::{bail, Context, Result};
use toml_edit::{value, DocumentMut, Item, Table};

use crate::util::config::KNOWN_KEYS;
use crate::util::fs;

/// Result of [`set_config_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetResult {
    /// The key was not present before.
    Added,
    /// The key held a different value.
    Updated { previous: String },
    /// The key already held this value; the file was not rewritten.
    Unchanged,
}

/// Set a dotted key such as `signing.profile_name` in the config at `path`.
///
/// The file and its directory are created if needed.
pub fn set_config_value(path: &Path, key: &str, new_value: &str) -> Result<SetResult> {
    if !KNOWN_KEYS.contains(&key) {
        bail!(
            "unknown config key `{}`; expected one of: {}",
            key,
            KNOWN_KEYS.join(", ")
        );
    }
    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("config key `{}` has no section", key))?;

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    if !doc.contains_key(section) {
        doc[section] = Item::Table(Table::new());
    }
    let table = doc[section]
        .as_table_mut()
        .with_context(|| format!("`{}` in {} is not a table", section, path.display()))?;

    let previous = table
        .get(field)
        .and_then(Item::as_str)
        .map(str::to_string);
    let result = match previous {
        Some(previous) if previous == new_value => return Ok(SetResult::Unchanged),
        Some(previous) => SetResult::Updated { previous },
        None => SetResult::Added,
    };

    table[field] = value(new_value);
    fs::write_string(path, &doc.to_string())?;
    tracing::debug!("Set {} in {}", key, path.display());

    Ok(result)
}
