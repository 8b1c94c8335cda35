//! Parsing of `source::package` passlist entries.

use bsedic_common::constants::WHITELIST_SEPARATOR;
use bsedic_common::error::{BsedicError, Result};
use bsedic_model::dependency::Whitelist;

/// Groups passlist entries into a [`Whitelist`].
///
/// # Errors
///
/// Returns [`BsedicError::InvalidWhitelistEntry`] for the first entry that
/// does not split into exactly one source and one package.
pub fn parse_whitelist<S: AsRef<str>>(entries: &[S]) -> Result<Whitelist> {
    let mut whitelist = Whitelist::default();
    for entry in entries {
        let entry = entry.as_ref();
        let parts: Vec<&str> = entry.split(WHITELIST_SEPARATOR).collect();
        let [source, package] = parts.as_slice() else {
            return Err(BsedicError::InvalidWhitelistEntry {
                entry: entry.to_string(),
            });
        };
        whitelist.insert(*source, *package);
    }
    tracing::debug!(entries = entries.len(), "parsed whitelist");
    Ok(whitelist)
}
