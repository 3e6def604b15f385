//! JSON files exchanged between the commands.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

/// Writes `value` as pretty-printed UTF-8 JSON, replacing any existing file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Reads an identifier list written by the `harvest` command.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a JSON list of strings.
pub(crate) fn read_identifiers(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON list of identifiers", path.display()))
}
