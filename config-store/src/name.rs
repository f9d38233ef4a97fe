use shared_types::ConfigIdentifier;

use crate::error::{Result, StorageError};

/// Extensions the codec registry knows how to handle.
pub const KNOWN_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Parse a user-supplied config name of the form `base(.ext)?(@version)?`.
///
/// Components absent from the input stay absent in the result; defaulting
/// the extension or version is left to the caller.
pub fn parse(name: &str) -> Result<ConfigIdentifier> {
    let (head, version) = match name.split_once('@') {
        Some((head, version)) => (head, Some(version)),
        None => (name, None),
    };

    if let Some(version) = version {
        if !is_version(version) {
            return Err(StorageError::MalformedIdentifier(name.to_string()));
        }
    }

    let (base, extension) = match head.rsplit_once('.') {
        Some((base, ext)) if KNOWN_EXTENSIONS.contains(&ext) => (base, Some(ext)),
        Some(_) => return Err(StorageError::MalformedIdentifier(name.to_string())),
        None => (head, None),
    };

    if !is_word(base) {
        return Err(StorageError::MalformedIdentifier(name.to_string()));
    }

    Ok(ConfigIdentifier::new(
        base,
        extension.map(str::to_string),
        version.map(str::to_string),
    ))
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn is_version(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}
