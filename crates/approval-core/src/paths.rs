/// Path constants and utilities for the file-backed profile store
use approval_types::{ProfileId, Role, UserId};
use std::path::{Path, PathBuf};

// Default root
pub const DEFAULT_DATA_ROOT: &str = "/data/approvals";

// Directory names (relative to the data root)
pub const INTENTS_DIR_NAME: &str = "intents";

// File name prefixes
pub const INTENT_FILE_PREFIX: &str = "intent_";
pub const JSON_EXTENSION: &str = "json";

// Path builder functions
pub fn approval_dir(root: &Path, role: Role) -> PathBuf {
    root.join(role.approval_table())
}

pub fn live_dir(root: &Path, role: Role) -> PathBuf {
    root.join(role.live_table())
}

pub fn intents_dir(root: &Path) -> PathBuf {
    root.join(INTENTS_DIR_NAME)
}

pub fn approval_file(root: &Path, role: Role, id: &ProfileId) -> PathBuf {
    approval_dir(root, role).join(format!("{}.{}", id, JSON_EXTENSION))
}

/// Live rows are keyed by owner, so a second promotion lands on the same file
pub fn live_file(root: &Path, role: Role, user_id: &UserId) -> PathBuf {
    live_dir(root, role).join(format!("{}.{}", encode_key(user_id.as_str()), JSON_EXTENSION))
}

pub fn intent_file(root: &Path, intent_id: &str) -> PathBuf {
    intents_dir(root).join(format!("{}{}.{}", INTENT_FILE_PREFIX, intent_id, JSON_EXTENSION))
}

/// Whether a directory entry is a JSON row file
pub fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(JSON_EXTENSION)
}

/// Percent-encode every byte outside `[A-Za-z0-9_-]` so distinct account
/// ids never share a file stem
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}
