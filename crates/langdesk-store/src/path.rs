//! Project-relative path normalisation.
//!
//! Every path that crosses a store boundary is reduced to a canonical,
//! forward-slash form relative to the project root:
//!
//! - `\` separators become `/`
//! - empty and `.` components are dropped
//! - `..` pops the previous component; popping above the root is denied
//! - absolute paths (`/x`, `C:/x`) are denied
//!
//! The empty string denotes the project root itself.

use crate::error::{StoreError, StoreResult};

/// Normalise `raw` into a canonical project-relative path.
///
/// # Examples
///
/// ```
/// use langdesk_store::normalize_path;
///
/// assert_eq!(normalize_path("src\\lib.rs").unwrap(), "src/lib.rs");
/// assert_eq!(normalize_path("./a//b/../c").unwrap(), "a/c");
/// assert!(normalize_path("../etc/passwd").is_err());
/// ```
pub fn normalize_path(raw: &str) -> StoreResult<String> {
    let unified = raw.replace('\\', "/");

    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(StoreError::AccessDenied(raw.to_string()));
    }

    let mut parts: Vec<&str> = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                if parts.pop().is_none() {
                    return Err(StoreError::AccessDenied(raw.to_string()));
                }
            }
            other => parts.push(other),
        }
    }

    Ok(parts.join("/"))
}

/// Join a child name onto a normalised parent path.
pub fn join_child(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// The final component of a normalised path (the path itself at top level).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
