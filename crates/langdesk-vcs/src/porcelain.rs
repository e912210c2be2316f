//! Parser for `git status --porcelain=v1 -z`.
//!
//! Each record is `XY<space><path>` terminated by NUL, where `X` is the
//! index column and `Y` the working tree column. Rename and copy records
//! (`R`/`C` in either column) are followed by one more NUL-terminated field
//! holding the source path, which is skipped; the destination is reported.
//!
//! Classification:
//!
//! | record            | staged | modified | untracked |
//! |-------------------|--------|----------|-----------|
//! | `??`              |        |          | yes       |
//! | `!!`              |        |          |           |
//! | unmerged pair     |        | yes      |           |
//! | `X` not blank     | yes    |          |           |
//! | `Y` not blank     |        | yes      |           |
//!
//! so `AM` is both staged and modified, and ` D` is modified only.

use crate::error::{VcsError, VcsResult};
use crate::status::ProjectStatus;

const STATUS_COMMAND: &str = "git status";

/// Parse porcelain v1 `-z` output.
///
/// `prefix` is the project directory relative to the repository top level
/// (`git rev-parse --show-prefix`, with trailing slash, or empty). Paths
/// are reported relative to the project; records outside it are dropped.
pub fn parse_porcelain_z(output: &str, prefix: &str) -> VcsResult<ProjectStatus> {
    let mut status = ProjectStatus::new();
    let mut fields = output.split('\0').filter(|f| !f.is_empty());

    while let Some(record) = fields.next() {
        let bytes = record.as_bytes();
        if bytes.len() < 4 || !record.is_char_boundary(3) || bytes[2] != b' ' {
            return Err(VcsError::provider(
                STATUS_COMMAND,
                format!("malformed status record {record:?}"),
            ));
        }
        let (x, y) = (bytes[0], bytes[1]);
        if matches!(x, b'R' | b'C') || matches!(y, b'R' | b'C') {
            fields.next();
        }

        let Some(path) = record[3..].strip_prefix(prefix) else {
            continue;
        };
        let path = path.to_string();

        match (x, y) {
            (b'?', b'?') => status.untracked.push(path),
            (b'!', b'!') => {}
            _ if is_unmerged(x, y) => status.modified.push(path),
            _ => {
                if !is_blank(x) {
                    status.staged.push(path.clone());
                }
                if !is_blank(y) {
                    status.modified.push(path);
                }
            }
        }
    }

    Ok(status.sorted())
}

fn is_blank(column: u8) -> bool {
    matches!(column, b' ' | b'?' | b'!')
}

fn is_unmerged(x: u8, y: u8) -> bool {
    matches!(
        (x, y),
        (b'D', b'D') | (b'A', b'U') | (b'U', b'D') | (b'U', b'A') | (b'D', b'U') | (b'A', b'A') | (b'U', b'U')
    )
}
