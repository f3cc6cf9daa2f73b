//! @ai:module:intent Read result log files into line sequences
//! @ai:module:layer infrastructure
//! @ai:module:public_api read_lines, load_pair, LogPair
//! @ai:module:stateless true

use crate::error::{Error, Result};
use std::path::Path;

/// @ai:intent Fully read baseline and comparison logs
#[derive(Debug, Clone, Default)]
pub struct LogPair {
    pub baseline: Vec<String>,
    pub comparison: Vec<String>,
}

/// @ai:intent Read a whole file and split it into lines
/// @ai:pre path exists and is readable
/// @ai:post invalid UTF-8 is reported as Error::Encoding, not as an access failure
/// @ai:effects fs:read
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        Error::Encoding {
            path: path.to_path_buf(),
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
        }
    })?;

    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    tracing::debug!("Read {} lines from {}", lines.len(), path.display());

    Ok(lines)
}

/// @ai:intent Read both logs before any comparison starts
/// @ai:effects fs:read
pub fn load_pair(baseline: &Path, comparison: &Path) -> Result<LogPair> {
    Ok(LogPair {
        baseline: read_lines(baseline)?,
        comparison: read_lines(comparison)?,
    })
}
