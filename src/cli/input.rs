//! Command input resolution: inline text, then file, then stdin.

use std::io::Read;
use std::path::Path;

use crate::types::{DigestError, Result};

/// Read command input from `text`, `file` or stdin, in that order.
pub fn read_input(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path).map_err(|e| {
            DigestError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        });
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
