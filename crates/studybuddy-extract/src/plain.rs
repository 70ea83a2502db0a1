//! Plain text and source code files.

use std::path::Path;

use anyhow::{Context, Result};

/// Read a file as UTF-8, replacing invalid byte sequences.
pub fn extract(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"caf\xe9 au lait\n").unwrap();
        assert_eq!(extract(&path).unwrap(), "caf\u{fffd} au lait\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = extract(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
