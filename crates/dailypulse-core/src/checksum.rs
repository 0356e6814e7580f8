//! Identify the cached audio revision by size and SHA-256.
//!
//! Computed on demand for status output, never on the download path.

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const BUF_SIZE: usize = 64 * 1024;

/// The audio file currently on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedPayload {
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
}

/// Describe the file at `path`, or `None` when nothing has been downloaded yet.
pub fn inspect(path: &Path) -> Result<Option<CachedPayload>> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("open {}", path.display())),
    };
    let (size, sha256) = digest(&mut f).with_context(|| format!("read {}", path.display()))?;
    Ok(Some(CachedPayload {
        path: path.to_path_buf(),
        size,
        sha256,
    }))
}

fn digest(reader: &mut impl Read) -> io::Result<(u64, String)> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok((total, hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn inspect_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(inspect(&dir.path().join("none.mp3")).unwrap().is_none());
    }

    #[test]
    fn inspect_reports_size_and_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.mp3");
        std::fs::write(&path, b"abc").unwrap();
        let info = inspect(&path).unwrap().unwrap();
        assert_eq!(info.size, 3);
        assert_eq!(info.sha256, ABC_SHA256);
        assert_eq!(info.path, path);
    }

    #[test]
    fn empty_file_has_empty_digest() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let info = inspect(f.path()).unwrap().unwrap();
        assert_eq!(info.size, 0);
        assert_eq!(info.sha256, EMPTY_SHA256);
    }
}
