//! Local file lifecycle: scratch download files and copy-and-replace.
//!
//! A download is streamed into a scratch file in the cache directory. Only a
//! complete scratch file is copied next to the destination (`.part`), synced,
//! and renamed over it, so a reader never observes a half-written file.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix of the staging copy placed beside the destination before rename.
pub const PART_SUFFIX: &str = ".part";

/// Sequential writer for one scratch download file.
pub struct ScratchWriter {
    out: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl ScratchWriter {
    /// Create (or truncate) the scratch file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create scratch dir: {}", parent.display()))?;
        }
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to create scratch file: {}", path.display()))?;
        Ok(ScratchWriter {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Append a chunk of the response body.
    pub fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.out.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes appended so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and sync, returning the path of the complete scratch file.
    pub fn finish(self) -> Result<PathBuf> {
        let file = self
            .out
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("flush {}", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("sync {}", self.path.display()))?;
        Ok(self.path)
    }

    /// Drop the scratch file without using it (best effort).
    pub fn discard(self) {
        let path = self.path.clone();
        drop(self.out);
        remove_quietly(&path);
    }
}

/// Path of the staging copy: appends `.part` (e.g. `news.mp3` → `news.mp3.part`).
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(PART_SUFFIX);
    PathBuf::from(o)
}

/// Copy `scratch` beside `destination`, sync, rename over `destination`, then
/// delete `scratch`. The scratch dir may live on another filesystem; the
/// rename only ever happens within the destination directory.
pub fn replace_destination(scratch: &Path, destination: &Path) -> Result<()> {
    let staged = part_path(destination);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data dir: {}", parent.display()))?;
    }
    let copied = fs::copy(scratch, &staged).with_context(|| {
        format!("failed to copy {} to {}", scratch.display(), staged.display())
    })?;
    let sync = File::open(&staged).and_then(|f| f.sync_all());
    if let Err(e) = sync {
        remove_quietly(&staged);
        return Err(e).with_context(|| format!("sync {}", staged.display()));
    }
    if let Err(e) = fs::rename(&staged, destination) {
        remove_quietly(&staged);
        return Err(e).with_context(|| {
            format!("failed to rename {} to {}", staged.display(), destination.display())
        });
    }
    tracing::debug!(bytes = copied, dest = %destination.display(), "replaced destination");
    remove_quietly(scratch);
    Ok(())
}

/// Cached stamp: trimmed file content, or an empty string if the file is missing.
pub fn read_stamp(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s.trim().to_string()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

pub(crate) fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::debug!("could not remove {}: {}", path.display(), e);
        }
    }
}
