//! Candidate directory — the flat folder of resumes read on every analysis and filled by mail sync.

use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::documents::loader::is_supported_filename;

/// A supported file read from the candidate directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "filename", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved(String),
    AlreadyExists(String),
}

#[derive(Debug, Clone)]
pub struct CandidateStore {
    root: PathBuf,
}

impl CandidateStore {
    /// Opens the directory, creating it if missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create candidate directory {}", root.display()))?;
        info!("Candidate directory: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of supported files, sorted.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_supported_filename(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Reads every supported file, sorted by name.
    pub fn read_all(&self) -> Result<Vec<StoredFile>> {
        self.list_names()?
            .into_iter()
            .map(|name| {
                let path = self.root.join(&name);
                let bytes =
                    fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(StoredFile { name, bytes })
            })
            .collect()
    }

    /// Writes a file unless one with the same name already exists. Directory components in
    /// `filename` are stripped.
    pub fn save_if_absent(&self, filename: &str, bytes: &[u8]) -> Result<SaveOutcome> {
        self.save_from_reader(filename, bytes)
    }

    /// Bytes are staged in a temp file inside the directory and only linked under `filename`
    /// once complete, so a failed write never leaves a truncated resume behind.
    fn save_from_reader(&self, filename: &str, mut source: impl Read) -> Result<SaveOutcome> {
        let name = sanitize_filename(filename)?;
        let path = self.root.join(&name);
        if path.exists() {
            return Ok(SaveOutcome::AlreadyExists(name));
        }

        let mut staged = NamedTempFile::new_in(&self.root)
            .with_context(|| format!("Failed to stage {} in {}", name, self.root.display()))?;
        io::copy(&mut source, &mut staged)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        match staged.persist_noclobber(&path) {
            Ok(_) => Ok(SaveOutcome::Saved(name)),
            // Lost a race with another writer; the staged copy is dropped.
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                warn!("{} appeared while staging, keeping existing file", path.display());
                Ok(SaveOutcome::AlreadyExists(name))
            }
            Err(e) => Err(e.error).with_context(|| format!("Failed to save {}", path.display())),
        }
    }
}

fn sanitize_filename(filename: &str) -> Result<String> {
    // Attachments may carry Windows-style paths.
    let last = filename.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if last.is_empty() || last == "." || last == ".." {
        bail!("Invalid filename '{filename}'");
    }
    Ok(last.to_string())
}
