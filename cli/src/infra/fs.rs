//! Filesystem infrastructure — implements `ArtifactStore` and `UnitWriter`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;

use crate::application::ports::{ArtifactStore, UnitWriter};
use crate::domain::{AppNumber, Candidate, UnitWrite};

/// Versioned artifacts of one directory, re-scanned on every call.
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn versioned_candidates(&self, app: &AppNumber) -> Result<Vec<Candidate>> {
        let pattern = Regex::new(&format!(
            r"^{}.*\.py$",
            regex::escape(&app.versioned_prefix())
        ))
        .context("building artifact pattern")?;

        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %self.root.display(), "artifact directory missing");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", self.root.display()));
            }
        };

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("cannot read {}", self.root.display()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !pattern.is_match(name) {
                continue;
            }
            // Files can vanish between listing and stat; skip them.
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_file() {
                continue;
            }
            let Ok(modified) = meta.modified() else { continue };
            candidates.push(Candidate {
                path: entry.path(),
                modified: DateTime::<Utc>::from(modified),
            });
        }
        Ok(candidates)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Writes unit files into the supervisor's definition directory.
pub struct FsUnitWriter {
    unit_dir: PathBuf,
}

impl FsUnitWriter {
    #[must_use]
    pub fn new(unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            unit_dir: unit_dir.into(),
        }
    }
}

impl UnitWriter for FsUnitWriter {
    fn unit_path(&self, file_name: &str) -> PathBuf {
        self.unit_dir.join(file_name)
    }

    fn write_unit(&self, file_name: &str, content: &str) -> std::io::Result<UnitWrite> {
        let path = self.unit_path(file_name);
        let previous = match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(e),
            // Unreadable but maybe writable; the write decides.
            Err(_) => None,
        };
        std::fs::write(&path, content)?;
        Ok(UnitWrite::classify(previous.as_deref(), content))
    }
}
