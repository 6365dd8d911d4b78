//! Versioned artifact ranking and selection.
//!
//! Pure functions only: the caller scans the artifact directory and hands the
//! candidates in; nothing here touches the filesystem except through the
//! `exists` callback passed to [`select`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::app::{AppNumber, Mode};
use crate::domain::error::SwitchError;

/// A versioned artifact found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}

impl Candidate {
    fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Why an artifact was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Switch: newest versioned artifact.
    Newest,
    /// Rollback: second-newest versioned artifact.
    Previous,
    /// Rollback with a single versioned artifact available.
    OnlyVersion,
    /// Switch without versioned artifacts: `app_<n>.py`, existence unchecked.
    DefaultFallback,
    /// Rollback without versioned artifacts: `app_app_<n>.py`.
    InitialFallback,
}

/// The artifact a run activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReference {
    pub app: AppNumber,
    pub path: PathBuf,
    /// Modification time; `None` for fallbacks that were not scanned.
    pub modified: Option<DateTime<Utc>>,
    pub selection: Selection,
}

/// Numeric version embedded in `app_<n>_v<version>.py`, if any.
#[must_use]
pub fn version_suffix(file_name: &str, prefix: &str) -> Option<u64> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(".py")?
        .parse()
        .ok()
}

/// Sort candidates newest first.
///
/// Equal modification times fall back to the numeric version suffix
/// (descending, numeric before non-numeric), then to the file name
/// (descending), so the order never depends on directory iteration.
pub fn rank(candidates: &mut [Candidate], app: &AppNumber) {
    let prefix = app.versioned_prefix();
    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| {
                version_suffix(b.file_name(), &prefix).cmp(&version_suffix(a.file_name(), &prefix))
            })
            .then_with(|| b.file_name().cmp(a.file_name()))
    });
}

/// Pick the artifact to activate.
///
/// `candidates` must already be ranked (see [`rank`]). `exists` is consulted
/// only for the initial-provisioning fallback of a rollback.
///
/// # Errors
///
/// Returns [`SwitchError::NoRollbackTarget`] when a rollback finds neither a
/// versioned nor an initial artifact.
pub fn select(
    app: &AppNumber,
    mode: Mode,
    candidates: &[Candidate],
    artifact_dir: &Path,
    exists: impl FnOnce(&Path) -> bool,
) -> Result<ArtifactReference, SwitchError> {
    let chosen = |c: &Candidate, selection| ArtifactReference {
        app: app.clone(),
        path: c.path.clone(),
        modified: Some(c.modified),
        selection,
    };

    match (mode, candidates) {
        (Mode::Switch, [newest, ..]) => Ok(chosen(newest, Selection::Newest)),
        (Mode::Switch, []) => Ok(ArtifactReference {
            app: app.clone(),
            path: artifact_dir.join(app.default_artifact()),
            modified: None,
            selection: Selection::DefaultFallback,
        }),
        (Mode::Rollback, [_, previous, ..]) => Ok(chosen(previous, Selection::Previous)),
        (Mode::Rollback, [only]) => Ok(chosen(only, Selection::OnlyVersion)),
        (Mode::Rollback, []) => {
            let initial = artifact_dir.join(app.initial_artifact());
            if exists(&initial) {
                Ok(ArtifactReference {
                    app: app.clone(),
                    path: initial,
                    modified: None,
                    selection: Selection::InitialFallback,
                })
            } else {
                Err(SwitchError::NoRollbackTarget {
                    app: app.to_string(),
                    dir: artifact_dir.to_path_buf(),
                })
            }
        }
    }
}
