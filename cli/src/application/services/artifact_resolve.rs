//! Application service — pick the artifact a run activates.

use anyhow::{Context, Result};

use crate::application::ports::{ArtifactStore, ProgressReporter};
use crate::domain::artifact::{self, ArtifactReference, Selection};
use crate::domain::{Mode, ResolutionRequest};

/// Scan the artifact store and select the artifact for `request`.
///
/// The store is scanned afresh on every call; artifacts may have been added
/// since the previous deployment.
///
/// # Errors
///
/// Returns [`crate::domain::SwitchError::NoRollbackTarget`] (wrapped) when a
/// rollback has nothing to roll back to, or an error if the artifact
/// directory cannot be read.
pub fn resolve_artifact(
    store: &impl ArtifactStore,
    request: &ResolutionRequest,
    reporter: &impl ProgressReporter,
) -> Result<ArtifactReference> {
    match request.mode {
        Mode::Switch => reporter.step("switch mode triggered"),
        Mode::Rollback => reporter.step("rollback mode triggered"),
    }

    let mut candidates = store
        .versioned_candidates(&request.app)
        .with_context(|| format!("scanning {}", store.root().display()))?;
    artifact::rank(&mut candidates, &request.app);
    tracing::debug!(
        app = %request.app,
        mode = %request.mode,
        candidates = candidates.len(),
        "ranked versioned artifacts"
    );

    let chosen = artifact::select(
        &request.app,
        request.mode,
        &candidates,
        store.root(),
        |p| store.exists(p),
    )?;

    let path = chosen.path.display();
    match chosen.selection {
        Selection::Newest => reporter.success(&format!("latest app version detected: {path}")),
        Selection::Previous => {
            reporter.success(&format!("rolling back to previous version: {path}"));
        }
        Selection::OnlyVersion => {
            reporter.warn(&format!("only one version found, using: {path}"));
        }
        Selection::DefaultFallback => {
            reporter.warn(&format!("no versioned files found, using fallback: {path}"));
        }
        Selection::InitialFallback => reporter.warn(&format!(
            "no versioned files found, falling back to initial version: {path}"
        )),
    }
    tracing::info!(
        app = %request.app,
        artifact = %path,
        selection = ?chosen.selection,
        "artifact resolved"
    );
    Ok(chosen)
}
