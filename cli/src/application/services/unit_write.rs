//! Application service — write the service definition for the chosen artifact.

use std::io::ErrorKind;

use crate::application::ports::{ProgressReporter, UnitWriter};
use crate::domain::report::UnitReport;
use crate::domain::{ServiceDescriptor, SwitchError, UnitWrite};

/// Render `descriptor` and overwrite its unit file.
///
/// Runs before any supervisor call, so a failure here leaves the previously
/// running instance untouched.
///
/// # Errors
///
/// Returns [`SwitchError::PermissionDenied`] when the unit directory is not
/// writable and [`SwitchError::DefinitionWrite`] for any other I/O failure.
pub fn write_definition(
    writer: &impl UnitWriter,
    descriptor: &ServiceDescriptor,
    reporter: &impl ProgressReporter,
) -> Result<UnitReport, SwitchError> {
    let file_name = descriptor.file_name();
    let path = writer.unit_path(&file_name);
    let rendered = descriptor.render();

    let write = writer
        .write_unit(&file_name, &rendered)
        .map_err(|source| match source.kind() {
            ErrorKind::PermissionDenied => SwitchError::PermissionDenied { path: path.clone() },
            _ => SwitchError::DefinitionWrite {
                path: path.clone(),
                source,
            },
        })?;

    let verb = match write {
        UnitWrite::Created => "created",
        UnitWrite::Updated => "updated",
        UnitWrite::Unchanged => "rewrote unchanged",
    };
    reporter.success(&format!("{verb} service definition: {}", path.display()));
    tracing::info!(path = %path.display(), ?write, "service definition written");

    Ok(UnitReport {
        path,
        service_name: descriptor.service_name.clone(),
        write,
    })
}
