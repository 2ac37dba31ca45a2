//! Human-facing error rendering.
//!
//! Turns a `WharfError` into a multi-line diagnostic: the primary message,
//! any captured command context, and a remediation hint where one exists.
//! All the information needed is carried on the error itself, so nothing
//! has to be re-run to produce the report.

use crate::core::error::WharfError;

/// Format an error with contextual help for terminal display.
pub fn format_error_with_help(error: &WharfError) -> String {
    let mut lines = vec![format!("ERROR: {}", error)];

    match error {
        WharfError::Uninstall { output, code, .. } => {
            if !output.trim().is_empty() {
                lines.push(format!("OUTPUT: {}", output.trim_end()));
            }
            lines.push(format!("Exit code: {}", code));
        }
        WharfError::Resolution {
            no_version_found, ..
        } => {
            if *no_version_found {
                lines.push(
                    "Hint: no matching version was found. Relax the version \
                     constraint in wharf.yaml, or pass --pre to allow \
                     pre-releases."
                        .to_string(),
                );
            } else {
                lines.push(
                    "Hint: the declared requirements could not be resolved \
                     together. Run with RUST_LOG=debug to see the resolver \
                     invocation."
                        .to_string(),
                );
            }
        }
        WharfError::Usage(_) => {
            lines.push("Hint: run `wharf uninstall --help` for the accepted targets.".to_string());
        }
        WharfError::Path(_) => {
            lines.push(
                "Hint: wharf commands must run inside a project containing \
                 wharf.yaml."
                    .to_string(),
            );
        }
        _ => {}
    }

    lines.join("\n")
}
