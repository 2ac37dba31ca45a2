//! Resolver gateway.
//!
//! Resolution is a black box behind `ResolverProvider`: declarations and
//! options in, a resolved set or a structured failure out. The production
//! implementation spawns the configured resolver command and exchanges
//! JSON over stdin/stdout, so the solver can live out of process and be
//! swapped without touching the engine.

use crate::di::traits::{ResolveOptions, ResolverProvider};
use crate::project::category::Category;
use crate::project::lockfile::ResolvedSet;
use crate::project::requirement::Requirement;
use crate::venv::cmd_to_shell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};
use wharf_core::{WharfError, WharfResult};

#[derive(Serialize)]
struct ResolveRequest<'a> {
    category: &'a str,
    requirements: &'a BTreeMap<String, Requirement>,
    pre: bool,
    allow_global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pypi_mirror: Option<&'a str>,
}

#[derive(Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    resolved: Option<ResolvedSet>,
    #[serde(default)]
    error: Option<ResolveFailure>,
}

#[derive(Deserialize)]
struct ResolveFailure {
    message: String,
    #[serde(default)]
    no_version_found: bool,
}

/// Resolver gateway backed by an external command.
pub struct CommandResolver {
    command: Vec<String>,
}

impl CommandResolver {
    pub fn new(command: &[String]) -> Self {
        Self {
            command: command.to_vec(),
        }
    }
}

fn parse_response(stdout: &str, stderr: &str, code: i32) -> WharfResult<ResolvedSet> {
    match serde_json::from_str::<ResolveResponse>(stdout) {
        Ok(response) => {
            if let Some(failure) = response.error {
                return Err(WharfError::Resolution {
                    message: failure.message,
                    no_version_found: failure.no_version_found,
                });
            }
            response.resolved.ok_or_else(|| WharfError::Resolution {
                message: "Resolver answered without a resolved set or an error".to_string(),
                no_version_found: false,
            })
        }
        Err(_) => {
            let message = if stderr.trim().is_empty() {
                format!("Resolver produced no usable output (exit code {})", code)
            } else {
                stderr.trim().to_string()
            };
            Err(WharfError::Resolution {
                message,
                no_version_found: false,
            })
        }
    }
}

impl ResolverProvider for CommandResolver {
    fn resolve(
        &self,
        declared: &BTreeMap<String, Requirement>,
        category: &Category,
        options: &ResolveOptions,
    ) -> WharfResult<ResolvedSet> {
        let request = serde_json::to_string(&ResolveRequest {
            category: category.lock_key(),
            requirements: declared,
            pre: options.pre,
            allow_global: options.allow_global,
            pypi_mirror: options.pypi_mirror.as_deref(),
        })?;

        let (program, args) = self.command.split_first().ok_or_else(|| {
            WharfError::Config("resolver_command must name at least an executable".to_string())
        })?;
        tracing::debug!(command = %cmd_to_shell(&self.command), "invoking resolver");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WharfError::Resolution {
                message: format!("Failed to spawn resolver '{}': {}", program, e),
                no_version_found: false,
            })?;

        child
            .stdin
            .take()
            .expect("stdin was piped")
            .write_all(request.as_bytes())?;

        let output = child.wait_with_output()?;
        parse_response(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            output.status.code().unwrap_or(-1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::lockfile::LockedPackage;

    #[test]
    fn test_parse_response_resolved() {
        let resolved = parse_response(
            r#"{"resolved": {"requests": {"version": "2.31.0"}, "urllib3": {"version": "2.2.1"}}}"#,
            "",
            0,
        )
        .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["requests"].version, "2.31.0");
    }

    #[test]
    fn test_parse_response_failure() {
        let result = parse_response(
            r#"{"error": {"message": "no candidates for urllib3>=99", "no_version_found": true}}"#,
            "",
            1,
        );
        match result {
            Err(WharfError::Resolution {
                message,
                no_version_found,
            }) => {
                assert!(message.contains("urllib3>=99"));
                assert!(no_version_found);
            }
            other => panic!("expected resolution failure, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_parse_response_garbage_falls_back_to_stderr() {
        let result = parse_response("Traceback (most recent call last)", "boom", 1);
        match result {
            Err(WharfError::Resolution { message, .. }) => assert_eq!(message, "boom"),
            other => panic!("expected resolution failure, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_request_serialization() {
        let mut declared = BTreeMap::new();
        declared.insert(
            "requests".to_string(),
            Requirement::Specifier(">=2.31".to_string()),
        );

        let request = serde_json::to_value(ResolveRequest {
            category: Category::Dev.lock_key(),
            requirements: &declared,
            pre: true,
            allow_global: false,
            pypi_mirror: None,
        })
        .unwrap();

        assert_eq!(request["category"], "develop");
        assert_eq!(request["requirements"]["requests"], ">=2.31");
        assert_eq!(request["pre"], true);
        assert!(request.get("pypi_mirror").is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_via_subprocess() {
        let resolver = CommandResolver::new(&[
            "sh".to_string(),
            "-c".to_string(),
            r#"cat > /dev/null; echo '{"resolved": {"flask": {"version": "3.0.2"}}}'"#.to_string(),
        ]);

        let declared = BTreeMap::new();
        let resolved = resolver
            .resolve(&declared, &Category::Default, &ResolveOptions::default())
            .unwrap();
        assert_eq!(resolved["flask"], LockedPackage::pinned("3.0.2"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_spawn_failure() {
        let resolver = CommandResolver::new(&["/nonexistent/resolver".to_string()]);
        let result = resolver.resolve(
            &BTreeMap::new(),
            &Category::Default,
            &ResolveOptions::default(),
        );
        assert!(matches!(result, Err(WharfError::Resolution { .. })));
    }
}
