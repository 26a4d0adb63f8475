use crate::inventory::domain::{InstallRoot, RuntimeBucket, Scope};
use crate::ports::outbound::SiteLocator;
use crate::shared::error::PipinfoError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Printed by the interpreter; keep it compatible with old Python 3 releases.
const SITE_SCRIPT: &str = "import json, os, sys; print(json.dumps({\
'path': sys.path, \
'base_prefix': getattr(sys, 'base_prefix', sys.prefix), \
'version': '%d.%d' % sys.version_info[:2], \
'os_name': os.name}))";

const INTERPRETER_TIMEOUT: Duration = Duration::from_secs(15);

/// What the interpreter reports about itself
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SiteReport {
    pub path: Vec<String>,
    pub base_prefix: String,
    pub version: String,
    pub os_name: String,
}

impl SiteReport {
    /// Package directories of `sys.path`, tagged with scope and runtime bucket.
    ///
    /// Entries under `<base_prefix>/lib/pythonX.Y` (`<base_prefix>/Lib` on Windows) are
    /// System, as are `dist-packages` directories under `base_prefix`. Everything else
    /// (user site, virtual environments) is User.
    pub fn install_roots(&self) -> Vec<InstallRoot> {
        let base_prefix = Path::new(&self.base_prefix);
        let system_prefix = if self.os_name == "nt" {
            base_prefix.join("Lib")
        } else {
            base_prefix.join("lib").join(format!("python{}", self.version))
        };
        let bucket = RuntimeBucket::new(format!("python{}", self.version));

        let mut roots: Vec<InstallRoot> = Vec::new();
        for entry in &self.path {
            let path = PathBuf::from(entry);
            let is_site = path.ends_with("site-packages");
            let is_dist = path.ends_with("dist-packages");
            if !is_site && !is_dist {
                continue;
            }
            if roots.iter().any(|r| r.path() == path) {
                continue;
            }

            let scope = if path.starts_with(&system_prefix) || (is_dist && path.starts_with(base_prefix))
            {
                Scope::System
            } else {
                Scope::User
            };
            roots.push(InstallRoot::new(path, scope, bucket.clone()));
        }
        roots
    }
}

/// PythonSiteLocator adapter asking an interpreter for its `sys.path`
pub struct PythonSiteLocator;

impl PythonSiteLocator {
    pub fn new() -> Self {
        Self
    }

    fn discovery_error(interpreter: &str, details: impl Into<String>) -> PipinfoError {
        PipinfoError::SiteDiscovery {
            interpreter: interpreter.to_string(),
            details: details.into(),
        }
    }
}

impl Default for PythonSiteLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteLocator for PythonSiteLocator {
    async fn locate(&self, interpreter: &str) -> Result<Vec<InstallRoot>, PipinfoError> {
        let output = tokio::time::timeout(
            INTERPRETER_TIMEOUT,
            Command::new(interpreter)
                .arg("-c")
                .arg(SITE_SCRIPT)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| Self::discovery_error(interpreter, "timed out"))?
        .map_err(|e| Self::discovery_error(interpreter, e.to_string()))?;

        if !output.status.success() {
            return Err(Self::discovery_error(
                interpreter,
                format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let report: SiteReport = serde_json::from_slice(&output.stdout)
            .map_err(|e| Self::discovery_error(interpreter, format!("unexpected output: {}", e)))?;

        let roots = report.install_roots();
        tracing::debug!(
            "{} (python {}) has {} package directories",
            interpreter,
            report.version,
            roots.len()
        );
        Ok(roots)
    }
}
