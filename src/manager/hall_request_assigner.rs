//! Runs the external `hall_request_assigner` executable.
//!
//! The executable is called as `<path> -i <json input>` and prints the JSON output on stdout.
//! Every way it can fail is returned as an error: missing binary, non-zero exit, unparseable
//! output, or running longer than the timeout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::config;

use super::json_serial::{AssignerInput, AssignerOutput};
use super::HallAssigner;


/// Name of the assigner executable for the host OS
pub fn executable_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "hall_request_assigner.exe"
    } else if cfg!(target_os = "macos") {
        "hall_request_assigner_mac"
    } else {
        "hall_request_assigner"
    }
}

/// [HallAssigner] backed by the external executable
#[derive(Debug, Clone)]
pub struct ExternalAssigner {
    path: PathBuf,
    timeout: Duration,
}

impl ExternalAssigner {
    /// Uses the executable for this OS inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::with_path(dir.join(executable_name()))
    }

    /// Uses the executable at `path`
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            timeout: config::SOLVER_TIMEOUT,
        }
    }

    /// Changes the time limit
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = limit;
        self
    }
}

impl HallAssigner for ExternalAssigner {
    async fn assign(&mut self, input: &AssignerInput) -> anyhow::Result<AssignerOutput> {
        let json = serde_json::to_string(input)?;

        let output = timeout(
            self.timeout,
            Command::new(&self.path).arg("-i").arg(&json).kill_on_drop(true).output(),
        )
        .await
        .with_context(|| format!("{} did not answer within {:?}", self.path.display(), self.timeout))?
        .with_context(|| format!("failed to run {}", self.path.display()))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("malformed output from {}: {}", self.path.display(), String::from_utf8_lossy(&output.stdout).trim()))
    }
}
