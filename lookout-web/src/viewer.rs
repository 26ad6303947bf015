//! Launching an external terminal browser on a chosen URL.
use async_trait::async_trait;
use lookout_common::{LookoutError, Result};
use lookout_config::ViewerSettings;
use tokio::process::Command;

#[async_trait]
pub trait Viewer: Send + Sync {
    /// Show `url` and return once the user is done with it.
    async fn open(&self, url: &str) -> Result<()>;

    /// Name shown in prompts.
    fn name(&self) -> &str;
}

/// Runs `program [args..] <url>` in the foreground, sharing the terminal.
#[derive(Debug, Clone)]
pub struct TerminalViewer {
    program: String,
    args: Vec<String>,
}

impl TerminalViewer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &ViewerSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.clone())
    }
}

#[async_trait]
impl Viewer for TerminalViewer {
    async fn open(&self, url: &str) -> Result<()> {
        tracing::info!(program = %self.program, url, "viewer.open");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .status()
            .await
            .map_err(|e| {
                tracing::warn!(program = %self.program, error = %e, "viewer.spawn_failed");
                LookoutError::Viewer(e.to_string())
            })?;

        // The viewer's own exit code says nothing about whether the page was shown.
        if !status.success() {
            tracing::warn!(program = %self.program, %status, "viewer.nonzero_exit");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
