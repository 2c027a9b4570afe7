//! Delivery of exported markdown: clipboard command first, file second.

use achv_core::EXPORT_FILE_NAME;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDelivery {
    Clipboard,
    /// The clipboard was unavailable and the document was written here.
    File(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why the clipboard command could not take the document.
#[derive(Debug, thiserror::Error)]
enum ClipboardError {
    #[error("no clipboard command configured")]
    NotConfigured,
    #[error("failed to run clipboard command: {0}")]
    Io(#[from] std::io::Error),
    #[error("clipboard command exited with {0}")]
    Exit(std::process::ExitStatus),
}

#[derive(Debug, Clone)]
pub struct ExportSink {
    clipboard_command: Vec<String>,
    export_dir: PathBuf,
}

impl ExportSink {
    pub fn new(clipboard_command: Vec<String>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            clipboard_command,
            export_dir: export_dir.into(),
        }
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }

    /// Hand `markdown` to the clipboard, or write it to the export directory
    /// if the clipboard cannot take it. Only a failed file write is an error.
    pub async fn deliver(&self, markdown: &str) -> Result<ExportDelivery, ExportError> {
        match self.copy_to_clipboard(markdown).await {
            Ok(()) => {
                tracing::info!(bytes = markdown.len(), "Export copied to clipboard");
                Ok(ExportDelivery::Clipboard)
            }
            Err(err) => {
                let path = self.fallback_path();
                tracing::warn!(error = %err, path = %path.display(), "Clipboard unavailable; writing export file");
                write_file(&path, markdown).await?;
                Ok(ExportDelivery::File(path))
            }
        }
    }

    async fn copy_to_clipboard(&self, markdown: &str) -> Result<(), ClipboardError> {
        let (program, args) = self
            .clipboard_command
            .split_first()
            .ok_or(ClipboardError::NotConfigured)?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(markdown.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Exit(status))
        }
    }
}

async fn write_file(path: &Path, markdown: &str) -> Result<(), ExportError> {
    let to_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    tokio::fs::write(path, markdown).await.map_err(to_error)
}
