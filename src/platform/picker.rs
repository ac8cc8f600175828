//! # Attachment Picker
//!
//! Launches the host's media pickers after a permission grant. The screen
//! always launches with the fixed options record (images only, editing
//! allowed, EXIF requested) and treats `Ok(None)` as a cancelled pick.
//!
//! `HostPicker` stands in for a native chooser: the library picker selects
//! the most recently modified image under the library directory, and the
//! camera picker runs the configured capture command. Swapping in an
//! interactive chooser only means replacing this implementation — the
//! screen never sees past the trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::json;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::config::ResolvedConfig;

/// How long a capture command may run before the pick fails.
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(20);

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Images,
}

/// Options handed to a picker launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerOptions {
    pub media_types: MediaType,
    pub allows_editing: bool,
    pub exif: bool,
}

impl PickerOptions {
    /// The fixed record the chat screen launches with.
    pub fn images() -> Self {
        Self {
            media_types: MediaType::Images,
            allows_editing: true,
            exif: true,
        }
    }
}

/// A picked media asset.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedAsset {
    pub uri: PathBuf,
    pub file_name: String,
    pub byte_len: u64,
    /// Present only when the launch options requested EXIF metadata.
    pub exif: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum PickerError {
    Io(std::io::Error),
    Capture(String),
    Timeout,
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::Io(e) => write!(f, "picker I/O error: {e}"),
            PickerError::Capture(msg) => write!(f, "capture failed: {msg}"),
            PickerError::Timeout => write!(f, "capture timed out"),
        }
    }
}

impl std::error::Error for PickerError {}

/// Seam for the host media pickers. `Ok(None)` means the user cancelled.
#[async_trait]
pub trait AttachmentPicker: Send + Sync {
    async fn launch_library(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError>;

    async fn launch_camera(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError>;
}

/// Picker backed by the host filesystem and an external capture command.
pub struct HostPicker {
    library_dir: PathBuf,
    capture_command: Option<String>,
}

impl HostPicker {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            library_dir: config.library_dir.clone(),
            capture_command: config.capture_command.clone(),
        }
    }

    fn is_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }

    fn build_asset(
        path: &Path,
        metadata: &std::fs::Metadata,
        options: PickerOptions,
    ) -> SelectedAsset {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let exif = options.exif.then(|| {
            let modified = metadata
                .modified()
                .ok()
                .map(|t| DateTime::<Utc>::from(t).to_rfc3339());
            json!({
                "byte_len": metadata.len(),
                "modified": modified,
            })
        });

        SelectedAsset {
            uri: path.to_path_buf(),
            file_name,
            byte_len: metadata.len(),
            exif,
        }
    }

    /// Most recently modified image in the library directory.
    async fn newest_image(&self) -> Result<Option<(PathBuf, std::fs::Metadata)>, PickerError> {
        let mut entries = tokio::fs::read_dir(&self.library_dir)
            .await
            .map_err(PickerError::Io)?;

        let mut newest: Option<(PathBuf, std::fs::Metadata, std::time::SystemTime)> = None;
        while let Some(entry) = entries.next_entry().await.map_err(PickerError::Io)? {
            let path = entry.path();
            if !Self::is_image(&path) {
                continue;
            }
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            let is_newer = newest
                .as_ref()
                .is_none_or(|(_, _, current)| modified > *current);
            if is_newer {
                newest = Some((path, metadata, modified));
            }
        }

        Ok(newest.map(|(path, metadata, _)| (path, metadata)))
    }
}

#[async_trait]
impl AttachmentPicker for HostPicker {
    async fn launch_library(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError> {
        debug!(
            "launching library picker in {} ({:?})",
            self.library_dir.display(),
            options
        );

        match self.newest_image().await? {
            Some((path, metadata)) => Ok(Some(Self::build_asset(&path, &metadata, options))),
            None => {
                debug!("library picker found no images");
                Ok(None)
            }
        }
    }

    async fn launch_camera(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError> {
        let Some(template) = &self.capture_command else {
            // The gate normally blocks this earlier; treat it as a cancel.
            warn!("camera launch without a capture command");
            return Ok(None);
        };

        let captures = self.library_dir.join("captures");
        tokio::fs::create_dir_all(&captures)
            .await
            .map_err(PickerError::Io)?;

        let out = captures.join(format!(
            "capture-{}.jpg",
            Utc::now().format("%Y%m%dT%H%M%S")
        ));
        let command = template.replace("{out}", &out.to_string_lossy());
        debug!("launching camera capture: {command}");

        let status = tokio::time::timeout(
            CAPTURE_TIMEOUT,
            tokio::process::Command::new("sh")
                .arg("-c")
                .arg(&command)
                .status(),
        )
        .await
        .map_err(|_| PickerError::Timeout)?
        .map_err(PickerError::Io)?;

        if !status.success() {
            return Err(PickerError::Capture(format!(
                "capture command exited with {status}"
            )));
        }

        let metadata = tokio::fs::metadata(&out).await.map_err(PickerError::Io)?;
        Ok(Some(Self::build_asset(&out, &metadata, options)))
    }
}
