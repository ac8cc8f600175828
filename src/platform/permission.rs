//! # Permission Gate
//!
//! Asks the host for camera or photo-library access on demand. Exactly two
//! outcomes matter to callers: `Granted` proceeds, everything else is a
//! silent no-op — no retry, no user-facing explanation on denial.

use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;

use crate::core::config::ResolvedConfig;

/// What the attachment buttons ask for. `Photo` targets the library;
/// anything else targets the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Photo,
    Camera,
}

impl AttachmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photos",
            AttachmentKind::Camera => "camera",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The host has no corresponding capability configured at all.
    Undetermined,
}

/// Seam for host permission checks. One round-trip per request; the result
/// is never cached here.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request(&self, kind: AttachmentKind) -> PermissionStatus;
}

/// Gate backed by the host filesystem and config:
/// photo access means the library directory is readable, camera access
/// means a capture command is configured.
pub struct HostPermissionGate {
    library_dir: PathBuf,
    has_capture_command: bool,
}

impl HostPermissionGate {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            library_dir: config.library_dir.clone(),
            has_capture_command: config.capture_command.is_some(),
        }
    }
}

#[async_trait]
impl PermissionGate for HostPermissionGate {
    async fn request(&self, kind: AttachmentKind) -> PermissionStatus {
        let status = match kind {
            AttachmentKind::Photo => match tokio::fs::read_dir(&self.library_dir).await {
                Ok(_) => PermissionStatus::Granted,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    PermissionStatus::Undetermined
                }
                Err(_) => PermissionStatus::Denied,
            },
            AttachmentKind::Camera => {
                if self.has_capture_command {
                    PermissionStatus::Granted
                } else {
                    PermissionStatus::Undetermined
                }
            }
        };
        debug!("permission request for {}: {:?}", kind.label(), status);
        status
    }
}
