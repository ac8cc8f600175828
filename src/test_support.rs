//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::core::chat::Participant;
use crate::core::state::App;
use crate::platform::permission::{AttachmentKind, PermissionGate, PermissionStatus};
use crate::platform::picker::{AttachmentPicker, PickerError, PickerOptions, SelectedAsset};

/// A gate that always answers with a programmed status.
pub struct StubGate {
    pub status: PermissionStatus,
}

#[async_trait]
impl PermissionGate for StubGate {
    async fn request(&self, _kind: AttachmentKind) -> PermissionStatus {
        self.status
    }
}

/// A picker that records every launch and returns a programmed asset.
pub struct StubPicker {
    pub asset: Option<SelectedAsset>,
    pub launches: Mutex<Vec<(AttachmentKind, PickerOptions)>>,
}

impl StubPicker {
    pub fn new(asset: Option<SelectedAsset>) -> Self {
        Self {
            asset,
            launches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AttachmentPicker for StubPicker {
    async fn launch_library(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError> {
        self.launches
            .lock()
            .unwrap()
            .push((AttachmentKind::Photo, options));
        Ok(self.asset.clone())
    }

    async fn launch_camera(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError> {
        self.launches
            .lock()
            .unwrap()
            .push((AttachmentKind::Camera, options));
        Ok(self.asset.clone())
    }
}

/// Creates a test App with a local participant named "tester".
pub fn test_app() -> App {
    App::new(Participant::local("tester", ""))
}

/// A synthetic picked asset for tests.
pub fn test_asset(name: &str) -> SelectedAsset {
    SelectedAsset {
        uri: PathBuf::from(format!("/tmp/{name}")),
        file_name: name.to_string(),
        byte_len: 42,
        exif: None,
    }
}
