//! Integration tests for the attachment flow:
//! button press → permission gate → picker launch → pending attachment,
//! including the silent-no-op paths and cancellation semantics.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use parley::core::action::{Action, Effect, update};
use parley::core::chat::Participant;
use parley::core::state::App;
use parley::platform::permission::{AttachmentKind, PermissionGate, PermissionStatus};
use parley::platform::picker::{AttachmentPicker, PickerError, PickerOptions, SelectedAsset};
use parley::tui::spawn_attachment_flow;

// ============================================================================
// Helpers
// ============================================================================

struct FixedGate(PermissionStatus);

#[async_trait]
impl PermissionGate for FixedGate {
    async fn request(&self, _kind: AttachmentKind) -> PermissionStatus {
        self.0
    }
}

/// Records every launch; optionally sleeps first so cancellation can land.
struct RecordingPicker {
    asset: Option<SelectedAsset>,
    launches: Mutex<Vec<(AttachmentKind, PickerOptions)>>,
    delay: Option<Duration>,
}

impl RecordingPicker {
    fn new(asset: Option<SelectedAsset>) -> Self {
        Self {
            asset,
            launches: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    fn slow(asset: Option<SelectedAsset>, delay: Duration) -> Self {
        Self {
            asset,
            launches: Mutex::new(Vec::new()),
            delay: Some(delay),
        }
    }
}

#[async_trait]
impl AttachmentPicker for RecordingPicker {
    async fn launch_library(
        &self,
        options: PickerOptions,
    ) -> Result<Option<SelectedAsset>, PickerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
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
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.launches
            .lock()
            .unwrap()
            .push((AttachmentKind::Camera, options));
        Ok(self.asset.clone())
    }
}

fn make_asset(name: &str) -> SelectedAsset {
    SelectedAsset {
        uri: PathBuf::from(format!("/pictures/{name}")),
        file_name: name.to_string(),
        byte_len: 1024,
        exif: None,
    }
}

fn make_app() -> App {
    App::new(Participant::local("tester", ""))
}

// ============================================================================
// Granted paths
// ============================================================================

#[tokio::test]
async fn granted_photo_flow_launches_library_with_fixed_options() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Granted));
    let picker = Arc::new(RecordingPicker::new(Some(make_asset("pick.png"))));
    let (tx, rx) = mpsc::channel();

    spawn_attachment_flow(AttachmentKind::Photo, gate, picker.clone(), tx)
        .await
        .unwrap();

    let launches = picker.launches.lock().unwrap();
    assert_eq!(launches.len(), 1, "exactly one picker launch");
    let (kind, options) = launches[0];
    assert_eq!(kind, AttachmentKind::Photo);
    assert!(options.allows_editing);
    assert!(options.exif);

    // The picked asset comes back as an action and lands in the pending slot
    let action = rx.try_recv().expect("flow should emit an action");
    let mut app = make_app();
    let effect = update(&mut app, action);
    assert_eq!(effect, Effect::None);
    assert_eq!(
        app.pending_attachment.as_ref().map(|a| a.file_name.as_str()),
        Some("pick.png")
    );
}

#[tokio::test]
async fn granted_camera_flow_launches_the_camera_picker() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Granted));
    let picker = Arc::new(RecordingPicker::new(Some(make_asset("capture.jpg"))));
    let (tx, _rx) = mpsc::channel();

    spawn_attachment_flow(AttachmentKind::Camera, gate, picker.clone(), tx)
        .await
        .unwrap();

    let launches = picker.launches.lock().unwrap();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].0, AttachmentKind::Camera);
}

#[tokio::test]
async fn pending_attachment_rides_along_with_the_next_send() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Granted));
    let picker = Arc::new(RecordingPicker::new(Some(make_asset("pick.png"))));
    let (tx, rx) = mpsc::channel();

    spawn_attachment_flow(AttachmentKind::Photo, gate, picker, tx)
        .await
        .unwrap();

    let mut app = make_app();
    update(&mut app, rx.try_recv().unwrap());

    let effect = update(&mut app, Action::Submit("look at this".to_string()));
    let Effect::DeliverMessage(id) = effect else {
        panic!("expected DeliverMessage");
    };

    let sent = app.log.get(app.log.len() - 1).unwrap();
    assert_eq!(sent.id, id);
    assert_eq!(
        sent.attachment.as_ref().map(|a| a.file_name.as_str()),
        Some("pick.png")
    );
    assert!(app.pending_attachment.is_none());
    assert!(app.is_sending);

    update(&mut app, Action::DeliveryConfirmed(id));
    assert!(!app.is_sending);
}

// ============================================================================
// Silent no-op paths
// ============================================================================

#[tokio::test]
async fn denied_flow_launches_nothing_and_changes_no_state() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Denied));
    let picker = Arc::new(RecordingPicker::new(Some(make_asset("pick.png"))));
    let (tx, rx) = mpsc::channel();

    spawn_attachment_flow(AttachmentKind::Photo, gate, picker.clone(), tx)
        .await
        .unwrap();

    assert!(picker.launches.lock().unwrap().is_empty(), "no picker launch");
    assert!(rx.try_recv().is_err(), "no action emitted");

    // Nothing to fold in, so the app is untouched by construction
    let app = make_app();
    assert!(app.pending_attachment.is_none());
    assert_eq!(app.log.len(), 4);
    assert!(!app.is_sending);
}

#[tokio::test]
async fn undetermined_permission_also_stops_the_flow() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Undetermined));
    let picker = Arc::new(RecordingPicker::new(Some(make_asset("pick.png"))));
    let (tx, rx) = mpsc::channel();

    spawn_attachment_flow(AttachmentKind::Camera, gate, picker.clone(), tx)
        .await
        .unwrap();

    assert!(picker.launches.lock().unwrap().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn cancelled_pick_emits_no_action() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Granted));
    let picker = Arc::new(RecordingPicker::new(None));
    let (tx, rx) = mpsc::channel();

    spawn_attachment_flow(AttachmentKind::Photo, gate, picker.clone(), tx)
        .await
        .unwrap();

    assert_eq!(picker.launches.lock().unwrap().len(), 1);
    assert!(rx.try_recv().is_err());
}

// ============================================================================
// Cancellation / supersede
// ============================================================================

#[tokio::test]
async fn superseded_flow_is_cancelled_cleanly() {
    let gate: Arc<dyn PermissionGate> = Arc::new(FixedGate(PermissionStatus::Granted));
    let picker = Arc::new(RecordingPicker::slow(
        Some(make_asset("slow.png")),
        Duration::from_secs(30),
    ));
    let (tx, rx) = mpsc::channel();

    let first = spawn_attachment_flow(AttachmentKind::Photo, gate.clone(), picker.clone(), tx.clone());
    // A second tap supersedes: the event loop aborts the stored handle
    first.abort();
    let err = first.await.expect_err("aborted task should not complete");
    assert!(err.is_cancelled());

    assert!(picker.launches.lock().unwrap().is_empty(), "pick never finished");
    assert!(rx.try_recv().is_err(), "no stale action from the dead flow");

    // The replacement flow proceeds normally
    let fast = Arc::new(RecordingPicker::new(Some(make_asset("fast.png"))));
    spawn_attachment_flow(AttachmentKind::Photo, gate, fast.clone(), tx)
        .await
        .unwrap();
    let action = rx.try_recv().expect("replacement flow emits its pick");
    match action {
        Action::AttachmentPicked { asset, .. } => assert_eq!(asset.file_name, "fast.png"),
        other => panic!("expected AttachmentPicked, got {other:?}"),
    }
}
