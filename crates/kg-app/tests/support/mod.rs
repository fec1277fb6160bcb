//! Shared doubles for the walkthrough integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::oneshot;

use kg_app::{WalkthroughDeps, WalkthroughOrchestrator};
use kg_core::ports::{CameraDevicePort, ClockPort, RenderSurfacePort, SnapshotPort};
use kg_core::{
    CameraError, CameraHandle, NoticeKind, Rgb, StageId, StatusKind, StepVisual,
    WorkflowRegistry, WorkflowSnapshot,
};

pub const REGISTRY: &str = r#"
    initial_stage = "shape"

    [[stages]]
    id = "shape"
    title = "Shape your piece"
    steps = ["split", "wedge", "ball", "center", "open", "pull", "trim", "check"]
    resource_step = 7
    gate_on_verification = true
    next = { stage = "dry" }

    [[stages]]
    id = "dry"
    title = "Let it dry"
    steps = ["cover", "uncover", "inspect"]
    resource_step = 2
    next = { stage = "bisque" }

    [[stages]]
    id = "bisque"
    title = "Bisque firing"
    steps = ["book", "wait"]
    cursor_policy = "reset_on_entry"
    appointment = { stage = "glaze", step = 0 }
    next = { stage = "glaze" }

    [[stages]]
    id = "glaze"
    title = "Glaze"
    steps = ["pick", "dip", "wait"]
    hosts_preview = true
    appointment = { stage = "finish", step = 0 }
    next = { stage = "finish" }

    [[stages]]
    id = "finish"
    title = "Pick up"
    steps = ["collect", "enjoy"]
    cursor_policy = "reset_on_entry"

    [[treatments]]
    id = "celadon"
    name = "Celadon"
    note = "Soft jade green"
    unprocessed = [0.72, 0.8, 0.7]
    processed = [0.45, 0.62, 0.52]

    [[treatments]]
    id = "tenmoku"
    name = "Tenmoku"
    note = "Iron brown"
    unprocessed = [0.5, 0.35, 0.2]
"#;

pub fn stage(id: &str) -> StageId {
    StageId::from(id)
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Let spawned completions run. Time is paused, so this only advances
/// the clock after every ready task has been polled.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub async fn elapse(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    settle().await;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ActivateStage(StageId),
    StepVisual(StepVisual),
    StepStatus(StageId, StatusKind),
    UnlockForward(StageId, bool),
    PreviewColor(Option<Rgb>),
    TreatmentDetails(String, String),
    RevealPreview(StageId),
    Notice(NoticeKind, Duration),
    AttachCamera(CameraHandle),
    DetachCamera,
}

/// Records every call. When `failing`, every call still records but errors.
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    failing: AtomicBool,
}

impl RecordingSurface {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(true),
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn last_visual(&self) -> Option<StepVisual> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SurfaceCall::StepVisual(v) => Some(v),
            _ => None,
        })
    }

    fn record(&self, call: SurfaceCall) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("surface detached");
        }
        Ok(())
    }
}

#[async_trait]
impl RenderSurfacePort for RecordingSurface {
    async fn activate_stage(&self, stage_id: &StageId) -> anyhow::Result<()> {
        self.record(SurfaceCall::ActivateStage(stage_id.clone()))
    }

    async fn set_step_visual(&self, visual: &StepVisual) -> anyhow::Result<()> {
        self.record(SurfaceCall::StepVisual(visual.clone()))
    }

    async fn set_step_status(&self, stage_id: &StageId, status: StatusKind) -> anyhow::Result<()> {
        self.record(SurfaceCall::StepStatus(stage_id.clone(), status))
    }

    async fn unlock_forward(&self, stage_id: &StageId, unlocked: bool) -> anyhow::Result<()> {
        self.record(SurfaceCall::UnlockForward(stage_id.clone(), unlocked))
    }

    async fn set_preview_color(&self, color: Option<Rgb>) -> anyhow::Result<()> {
        self.record(SurfaceCall::PreviewColor(color))
    }

    async fn set_treatment_details(&self, name: &str, note: &str) -> anyhow::Result<()> {
        self.record(SurfaceCall::TreatmentDetails(name.to_string(), note.to_string()))
    }

    async fn reveal_preview(&self, stage_id: &StageId) -> anyhow::Result<()> {
        self.record(SurfaceCall::RevealPreview(stage_id.clone()))
    }

    async fn show_transient_notice(
        &self,
        kind: NoticeKind,
        _message: &str,
        duration: Duration,
    ) -> anyhow::Result<()> {
        self.record(SurfaceCall::Notice(kind, duration))
    }

    async fn attach_camera(&self, handle: &CameraHandle) -> anyhow::Result<()> {
        self.record(SurfaceCall::AttachCamera(handle.clone()))
    }

    async fn detach_camera(&self) -> anyhow::Result<()> {
        self.record(SurfaceCall::DetachCamera)
    }
}

type Grant = Result<CameraHandle, CameraError>;

/// Camera double. Grants `cam-N` handles (or denies), unless a deferred
/// answer was queued with [`ScriptedCamera::defer_next`].
#[derive(Default)]
pub struct ScriptedCamera {
    deny: bool,
    deferred: Mutex<VecDeque<oneshot::Receiver<Grant>>>,
    acquired: AtomicUsize,
    released: Mutex<Vec<CameraHandle>>,
}

impl ScriptedCamera {
    pub fn granting() -> Self {
        Self::default()
    }

    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    /// The next `acquire` suspends until the returned sender fires.
    pub fn defer_next(&self) -> oneshot::Sender<Grant> {
        let (tx, rx) = oneshot::channel();
        self.deferred.lock().unwrap().push_back(rx);
        tx
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> Vec<CameraHandle> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl CameraDevicePort for ScriptedCamera {
    async fn acquire(&self) -> Result<CameraHandle, CameraError> {
        let n = self.acquired.fetch_add(1, Ordering::SeqCst) + 1;
        let deferred = self.deferred.lock().unwrap().pop_front();
        if let Some(rx) = deferred {
            return rx.await.unwrap_or(Err(CameraError::Unavailable));
        }
        if self.deny {
            Err(CameraError::Denied)
        } else {
            Ok(CameraHandle::new(format!("cam-{n}")))
        }
    }

    fn release(&self, handle: &CameraHandle) {
        self.released.lock().unwrap().push(handle.clone());
    }
}

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

mock! {
    pub Snapshot {}

    #[async_trait]
    impl SnapshotPort for Snapshot {
        async fn load(&self) -> anyhow::Result<Option<WorkflowSnapshot>>;
        async fn save(&self, snapshot: &WorkflowSnapshot) -> anyhow::Result<()>;
        async fn clear(&self) -> anyhow::Result<()>;
    }
}

/// Snapshot port that starts empty and accepts every save.
pub fn quiet_snapshot() -> MockSnapshot {
    let mut snapshot = MockSnapshot::new();
    snapshot.expect_load().returning(|| Ok(None));
    snapshot.expect_save().returning(|_| Ok(()));
    snapshot
}

pub struct Harness {
    pub orchestrator: WalkthroughOrchestrator,
    pub surface: Arc<RecordingSurface>,
    pub camera: Arc<ScriptedCamera>,
}

pub fn harness(camera: ScriptedCamera) -> Harness {
    build(camera, RecordingSurface::default(), quiet_snapshot())
}

/// Harness over the built-in walkthrough shipped with `kg-infra`.
pub fn default_harness(camera: ScriptedCamera) -> Harness {
    let registry = kg_infra::default_registry().expect("built-in registry is valid");
    build_with(registry, camera, RecordingSurface::default(), quiet_snapshot())
}

pub fn build(
    camera: ScriptedCamera,
    surface: RecordingSurface,
    snapshot: MockSnapshot,
) -> Harness {
    let registry = WorkflowRegistry::from_toml_str(REGISTRY).expect("test registry is valid");
    build_with(registry, camera, surface, snapshot)
}

pub fn build_with(
    registry: WorkflowRegistry,
    camera: ScriptedCamera,
    surface: RecordingSurface,
    snapshot: MockSnapshot,
) -> Harness {
    init_test_tracing();
    let surface = Arc::new(surface);
    let camera = Arc::new(camera);
    let orchestrator = WalkthroughOrchestrator::new(WalkthroughDeps {
        registry: Arc::new(registry),
        surface: surface.clone(),
        camera: camera.clone(),
        clock: Arc::new(FixedClock(1_700_000_000_000)),
        snapshot: Arc::new(snapshot),
    });
    Harness {
        orchestrator,
        surface,
        camera,
    }
}
