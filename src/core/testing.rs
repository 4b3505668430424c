//=========================================================================
// Test Support
//=========================================================================
//
// Recording engine used by unit tests to assert on outbound call order.
//
//=========================================================================

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::boundary::{AssetSource, EngineBoundary, Status, STATUS_OK};

//=== EngineCall ==========================================================

/// One recorded call into the engine boundary.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineCall {
    Init(AssetSource),
    Restore,
    Resize(i32, i32),
    Update,
    Shutdown,
    Activated,
    Deactivated,
    PointerDown(i32, f32, f32),
    PointerUp(i32, f32, f32),
    PointerMove(i32, f32, f32),
    Scroll(i64, f32, f32, f32, f32),
    KeyDown(i32),
    KeyUp(i32),
}

//=== CallLog =============================================================

/// Shared call log; clones observe the same sequence.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<EngineCall>>>);

impl CallLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, call: EngineCall) {
        self.0.lock().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<EngineCall> {
        self.0.lock().clone()
    }

    pub(crate) fn count(&self, call: &EngineCall) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().clear();
    }
}

//=== RecordingEngine =====================================================

/// Engine double with scripted status codes.
pub(crate) struct RecordingEngine {
    log: CallLog,
    init_status: Status,
    restore_status: Status,
    update_statuses: VecDeque<Status>,
}

impl RecordingEngine {
    pub(crate) fn new(log: CallLog) -> Self {
        Self {
            log,
            init_status: STATUS_OK,
            restore_status: STATUS_OK,
            update_statuses: VecDeque::new(),
        }
    }

    pub(crate) fn failing_init(mut self, status: Status) -> Self {
        self.init_status = status;
        self
    }

    pub(crate) fn failing_restore(mut self, status: Status) -> Self {
        self.restore_status = status;
        self
    }

    /// Statuses returned by successive `update` calls, then `STATUS_OK`.
    pub(crate) fn with_updates(mut self, statuses: &[Status]) -> Self {
        self.update_statuses = statuses.iter().copied().collect();
        self
    }
}

impl EngineBoundary for RecordingEngine {
    fn init(&mut self, source: &AssetSource) -> Status {
        self.log.push(EngineCall::Init(source.clone()));
        self.init_status
    }

    fn restore(&mut self) -> Status {
        self.log.push(EngineCall::Restore);
        self.restore_status
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.log.push(EngineCall::Resize(width, height));
    }

    fn update(&mut self) -> Status {
        self.log.push(EngineCall::Update);
        self.update_statuses.pop_front().unwrap_or(STATUS_OK)
    }

    fn shutdown(&mut self) {
        self.log.push(EngineCall::Shutdown);
    }

    fn activated(&mut self) {
        self.log.push(EngineCall::Activated);
    }

    fn deactivated(&mut self) {
        self.log.push(EngineCall::Deactivated);
    }

    fn pointer_down(&mut self, id: i32, x: f32, y: f32) {
        self.log.push(EngineCall::PointerDown(id, x, y));
    }

    fn pointer_up(&mut self, id: i32, x: f32, y: f32) {
        self.log.push(EngineCall::PointerUp(id, x, y));
    }

    fn pointer_move(&mut self, id: i32, x: f32, y: f32) {
        self.log.push(EngineCall::PointerMove(id, x, y));
    }

    fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32) {
        self.log.push(EngineCall::Scroll(dt, dx1, dy1, dx2, dy2));
    }

    fn key_down(&mut self, key: i32) {
        self.log.push(EngineCall::KeyDown(key));
    }

    fn key_up(&mut self, key: i32) {
        self.log.push(EngineCall::KeyUp(key));
    }
}
