//=========================================================================
// Event Bridge
//=========================================================================
//
// Facade receiving every host callback.
//
// Architecture:
// ```text
//   UI sequence                         Render sequence
//   ───────────                         ───────────────
//   on_create / on_destroy              on_surface_created
//   on_resume / on_pause                on_surface_changed
//   on_focus_changed                    on_surface_destroyed
//   on_touch / on_key_*                 on_draw_frame
//          │                                   │
//          └──────────► Session (mutex) ◄──────┘
//                        ├─ LifecycleController ──► engine
//                        ├─ PointerNormalizer
//                        ├─ held keys
//                        └─ SurfaceSize
// ```
//
// Each entry point takes the session lock exactly once, so everything the
// two sequences do to the controller is mutually exclusive. Leaving the
// live state (pause, focus loss, surface loss, destroy) first lifts all
// outstanding pointers and held keys, so the engine sees every down matched
// by an up before it is deactivated.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, trace};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use crate::core::boundary::{AssetSource, EngineBoundary};
use crate::core::input::{LogicalKey, PointerNormalizer, SurfaceSize, TouchSample};
use crate::core::lifecycle::{EngineState, FrameOutcome, LifecycleController, LifecycleError};
use crate::core::report::Reporter;

//=== Session =============================================================

struct Session<E: EngineBoundary> {
    controller: LifecycleController<E>,
    normalizer: PointerNormalizer,
    held_keys: HashSet<LogicalKey>,
    surface: SurfaceSize,
}

impl<E: EngineBoundary> Session<E> {
    fn release_pointers(&mut self) {
        for command in self.normalizer.release_all() {
            self.controller.pointer(&command);
        }
    }

    fn release_keys(&mut self) {
        for key in self.held_keys.drain() {
            self.controller.key(key, false);
        }
    }

    fn release_all(&mut self) {
        self.release_pointers();
        self.release_keys();
    }

    /// Forwards a key transition, keeping downs and ups paired.
    fn key(&mut self, key: LogicalKey, pressed: bool) -> bool {
        if pressed {
            if self.held_keys.contains(&key) {
                trace!(target: "input", "Key {:?} already down", key);
                return false;
            }
            let sent = self.controller.key(key, true);
            if sent {
                self.held_keys.insert(key);
            }
            sent
        } else {
            if !self.held_keys.remove(&key) {
                trace!(target: "input", "Key {:?} released without press", key);
                return false;
            }
            self.controller.key(key, false)
        }
    }
}

//=== EventBridge =========================================================

/// Shared handle used by both host sequences.
///
/// Cloning is cheap; all clones drive the same session.
pub struct EventBridge<E: EngineBoundary> {
    session: Arc<Mutex<Session<E>>>,
}

impl<E: EngineBoundary> Clone for EventBridge<E> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<E: EngineBoundary> EventBridge<E> {
    //--- Construction -----------------------------------------------------

    pub fn new(engine: E, reporter: Reporter, normalizer: PointerNormalizer) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                controller: LifecycleController::new(engine, reporter),
                normalizer,
                held_keys: HashSet::new(),
                surface: SurfaceSize::default(),
            })),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> EngineState {
        self.session.lock().controller.state()
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.session.lock().surface
    }

    pub fn activation_pending(&self) -> bool {
        self.session.lock().controller.activation_pending()
    }

    /// The fatal lifecycle error reported so far, if any.
    pub fn fault(&self) -> Option<LifecycleError> {
        self.session.lock().controller.fault().cloned()
    }

    //--- Application Lifecycle (UI sequence) ------------------------------

    pub fn on_create(&self, source: &AssetSource) -> Result<(), LifecycleError> {
        info!(target: "bridge", "Application created");
        self.session.lock().controller.init(source)
    }

    pub fn on_resume(&self) {
        debug!(target: "bridge", "Resume");
        self.session.lock().controller.resume();
    }

    pub fn on_pause(&self) {
        debug!(target: "bridge", "Pause");
        let mut session = self.session.lock();
        session.release_all();
        session.controller.pause();
    }

    pub fn on_focus_changed(&self, focused: bool) {
        debug!(target: "bridge", "Window focus: {}", focused);
        let mut session = self.session.lock();
        if !focused {
            session.release_all();
        }
        session.controller.focus_changed(focused);
    }

    pub fn on_destroy(&self) {
        info!(target: "bridge", "Application destroyed");
        let mut session = self.session.lock();
        session.release_all();
        session.controller.shutdown();
    }

    //--- Input (UI sequence) ----------------------------------------------

    /// Normalizes and forwards a touch sample. Returns the number of engine
    /// calls issued.
    pub fn on_touch(&self, sample: &TouchSample) -> usize {
        let mut session = self.session.lock();
        if !session.controller.state().is_live() {
            trace!(target: "input", "Touch {:?} dropped in state {:?}", sample.phase, session.controller.state());
            return 0;
        }

        let surface = session.surface;
        match session.normalizer.process(sample, surface) {
            Ok(commands) => commands
                .iter()
                .filter(|command| session.controller.pointer(command))
                .count(),
            Err(anomaly) => {
                debug!(target: "input", "Discarded touch sample: {}", anomaly);
                0
            }
        }
    }

    /// Maps and forwards a raw key press.
    pub fn on_key_down(&self, raw_code: i32) -> bool {
        self.on_key(LogicalKey::from_raw(raw_code), true)
    }

    /// Maps and forwards a raw key release.
    pub fn on_key_up(&self, raw_code: i32) -> bool {
        self.on_key(LogicalKey::from_raw(raw_code), false)
    }

    /// Forwards an already-mapped key transition. A repeated down or a
    /// release of a key that is not held is dropped.
    pub fn on_key(&self, key: LogicalKey, pressed: bool) -> bool {
        trace!(target: "input", "Key {:?} {}", key, if pressed { "down" } else { "up" });
        self.session.lock().key(key, pressed)
    }

    //--- Surface & Frames (render sequence) -------------------------------

    pub fn on_surface_created(&self) -> Result<(), LifecycleError> {
        debug!(target: "bridge", "Surface created");
        let mut session = self.session.lock();
        session.release_all();
        session.controller.surface_created()
    }

    pub fn on_surface_changed(&self, width: i32, height: i32) {
        debug!(target: "bridge", "Surface changed: {}x{}", width, height);
        let mut session = self.session.lock();
        session.surface = SurfaceSize::new(width, height);
        session.controller.resize(width, height);
    }

    pub fn on_surface_destroyed(&self) {
        debug!(target: "bridge", "Surface destroyed");
        let mut session = self.session.lock();
        session.release_all();
        session.controller.surface_destroyed();
    }

    pub fn on_draw_frame(&self) -> FrameOutcome {
        self.session.lock().controller.update()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
