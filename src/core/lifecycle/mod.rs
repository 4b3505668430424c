//=========================================================================
// Engine Lifecycle Controller
//=========================================================================
//
// Owns the engine and decides which boundary calls are legal right now.
//
// State machine:
// ```text
//   Uninitialized ──init──► Initialized ──restore──► SurfaceReady ◄──► Active
//         │                     ▲                        │   ▲          │
//         │                     └──── surface lost ──────┤   └─resume───┤
//         │                                              ▼              │
//         │                                          Suspended ◄─pause──┘
//         └──────────────► ShutDown ◄── destroy / update exit (any state)
// ```
//
// Two independent axes feed the `SurfaceReady ⇄ Active` edge: host
// visibility (`Created`/`Resumed`/`Paused`) and window focus. Activation
// requires a ready surface, a resumed host and focus, all at once. A resume
// that arrives without focus leaves `activation_pending` set until focus
// shows up; pausing clears it.
//
// The controller is not synchronized itself. `EventBridge` wraps it in a
// mutex shared by the UI and render sequences.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod error;

//=== External Dependencies ===============================================

use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::boundary::{AssetSource, EngineBoundary, STATUS_OK};
use crate::core::input::{LogicalKey, PointerCommand};
use crate::core::report::Reporter;
pub use error::{LifecycleError, ProtocolAnomaly};

//=== EngineState =========================================================

/// Engine readiness as seen from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// `init` has not run yet.
    Uninitialized,

    /// Assets loaded, no rendering surface bound.
    Initialized,

    /// Surface restored; host not both resumed and focused.
    SurfaceReady,

    /// Surface ready, host resumed and focused; `activated` was called.
    Active,

    /// Surface still valid but the host is paused.
    Suspended,

    /// Terminal. No further engine calls.
    ShutDown,
}

impl EngineState {
    /// A restored surface is bound (paused or not).
    pub fn has_surface(self) -> bool {
        matches!(self, Self::SurfaceReady | Self::Active | Self::Suspended)
    }

    /// Frames and input may be forwarded.
    pub fn is_live(self) -> bool {
        matches!(self, Self::SurfaceReady | Self::Active)
    }
}

//=== Visibility ==========================================================

/// Host resume/pause axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Neither resumed nor paused yet.
    Created,
    Resumed,
    Paused,
}

//=== FrameOutcome ========================================================

/// Result of one render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Engine not live; `update` was not called.
    Skipped,

    /// `update` ran and the engine wants to continue.
    Rendered,

    /// The engine requested termination. The controller is now shut down.
    Exit,
}

//=== LifecycleController =================================================

/// State machine guarding every call into the engine.
///
/// Owns the engine for its whole lifetime. If the controller is dropped
/// while the engine is still initialized, it deactivates and shuts the
/// engine down on the way out.
pub struct LifecycleController<E: EngineBoundary> {
    engine: E,
    state: EngineState,
    visibility: Visibility,
    has_focus: bool,
    activation_pending: bool,
    fault: Option<LifecycleError>,
    reporter: Reporter,
}

impl<E: EngineBoundary> LifecycleController<E> {
    //--- Construction -----------------------------------------------------

    pub fn new(engine: E, reporter: Reporter) -> Self {
        Self {
            engine,
            state: EngineState::Uninitialized,
            visibility: Visibility::Created,
            has_focus: false,
            activation_pending: false,
            fault: None,
            reporter,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn activation_pending(&self) -> bool {
        self.activation_pending
    }

    /// The fatal error reported earlier, if any.
    pub fn fault(&self) -> Option<&LifecycleError> {
        self.fault.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    //--- Bootstrap --------------------------------------------------------

    /// Runs engine `init` once. Failure is fatal and reported.
    pub fn init(&mut self, source: &AssetSource) -> Result<(), LifecycleError> {
        if self.state != EngineState::Uninitialized {
            debug!(target: "lifecycle", "Init ignored in state {:?}", self.state);
            return Ok(());
        }

        info!(target: "lifecycle", "Initializing engine from {}", source);
        let status = self.engine.init(source);
        if status != STATUS_OK {
            let err = LifecycleError::Init { status };
            self.transition(EngineState::ShutDown);
            return Err(self.report_fault(err));
        }

        self.transition(EngineState::Initialized);
        Ok(())
    }

    //--- Surface ----------------------------------------------------------

    /// Binds a freshly created surface by running engine `restore`.
    ///
    /// A surface created while one is already bound means the old one was
    /// lost without notice; it is released first.
    pub fn surface_created(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            EngineState::Uninitialized | EngineState::ShutDown => {
                debug!(target: "lifecycle", "Surface created in state {:?}, not restoring", self.state);
                return Ok(());
            }
            EngineState::Initialized => {}
            EngineState::SurfaceReady | EngineState::Active | EngineState::Suspended => {
                debug!(target: "lifecycle", "Surface recreated, releasing previous one");
                self.release_surface();
            }
        }

        if let Some(fault) = &self.fault {
            debug!(target: "lifecycle", "Restore refused after fatal error: {}", fault);
            return Err(fault.clone());
        }

        let status = self.engine.restore();
        if status != STATUS_OK {
            let err = LifecycleError::Restore { status };
            return Err(self.report_fault(err));
        }

        let next = match self.visibility {
            Visibility::Paused => EngineState::Suspended,
            Visibility::Created | Visibility::Resumed => EngineState::SurfaceReady,
        };
        self.transition(next);
        self.try_activate();
        Ok(())
    }

    pub fn surface_destroyed(&mut self) {
        if !self.state.has_surface() {
            debug!(target: "lifecycle", "Surface destroyed in state {:?}", self.state);
            return;
        }
        self.release_surface();
    }

    /// Forwards `resize` if a surface is bound. Returns whether it was sent.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        if !self.state.has_surface() {
            debug!(
                target: "lifecycle",
                "Dropping resize {}x{} in state {:?}", width, height, self.state
            );
            return false;
        }

        self.engine.resize(width, height);
        true
    }

    //--- Render Tick ------------------------------------------------------

    /// Runs one engine `update` if live.
    pub fn update(&mut self) -> FrameOutcome {
        if !self.state.is_live() {
            trace!(target: "lifecycle", "Skipping update in state {:?}", self.state);
            return FrameOutcome::Skipped;
        }

        let status = self.engine.update();
        if status == STATUS_OK {
            return FrameOutcome::Rendered;
        }

        info!(target: "lifecycle", "Engine requested exit (status {})", status);
        self.terminate();
        self.reporter.exit();
        FrameOutcome::Exit
    }

    //--- Host Visibility & Focus ------------------------------------------

    pub fn resume(&mut self) {
        if self.state == EngineState::ShutDown {
            debug!(target: "lifecycle", "Resume ignored after shutdown");
            return;
        }

        self.visibility = Visibility::Resumed;
        if self.state == EngineState::Suspended {
            self.transition(EngineState::SurfaceReady);
        }

        if self.has_focus {
            self.try_activate();
        } else {
            debug!(target: "lifecycle", "Resumed without focus, activation deferred");
            self.activation_pending = true;
        }
    }

    pub fn pause(&mut self) {
        if self.state == EngineState::ShutDown {
            debug!(target: "lifecycle", "Pause ignored after shutdown");
            return;
        }

        self.visibility = Visibility::Paused;
        self.activation_pending = false;

        if self.state == EngineState::Active {
            self.deactivate();
        }
        if self.state == EngineState::SurfaceReady {
            self.transition(EngineState::Suspended);
        }
    }

    pub fn focus_changed(&mut self, focused: bool) {
        if self.has_focus == focused {
            trace!(target: "lifecycle", "Focus unchanged ({})", focused);
            return;
        }
        self.has_focus = focused;

        if self.state == EngineState::ShutDown {
            return;
        }

        if focused {
            if self.activation_pending {
                debug!(target: "lifecycle", "Focus gained, consuming pending activation");
                self.activation_pending = false;
            }
            self.try_activate();
        } else {
            if self.state == EngineState::Active {
                self.deactivate();
            }
            if self.visibility == Visibility::Resumed {
                self.activation_pending = true;
            }
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Terminal transition. Repeated calls are no-ops.
    pub fn shutdown(&mut self) {
        match self.state {
            EngineState::ShutDown => {
                debug!(target: "lifecycle", "Already shut down");
            }
            EngineState::Uninitialized => {
                self.transition(EngineState::ShutDown);
            }
            _ => self.terminate(),
        }
    }

    //--- Input Forwarding -------------------------------------------------

    /// Forwards a normalized pointer command if live. Returns whether it was sent.
    pub fn pointer(&mut self, command: &PointerCommand) -> bool {
        if !self.state.is_live() {
            trace!(target: "lifecycle", "Dropping {:?} in state {:?}", command, self.state);
            return false;
        }

        match *command {
            PointerCommand::Down { id, x, y } => self.engine.pointer_down(id, x, y),
            PointerCommand::Move { id, x, y } => self.engine.pointer_move(id, x, y),
            PointerCommand::Up { id, x, y } => self.engine.pointer_up(id, x, y),
            PointerCommand::Scroll { dt, dx1, dy1, dx2, dy2 } => {
                self.engine.scroll(dt, dx1, dy1, dx2, dy2)
            }
        }
        true
    }

    /// Forwards a key transition if live, `None` included.
    pub fn key(&mut self, key: LogicalKey, pressed: bool) -> bool {
        if !self.state.is_live() {
            trace!(target: "lifecycle", "Dropping key {:?} in state {:?}", key, self.state);
            return false;
        }

        if pressed {
            self.engine.key_down(key.ordinal());
        } else {
            self.engine.key_up(key.ordinal());
        }
        true
    }

    //--- Internal Helpers -------------------------------------------------

    fn transition(&mut self, next: EngineState) {
        if self.state != next {
            info!(target: "lifecycle", "{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn try_activate(&mut self) {
        let ready = self.state == EngineState::SurfaceReady
            && self.visibility == Visibility::Resumed
            && self.has_focus;
        if !ready {
            return;
        }

        self.engine.activated();
        self.activation_pending = false;
        self.transition(EngineState::Active);
    }

    fn deactivate(&mut self) {
        self.engine.deactivated();
        self.transition(EngineState::SurfaceReady);
    }

    fn release_surface(&mut self) {
        if self.state == EngineState::Active {
            self.deactivate();
        }
        self.transition(EngineState::Initialized);
    }

    fn terminate(&mut self) {
        if self.state == EngineState::Active {
            self.engine.deactivated();
        }
        self.engine.shutdown();
        self.activation_pending = false;
        self.transition(EngineState::ShutDown);
    }

    fn report_fault(&mut self, err: LifecycleError) -> LifecycleError {
        error!(target: "lifecycle", "{}", err);
        self.reporter.error(err.to_string());
        self.fault = Some(err.clone());
        err
    }
}

impl<E: EngineBoundary> Drop for LifecycleController<E> {
    fn drop(&mut self) {
        if !matches!(self.state, EngineState::Uninitialized | EngineState::ShutDown) {
            info!(target: "lifecycle", "Releasing engine still in state {:?}", self.state);
            self.terminate();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
