//=========================================================================
// Engine Boundary
//=========================================================================
//
// The fixed set of entry points into the external runner engine.
//
// Architecture:
// ```text
//   LifecycleController ──► EngineBoundary ──► engine (native or adapter)
//                                  ▲
//                                  ├─ NativeEngine   (feature "native")
//                                  └─ LegacyAdapter  (first-generation shape)
// ```
//
// Every call is synchronous. Status codes follow the C convention of the
// runner library: zero means success, anything else is a failure (or, for
// `update`, an exit request).
//
//=========================================================================

//=== Submodules ==========================================================

pub mod legacy;

#[cfg(feature = "native")]
pub mod native;

//=== External Dependencies ===============================================

use std::ffi::c_void;
use std::fmt;
use std::path::PathBuf;
use std::ptr::NonNull;

//=== Status ==============================================================

/// Status code returned by `init`, `restore` and `update`.
pub type Status = i32;

/// Success status.
pub const STATUS_OK: Status = 0;

//=== AssetSource =========================================================

/// Where the engine loads its assets from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Packaged archive (e.g. the application package path).
    Archive(PathBuf),

    /// Unpacked asset root on disk.
    Directory(PathBuf),

    /// Opaque asset-manager handle owned by the host.
    Handle(AssetHandle),
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(path) => write!(f, "archive {}", path.display()),
            Self::Directory(path) => write!(f, "directory {}", path.display()),
            Self::Handle(handle) => write!(f, "handle {:p}", handle.as_ptr()),
        }
    }
}

/// Host-owned asset manager pointer, passed through to the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetHandle(NonNull<c_void>);

// SAFETY: the handle is an opaque token that this crate never dereferences;
// only the engine interprets it, on whichever thread calls `init`.
unsafe impl Send for AssetHandle {}
unsafe impl Sync for AssetHandle {}

impl AssetHandle {
    /// Wraps a host pointer. Returns `None` for null.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

//=== EngineBoundary ======================================================

/// Entry points of the external engine.
///
/// Implementations must not be called concurrently; the lifecycle
/// controller owns the only instance and serializes every call.
pub trait EngineBoundary: Send {
    /// Bootstraps the engine from `source`. Non-zero status is fatal.
    fn init(&mut self, source: &AssetSource) -> Status;

    /// Rebuilds surface-bound resources. Non-zero status is fatal.
    fn restore(&mut self) -> Status;

    fn resize(&mut self, width: i32, height: i32);

    /// Advances and renders one frame. Non-zero status requests exit.
    fn update(&mut self) -> Status;

    fn shutdown(&mut self);

    fn activated(&mut self);

    fn deactivated(&mut self);

    /// Coordinates are normalized to `[0, 1]`.
    fn pointer_down(&mut self, id: i32, x: f32, y: f32);

    fn pointer_up(&mut self, id: i32, x: f32, y: f32);

    fn pointer_move(&mut self, id: i32, x: f32, y: f32);

    /// Raw deltas for up to two pointers over `dt` milliseconds.
    fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32);

    fn key_down(&mut self, key: i32);

    fn key_up(&mut self, key: i32);
}

impl<E: EngineBoundary + ?Sized> EngineBoundary for Box<E> {
    fn init(&mut self, source: &AssetSource) -> Status {
        (**self).init(source)
    }

    fn restore(&mut self) -> Status {
        (**self).restore()
    }

    fn resize(&mut self, width: i32, height: i32) {
        (**self).resize(width, height)
    }

    fn update(&mut self) -> Status {
        (**self).update()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }

    fn activated(&mut self) {
        (**self).activated()
    }

    fn deactivated(&mut self) {
        (**self).deactivated()
    }

    fn pointer_down(&mut self, id: i32, x: f32, y: f32) {
        (**self).pointer_down(id, x, y)
    }

    fn pointer_up(&mut self, id: i32, x: f32, y: f32) {
        (**self).pointer_up(id, x, y)
    }

    fn pointer_move(&mut self, id: i32, x: f32, y: f32) {
        (**self).pointer_move(id, x, y)
    }

    fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32) {
        (**self).scroll(dt, dx1, dy1, dx2, dy2)
    }

    fn key_down(&mut self, key: i32) {
        (**self).key_down(key)
    }

    fn key_up(&mut self, key: i32) {
        (**self).key_up(key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{CallLog, EngineCall, RecordingEngine};

    #[test]
    fn null_handle_is_rejected() {
        assert!(AssetHandle::new(std::ptr::null_mut()).is_none());
    }

    #[test]
    fn handle_keeps_pointer() {
        let mut value = 7u8;
        let ptr = &mut value as *mut u8 as *mut c_void;
        let handle = AssetHandle::new(ptr).unwrap();
        assert_eq!(handle.as_ptr(), ptr);
    }

    #[test]
    fn asset_source_display() {
        let source = AssetSource::Directory(PathBuf::from("assets"));
        assert_eq!(source.to_string(), "directory assets");
    }

    #[test]
    fn boxed_engine_forwards_calls() {
        let log = CallLog::new();
        let mut engine: Box<dyn EngineBoundary> = Box::new(RecordingEngine::new(log.clone()));

        engine.resize(640, 480);
        engine.key_down(3);

        assert_eq!(log.calls(), vec![EngineCall::Resize(640, 480), EngineCall::KeyDown(3)]);
    }
}
