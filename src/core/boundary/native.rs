//=========================================================================
// Native Engine Binding
//=========================================================================
//
// Binds `EngineBoundary` to the C runner library (`runner.h`).
//
// The C library keeps its game state in process globals, so at most one
// `NativeEngine` may exist at a time. `acquire()` hands out that single
// instance; dropping it makes the slot available again.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::{c_int, c_long, c_void, CString};
use std::sync::atomic::{AtomicBool, Ordering};

use log::error;

//=== Internal Dependencies ===============================================

use super::{AssetSource, EngineBoundary, Status};

/// Status returned when an asset path cannot be passed across the boundary.
pub const STATUS_INVALID_PATH: Status = -2;

mod sys {
    use std::ffi::{c_float, c_int, c_long, c_void};

    #[link(name = "runner")]
    extern "C" {
        pub fn init(iodata: *mut c_void) -> c_int;
        pub fn shutdown();
        pub fn resize(width: c_int, height: c_int);
        pub fn activated();
        pub fn deactivated();
        pub fn restore() -> c_int;
        pub fn update() -> c_int;
        pub fn pointer_down(pointer_id: c_int, x: c_float, y: c_float);
        pub fn pointer_up(pointer_id: c_int, x: c_float, y: c_float);
        pub fn pointer_move(pointer_id: c_int, x: c_float, y: c_float);
        pub fn scroll(dt: c_long, dx1: c_float, dy1: c_float, dx2: c_float, dy2: c_float);
        pub fn key_down(key: c_int);
        pub fn key_up(key: c_int);
    }
}

static ACQUIRED: AtomicBool = AtomicBool::new(false);

//=== NativeEngine ========================================================

/// Process-wide handle to the linked runner library.
pub struct NativeEngine {
    _private: (),
}

impl NativeEngine {
    /// Returns the engine handle, or `None` if it is already held.
    pub fn acquire() -> Option<Self> {
        ACQUIRED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { _private: () })
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        ACQUIRED.store(false, Ordering::Release);
    }
}

impl EngineBoundary for NativeEngine {
    fn init(&mut self, source: &AssetSource) -> Status {
        match source {
            AssetSource::Archive(path) | AssetSource::Directory(path) => {
                let Some(text) = path.to_str() else {
                    error!(target: "lifecycle", "Asset path is not valid UTF-8: {}", path.display());
                    return STATUS_INVALID_PATH;
                };
                let Ok(c_path) = CString::new(text) else {
                    error!(target: "lifecycle", "Asset path contains a NUL byte: {}", text);
                    return STATUS_INVALID_PATH;
                };
                // SAFETY: `c_path` outlives the call; the engine copies what it keeps.
                unsafe { sys::init(c_path.as_ptr() as *mut c_void) }
            }
            // SAFETY: the handle is a live asset manager owned by the host.
            AssetSource::Handle(handle) => unsafe { sys::init(handle.as_ptr()) },
        }
    }

    fn restore(&mut self) -> Status {
        unsafe { sys::restore() }
    }

    fn resize(&mut self, width: i32, height: i32) {
        unsafe { sys::resize(width as c_int, height as c_int) }
    }

    fn update(&mut self) -> Status {
        unsafe { sys::update() }
    }

    fn shutdown(&mut self) {
        unsafe { sys::shutdown() }
    }

    fn activated(&mut self) {
        unsafe { sys::activated() }
    }

    fn deactivated(&mut self) {
        unsafe { sys::deactivated() }
    }

    fn pointer_down(&mut self, id: i32, x: f32, y: f32) {
        unsafe { sys::pointer_down(id, x, y) }
    }

    fn pointer_up(&mut self, id: i32, x: f32, y: f32) {
        unsafe { sys::pointer_up(id, x, y) }
    }

    fn pointer_move(&mut self, id: i32, x: f32, y: f32) {
        unsafe { sys::pointer_move(id, x, y) }
    }

    fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32) {
        unsafe { sys::scroll(dt as c_long, dx1, dy1, dx2, dy2) }
    }

    fn key_down(&mut self, key: i32) {
        unsafe { sys::key_down(key) }
    }

    fn key_up(&mut self, key: i32) {
        unsafe { sys::key_up(key) }
    }
}
