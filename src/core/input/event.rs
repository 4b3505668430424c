//=========================================================================
// Touch Event Types
//
// Host-independent representation of raw touch samples and of the
// normalized pointer commands sent to the engine.
//
// Event Flow:
// ```text
// Host (winit touch/mouse, Android MotionEvent, ...)
//         ↓
//    TouchSample (this module, raw pixels + timestamp)
//         ↓
//    PointerTracker / ScrollAccumulator
//         ↓
//    PointerCommand (normalized or delta form)
//         ↓
//    LifecycleController → engine boundary
// ```
//
// A sample mirrors a multi-touch frame: every pointer currently in
// contact is listed, ordered by pointer index, and `action_index` names
// the one that triggered the sample.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::lifecycle::ProtocolAnomaly;

//=== TouchPhase ==========================================================

/// What happened to the acting pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A pointer made contact (first or additional finger).
    Down,

    /// One or more pointers moved.
    Move,

    /// A pointer lifted (last or non-last finger).
    Up,

    /// The gesture was aborted by the host; all pointers are gone.
    Cancel,
}

//=== PointerSample =======================================================

/// Position of one pointer in raw surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Stable identifier for the duration of the contact.
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

//=== TouchSample =========================================================

/// One raw touch delivery from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchSample {
    pub phase: TouchPhase,

    /// Index into `pointers` of the pointer that triggered the sample.
    pub action_index: usize,

    /// All pointers in contact, by pointer index.
    pub pointers: Vec<PointerSample>,

    /// Host event time in milliseconds.
    pub time_ms: i64,
}

impl TouchSample {
    pub fn new(phase: TouchPhase, action_index: usize, time_ms: i64) -> Self {
        Self {
            phase,
            action_index,
            pointers: Vec::with_capacity(2),
            time_ms,
        }
    }

    /// Appends a pointer at the next pointer index.
    pub fn with_pointer(mut self, id: i32, x: f32, y: f32) -> Self {
        self.pointers.push(PointerSample { id, x, y });
        self
    }

    /// Pointer that triggered this sample.
    pub fn acting(&self) -> Result<&PointerSample, ProtocolAnomaly> {
        self.pointers
            .get(self.action_index)
            .ok_or(ProtocolAnomaly::MissingPointer { index: self.action_index })
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}

//=== SurfaceSize =========================================================

/// Current drawable size in pixels, used to normalize coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: i32,
    pub height: i32,
}

impl SurfaceSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Maps pixel coordinates into `[0, 1] × [0, 1]`.
    pub fn normalize(&self, x: f32, y: f32) -> Result<(f32, f32), ProtocolAnomaly> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ProtocolAnomaly::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }

        let nx = (x / self.width as f32).clamp(0.0, 1.0);
        let ny = (y / self.height as f32).clamp(0.0, 1.0);
        Ok((nx, ny))
    }
}

//=== PointerCommand ======================================================

/// Normalized input ready for the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerCommand {
    /// Absolute position, normalized.
    Down { id: i32, x: f32, y: f32 },

    /// Absolute position, normalized.
    Move { id: i32, x: f32, y: f32 },

    /// Absolute position, normalized.
    Up { id: i32, x: f32, y: f32 },

    /// Raw pixel deltas of the first two pointers over `dt` milliseconds.
    Scroll {
        dt: i64,
        dx1: f32,
        dy1: f32,
        dx2: f32,
        dy2: f32,
    },
}

//=========================================================================
// Unit Tests
//=========================================================================
