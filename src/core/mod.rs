//=========================================================================
// Core Systems
//
// Everything between the host callbacks and the native engine.
//
// Responsibilities:
// - Describe the engine boundary and its variants (`boundary`)
// - Own the engine state machine (`lifecycle`)
// - Normalize touch and key input (`input`)
// - Funnel host callbacks through one serialized facade (`platform_bridge`)
// - Drive the engine from a fixed-rate render thread (`render_loop`)
// - Carry fatal errors and exit requests back to the host (`report`)
//
// Notes:
// Nothing here depends on a particular windowing system. The winit host
// in `platform` is one consumer; an embedding shell can drive
// `EventBridge` directly.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod boundary;
pub mod input;
pub mod lifecycle;
pub mod platform_bridge;
pub mod report;

pub(crate) mod render_loop;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use boundary::{AssetHandle, AssetSource, EngineBoundary, Status, STATUS_OK};
pub use input::{LogicalKey, PointerNormalizer, TouchPhase, TouchProtocol, TouchSample};
pub use lifecycle::{EngineState, FrameOutcome, LifecycleController, LifecycleError};
pub use platform_bridge::{EventBridge, PlatformError};
pub use report::{Notification, Reporter};
