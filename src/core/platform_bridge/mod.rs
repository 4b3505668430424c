//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host platform (winit, or any embedding shell) with the
// lifecycle controller and input normalization.
//
// Components:
// - `bridge`: `EventBridge`, the facade every host callback goes through
// - `interface`: Render commands and platform error definitions
// - `event_collector`: Render-side command draining
//
//=========================================================================

//=== Module Declarations =================================================

pub mod bridge;
pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use bridge::EventBridge;
pub use interface::PlatformError;

//=== Internal API ========================================================

pub(crate) use event_collector::{RenderCommandCollector, TickControl};
pub(crate) use interface::RenderCommand;
