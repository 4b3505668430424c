//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Types crossing from the UI sequence to the render sequence, and the
// errors a host platform can raise.
//
//=========================================================================

use thiserror::Error;

//=== RenderCommand =======================================================

/// Surface lifecycle events delivered to the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderCommand {
    /// A drawable surface exists; engine resources must be restored.
    SurfaceCreated,

    /// Surface geometry in pixels.
    SurfaceChanged { width: i32, height: i32 },

    /// The surface is gone.
    SurfaceDestroyed,

    /// Stop the render loop.
    Quit,
}

//=== PlatformError =======================================================

/// Host platform failures. Fatal: the event loop cannot run.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(winit::error::EventLoopError),

    /// The event loop stopped with an error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(winit::error::EventLoopError),
}
