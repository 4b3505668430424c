//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use runner_host::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Host facade
pub use crate::runner::{HostConfig, Runner, RunnerBuilder, RunnerError};

// Engine boundary
pub use crate::core::boundary::legacy::{LegacyAdapter, LegacyEngine};
pub use crate::core::boundary::{AssetHandle, AssetSource, EngineBoundary, Status, STATUS_OK};

#[cfg(feature = "native")]
pub use crate::core::boundary::native::NativeEngine;

// Lifecycle
pub use crate::core::lifecycle::{EngineState, FrameOutcome, LifecycleError};

// Input
pub use crate::core::input::{LogicalKey, TouchPhase, TouchProtocol, TouchSample};

// Bridge and reporting
pub use crate::core::platform_bridge::EventBridge;
pub use crate::core::report::{Notification, Reporter};
