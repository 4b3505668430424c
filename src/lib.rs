//=========================================================================
// Runner Host - Library Root
//
// Host-application shell for a native runner engine.
//
// Responsibilities:
// - Expose the host facade (`RunnerBuilder`, `Runner`)
// - Expose the host-independent coordination layer (`core`) for shells
//   that deliver lifecycle and input callbacks themselves
// - Keep the winit desktop host (`platform`) internal
//
// Typical usage:
// ```ignore
// use runner_host::{AssetSource, RunnerBuilder};
//
// fn main() -> Result<(), runner_host::RunnerError> {
//     RunnerBuilder::new(AssetSource::Directory("assets".into()))
//         .build(engine)
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine boundary, lifecycle state machine, input
// normalization and the event bridge. None of it depends on winit.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the winit host driving the bridge on desktop.
// `runner` wires configuration, render thread and platform together.
//
mod platform;
mod runner;

//--- Public Exports ------------------------------------------------------

pub use crate::core::boundary::{AssetSource, EngineBoundary};
pub use crate::core::input::TouchProtocol;
pub use runner::{HostConfig, Runner, RunnerBuilder, RunnerError};
