//=========================================================================
// Runner
//
// Main entry point: configures the host and runs it to completion.
//
// Architecture:
// ```text
//     RunnerBuilder  ──build(engine)──>  Runner  ──run()──>  [Runtime]
//         │                                │
//         ├─ with_tps()                    ├─ init engine
//         ├─ with_channel_capacity()       ├─ spawns render thread
//         ├─ with_title() / with_size()    ├─ runs platform
//         └─ with_touch_protocol()         └─ blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::boundary::{AssetSource, EngineBoundary};
use crate::core::input::{PointerNormalizer, TouchProtocol, DEFAULT_SCROLL_EPSILON};
use crate::core::lifecycle::LifecycleError;
use crate::core::platform_bridge::{EventBridge, PlatformError, RenderCommand};
use crate::core::render_loop::spawn_render_thread;
use crate::core::report::{Notification, Reporter};
use crate::platform::{Platform, PlatformExit, WindowSettings};

//=== HostConfig ==========================================================

/// Resolved host settings.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub asset_source: AssetSource,
    pub tps: f64,
    pub channel_capacity: usize,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub touch_protocol: TouchProtocol,
    pub scroll_epsilon: f32,
}

impl HostConfig {
    fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

//=== RunnerError =========================================================

/// Why [`Runner::run`] failed.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The engine failed to initialize or restore.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The host could not present a window.
    #[error("{0}")]
    Window(String),

    #[error("Failed to spawn render thread: {0}")]
    RenderThreadSpawn(#[source] std::io::Error),

    #[error("Render thread panicked")]
    RenderThreadPanicked,
}

//=== RunnerBuilder =======================================================

/// Builder for configuring and constructing a [`Runner`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (render ticks per second)
/// - **Channel capacity**: 128 surface commands
/// - **Window**: "Runner", 800x600
/// - **Touch protocol**: [`TouchProtocol::Pointers`]
/// - **Scroll epsilon**: 0.005
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use runner_host::{AssetSource, RunnerBuilder, TouchProtocol};
/// # use runner_host::core::boundary::legacy::{LegacyAdapter, LegacyEngine};
/// # use runner_host::core::boundary::Status;
/// # struct Stub;
/// # impl LegacyEngine for Stub {
/// #     fn init(&mut self, _: &std::path::Path) -> Status { 0 }
/// #     fn resize(&mut self, _: i32, _: i32) {}
/// #     fn update(&mut self) {}
/// #     fn scroll(&mut self, _: i64, _: f32, _: f32, _: f32, _: f32) {}
/// # }
/// # let engine = LegacyAdapter::new(Stub);
///
/// RunnerBuilder::new(AssetSource::Directory(PathBuf::from("assets")))
///     .with_tps(60.0)
///     .with_touch_protocol(TouchProtocol::Scroll)
///     .build(engine)
///     .run()?;
/// # Ok::<(), runner_host::RunnerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RunnerBuilder {
    config: HostConfig,
}

impl RunnerBuilder {
    /// Creates a new builder with default settings.
    pub fn new(asset_source: AssetSource) -> Self {
        Self {
            config: HostConfig {
                asset_source,
                tps: 60.0,
                channel_capacity: 128,
                title: "Runner".to_string(),
                width: 800,
                height: 600,
                touch_protocol: TouchProtocol::default(),
                scroll_epsilon: DEFAULT_SCROLL_EPSILON,
            },
        }
    }

    /// Sets the target ticks per second for the render thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`, or if it is so small that one frame lasts
    /// longer than a [`Duration`] can hold.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        assert!(
            Duration::try_from_secs_f64(1.0 / tps).is_ok(),
            "TPS too small for a representable frame duration, got {}",
            tps
        );
        self.config.tps = tps;
        self
    }

    /// Sets the capacity of the UI → render command channel.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Selects the pointer protocol the engine speaks.
    ///
    /// Default: [`TouchProtocol::Pointers`]
    pub fn with_touch_protocol(mut self, protocol: TouchProtocol) -> Self {
        self.config.touch_protocol = protocol;
        self
    }

    /// Minimum absolute delta for the scroll protocol to emit.
    ///
    /// Default: 0.005
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is negative or NaN.
    pub fn with_scroll_epsilon(mut self, epsilon: f32) -> Self {
        assert!(epsilon >= 0.0, "Scroll epsilon must be non-negative, got {}", epsilon);
        self.config.scroll_epsilon = epsilon;
        self
    }

    /// Builds the runner around `engine`.
    ///
    /// The engine is not touched until [`Runner::run`], or until an
    /// embedding shell drives [`Runner::bridge`] itself.
    pub fn build<E: EngineBoundary + 'static>(self, engine: E) -> Runner<E> {
        let config = self.config;
        info!(
            "Building runner (TPS: {}, channel: {}, protocol: {:?})",
            config.tps, config.channel_capacity, config.touch_protocol
        );

        let (reporter, notifications) = Reporter::channel();
        let normalizer = PointerNormalizer::new(config.touch_protocol, config.scroll_epsilon);
        let bridge = EventBridge::new(engine, reporter, normalizer);

        Runner {
            config,
            bridge,
            notifications,
        }
    }
}

//=== Runner ==============================================================

/// Host runtime around one engine.
///
/// # Architecture
///
/// ```text
/// Runner (Main Thread)
///   ├─► Render Thread (@ TPS)
///   │     └─► surface commands, engine update
///   │
///   └─► Platform (Event Loop)
///         └─► Window, focus, input → EventBridge
///
/// Communication: crossbeam channels (RenderCommand, Notification)
/// ```
pub struct Runner<E: EngineBoundary + 'static> {
    config: HostConfig,
    bridge: EventBridge<E>,
    notifications: Receiver<Notification>,
}

impl<E: EngineBoundary + 'static> Runner<E> {
    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The bridge, for shells that deliver host callbacks themselves.
    pub fn bridge(&self) -> &EventBridge<E> {
        &self.bridge
    }

    /// Notifications for shells that present errors themselves.
    pub fn notifications(&self) -> &Receiver<Notification> {
        &self.notifications
    }

    //--- Execution --------------------------------------------------------

    /// Starts the host and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Initializes the engine (a failure returns before any window exists)
    /// 2. Creates the UI → render command channel
    /// 3. Spawns the render thread running at the configured TPS
    /// 4. Runs the platform event loop (blocks here)
    /// 5. On exit: joins the render thread, then shuts the engine down
    ///
    /// # Errors
    ///
    /// - [`RunnerError::Lifecycle`] if `init` or `restore` failed
    /// - [`RunnerError::Platform`] if the event loop could not run
    /// - [`RunnerError::Window`] if no window could be created
    /// - [`RunnerError::RenderThreadSpawn`] / [`RunnerError::RenderThreadPanicked`]
    pub fn run(self) -> Result<(), RunnerError> {
        let Runner {
            config,
            bridge,
            notifications,
        } = self;
        info!("Starting runner (TPS: {})", config.tps);

        //--- 1. Initialize the engine -------------------------------------
        bridge.on_create(&config.asset_source)?;

        //--- 2. Create command channel ------------------------------------
        let (tx, rx): (Sender<RenderCommand>, Receiver<RenderCommand>) =
            bounded(config.channel_capacity);

        //--- 3. Spawn the render thread -----------------------------------
        let render_handle = spawn_render_thread(bridge.clone(), rx, config.tps)
            .map_err(RunnerError::RenderThreadSpawn)?;
        info!("Render thread spawned");

        //--- 4. Launch the platform ---------------------------------------
        let platform = Platform::new(config.window_settings(), bridge.clone(), tx, notifications);
        let outcome = platform.run();
        info!("Platform event loop exited");

        //--- 5. Cleanup ---------------------------------------------------
        let joined = render_handle.join();
        bridge.on_destroy();

        if let Err(e) = joined {
            error!("Render thread panicked: {:?}", e);
            return Err(RunnerError::RenderThreadPanicked);
        }

        match outcome? {
            PlatformExit::Closed | PlatformExit::EngineExit => {
                info!("Runner shutdown complete");
                Ok(())
            }
            PlatformExit::Fatal(message) => Err(match bridge.fault() {
                Some(fault) => RunnerError::Lifecycle(fault),
                None => RunnerError::Window(message),
            }),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
