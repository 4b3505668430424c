//=========================================================================
// Platform Subsystem
//
// Desktop host: drives the event bridge from a winit event loop.
//
// Architecture:
// ```text
//  Main Thread (UI sequence):          Render Thread:
//  ┌───────────────────────────┐      ┌──────────────────────┐
//  │  Winit Event Loop         │      │  RenderCommand drain │
//  │   ├─ resumed / suspended ─┼──┐   │   ↓                  │
//  │   ├─ Focused              │  │   │  on_draw_frame()     │
//  │   ├─ mouse / touch / keys │  │   │   @ TPS              │
//  │   ↓                       │  │   └──────────┬───────────┘
//  │  InputProcessor           │  │              │
//  │   ↓                       │  │ RenderCommand│
//  │  EventBridge (UI calls)   │  └──────────────┤
//  │                           │                 │
//  │  about_to_wait            │   Notification  │
//  │   └─ poll notifications ◄─┼─────────────────┘
//  └───────────────────────────┘
// ```
//
// Key Design Decisions:
// - Surface lifecycle travels to the render thread as `RenderCommand`s;
//   everything else is a direct bridge call on the main thread
// - `resumed` creates the window once, then reports resume plus a fresh
//   surface; `suspended` reports pause plus surface loss
// - An `Error` notification ends the loop with a fatal outcome; `Exit`
//   ends it normally
// - A panic on any thread is logged with its location and a backtrace
//   before the default hook runs
// - Main thread requirement: winit mandates the main thread on macOS/iOS,
//   so this runs on the thread that called `Runner::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic;
use std::sync::Once;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{Touch, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::boundary::EngineBoundary;
use crate::core::input::TouchSample;
use crate::core::platform_bridge::{EventBridge, PlatformError, RenderCommand};
use crate::core::report::Notification;
use input_processor::InputProcessor;

/// How often the loop wakes to look for notifications.
const NOTIFICATION_POLL: Duration = Duration::from_millis(16);

//=== WindowSettings ======================================================

/// Initial window appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== PlatformExit ========================================================

/// Why the event loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformExit {
    /// The user or OS closed the window.
    Closed,

    /// The engine asked to terminate.
    EngineExit,

    /// A fatal error was reported.
    Fatal(String),
}

//=== Platform ============================================================

/// Window owner and host-callback source.
///
/// # Thread Safety
///
/// This type is NOT Send/Sync; it must remain on the main thread.
/// The render thread is reached only through the command sender and the
/// shared bridge.
pub(crate) struct Platform<E: EngineBoundary + 'static> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    settings: WindowSettings,
    bridge: EventBridge<E>,
    render_sender: Sender<RenderCommand>,
    notifications: Receiver<Notification>,
    input_processor: InputProcessor,

    /// Whether the render thread currently holds a surface.
    surface_live: bool,

    exit: Option<PlatformExit>,
}

impl<E: EngineBoundary + 'static> Platform<E> {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub(crate) fn new(
        settings: WindowSettings,
        bridge: EventBridge<E>,
        render_sender: Sender<RenderCommand>,
        notifications: Receiver<Notification>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            bridge,
            render_sender,
            notifications,
            input_processor: InputProcessor::new(),
            surface_live: false,
            exit: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes or the engine
    /// stops, and reports why.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub(crate) fn run(mut self) -> Result<PlatformExit, PlatformError> {
        install_panic_hook();
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        Ok(self.exit.take().unwrap_or(PlatformExit::Closed))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends a command to the render thread; a stopped render thread is
    /// logged and otherwise ignored.
    fn send_render(&self, command: RenderCommand) {
        if self.render_sender.send(command).is_err() {
            debug!(target: "platform", "Render thread gone, dropping {:?}", command);
        }
    }

    fn surface_created(&mut self, size: PhysicalSize<u32>) {
        if self.surface_live {
            return;
        }
        self.surface_live = true;
        self.send_render(RenderCommand::SurfaceCreated);
        self.surface_changed(size);
    }

    fn surface_changed(&self, size: PhysicalSize<u32>) {
        self.send_render(RenderCommand::SurfaceChanged {
            width: i32::try_from(size.width).unwrap_or(i32::MAX),
            height: i32::try_from(size.height).unwrap_or(i32::MAX),
        });
    }

    fn touch(&self, sample: Option<TouchSample>) {
        if let Some(sample) = sample {
            self.bridge.on_touch(&sample);
        }
    }

    /// Checks for a pending notification. Returns whether the loop must stop.
    fn drain_notifications(&mut self) -> bool {
        match self.notifications.try_recv() {
            Ok(Notification::Error(message)) => {
                error!(target: "platform", "Fatal: {}", message);
                self.exit = Some(PlatformExit::Fatal(message));
                true
            }
            Ok(Notification::Exit) => {
                info!(target: "platform", "Engine requested exit");
                self.exit = Some(PlatformExit::EngineExit);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!(target: "platform", "Notification channel closed");
                true
            }
        }
    }

    /// Stops the render thread and leaves the event loop.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.send_render(RenderCommand::Quit);
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Panic Diagnostics ===================================================

static PANIC_HOOK: Once = Once::new();

/// Logs panics through `log` ahead of the previously installed hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "<unknown>".to_string());

            error!(
                target: "platform",
                "Panic on thread '{}' at {}: {}\n{}",
                thread::current().name().unwrap_or("<unnamed>"),
                location,
                panic_payload(info.payload()),
                Backtrace::force_capture()
            );
            previous(info);
        }));
    });
}

fn panic_payload(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

//=== Winit Integration ===================================================

impl<E: EngineBoundary + 'static> ApplicationHandler for Platform<E> {
    /// Called on startup and on mobile resume.
    ///
    /// Creates the window once, then reports resume and a surface.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = WindowAttributes::default()
                .with_title(self.settings.title.clone())
                .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

            match event_loop.create_window(attrs) {
                Ok(window) => {
                    info!(
                        target: "platform",
                        "Window created: {}x{} @ {}x DPI",
                        window.inner_size().width,
                        window.inner_size().height,
                        window.scale_factor()
                    );
                    self.window = Some(window);
                }
                Err(e) => {
                    let message = format!("Window creation failed: {}", e);
                    error!(target: "platform", "{}", message);
                    self.exit = Some(PlatformExit::Fatal(message));
                    self.close(event_loop);
                    return;
                }
            }
        }

        self.bridge.on_resume();
        if let Some(size) = self.window.as_ref().map(Window::inner_size) {
            self.surface_created(size);
        }
    }

    /// Called when the app is backgrounded (mobile).
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.bridge.on_pause();
        self.input_processor.reset();
        if self.surface_live {
            self.surface_live = false;
            self.send_render(RenderCommand::SurfaceDestroyed);
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::Focused(focused) => {
                self.bridge.on_focus_changed(focused);
                if !focused {
                    self.input_processor.reset();
                }
            }

            WindowEvent::Resized(size) => {
                if self.surface_live {
                    self.surface_changed(size);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let now = self.input_processor.now_ms();
                let sample = self
                    .input_processor
                    .process_cursor_moved(position.x as f32, position.y as f32, now);
                self.touch(sample);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let now = self.input_processor.now_ms();
                let sample = self.input_processor.process_mouse_button(button, state, now);
                self.touch(sample);
            }

            WindowEvent::Touch(Touch { phase, location, id, .. }) => {
                let now = self.input_processor.now_ms();
                let sample = self.input_processor.process_touch(
                    phase,
                    id,
                    location.x as f32,
                    location.y as f32,
                    now,
                );
                self.touch(sample);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some((key, pressed)) = self.input_processor.process_key_event(&key_event) {
                    self.bridge.on_key(key, pressed);
                } else {
                    trace!(target: "platform", "Key repeat ignored");
                }
            }

            _ => {}
        }
    }

    /// Polls notifications between event batches.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.drain_notifications() {
            self.close(event_loop);
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + NOTIFICATION_POLL));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
