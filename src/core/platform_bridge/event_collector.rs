//=========================================================================
// Render Command Collector
//=========================================================================
//
// Render-side drain of surface commands with bounded polling and shutdown
// detection.
//
// Architecture:
//   Receiver<RenderCommand> → collect_frame() → EventBridge → TickControl
//
// Bounded polling keeps a burst of surface churn from starving frames.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{EventBridge, RenderCommand};
use crate::core::boundary::EngineBoundary;

/// Upper bound on commands applied per frame.
pub(crate) const MAX_COMMANDS_PER_FRAME: usize = 100;

//=== TickControl =========================================================

/// Render loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== RenderCommandCollector ==============================================

/// Applies pending surface commands to the bridge, in arrival order.
pub(crate) struct RenderCommandCollector {
    receiver: Receiver<RenderCommand>,
}

impl RenderCommandCollector {
    pub(crate) fn new(receiver: Receiver<RenderCommand>) -> Self {
        Self { receiver }
    }

    /// Drains pending commands (bounded to prevent starvation).
    pub(crate) fn collect_frame<E: EngineBoundary>(&mut self, bridge: &EventBridge<E>) -> TickControl {
        let mut drained = 0;

        while drained < MAX_COMMANDS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(command) => {
                    if Self::apply(command, bridge) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_COMMANDS_PER_FRAME {
            warn!(target: "render", "Command queue backlog: drained {} commands this frame", drained);
        }

        TickControl::Continue
    }

    fn apply<E: EngineBoundary>(command: RenderCommand, bridge: &EventBridge<E>) -> TickControl {
        match command {
            RenderCommand::SurfaceCreated => {
                // Failure is already reported through the notification channel
                if let Err(e) = bridge.on_surface_created() {
                    debug!(target: "render", "Surface not bound: {}", e);
                }
            }
            RenderCommand::SurfaceChanged { width, height } => bridge.on_surface_changed(width, height),
            RenderCommand::SurfaceDestroyed => bridge.on_surface_destroyed(),
            RenderCommand::Quit => return TickControl::Exit,
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::boundary::AssetSource;
    use crate::core::input::{PointerNormalizer, TouchProtocol, DEFAULT_SCROLL_EPSILON};
    use crate::core::lifecycle::EngineState;
    use crate::core::report::Reporter;
    use crate::core::testing::{CallLog, EngineCall, RecordingEngine};
    use crossbeam_channel::unbounded;
    use std::path::PathBuf;

    fn initialized_bridge() -> (EventBridge<RecordingEngine>, CallLog) {
        let log = CallLog::new();
        let (reporter, _rx) = Reporter::channel();
        let bridge = EventBridge::new(
            RecordingEngine::new(log.clone()),
            reporter,
            PointerNormalizer::new(TouchProtocol::Pointers, DEFAULT_SCROLL_EPSILON),
        );
        bridge.on_create(&AssetSource::Directory(PathBuf::from("assets"))).unwrap();
        log.clear();
        (bridge, log)
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (bridge, log) = initialized_bridge();
        let (_tx, rx) = unbounded::<RenderCommand>();
        let mut collector = RenderCommandCollector::new(rx);

        assert_eq!(collector.collect_frame(&bridge), TickControl::Continue);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn collect_applies_commands_in_order() {
        let (bridge, log) = initialized_bridge();
        let (tx, rx) = unbounded();
        let mut collector = RenderCommandCollector::new(rx);

        tx.send(RenderCommand::SurfaceCreated).unwrap();
        tx.send(RenderCommand::SurfaceChanged { width: 320, height: 240 }).unwrap();

        assert_eq!(collector.collect_frame(&bridge), TickControl::Continue);
        assert_eq!(log.calls(), vec![EngineCall::Restore, EngineCall::Resize(320, 240)]);
        assert_eq!(bridge.state(), EngineState::SurfaceReady);
        assert_eq!(bridge.surface_size().width, 320);
    }

    #[test]
    fn collect_returns_exit_on_quit() {
        let (bridge, log) = initialized_bridge();
        let (tx, rx) = unbounded();
        let mut collector = RenderCommandCollector::new(rx);

        tx.send(RenderCommand::Quit).unwrap();
        tx.send(RenderCommand::SurfaceCreated).unwrap();

        assert_eq!(collector.collect_frame(&bridge), TickControl::Exit);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (bridge, log) = initialized_bridge();
        let (tx, rx) = unbounded();
        let mut collector = RenderCommandCollector::new(rx);

        for _ in 0..MAX_COMMANDS_PER_FRAME + 5 {
            tx.send(RenderCommand::SurfaceChanged { width: 1, height: 1 }).unwrap();
        }
        tx.send(RenderCommand::SurfaceCreated).unwrap();

        collector.collect_frame(&bridge);
        assert_eq!(log.count(&EngineCall::Restore), 0);

        collector.collect_frame(&bridge);
        assert_eq!(log.count(&EngineCall::Restore), 1);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (bridge, _log) = initialized_bridge();
        let (tx, rx) = unbounded::<RenderCommand>();
        let mut collector = RenderCommandCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(&bridge), TickControl::Exit);
    }
}
