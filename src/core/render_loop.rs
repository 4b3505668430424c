//=========================================================================
// Render Loop
//
// Dedicated render thread driving the engine at a fixed tick rate.
//
// Each tick:
//  1. Applies pending surface commands (bounded)
//  2. Runs one engine frame through the bridge
//  3. Sleeps to maintain fixed pacing
//
// The loop exits on `Quit`, on channel disconnect, or when the engine
// itself requests exit. In the last case the platform learns about it
// through the notification channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::boundary::EngineBoundary;
use crate::core::lifecycle::FrameOutcome;
use crate::core::platform_bridge::{EventBridge, RenderCommand, RenderCommandCollector, TickControl};

//=== spawn_render_thread() ===============================================

/// Spawns the render thread ticking `bridge` at `tps` frames per second.
///
/// Fails with [`io::ErrorKind::InvalidInput`] if `tps` yields no
/// representable frame duration.
pub(crate) fn spawn_render_thread<E>(
    bridge: EventBridge<E>,
    receiver: Receiver<RenderCommand>,
    tps: f64,
) -> io::Result<thread::JoinHandle<()>>
where
    E: EngineBoundary + 'static,
{
    let frame_duration = Duration::try_from_secs_f64(1.0 / tps)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("TPS {}: {}", tps, e)))?;

    thread::Builder::new()
        .name("render".into())
        .spawn(move || run_render_loop(&bridge, receiver, frame_duration))
}

fn run_render_loop<E: EngineBoundary>(
    bridge: &EventBridge<E>,
    receiver: Receiver<RenderCommand>,
    frame_duration: Duration,
) {
    let mut collector = RenderCommandCollector::new(receiver);
    let mut frames: u64 = 0;
    info!(target: "render", "Render thread started ({:?} per frame)", frame_duration);

    loop {
        let frame_start = Instant::now();

        //--- Step 1: Surface commands -------------------------------------
        if collector.collect_frame(bridge) == TickControl::Exit {
            info!(target: "render", "Render thread exiting after {} frames", frames);
            break;
        }

        //--- Step 2: Engine frame -----------------------------------------
        match bridge.on_draw_frame() {
            FrameOutcome::Rendered => frames += 1,
            FrameOutcome::Skipped => {}
            FrameOutcome::Exit => {
                info!(target: "render", "Engine finished after {} frames", frames);
                break;
            }
        }

        //--- Step 3: Pacing -----------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        } else {
            debug!(target: "render", "Frame overran budget: {:?}", elapsed);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
