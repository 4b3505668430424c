//=========================================================================
// Input Normalization
//
// Turns raw host touch samples and key codes into the canonical calls
// the engine expects.
//
// Responsibilities:
// - Pointer protocol: per-pointer down/move/up with normalized positions
// - Scroll protocol: two-finger raw deltas with elapsed milliseconds
// - Key mapping: raw codes → `LogicalKey`
//
// Notes:
// `PointerNormalizer` owns the state of whichever protocol is configured.
// It never talks to the engine; the bridge forwards its output through the
// lifecycle controller, which drops it when the engine is not live.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod key;
pub mod pointer;
pub mod scroll;

//=== Public API ==========================================================

pub use event::{PointerCommand, PointerSample, SurfaceSize, TouchPhase, TouchSample};
pub use key::LogicalKey;
pub use pointer::{PointerRecord, PointerTracker};
pub use scroll::{ScrollAccumulator, DEFAULT_SCROLL_EPSILON};

//=== Internal Imports ====================================================

use crate::core::lifecycle::ProtocolAnomaly;

//=== TouchProtocol =======================================================

/// Which pointer protocol the engine speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TouchProtocol {
    /// Discrete down/move/up per pointer id.
    #[default]
    Pointers,

    /// Accumulated two-finger scroll deltas.
    Scroll,
}

//=== PointerNormalizer ===================================================

/// Stateful front end for the configured touch protocol.
#[derive(Debug)]
pub struct PointerNormalizer {
    protocol: TouchProtocol,
    tracker: PointerTracker,
    scroll: ScrollAccumulator,
}

impl PointerNormalizer {
    pub fn new(protocol: TouchProtocol, scroll_epsilon: f32) -> Self {
        Self {
            protocol,
            tracker: PointerTracker::new(),
            scroll: ScrollAccumulator::new(scroll_epsilon),
        }
    }

    pub fn protocol(&self) -> TouchProtocol {
        self.protocol
    }

    /// Converts one raw sample into engine commands.
    pub fn process(
        &mut self,
        sample: &TouchSample,
        surface: SurfaceSize,
    ) -> Result<Vec<PointerCommand>, ProtocolAnomaly> {
        match self.protocol {
            TouchProtocol::Pointers => self.tracker.process(sample, surface),
            TouchProtocol::Scroll => Ok(self.scroll.process(sample)?.into_iter().collect()),
        }
    }

    /// Ends all contacts, returning the `Up`s owed to the engine.
    pub fn release_all(&mut self) -> Vec<PointerCommand> {
        self.scroll.reset();
        self.tracker.release_all()
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn scroll(&self) -> &ScrollAccumulator {
        &self.scroll
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
