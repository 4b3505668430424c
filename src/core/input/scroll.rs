//=========================================================================
// Scroll Accumulator
//=========================================================================
//
// Two-finger delta protocol.
//
// Each move sample is compared with the previous one: elapsed time plus
// raw pixel deltas for the first two pointer slots. The previous sample
// is overwritten on every move, emitted or not, so a run of sub-threshold
// motion still adds up to a real delta relative to the latest position.
//
// Slot 2 only produces a delta when both samples carry a second pointer;
// a finger joining or leaving never yields a jump.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{PointerCommand, TouchPhase, TouchSample};
use crate::core::lifecycle::ProtocolAnomaly;

/// Minimum absolute delta on any component for a sample to be emitted.
pub const DEFAULT_SCROLL_EPSILON: f32 = 0.005;

//=== Slots ===============================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slots {
    primary: (f32, f32),
    secondary: Option<(f32, f32)>,
    time_ms: i64,
}

impl Slots {
    fn from_sample(sample: &TouchSample) -> Result<Self, ProtocolAnomaly> {
        let primary = sample
            .pointers
            .first()
            .ok_or(ProtocolAnomaly::MissingPointer { index: 0 })?;

        Ok(Self {
            primary: (primary.x, primary.y),
            secondary: sample.pointers.get(1).map(|p| (p.x, p.y)),
            time_ms: sample.time_ms,
        })
    }
}

//=== ScrollAccumulator ===================================================

/// Previous-sample bookkeeping for the delta protocol.
#[derive(Debug, Clone)]
pub struct ScrollAccumulator {
    epsilon: f32,
    previous: Option<Slots>,
}

impl ScrollAccumulator {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon, previous: None }
    }

    //--- Gesture Bookkeeping ----------------------------------------------

    /// Starts a gesture at the given positions.
    pub fn begin(&mut self, time_ms: i64, primary: (f32, f32), secondary: Option<(f32, f32)>) {
        self.previous = Some(Slots { primary, secondary, time_ms });
    }

    /// Ends the gesture; the next move only seeds the state.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn previous_primary(&self) -> Option<(f32, f32)> {
        self.previous.map(|s| s.primary)
    }

    pub fn previous_secondary(&self) -> Option<(f32, f32)> {
        self.previous.and_then(|s| s.secondary)
    }

    pub fn previous_time(&self) -> Option<i64> {
        self.previous.map(|s| s.time_ms)
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    //--- Processing -------------------------------------------------------

    /// Converts one sample into at most one `Scroll` command.
    pub fn process(&mut self, sample: &TouchSample) -> Result<Option<PointerCommand>, ProtocolAnomaly> {
        match sample.phase {
            TouchPhase::Down => {
                self.previous = Some(Slots::from_sample(sample)?);
                Ok(None)
            }

            TouchPhase::Move => {
                let current = Slots::from_sample(sample)?;
                let Some(previous) = self.previous.replace(current) else {
                    trace!(target: "input", "Move without gesture start, seeding scroll state");
                    return Ok(None);
                };

                let dt = current.time_ms - previous.time_ms;
                if dt <= 0 {
                    return Err(ProtocolAnomaly::NonMonotonicTimestamp {
                        previous: previous.time_ms,
                        current: current.time_ms,
                    });
                }

                let dx1 = current.primary.0 - previous.primary.0;
                let dy1 = current.primary.1 - previous.primary.1;
                let (dx2, dy2) = match (current.secondary, previous.secondary) {
                    (Some(now), Some(before)) => (now.0 - before.0, now.1 - before.1),
                    _ => (0.0, 0.0),
                };

                if [dx1, dy1, dx2, dy2].iter().all(|d| d.abs() < self.epsilon) {
                    trace!(target: "input", "Scroll below threshold suppressed");
                    return Ok(None);
                }

                Ok(Some(PointerCommand::Scroll { dt, dx1, dy1, dx2, dy2 }))
            }

            TouchPhase::Up => {
                if sample.pointer_count() <= 1 {
                    self.reset();
                } else {
                    // Re-seed from the pointers that stay down.
                    let remaining: Vec<(f32, f32)> = sample
                        .pointers
                        .iter()
                        .enumerate()
                        .filter(|(index, _)| *index != sample.action_index)
                        .map(|(_, p)| (p.x, p.y))
                        .collect();
                    match remaining.first() {
                        Some(&primary) => self.begin(sample.time_ms, primary, remaining.get(1).copied()),
                        None => self.reset(),
                    }
                }
                Ok(None)
            }

            TouchPhase::Cancel => {
                self.reset();
                Ok(None)
            }
        }
    }
}

impl Default for ScrollAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_EPSILON)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(t: i64, x: f32, y: f32) -> TouchSample {
        TouchSample::new(TouchPhase::Move, 0, t).with_pointer(0, x, y)
    }

    fn moved2(t: i64, a: (f32, f32), b: (f32, f32)) -> TouchSample {
        TouchSample::new(TouchPhase::Move, 0, t)
            .with_pointer(0, a.0, a.1)
            .with_pointer(1, b.0, b.1)
    }

    #[test]
    fn single_pointer_delta() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(100, (10.0, 10.0), None);

        let command = acc.process(&moved(150, 20.0, 15.0)).unwrap();

        assert_eq!(
            command,
            Some(PointerCommand::Scroll { dt: 50, dx1: 10.0, dy1: 5.0, dx2: 0.0, dy2: 0.0 })
        );
    }

    #[test]
    fn sub_threshold_motion_is_suppressed_but_recorded() {
        let mut acc = ScrollAccumulator::new(0.005);
        acc.begin(100, (10.0, 10.0), None);

        let command = acc.process(&moved(150, 10.002, 10.0)).unwrap();

        assert_eq!(command, None);
        assert_eq!(acc.previous_primary(), Some((10.002, 10.0)));
        assert_eq!(acc.previous_time(), Some(150));
    }

    #[test]
    fn negative_motion_passes_threshold_symmetrically() {
        let mut acc = ScrollAccumulator::new(0.005);
        acc.begin(0, (10.0, 10.0), None);
        assert!(acc.process(&moved(10, 10.0, 9.998)).unwrap().is_none());

        let mut acc = ScrollAccumulator::new(0.005);
        acc.begin(0, (10.0, 10.0), None);
        assert!(acc.process(&moved(10, 4.0, 10.0)).unwrap().is_some());
    }

    #[test]
    fn non_positive_elapsed_time_is_discarded() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(100, (0.0, 0.0), None);

        assert_eq!(
            acc.process(&moved(100, 50.0, 50.0)),
            Err(ProtocolAnomaly::NonMonotonicTimestamp { previous: 100, current: 100 })
        );
        assert_eq!(
            acc.process(&moved(90, 60.0, 60.0)),
            Err(ProtocolAnomaly::NonMonotonicTimestamp { previous: 100, current: 90 })
        );
        assert_eq!(acc.previous_primary(), Some((60.0, 60.0)));
    }

    #[test]
    fn second_pointer_deltas() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(0, (0.0, 0.0), Some((100.0, 100.0)));

        let command = acc.process(&moved2(20, (1.0, 2.0), (97.0, 104.0))).unwrap();

        assert_eq!(
            command,
            Some(PointerCommand::Scroll { dt: 20, dx1: 1.0, dy1: 2.0, dx2: -3.0, dy2: 4.0 })
        );
    }

    #[test]
    fn pointer_leaving_zeroes_second_slot() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(0, (0.0, 0.0), Some((100.0, 100.0)));

        // Primary stationary, second finger gone: nothing to emit
        assert_eq!(acc.process(&moved(20, 0.0, 0.0)).unwrap(), None);
        assert_eq!(acc.previous_secondary(), None);

        // Second finger returns far away: still no spurious jump
        assert_eq!(acc.process(&moved2(40, (0.0, 0.0), (500.0, 500.0))).unwrap(), None);
    }

    #[test]
    fn down_starts_new_gesture() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(0, (0.0, 0.0), None);

        let down = TouchSample::new(TouchPhase::Down, 0, 500).with_pointer(0, 300.0, 300.0);
        acc.process(&down).unwrap();

        assert_eq!(acc.previous_primary(), Some((300.0, 300.0)));
        assert_eq!(acc.previous_time(), Some(500));
    }

    #[test]
    fn last_up_resets_and_next_move_only_seeds() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(0, (0.0, 0.0), None);

        let up = TouchSample::new(TouchPhase::Up, 0, 10).with_pointer(0, 5.0, 5.0);
        acc.process(&up).unwrap();
        assert_eq!(acc.previous_primary(), None);

        assert_eq!(acc.process(&moved(20, 50.0, 50.0)).unwrap(), None);
        assert_eq!(acc.previous_primary(), Some((50.0, 50.0)));
    }

    #[test]
    fn non_last_up_reseeds_from_remaining() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(0, (0.0, 0.0), Some((100.0, 100.0)));

        let lift_first = TouchSample::new(TouchPhase::Up, 0, 10)
            .with_pointer(0, 1.0, 1.0)
            .with_pointer(1, 101.0, 101.0);
        acc.process(&lift_first).unwrap();

        assert_eq!(acc.previous_primary(), Some((101.0, 101.0)));
        assert_eq!(acc.previous_secondary(), None);
        assert_eq!(acc.previous_time(), Some(10));
    }

    #[test]
    fn cancel_resets() {
        let mut acc = ScrollAccumulator::default();
        acc.begin(0, (0.0, 0.0), None);
        acc.process(&TouchSample::new(TouchPhase::Cancel, 0, 5)).unwrap();
        assert_eq!(acc.previous_primary(), None);
    }
}
