//=========================================================================
// Pointer Tracker
//=========================================================================
//
// Discrete down/move/up protocol with pointer identity.
//
// Architecture:
//   TouchSample → process() → PointerRecord map → PointerCommand(s)
//
// Every id in the record map has seen exactly one unmatched down. Repeated
// downs, and moves or ups for ids that are not tracked, are protocol
// anomalies: the sample produces no command and the caller logs it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{PointerCommand, SurfaceSize, TouchPhase, TouchSample};
use crate::core::lifecycle::ProtocolAnomaly;

//=== PointerRecord =======================================================

/// Last known state of a pointer in contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRecord {
    /// Normalized position.
    pub x: f32,
    pub y: f32,

    /// Host time of the down event, in milliseconds.
    pub created_ms: i64,
}

//=== PointerTracker ======================================================

/// Turns raw samples into ordered per-pointer commands.
#[derive(Debug, Default)]
pub struct PointerTracker {
    records: HashMap<i32, PointerRecord>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            records: HashMap::with_capacity(4),
        }
    }

    //--- Processing -------------------------------------------------------

    /// Converts one sample. On error nothing is emitted and state is unchanged.
    pub fn process(
        &mut self,
        sample: &TouchSample,
        surface: SurfaceSize,
    ) -> Result<Vec<PointerCommand>, ProtocolAnomaly> {
        match sample.phase {
            TouchPhase::Down => {
                let acting = sample.acting()?;
                if self.records.contains_key(&acting.id) {
                    return Err(ProtocolAnomaly::DuplicatePress { id: acting.id });
                }

                let (x, y) = surface.normalize(acting.x, acting.y)?;
                self.records.insert(
                    acting.id,
                    PointerRecord { x, y, created_ms: sample.time_ms },
                );
                Ok(vec![PointerCommand::Down { id: acting.id, x, y }])
            }

            TouchPhase::Move => {
                let mut commands = Vec::with_capacity(sample.pointer_count());
                for pointer in &sample.pointers {
                    let Some(record) = self.records.get_mut(&pointer.id) else {
                        trace!(target: "input", "Move for untracked pointer #{}", pointer.id);
                        continue;
                    };

                    let (x, y) = surface.normalize(pointer.x, pointer.y)?;
                    record.x = x;
                    record.y = y;
                    commands.push(PointerCommand::Move { id: pointer.id, x, y });
                }

                if commands.is_empty() {
                    let id = sample.acting().map(|p| p.id).unwrap_or(-1);
                    return Err(ProtocolAnomaly::UnknownPointer { id });
                }
                Ok(commands)
            }

            TouchPhase::Up => {
                let acting = sample.acting()?;
                let Some(record) = self.records.remove(&acting.id) else {
                    return Err(ProtocolAnomaly::UnknownPointer { id: acting.id });
                };

                // Keep the pair balanced even if the surface size is unusable.
                let (x, y) = surface
                    .normalize(acting.x, acting.y)
                    .unwrap_or((record.x, record.y));
                Ok(vec![PointerCommand::Up { id: acting.id, x, y }])
            }

            TouchPhase::Cancel => Ok(self.release_all()),
        }
    }

    /// Lifts every tracked pointer at its last known position, by id.
    pub fn release_all(&mut self) -> Vec<PointerCommand> {
        let mut released: Vec<(i32, PointerRecord)> = self.records.drain().collect();
        released.sort_by_key(|(id, _)| *id);

        released
            .into_iter()
            .map(|(id, record)| PointerCommand::Up { id, x: record.x, y: record.y })
            .collect()
    }

    //--- Queries ----------------------------------------------------------

    pub fn record(&self, id: i32) -> Option<&PointerRecord> {
        self.records.get(&id)
    }

    pub fn is_tracking(&self, id: i32) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SurfaceSize {
        SurfaceSize::new(200, 100)
    }

    fn single(phase: TouchPhase, id: i32, x: f32, y: f32, t: i64) -> TouchSample {
        TouchSample::new(phase, 0, t).with_pointer(id, x, y)
    }

    #[test]
    fn down_move_up_produces_ordered_commands() {
        let mut tracker = PointerTracker::new();
        let mut commands = Vec::new();

        commands.extend(tracker.process(&single(TouchPhase::Down, 3, 20.0, 10.0, 0), surface()).unwrap());
        commands.extend(tracker.process(&single(TouchPhase::Move, 3, 100.0, 50.0, 16), surface()).unwrap());
        commands.extend(tracker.process(&single(TouchPhase::Up, 3, 200.0, 100.0, 32), surface()).unwrap());

        assert_eq!(
            commands,
            vec![
                PointerCommand::Down { id: 3, x: 0.1, y: 0.1 },
                PointerCommand::Move { id: 3, x: 0.5, y: 0.5 },
                PointerCommand::Up { id: 3, x: 1.0, y: 1.0 },
            ]
        );
        assert!(tracker.is_empty());
    }

    #[test]
    fn second_up_is_ignored() {
        let mut tracker = PointerTracker::new();
        tracker.process(&single(TouchPhase::Down, 3, 0.0, 0.0, 0), surface()).unwrap();
        tracker.process(&single(TouchPhase::Up, 3, 0.0, 0.0, 1), surface()).unwrap();

        let second = tracker.process(&single(TouchPhase::Up, 3, 0.0, 0.0, 2), surface());
        assert_eq!(second, Err(ProtocolAnomaly::UnknownPointer { id: 3 }));
    }

    #[test]
    fn duplicate_down_keeps_first_record() {
        let mut tracker = PointerTracker::new();
        tracker.process(&single(TouchPhase::Down, 1, 20.0, 10.0, 5), surface()).unwrap();

        let again = tracker.process(&single(TouchPhase::Down, 1, 100.0, 50.0, 6), surface());
        assert_eq!(again, Err(ProtocolAnomaly::DuplicatePress { id: 1 }));
        assert_eq!(tracker.record(1).unwrap().created_ms, 5);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn move_for_unknown_pointer_is_anomaly() {
        let mut tracker = PointerTracker::new();
        let result = tracker.process(&single(TouchPhase::Move, 8, 1.0, 1.0, 0), surface());
        assert_eq!(result, Err(ProtocolAnomaly::UnknownPointer { id: 8 }));
    }

    #[test]
    fn move_updates_every_tracked_pointer() {
        let mut tracker = PointerTracker::new();
        tracker.process(&single(TouchPhase::Down, 0, 0.0, 0.0, 0), surface()).unwrap();
        let second = TouchSample::new(TouchPhase::Down, 1, 1)
            .with_pointer(0, 0.0, 0.0)
            .with_pointer(1, 200.0, 100.0);
        tracker.process(&second, surface()).unwrap();

        let moved = TouchSample::new(TouchPhase::Move, 0, 2)
            .with_pointer(0, 100.0, 0.0)
            .with_pointer(1, 100.0, 100.0);
        let commands = tracker.process(&moved, surface()).unwrap();

        assert_eq!(
            commands,
            vec![
                PointerCommand::Move { id: 0, x: 0.5, y: 0.0 },
                PointerCommand::Move { id: 1, x: 0.5, y: 1.0 },
            ]
        );
    }

    #[test]
    fn non_last_pointer_up_uses_action_index() {
        let mut tracker = PointerTracker::new();
        tracker.process(&single(TouchPhase::Down, 0, 0.0, 0.0, 0), surface()).unwrap();
        tracker
            .process(
                &TouchSample::new(TouchPhase::Down, 1, 1)
                    .with_pointer(0, 0.0, 0.0)
                    .with_pointer(5, 100.0, 50.0),
                surface(),
            )
            .unwrap();

        let lifted = TouchSample::new(TouchPhase::Up, 1, 2)
            .with_pointer(0, 0.0, 0.0)
            .with_pointer(5, 100.0, 50.0);
        let commands = tracker.process(&lifted, surface()).unwrap();

        assert_eq!(commands, vec![PointerCommand::Up { id: 5, x: 0.5, y: 0.5 }]);
        assert!(tracker.is_tracking(0));
        assert!(!tracker.is_tracking(5));
    }

    #[test]
    fn down_without_surface_is_not_tracked() {
        let mut tracker = PointerTracker::new();
        let result = tracker.process(&single(TouchPhase::Down, 2, 1.0, 1.0, 0), SurfaceSize::default());
        assert!(matches!(result, Err(ProtocolAnomaly::EmptySurface { .. })));
        assert!(tracker.is_empty());
    }

    #[test]
    fn up_without_surface_uses_last_position() {
        let mut tracker = PointerTracker::new();
        tracker.process(&single(TouchPhase::Down, 2, 100.0, 50.0, 0), surface()).unwrap();
        let commands = tracker
            .process(&single(TouchPhase::Up, 2, 0.0, 0.0, 1), SurfaceSize::default())
            .unwrap();
        assert_eq!(commands, vec![PointerCommand::Up { id: 2, x: 0.5, y: 0.5 }]);
    }

    #[test]
    fn cancel_releases_all_in_id_order() {
        let mut tracker = PointerTracker::new();
        tracker.process(&single(TouchPhase::Down, 7, 0.0, 0.0, 0), surface()).unwrap();
        tracker
            .process(
                &TouchSample::new(TouchPhase::Down, 1, 1)
                    .with_pointer(7, 0.0, 0.0)
                    .with_pointer(2, 200.0, 100.0),
                surface(),
            )
            .unwrap();

        let commands = tracker.process(&TouchSample::new(TouchPhase::Cancel, 0, 2), surface()).unwrap();

        assert_eq!(
            commands,
            vec![
                PointerCommand::Up { id: 2, x: 1.0, y: 1.0 },
                PointerCommand::Up { id: 7, x: 0.0, y: 0.0 },
            ]
        );
        assert!(tracker.is_empty());
    }
}
