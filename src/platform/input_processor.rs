//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit events into the host-neutral samples the bridge expects.
//
// Architecture:
//   Winit Events → InputProcessor → TouchSample / LogicalKey → EventBridge
//
// The left mouse button behaves as a single finger with pointer id 0;
// cursor motion is only a touch while the button is held. Touch contacts
// keep winit's ids, shifted past the mouse id. Timestamps are milliseconds
// since the processor was created.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, TouchPhase as WinitTouchPhase},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{LogicalKey, PointerSample, TouchPhase, TouchSample};

/// Pointer id reported for the left mouse button.
pub(crate) const MOUSE_POINTER_ID: i32 = 0;

//=== InputProcessor ======================================================

/// Stateful winit → sample conversion.
pub(crate) struct InputProcessor {
    started: Instant,
    cursor: (f32, f32),
    mouse_down: bool,
    contacts: Vec<PointerSample>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            started: Instant::now(),
            cursor: (0.0, 0.0),
            mouse_down: false,
            contacts: Vec::with_capacity(4),
        }
    }

    /// Host time in milliseconds.
    pub(crate) fn now_ms(&self) -> i64 {
        i64::try_from(self.started.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    //--- Mouse ------------------------------------------------------------

    /// Records the cursor; yields a move while the left button is held.
    pub(crate) fn process_cursor_moved(&mut self, x: f32, y: f32, time_ms: i64) -> Option<TouchSample> {
        self.cursor = (x, y);
        self.mouse_down
            .then(|| self.mouse_sample(TouchPhase::Move, time_ms))
    }

    /// Left button press/release as a single-pointer touch.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        time_ms: i64,
    ) -> Option<TouchSample> {
        if button != MouseButton::Left {
            return None;
        }

        match (state, self.mouse_down) {
            (ElementState::Pressed, false) => {
                self.mouse_down = true;
                Some(self.mouse_sample(TouchPhase::Down, time_ms))
            }
            (ElementState::Released, true) => {
                self.mouse_down = false;
                Some(self.mouse_sample(TouchPhase::Up, time_ms))
            }
            _ => None,
        }
    }

    /// Forgets held buttons and contacts without emitting anything.
    ///
    /// Used on focus loss, after the bridge has already lifted them.
    pub(crate) fn reset(&mut self) {
        self.mouse_down = false;
        self.contacts.clear();
    }

    //--- Touch ------------------------------------------------------------

    /// Converts one winit touch into a sample carrying every active contact.
    pub(crate) fn process_touch(
        &mut self,
        phase: WinitTouchPhase,
        touch_id: u64,
        x: f32,
        y: f32,
        time_ms: i64,
    ) -> Option<TouchSample> {
        let id = touch_pointer_id(touch_id);
        let index = self.contacts.iter().position(|p| p.id == id);

        match phase {
            WinitTouchPhase::Started => {
                if index.is_some() {
                    return None;
                }
                self.contacts.push(PointerSample { id, x, y });
                Some(self.touch_sample(TouchPhase::Down, self.contacts.len() - 1, time_ms))
            }
            WinitTouchPhase::Moved => {
                let index = index?;
                self.contacts[index] = PointerSample { id, x, y };
                Some(self.touch_sample(TouchPhase::Move, index, time_ms))
            }
            WinitTouchPhase::Ended => {
                let index = index?;
                self.contacts[index] = PointerSample { id, x, y };
                let sample = self.touch_sample(TouchPhase::Up, index, time_ms);
                self.contacts.remove(index);
                Some(sample)
            }
            WinitTouchPhase::Cancelled => {
                let sample = self.touch_sample(TouchPhase::Cancel, 0, time_ms);
                self.contacts.clear();
                Some(sample)
            }
        }
    }

    //--- Keys -------------------------------------------------------------

    /// Maps a key transition. Repeats are dropped; unknown keys map to `None`.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<(LogicalKey, bool)> {
        if key_event.repeat {
            return None;
        }

        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => LogicalKey::from(code),
            PhysicalKey::Unidentified(_) => LogicalKey::None,
        };
        Some((key, key_event.state == ElementState::Pressed))
    }

    //--- Internal Helpers -------------------------------------------------

    fn mouse_sample(&self, phase: TouchPhase, time_ms: i64) -> TouchSample {
        TouchSample::new(phase, 0, time_ms).with_pointer(MOUSE_POINTER_ID, self.cursor.0, self.cursor.1)
    }

    fn touch_sample(&self, phase: TouchPhase, action_index: usize, time_ms: i64) -> TouchSample {
        TouchSample {
            phase,
            action_index,
            pointers: self.contacts.clone(),
            time_ms,
        }
    }
}

/// Maps a winit touch id into `1..=i32::MAX`, clear of the mouse id.
fn touch_pointer_id(touch_id: u64) -> i32 {
    let folded = touch_id % (i32::MAX as u64);
    folded as i32 + 1
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Desktop key layout: arrows steer, Escape and Backspace go back.
impl From<WinitKeyCode> for LogicalKey {
    fn from(code: WinitKeyCode) -> Self {
        match code {
            WinitKeyCode::ArrowUp => LogicalKey::Up,
            WinitKeyCode::ArrowDown => LogicalKey::Down,
            WinitKeyCode::ArrowLeft => LogicalKey::Left,
            WinitKeyCode::ArrowRight => LogicalKey::Right,
            WinitKeyCode::Escape | WinitKeyCode::Backspace => LogicalKey::Back,
            _ => LogicalKey::None,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
