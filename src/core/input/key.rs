//=========================================================================
// Key Mapper
//=========================================================================
//
// Raw platform key codes → the closed set of keys the engine understands.
//
// Anything unrecognized becomes `LogicalKey::None`. The engine still
// receives the down/up pair for it (with ordinal 0) and ignores it.
//
//=========================================================================

//=== Raw Codes ===========================================================

/// Android key codes consumed by the mapper.
pub mod raw {
    pub const KEYCODE_BACK: i32 = 4;
    pub const KEYCODE_DPAD_UP: i32 = 19;
    pub const KEYCODE_DPAD_DOWN: i32 = 20;
    pub const KEYCODE_DPAD_LEFT: i32 = 21;
    pub const KEYCODE_DPAD_RIGHT: i32 = 22;
    pub const KEYCODE_ESCAPE: i32 = 111;
}

//=== LogicalKey ==========================================================

/// Keys forwarded to the engine, by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum LogicalKey {
    /// Unmapped key. Forwarded, never acted upon.
    #[default]
    None = 0,
    Back = 1,
    Up = 2,
    Down = 3,
    Left = 4,
    Right = 5,
}

impl LogicalKey {
    /// Maps a raw platform key code.
    pub fn from_raw(code: i32) -> Self {
        match code {
            raw::KEYCODE_DPAD_UP => Self::Up,
            raw::KEYCODE_DPAD_DOWN => Self::Down,
            raw::KEYCODE_DPAD_LEFT => Self::Left,
            raw::KEYCODE_DPAD_RIGHT => Self::Right,
            raw::KEYCODE_BACK | raw::KEYCODE_ESCAPE => Self::Back,
            _ => Self::None,
        }
    }

    /// Value passed to `key_down`/`key_up`.
    pub fn ordinal(self) -> i32 {
        self as i32
    }
}

impl From<i32> for LogicalKey {
    fn from(code: i32) -> Self {
        Self::from_raw(code)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpad_codes_map_to_directions() {
        assert_eq!(LogicalKey::from_raw(raw::KEYCODE_DPAD_UP), LogicalKey::Up);
        assert_eq!(LogicalKey::from_raw(raw::KEYCODE_DPAD_DOWN), LogicalKey::Down);
        assert_eq!(LogicalKey::from_raw(raw::KEYCODE_DPAD_LEFT), LogicalKey::Left);
    }

    #[test]
    fn right_is_distinct_from_left() {
        assert_eq!(LogicalKey::from_raw(raw::KEYCODE_DPAD_RIGHT), LogicalKey::Right);
        assert_ne!(
            LogicalKey::from_raw(raw::KEYCODE_DPAD_RIGHT),
            LogicalKey::from_raw(raw::KEYCODE_DPAD_LEFT)
        );
    }

    #[test]
    fn back_and_cancel_map_to_back() {
        assert_eq!(LogicalKey::from(raw::KEYCODE_BACK), LogicalKey::Back);
        assert_eq!(LogicalKey::from(raw::KEYCODE_ESCAPE), LogicalKey::Back);
    }

    #[test]
    fn unknown_code_is_none_with_ordinal_zero() {
        let key = LogicalKey::from_raw(9999);
        assert_eq!(key, LogicalKey::None);
        assert_eq!(key.ordinal(), 0);
        assert_eq!(LogicalKey::default(), LogicalKey::None);
    }

    #[test]
    fn ordinals_are_stable() {
        let ordinals: Vec<i32> = [
            LogicalKey::None,
            LogicalKey::Back,
            LogicalKey::Up,
            LogicalKey::Down,
            LogicalKey::Left,
            LogicalKey::Right,
        ]
        .iter()
        .map(|k| k.ordinal())
        .collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4, 5]);
    }
}
