//! Input events as delivered by the input layer.

/// Key code of the `0` key.
pub const KEY_0: u16 = 11;
/// Key code of the `1` key.
pub const KEY_1: u16 = 2;
/// Key code of the `2` key.
pub const KEY_2: u16 = 3;

/// Default input code table, indexed by [`crate::Key::input_index`].
pub const DEFAULT_INPUT_CODES: [u16; 3] = [KEY_0, KEY_1, KEY_2];

/// Class of an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Sync,
    Key,
    Relative,
    Absolute,
    Misc,
    Vendor,
    Other(u8),
}

impl From<u8> for EventKind {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Sync,
            0x01 => Self::Key,
            0x02 => Self::Relative,
            0x03 => Self::Absolute,
            0x04 => Self::Misc,
            0xF0 => Self::Vendor,
            other => Self::Other(other),
        }
    }
}

impl From<EventKind> for u8 {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Sync => 0x00,
            EventKind::Key => 0x01,
            EventKind::Relative => 0x02,
            EventKind::Absolute => 0x03,
            EventKind::Misc => 0x04,
            EventKind::Vendor => 0xF0,
            EventKind::Other(other) => other,
        }
    }
}

/// Press or release of a key. Edges are expected to be debounced by the input layer and to
/// alternate for a given key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Edge {
    Pressed,
    Released,
}

impl From<bool> for Edge {
    fn from(pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else {
            Self::Released
        }
    }
}

/// A single raw input event. Consumed once by the dispatcher, never retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    #[inline]
    #[must_use]
    pub const fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// A key edge event.
    #[inline]
    #[must_use]
    pub fn key(code: u16, pressed: bool) -> Self {
        Self::new(EventKind::Key, code, i32::from(pressed))
    }

    /// Returns the edge of a key event, or `None` for any other event class.
    #[inline]
    #[must_use]
    pub fn edge(&self) -> Option<Edge> {
        (self.kind == EventKind::Key).then_some(Edge::from(self.value != 0))
    }
}
