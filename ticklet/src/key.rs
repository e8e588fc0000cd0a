use strum::IntoEnumIterator;

use crate::Action;

/// Logical keys recognized by the dispatcher.
///
/// Each key owns exactly one [`Action`] and one slot in the input code table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum Key {
    K1,
    K2,
}

impl Key {
    /// Index of this key in the input code table.
    #[inline]
    #[must_use]
    pub const fn input_index(self) -> usize {
        match self {
            Self::K1 => 1,
            Self::K2 => 2,
        }
    }

    #[inline]
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::K1 => Action::AlternateReset,
            Self::K2 => Action::NormalReset,
        }
    }

    /// Looks up the key whose code in `input_codes` equals `code`.
    ///
    /// Keys whose input index falls outside the table are unbound.
    #[must_use]
    pub fn from_code(input_codes: &[u16], code: u16) -> Option<Self> {
        Self::iter().find(|key| input_codes.get(key.input_index()) == Some(&code))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::Key;
    use crate::{Action, DEFAULT_INPUT_CODES, KEY_0, KEY_1, KEY_2};

    #[test]
    fn test_default_bindings() {
        assert_eq!(Key::from_code(&DEFAULT_INPUT_CODES, KEY_1), Some(Key::K1));
        assert_eq!(Key::from_code(&DEFAULT_INPUT_CODES, KEY_2), Some(Key::K2));
        assert_eq!(Key::from_code(&DEFAULT_INPUT_CODES, KEY_0), None);
        assert_eq!(Key::from_code(&DEFAULT_INPUT_CODES, 0xFFFF), None);
    }

    #[test]
    fn test_keys_map_one_to_one() {
        let actions: Vec<Action> = Key::iter().map(Key::action).collect();
        assert_eq!(actions, [Action::AlternateReset, Action::NormalReset]);

        for key in Key::iter() {
            assert_eq!(key.action().key(), key);
        }
    }

    #[test]
    fn test_short_table_leaves_keys_unbound() {
        let codes = [KEY_0, KEY_1];
        assert_eq!(Key::from_code(&codes, KEY_1), Some(Key::K1));
        assert_eq!(Key::from_code(&codes, KEY_2), None);
        assert_eq!(Key::from_code(&[], KEY_1), None);
    }
}
