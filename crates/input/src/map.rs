//! Key mapping from terminal events to simulator inputs.

use crate::types::ButtonId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Button(ButtonId),
    /// Start a shake burst on the simulated accelerometer.
    Shake,
}

/// Map keyboard input to simulator inputs.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyInput> {
    match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(KeyInput::Button(ButtonId::A))
        }
        KeyCode::Right | KeyCode::Char('b') | KeyCode::Char('B') => {
            Some(KeyInput::Button(ButtonId::B))
        }
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => Some(KeyInput::Shake),
        _ => None,
    }
}

/// Check if key should quit the simulator.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_keys() {
        for code in [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')] {
            assert_eq!(
                handle_key_event(KeyEvent::from(code)),
                Some(KeyInput::Button(ButtonId::A))
            );
        }
        for code in [KeyCode::Right, KeyCode::Char('b'), KeyCode::Char('B')] {
            assert_eq!(
                handle_key_event(KeyEvent::from(code)),
                Some(KeyInput::Button(ButtonId::B))
            );
        }
    }

    #[test]
    fn test_shake_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('s'))),
            Some(KeyInput::Shake)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(KeyInput::Shake)
        );
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }
}
